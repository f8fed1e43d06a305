use std::ptr;

use anyhow::Result;
use ash::vk;

/// The pool itself carries no pool-size bookkeeping beyond what Vulkan
/// needs to create it, because reset/allocate failures are the driver's
/// problem once the pool is correctly sized at creation.
#[derive(Debug, Clone)]
pub struct DescriptorPool {
    pub handle: vk::DescriptorPool,
}

#[derive(Copy, Clone, Default, Debug)]
pub struct PoolSize {
    inner: vk::DescriptorPoolSize,
}

impl PoolSize {
    pub fn descriptor_type(mut self, ty: vk::DescriptorType) -> Self {
        self.inner.ty = ty;
        self
    }

    pub fn descriptor_count(mut self, count: u32) -> Self {
        self.inner.descriptor_count = count;
        self
    }
}

impl DescriptorPool {
    pub fn new(
        device: &ash::Device,
        flags: vk::DescriptorPoolCreateFlags,
        max_sets: u32,
        pool_sizes: &[PoolSize],
    ) -> Result<Self> {
        let raw_sizes: Vec<vk::DescriptorPoolSize> = pool_sizes.iter().map(|p| p.inner).collect();
        let pool_ci = vk::DescriptorPoolCreateInfo {
            s_type: vk::StructureType::DESCRIPTOR_POOL_CREATE_INFO,
            p_next: ptr::null(),
            flags,
            max_sets,
            pool_size_count: raw_sizes.len() as u32,
            p_pool_sizes: raw_sizes.as_ptr(),
            _marker: Default::default(),
        };
        let handle = unsafe { device.create_descriptor_pool(&pool_ci, None)? };
        #[cfg(feature = "log-lifetimes")]
        tracing::trace!("created VkDescriptorPool {:?}", handle);
        Ok(Self { handle })
    }

    pub fn reset(&self, device: &ash::Device, flags: vk::DescriptorPoolResetFlags) -> Result<()> {
        unsafe { device.reset_descriptor_pool(self.handle, flags)? };
        Ok(())
    }

    pub fn allocate(&self, device: &ash::Device, layout: vk::DescriptorSetLayout) -> Result<vk::DescriptorSet> {
        let alloc_info = vk::DescriptorSetAllocateInfo {
            s_type: vk::StructureType::DESCRIPTOR_SET_ALLOCATE_INFO,
            p_next: ptr::null(),
            descriptor_pool: self.handle,
            descriptor_set_count: 1,
            p_set_layouts: &layout,
            _marker: Default::default(),
        };
        let mut sets = unsafe { device.allocate_descriptor_sets(&alloc_info)? };
        Ok(sets.pop().expect("allocate_descriptor_sets with count=1 returns one set"))
    }

    pub fn destroy(&self, device: &ash::Device) {
        #[cfg(feature = "log-lifetimes")]
        tracing::trace!("destroying VkDescriptorPool {:?}", self.handle);
        unsafe { device.destroy_descriptor_pool(self.handle, None) };
    }
}
