//! Allocator seam: the device is generic over an [`Allocator`] backend so
//! the primary VMA-style allocator (`vk-mem`) and an alternate
//! (`gpu-allocator`) can both satisfy resource creation without the rest of
//! the crate caring which one is active. Both backends create the native
//! object and bind its memory in one call, so the trait models that
//! directly instead of exposing a generic "allocate memory for an
//! already-created object" step.

use ash::vk;

/// An opaque allocation record. Resource records store one of these rather
/// than a raw native allocation handle so the destroy queue can free memory
/// without re-deriving allocator-specific state.
pub trait Allocation: std::fmt::Debug {
    fn mapped_ptr(&self) -> Option<std::ptr::NonNull<std::ffi::c_void>>;
}

pub trait Allocator {
    type Allocation: Allocation;

    fn create_buffer(
        &mut self,
        info: &vk::BufferCreateInfo,
        location: MemoryLocation,
    ) -> anyhow::Result<(vk::Buffer, Self::Allocation)>;

    fn create_image(
        &mut self,
        info: &vk::ImageCreateInfo,
        location: MemoryLocation,
    ) -> anyhow::Result<(vk::Image, Self::Allocation)>;

    fn destroy_buffer(&mut self, buffer: vk::Buffer, allocation: Self::Allocation);

    fn destroy_image(&mut self, image: vk::Image, allocation: Self::Allocation);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemoryLocation {
    GpuOnly,
    CpuToGpu,
    GpuToCpu,
}

#[cfg(feature = "vk-mem-rs")]
pub mod vma {
    use super::*;
    use vk_mem::Alloc;

    #[derive(Debug)]
    pub struct VmaAllocation {
        pub(crate) allocation: vk_mem::Allocation,
        pub(crate) mapped_ptr: Option<std::ptr::NonNull<std::ffi::c_void>>,
    }

    // SAFETY: the crate drives every allocator call from the single thread
    // that owns the `GpuDevice`; this only needs to be `Send` so a deferred
    // destroyer closure capturing it can be boxed as `dyn FnOnce() + Send`,
    // never because it is actually handed across threads.
    unsafe impl Send for VmaAllocation {}

    impl Allocation for VmaAllocation {
        fn mapped_ptr(&self) -> Option<std::ptr::NonNull<std::ffi::c_void>> {
            self.mapped_ptr
        }
    }

    /// Thin wrapper so [`vk_mem::Allocator`] satisfies the crate's
    /// [`Allocator`] trait; the device owns one of these and drives all
    /// resource creation from the single recording thread.
    pub struct VmaAllocator {
        pub(crate) inner: vk_mem::Allocator,
    }

    impl std::fmt::Debug for VmaAllocator {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("VmaAllocator").finish_non_exhaustive()
        }
    }

    fn location_to_vma(location: MemoryLocation) -> vk_mem::MemoryUsage {
        match location {
            MemoryLocation::GpuOnly => vk_mem::MemoryUsage::AutoPreferDevice,
            MemoryLocation::CpuToGpu | MemoryLocation::GpuToCpu => vk_mem::MemoryUsage::AutoPreferHost,
        }
    }

    fn alloc_create_info(location: MemoryLocation) -> vk_mem::AllocationCreateInfo {
        let mut info = vk_mem::AllocationCreateInfo {
            usage: location_to_vma(location),
            ..Default::default()
        };
        if matches!(location, MemoryLocation::CpuToGpu | MemoryLocation::GpuToCpu) {
            info.flags = vk_mem::AllocationCreateFlags::MAPPED
                | vk_mem::AllocationCreateFlags::HOST_ACCESS_SEQUENTIAL_WRITE;
        }
        info
    }

    impl Allocator for VmaAllocator {
        type Allocation = VmaAllocation;

        fn create_buffer(
            &mut self,
            info: &vk::BufferCreateInfo,
            location: MemoryLocation,
        ) -> anyhow::Result<(vk::Buffer, Self::Allocation)> {
            let create_info = alloc_create_info(location);
            let (buffer, mut allocation) = unsafe { self.inner.create_buffer(info, &create_info)? };
            let mapped_ptr =
                std::ptr::NonNull::new(self.inner.get_allocation_info(&allocation).mapped_data);
            let _ = &mut allocation;
            Ok((buffer, VmaAllocation { allocation, mapped_ptr }))
        }

        fn create_image(
            &mut self,
            info: &vk::ImageCreateInfo,
            location: MemoryLocation,
        ) -> anyhow::Result<(vk::Image, Self::Allocation)> {
            let create_info = alloc_create_info(location);
            let (image, allocation) = unsafe { self.inner.create_image(info, &create_info)? };
            Ok((image, VmaAllocation { allocation, mapped_ptr: None }))
        }

        fn destroy_buffer(&mut self, buffer: vk::Buffer, mut allocation: Self::Allocation) {
            unsafe { self.inner.destroy_buffer(buffer, &mut allocation.allocation) };
        }

        fn destroy_image(&mut self, image: vk::Image, mut allocation: Self::Allocation) {
            unsafe { self.inner.destroy_image(image, &mut allocation.allocation) };
        }
    }
}

#[cfg(feature = "gpu-allocator")]
pub mod gpu_alloc {
    use super::*;
    use gpu_allocator::vulkan as ga;
    use gpu_allocator::MemoryLocation as GaLocation;

    #[derive(Debug)]
    pub struct GpuAllocatorAllocation {
        pub(crate) allocation: ga::Allocation,
    }

    // SAFETY: see the matching impl on `vma::VmaAllocation` — single
    // recording thread only, `Send` is needed purely to satisfy
    // `DestroyQueue`'s closure bound.
    unsafe impl Send for GpuAllocatorAllocation {}

    impl Allocation for GpuAllocatorAllocation {
        fn mapped_ptr(&self) -> Option<std::ptr::NonNull<std::ffi::c_void>> {
            self.allocation.mapped_ptr()
        }
    }

    fn location_to_ga(location: MemoryLocation) -> GaLocation {
        match location {
            MemoryLocation::GpuOnly => GaLocation::GpuOnly,
            MemoryLocation::CpuToGpu => GaLocation::CpuToGpu,
            MemoryLocation::GpuToCpu => GaLocation::GpuToCpu,
        }
    }

    /// Owns both the `gpu-allocator` instance and the `ash::Device` handle
    /// it needs to create/bind native objects itself, since `gpu-allocator`
    /// (unlike `vk-mem`) only manages memory, not the objects bound to it.
    pub struct GpuAllocatorBackend {
        pub(crate) inner: ga::Allocator,
        pub(crate) device: ash::Device,
    }

    impl std::fmt::Debug for GpuAllocatorBackend {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("GpuAllocatorBackend").finish_non_exhaustive()
        }
    }

    impl Allocator for GpuAllocatorBackend {
        type Allocation = GpuAllocatorAllocation;

        fn create_buffer(
            &mut self,
            info: &vk::BufferCreateInfo,
            location: MemoryLocation,
        ) -> anyhow::Result<(vk::Buffer, Self::Allocation)> {
            let buffer = unsafe { self.device.create_buffer(info, None)? };
            let requirements = unsafe { self.device.get_buffer_memory_requirements(buffer) };
            let allocation = self.inner.allocate(&ga::AllocationCreateDesc {
                name: "buffer",
                requirements,
                location: location_to_ga(location),
                linear: true,
                allocation_scheme: ga::AllocationScheme::GpuAllocatorManaged,
            })?;
            unsafe {
                self.device
                    .bind_buffer_memory(buffer, allocation.memory(), allocation.offset())?
            };
            Ok((buffer, GpuAllocatorAllocation { allocation }))
        }

        fn create_image(
            &mut self,
            info: &vk::ImageCreateInfo,
            location: MemoryLocation,
        ) -> anyhow::Result<(vk::Image, Self::Allocation)> {
            let image = unsafe { self.device.create_image(info, None)? };
            let requirements = unsafe { self.device.get_image_memory_requirements(image) };
            let allocation = self.inner.allocate(&ga::AllocationCreateDesc {
                name: "image",
                requirements,
                location: location_to_ga(location),
                linear: false,
                allocation_scheme: ga::AllocationScheme::GpuAllocatorManaged,
            })?;
            unsafe {
                self.device
                    .bind_image_memory(image, allocation.memory(), allocation.offset())?
            };
            Ok((image, GpuAllocatorAllocation { allocation }))
        }

        fn destroy_buffer(&mut self, buffer: vk::Buffer, allocation: Self::Allocation) {
            let _ = self.inner.free(allocation.allocation);
            unsafe { self.device.destroy_buffer(buffer, None) };
        }

        fn destroy_image(&mut self, image: vk::Image, allocation: Self::Allocation) {
            let _ = self.inner.free(allocation.allocation);
            unsafe { self.device.destroy_image(image, None) };
        }
    }
}

#[cfg(feature = "vk-mem-rs")]
pub type DefaultAllocator = vma::VmaAllocator;
#[cfg(all(feature = "gpu-allocator", not(feature = "vk-mem-rs")))]
pub type DefaultAllocator = gpu_alloc::GpuAllocatorBackend;
