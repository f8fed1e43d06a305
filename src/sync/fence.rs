use std::ptr;

use anyhow::Result;
use ash::vk;

#[derive(Debug, Copy, Clone)]
pub struct Fence {
    pub handle: vk::Fence,
}

impl Fence {
    pub fn new(device: &ash::Device, flags: vk::FenceCreateFlags) -> Result<Self> {
        let handle = unsafe {
            device.create_fence(
                &vk::FenceCreateInfo {
                    s_type: vk::StructureType::FENCE_CREATE_INFO,
                    p_next: ptr::null(),
                    flags,
                    _marker: Default::default(),
                },
                None,
            )?
        };
        Ok(Self { handle })
    }

    /// Blocking wait, bounded in practice to roughly one frame. A
    /// timeout here is backend failure, not a recoverable condition.
    pub fn wait(&self, device: &ash::Device, timeout_ns: u64) -> Result<()> {
        unsafe { device.wait_for_fences(&[self.handle], true, timeout_ns)? };
        Ok(())
    }

    pub fn reset(&self, device: &ash::Device) -> Result<()> {
        unsafe { device.reset_fences(&[self.handle])? };
        Ok(())
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe { device.destroy_fence(self.handle, None) };
    }
}
