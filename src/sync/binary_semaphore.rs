use std::ptr;

use anyhow::Result;
use ash::vk;

/// A single-use-per-frame binary semaphore, used for the
/// acquire/render-complete pair in `PresentFrame`.
#[derive(Debug, Copy, Clone)]
pub struct BinarySemaphore {
    pub handle: vk::Semaphore,
}

impl BinarySemaphore {
    pub fn new(device: &ash::Device) -> Result<Self> {
        let handle = unsafe {
            device.create_semaphore(
                &vk::SemaphoreCreateInfo {
                    s_type: vk::StructureType::SEMAPHORE_CREATE_INFO,
                    p_next: ptr::null(),
                    flags: vk::SemaphoreCreateFlags::empty(),
                    _marker: Default::default(),
                },
                None,
            )?
        };
        Ok(Self { handle })
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe { device.destroy_semaphore(self.handle, None) };
    }
}
