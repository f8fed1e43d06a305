use std::ptr;

use anyhow::Result;
use ash::vk;

/// A monotonically increasing counter semaphore (`VK_KHR_timeline_semaphore`,
/// core since 1.2). Unlike [`crate::sync::BinarySemaphore`] it isn't
/// consumed by a single wait/signal pair, so one instance can track
/// completion across many in-flight submissions without per-frame
/// reallocation.
#[derive(Debug, Copy, Clone)]
pub struct TimelineSemaphore {
    pub handle: vk::Semaphore,
}

impl TimelineSemaphore {
    pub fn new(device: &ash::Device, initial_value: u64) -> Result<Self> {
        let mut type_info = vk::SemaphoreTypeCreateInfo {
            s_type: vk::StructureType::SEMAPHORE_TYPE_CREATE_INFO,
            p_next: ptr::null(),
            semaphore_type: vk::SemaphoreType::TIMELINE,
            initial_value,
            _marker: Default::default(),
        };
        let create_info = vk::SemaphoreCreateInfo {
            s_type: vk::StructureType::SEMAPHORE_CREATE_INFO,
            p_next: &mut type_info as *mut _ as *const std::ffi::c_void,
            flags: vk::SemaphoreCreateFlags::empty(),
            _marker: Default::default(),
        };
        let handle = unsafe { device.create_semaphore(&create_info, None)? };
        Ok(Self { handle })
    }

    pub fn value(&self, device: &ash::Device) -> Result<u64> {
        Ok(unsafe { device.get_semaphore_counter_value(self.handle)? })
    }

    /// Blocks the calling thread until the semaphore reaches `value`.
    pub fn wait_for(&self, device: &ash::Device, value: u64, timeout_ns: u64) -> Result<()> {
        let wait_info = vk::SemaphoreWaitInfo {
            s_type: vk::StructureType::SEMAPHORE_WAIT_INFO,
            p_next: ptr::null(),
            flags: vk::SemaphoreWaitFlags::empty(),
            semaphore_count: 1,
            p_semaphores: &self.handle,
            p_values: &value,
            _marker: Default::default(),
        };
        unsafe { device.wait_semaphores(&wait_info, timeout_ns)? };
        Ok(())
    }

    /// Host-side signal, used to unblock GPU waits without a matching
    /// queue submission (e.g. tearing down after a device-lost abort).
    pub fn signal(&self, device: &ash::Device, value: u64) -> Result<()> {
        let signal_info = vk::SemaphoreSignalInfo {
            s_type: vk::StructureType::SEMAPHORE_SIGNAL_INFO,
            p_next: ptr::null(),
            semaphore: self.handle,
            value,
            _marker: Default::default(),
        };
        unsafe { device.signal_semaphore(&signal_info)? };
        Ok(())
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe { device.destroy_semaphore(self.handle, None) };
    }
}
