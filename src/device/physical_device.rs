use ash::vk;

use crate::error::RhiError;

/// The device features `Init` requires to be enabled: buffer device
/// address, descriptor indexing (partially-bound + runtime arrays),
/// dynamic rendering, synchronization-2, BC texture compression.
#[derive(Debug, Copy, Clone)]
pub struct RequiredFeatures;

impl RequiredFeatures {
    pub fn vulkan12(&self) -> vk::PhysicalDeviceVulkan12Features<'static> {
        vk::PhysicalDeviceVulkan12Features {
            s_type: vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_2_FEATURES,
            buffer_device_address: vk::TRUE,
            descriptor_indexing: vk::TRUE,
            descriptor_binding_partially_bound: vk::TRUE,
            runtime_descriptor_array: vk::TRUE,
            descriptor_binding_update_unused_while_pending: vk::TRUE,
            descriptor_binding_sampled_image_update_after_bind: vk::TRUE,
            descriptor_binding_storage_image_update_after_bind: vk::TRUE,
            descriptor_binding_storage_buffer_update_after_bind: vk::TRUE,
            ..Default::default()
        }
    }

    pub fn vulkan13(&self) -> vk::PhysicalDeviceVulkan13Features<'static> {
        vk::PhysicalDeviceVulkan13Features {
            s_type: vk::StructureType::PHYSICAL_DEVICE_VULKAN_1_3_FEATURES,
            dynamic_rendering: vk::TRUE,
            synchronization2: vk::TRUE,
            ..Default::default()
        }
    }

    /// Requires an API version equivalent to Vulkan 1.3.
    pub const MIN_API_VERSION: u32 = vk::API_VERSION_1_3;

    pub const REQUIRED_FORMAT_FEATURE: vk::FormatFeatureFlags = vk::FormatFeatureFlags::empty();
}

#[derive(Debug, Copy, Clone)]
pub struct QueueFamilyInfo {
    pub family_index: u32,
    pub graphics: bool,
    pub present: bool,
    pub transfer: bool,
}

#[derive(Debug, Clone)]
pub struct PhysicalDevice {
    pub handle: vk::PhysicalDevice,
    pub properties: vk::PhysicalDeviceProperties,
    pub queue_families: Vec<QueueFamilyInfo>,
    pub is_discrete: bool,
}

impl PhysicalDevice {
    /// Device-selection policy: prefer discrete, and require a queue
    /// family with both graphics and present support.
    pub fn select_best<'a>(candidates: &'a [PhysicalDevice]) -> Result<&'a PhysicalDevice, RhiError> {
        candidates
            .iter()
            .filter(|pd| {
                pd.queue_families
                    .iter()
                    .any(|qf| qf.graphics && qf.present)
            })
            .max_by_key(|pd| pd.is_discrete as u8)
            .ok_or(RhiError::NoPhysicalDevice)
    }

    pub fn combined_graphics_present_family(&self) -> Option<u32> {
        self.queue_families
            .iter()
            .find(|qf| qf.graphics && qf.present)
            .map(|qf| qf.family_index)
    }

    pub fn dedicated_transfer_family(&self) -> Option<u32> {
        self.queue_families
            .iter()
            .find(|qf| qf.transfer && !qf.graphics)
            .map(|qf| qf.family_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pd(discrete: bool, family_ok: bool) -> PhysicalDevice {
        PhysicalDevice {
            handle: vk::PhysicalDevice::null(),
            properties: unsafe { std::mem::zeroed() },
            queue_families: vec![QueueFamilyInfo {
                family_index: 0,
                graphics: family_ok,
                present: family_ok,
                transfer: family_ok,
            }],
            is_discrete: discrete,
        }
    }

    #[test]
    fn prefers_discrete_when_both_suitable() {
        let candidates = vec![pd(false, true), pd(true, true)];
        let chosen = PhysicalDevice::select_best(&candidates).unwrap();
        assert!(chosen.is_discrete);
    }

    #[test]
    fn rejects_devices_without_combined_queue() {
        let candidates = vec![pd(true, false)];
        assert!(PhysicalDevice::select_best(&candidates).is_err());
    }
}
