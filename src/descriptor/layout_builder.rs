use std::ptr;

use anyhow::Result;
use ash::vk;

/// A plain builder over `vk::DescriptorSetLayoutBinding` plus the binding
/// flags (`PARTIALLY_BOUND` etc.) descriptor indexing needs.
#[derive(Debug, Copy, Clone)]
pub struct LayoutBinding {
    pub binding: u32,
    pub descriptor_type: vk::DescriptorType,
    pub descriptor_count: u32,
    pub stage_flags: vk::ShaderStageFlags,
    pub binding_flags: vk::DescriptorBindingFlags,
}

#[derive(Debug, Default)]
pub struct DescriptorSetLayoutBuilder {
    bindings: Vec<LayoutBinding>,
}

impl DescriptorSetLayoutBuilder {
    pub fn add_binding(mut self, binding: LayoutBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn build(
        self,
        device: &ash::Device,
        create_flags: vk::DescriptorSetLayoutCreateFlags,
    ) -> Result<vk::DescriptorSetLayout> {
        let raw_bindings: Vec<vk::DescriptorSetLayoutBinding> = self
            .bindings
            .iter()
            .map(|b| vk::DescriptorSetLayoutBinding {
                binding: b.binding,
                descriptor_type: b.descriptor_type,
                descriptor_count: b.descriptor_count,
                stage_flags: b.stage_flags,
                p_immutable_samplers: ptr::null(),
                _marker: Default::default(),
            })
            .collect();
        let binding_flags: Vec<vk::DescriptorBindingFlags> =
            self.bindings.iter().map(|b| b.binding_flags).collect();

        let mut flags_ci = vk::DescriptorSetLayoutBindingFlagsCreateInfo {
            s_type: vk::StructureType::DESCRIPTOR_SET_LAYOUT_BINDING_FLAGS_CREATE_INFO,
            p_next: ptr::null(),
            binding_count: binding_flags.len() as u32,
            p_binding_flags: binding_flags.as_ptr(),
            _marker: Default::default(),
        };
        let layout_ci = vk::DescriptorSetLayoutCreateInfo {
            s_type: vk::StructureType::DESCRIPTOR_SET_LAYOUT_CREATE_INFO,
            p_next: &mut flags_ci as *mut _ as *const std::ffi::c_void,
            flags: create_flags,
            binding_count: raw_bindings.len() as u32,
            p_bindings: raw_bindings.as_ptr(),
            _marker: Default::default(),
        };
        let handle = unsafe { device.create_descriptor_set_layout(&layout_ci, None)? };
        Ok(handle)
    }
}
