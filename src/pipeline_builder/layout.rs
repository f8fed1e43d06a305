use std::ptr;

use anyhow::Result;
use ash::vk;

/// Builds a `VkPipelineLayout` from a set of descriptor set layouts (set 0
/// is always the bindless table) plus a single push-constant range sized to
/// the pipeline's push-constant struct.
#[derive(Debug, Default)]
pub struct PipelineLayoutBuilder {
    set_layouts: Vec<vk::DescriptorSetLayout>,
    push_constant_stage_flags: vk::ShaderStageFlags,
    push_constant_size: u32,
}

impl PipelineLayoutBuilder {
    pub fn add_set_layout(mut self, layout: vk::DescriptorSetLayout) -> Self {
        self.set_layouts.push(layout);
        self
    }

    pub fn push_constants(mut self, stage_flags: vk::ShaderStageFlags, size: u32) -> Self {
        self.push_constant_stage_flags = stage_flags;
        self.push_constant_size = size;
        self
    }

    pub fn build(self, device: &ash::Device) -> Result<(vk::PipelineLayout, u32)> {
        let push_constant_range = vk::PushConstantRange {
            stage_flags: self.push_constant_stage_flags,
            offset: 0,
            size: self.push_constant_size,
        };
        let ranges = if self.push_constant_size > 0 {
            std::slice::from_ref(&push_constant_range)
        } else {
            &[]
        };
        let create_info = vk::PipelineLayoutCreateInfo {
            s_type: vk::StructureType::PIPELINE_LAYOUT_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::PipelineLayoutCreateFlags::empty(),
            set_layout_count: self.set_layouts.len() as u32,
            p_set_layouts: self.set_layouts.as_ptr(),
            push_constant_range_count: ranges.len() as u32,
            p_push_constant_ranges: ranges.as_ptr(),
            _marker: Default::default(),
        };
        let layout = unsafe { device.create_pipeline_layout(&create_info, None)? };
        Ok((layout, self.push_constant_size))
    }
}
