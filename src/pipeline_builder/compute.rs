use std::ffi::CString;
use std::ptr;

use anyhow::{Context, Result};
use ash::vk;

use crate::shader::CompiledShaderStage;

pub fn build_compute_pipeline(
    device: &ash::Device,
    layout: vk::PipelineLayout,
    stage: &CompiledShaderStage,
) -> Result<vk::Pipeline> {
    let entry = CString::new(stage.entry_point.as_str()).unwrap();
    let stage_info = vk::PipelineShaderStageCreateInfo {
        s_type: vk::StructureType::PIPELINE_SHADER_STAGE_CREATE_INFO,
        p_next: ptr::null(),
        flags: vk::PipelineShaderStageCreateFlags::empty(),
        stage: vk::ShaderStageFlags::COMPUTE,
        module: stage.module,
        p_name: entry.as_ptr(),
        p_specialization_info: ptr::null(),
        _marker: Default::default(),
    };
    let create_info = vk::ComputePipelineCreateInfo {
        s_type: vk::StructureType::COMPUTE_PIPELINE_CREATE_INFO,
        p_next: ptr::null(),
        flags: vk::PipelineCreateFlags::empty(),
        stage: stage_info,
        layout,
        base_pipeline_handle: vk::Pipeline::null(),
        base_pipeline_index: -1,
        _marker: Default::default(),
    };
    let pipeline = unsafe {
        device
            .create_compute_pipelines(vk::PipelineCache::null(), &[create_info], None)
            .map_err(|(_, e)| e)
            .context("compute pipeline creation failed")?
    };
    stage.destroy(device);
    Ok(*pipeline.first().context("driver returned zero pipelines")?)
}
