//! Shader compiler seam. This crate never touches shader source — it only
//! turns already-compiled SPIR-V bytes into a `VkShaderModule` and tracks
//! the stage metadata pipeline creation needs. Source compilation, include
//! resolution, and reflection all live on the other side of
//! [`ShaderCompiler`].

use std::ptr;

use anyhow::Result;
use ash::vk;

#[derive(Debug, Clone)]
pub struct ShaderStageSpec {
    pub shader_name: String,
    pub stage: vk::ShaderStageFlags,
    pub entry_point: String,
    pub spirv: Vec<u32>,
}

#[derive(Debug)]
pub struct CompiledShaderStage {
    pub module: vk::ShaderModule,
    pub stage: vk::ShaderStageFlags,
    pub entry_point: String,
}

impl CompiledShaderStage {
    pub fn destroy(&self, device: &ash::Device) {
        unsafe { device.destroy_shader_module(self.module, None) };
    }
}

/// Implemented by whatever owns shader source compilation outside this
/// crate. `compile` receives already-assembled SPIR-V words (the crate
/// never invokes a shader compiler toolchain itself).
pub trait ShaderCompiler {
    fn compile(&self, device: &ash::Device, spec: &ShaderStageSpec) -> Result<CompiledShaderStage>;
}

/// The default compiler: wraps `vkCreateShaderModule` around SPIR-V that
/// has already been produced upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpirvModuleLoader;

impl ShaderCompiler for SpirvModuleLoader {
    fn compile(&self, device: &ash::Device, spec: &ShaderStageSpec) -> Result<CompiledShaderStage> {
        let create_info = vk::ShaderModuleCreateInfo {
            s_type: vk::StructureType::SHADER_MODULE_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::ShaderModuleCreateFlags::empty(),
            code_size: spec.spirv.len() * std::mem::size_of::<u32>(),
            p_code: spec.spirv.as_ptr(),
            _marker: Default::default(),
        };
        let module = unsafe { device.create_shader_module(&create_info, None)? };
        Ok(CompiledShaderStage {
            module,
            stage: spec.stage,
            entry_point: spec.entry_point.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_spec_carries_entry_point_through() {
        let spec = ShaderStageSpec {
            shader_name: "fullscreen.vert".into(),
            stage: vk::ShaderStageFlags::VERTEX,
            entry_point: "vs_main".into(),
            spirv: vec![0x0723_0203, 0, 0, 0],
        };
        assert_eq!(spec.entry_point, "vs_main");
        assert_eq!(spec.stage, vk::ShaderStageFlags::VERTEX);
    }
}
