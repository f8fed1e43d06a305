use std::ffi::CString;
use std::ptr;

use anyhow::{Context, Result};
use ash::vk;

use crate::shader::CompiledShaderStage;

/// Matches the frame graph's attachment-slot model: at most
/// `MAX_COLOR_ATTACHMENTS` color slots per pass, each with its own format
/// and independent blend state.
pub const MAX_COLOR_ATTACHMENTS: usize = 8;

#[derive(Debug, Copy, Clone)]
pub struct ColorAttachmentSpec {
    pub format: vk::Format,
    pub blend_enable: bool,
}

/// Builds a dynamic-rendering graphics pipeline (no `VkRenderPass`/
/// `VkFramebuffer` — rendering targets are supplied per-draw through
/// `vkCmdBeginRendering`, matching the frame graph's pass model).
#[derive(Debug)]
pub struct GraphicsPipelineBuilder {
    stages: Vec<CompiledShaderStage>,
    topology: vk::PrimitiveTopology,
    polygon_mode: vk::PolygonMode,
    cull_mode: vk::CullModeFlags,
    front_face: vk::FrontFace,
    depth_test_enable: bool,
    depth_write_enable: bool,
    depth_compare_op: vk::CompareOp,
    color_attachments: Vec<ColorAttachmentSpec>,
    depth_format: vk::Format,
}

impl Default for GraphicsPipelineBuilder {
    fn default() -> Self {
        Self {
            stages: Vec::new(),
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            polygon_mode: vk::PolygonMode::FILL,
            cull_mode: vk::CullModeFlags::BACK,
            front_face: vk::FrontFace::COUNTER_CLOCKWISE,
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: vk::CompareOp::LESS,
            color_attachments: Vec::new(),
            depth_format: vk::Format::UNDEFINED,
        }
    }
}

impl GraphicsPipelineBuilder {
    pub fn add_stage(mut self, stage: CompiledShaderStage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn topology(mut self, topology: vk::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn cull_mode(mut self, cull_mode: vk::CullModeFlags, front_face: vk::FrontFace) -> Self {
        self.cull_mode = cull_mode;
        self.front_face = front_face;
        self
    }

    pub fn disable_depth_test(mut self) -> Self {
        self.depth_test_enable = false;
        self.depth_write_enable = false;
        self
    }

    /// # Panics
    /// Panics if `attachments.len() > MAX_COLOR_ATTACHMENTS`.
    pub fn color_attachments(mut self, attachments: Vec<ColorAttachmentSpec>) -> Self {
        assert!(
            attachments.len() <= MAX_COLOR_ATTACHMENTS,
            "graphics pipeline requested {} color attachments, max is {MAX_COLOR_ATTACHMENTS}",
            attachments.len()
        );
        self.color_attachments = attachments;
        self
    }

    pub fn depth_attachment_format(mut self, format: vk::Format) -> Self {
        self.depth_format = format;
        self
    }

    pub fn build(self, device: &ash::Device, layout: vk::PipelineLayout) -> Result<vk::Pipeline> {
        let entry_points: Vec<CString> = self
            .stages
            .iter()
            .map(|s| CString::new(s.entry_point.as_str()).unwrap())
            .collect();

        let shader_stages: Vec<vk::PipelineShaderStageCreateInfo> = self
            .stages
            .iter()
            .zip(entry_points.iter())
            .map(|(stage, entry)| vk::PipelineShaderStageCreateInfo {
                s_type: vk::StructureType::PIPELINE_SHADER_STAGE_CREATE_INFO,
                p_next: ptr::null(),
                flags: vk::PipelineShaderStageCreateFlags::empty(),
                stage: stage.stage,
                module: stage.module,
                p_name: entry.as_ptr(),
                p_specialization_info: ptr::null(),
                _marker: Default::default(),
            })
            .collect();

        let vertex_input = vk::PipelineVertexInputStateCreateInfo::default();
        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo {
            s_type: vk::StructureType::PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO,
            p_next: ptr::null(),
            topology: self.topology,
            primitive_restart_enable: vk::FALSE,
            ..Default::default()
        };
        let viewport_state = vk::PipelineViewportStateCreateInfo {
            s_type: vk::StructureType::PIPELINE_VIEWPORT_STATE_CREATE_INFO,
            p_next: ptr::null(),
            viewport_count: 1,
            p_viewports: ptr::null(),
            scissor_count: 1,
            p_scissors: ptr::null(),
            ..Default::default()
        };
        let rasterizer = vk::PipelineRasterizationStateCreateInfo {
            s_type: vk::StructureType::PIPELINE_RASTERIZATION_STATE_CREATE_INFO,
            p_next: ptr::null(),
            polygon_mode: self.polygon_mode,
            cull_mode: self.cull_mode,
            front_face: self.front_face,
            line_width: 1.0,
            ..Default::default()
        };
        let multisampling = vk::PipelineMultisampleStateCreateInfo {
            s_type: vk::StructureType::PIPELINE_MULTISAMPLE_STATE_CREATE_INFO,
            p_next: ptr::null(),
            rasterization_samples: vk::SampleCountFlags::TYPE_1,
            min_sample_shading: 1.0,
            ..Default::default()
        };
        let color_blend_attachments: Vec<vk::PipelineColorBlendAttachmentState> = self
            .color_attachments
            .iter()
            .map(|attachment| vk::PipelineColorBlendAttachmentState {
                blend_enable: if attachment.blend_enable { vk::TRUE } else { vk::FALSE },
                src_color_blend_factor: vk::BlendFactor::SRC_ALPHA,
                dst_color_blend_factor: vk::BlendFactor::ONE_MINUS_SRC_ALPHA,
                color_blend_op: vk::BlendOp::ADD,
                src_alpha_blend_factor: vk::BlendFactor::ONE,
                dst_alpha_blend_factor: vk::BlendFactor::ZERO,
                alpha_blend_op: vk::BlendOp::ADD,
                color_write_mask: vk::ColorComponentFlags::RGBA,
            })
            .collect();
        let color_blend_state = vk::PipelineColorBlendStateCreateInfo {
            s_type: vk::StructureType::PIPELINE_COLOR_BLEND_STATE_CREATE_INFO,
            p_next: ptr::null(),
            attachment_count: color_blend_attachments.len() as u32,
            p_attachments: color_blend_attachments.as_ptr(),
            blend_constants: [0.0; 4],
            ..Default::default()
        };
        let depth_stencil = vk::PipelineDepthStencilStateCreateInfo {
            s_type: vk::StructureType::PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO,
            p_next: ptr::null(),
            depth_test_enable: if self.depth_test_enable { vk::TRUE } else { vk::FALSE },
            depth_write_enable: if self.depth_write_enable { vk::TRUE } else { vk::FALSE },
            depth_compare_op: self.depth_compare_op,
            ..Default::default()
        };
        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state = vk::PipelineDynamicStateCreateInfo {
            s_type: vk::StructureType::PIPELINE_DYNAMIC_STATE_CREATE_INFO,
            p_next: ptr::null(),
            dynamic_state_count: dynamic_states.len() as u32,
            p_dynamic_states: dynamic_states.as_ptr(),
            ..Default::default()
        };

        let color_formats: Vec<vk::Format> = self.color_attachments.iter().map(|a| a.format).collect();
        let mut rendering_info = vk::PipelineRenderingCreateInfo {
            s_type: vk::StructureType::PIPELINE_RENDERING_CREATE_INFO,
            p_next: ptr::null(),
            view_mask: 0,
            color_attachment_count: color_formats.len() as u32,
            p_color_attachment_formats: color_formats.as_ptr(),
            depth_attachment_format: self.depth_format,
            stencil_attachment_format: vk::Format::UNDEFINED,
            _marker: Default::default(),
        };

        let pipeline_info = vk::GraphicsPipelineCreateInfo {
            s_type: vk::StructureType::GRAPHICS_PIPELINE_CREATE_INFO,
            p_next: &mut rendering_info as *mut _ as *const std::ffi::c_void,
            flags: vk::PipelineCreateFlags::empty(),
            stage_count: shader_stages.len() as u32,
            p_stages: shader_stages.as_ptr(),
            p_vertex_input_state: &vertex_input,
            p_input_assembly_state: &input_assembly,
            p_tessellation_state: ptr::null(),
            p_viewport_state: &viewport_state,
            p_rasterization_state: &rasterizer,
            p_multisample_state: &multisampling,
            p_depth_stencil_state: &depth_stencil,
            p_color_blend_state: &color_blend_state,
            p_dynamic_state: &dynamic_state,
            layout,
            render_pass: vk::RenderPass::null(),
            subpass: 0,
            base_pipeline_handle: vk::Pipeline::null(),
            base_pipeline_index: -1,
            _marker: Default::default(),
        };

        let pipeline = unsafe {
            device
                .create_graphics_pipelines(vk::PipelineCache::null(), &[pipeline_info], None)
                .map_err(|(_, e)| e)
                .context("graphics pipeline creation failed")?
        };

        for stage in &self.stages {
            stage.destroy(device);
        }

        Ok(*pipeline.first().context("driver returned zero pipelines")?)
    }
}
