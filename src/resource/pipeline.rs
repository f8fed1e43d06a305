use ash::vk;

use crate::resource::DescriptorSetLayoutHandle;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BindPoint {
    Graphics,
    Compute,
}

impl BindPoint {
    pub fn to_vk(self) -> vk::PipelineBindPoint {
        match self {
            BindPoint::Graphics => vk::PipelineBindPoint::GRAPHICS,
            BindPoint::Compute => vk::PipelineBindPoint::COMPUTE,
        }
    }
}

/// Pipeline record: native pipeline + layout + bind point + referenced
/// set layouts (set 0, the bindless layout, is implicit and not stored
/// here — see `CreatePipeline`) + push-constant size.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub handle: vk::Pipeline,
    pub layout: vk::PipelineLayout,
    pub bind_point: BindPoint,
    pub set_layouts: Vec<DescriptorSetLayoutHandle>,
    pub push_constant_size: u32,
}
