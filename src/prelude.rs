//! Common imports for code driving the device day to day: the frame graph,
//! the resource handles/specs, and the device itself.

pub use crate::device::{
    BufferCreateSpec, DescriptorSetCreateSpec, DescriptorWrite, GpuDevice, GpuDeviceConfig,
    PipelineCreateSpec, SamplerCreateSpec, TextureCreateSpec,
};
pub use crate::error::RhiError;
pub use crate::frame_graph::{
    ExecuteContext, FrameGraphBuilder, PassBuilder, PassKind, ResourceResolver, TextureLayout,
    TransientBufferInfo, TransientTextureInfo, VirtualResource,
};
pub use crate::handle::Handle;
pub use crate::pipeline_builder::ColorAttachmentSpec;
pub use crate::resource::{
    BindPoint, BufferHandle, BufferUsage, DescriptorSetHandle, DescriptorSetLayoutHandle,
    PipelineHandle, SamplerHandle, TextureHandle, TextureType, TextureUsage,
};
pub use crate::shader::{ShaderCompiler, ShaderStageSpec, SpirvModuleLoader};
