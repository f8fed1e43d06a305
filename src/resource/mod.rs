//! Resource Records — plain data describing live GPU objects.
//!
//! Every record here is Plain Old Data: movable, and never holding an
//! owning reference to another record. Relationships between resources
//! (a pipeline's descriptor set layouts, a descriptor set's bound texture)
//! are expressed only through [`crate::handle::Handle`] values resolved
//! through the device's pools at use time, rather than
//! holding pointers directly.

pub mod buffer;
pub mod descriptor_set;
pub mod descriptor_set_layout;
pub mod pipeline;
pub mod sampler;
pub mod texture;

pub use buffer::{Buffer, BufferUsage};
pub use descriptor_set::DescriptorSet;
pub use descriptor_set_layout::DescriptorSetLayout;
pub use pipeline::{BindPoint, Pipeline};
pub use sampler::{Sampler, SamplerFilterMode};
pub use texture::{Texture, TextureCold, TextureHot, TextureType, TextureUsage};

/// Kind tags for [`crate::handle::Handle`]. Zero-sized; only used as a
/// phantom type parameter so `Handle<BufferKind>` and `Handle<TextureKind>`
/// are distinct types.
pub struct BufferKind;
pub struct TextureKind;
pub struct SamplerKind;
pub struct PipelineKind;
pub struct DescriptorSetLayoutKind;
pub struct DescriptorSetKind;

pub type BufferHandle = crate::handle::Handle<BufferKind>;
pub type TextureHandle = crate::handle::Handle<TextureKind>;
pub type SamplerHandle = crate::handle::Handle<SamplerKind>;
pub type PipelineHandle = crate::handle::Handle<PipelineKind>;
pub type DescriptorSetLayoutHandle = crate::handle::Handle<DescriptorSetLayoutKind>;
pub type DescriptorSetHandle = crate::handle::Handle<DescriptorSetKind>;
