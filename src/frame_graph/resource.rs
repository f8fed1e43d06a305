//! Virtual resources: graph-local names for buffers/textures, versioned so
//! that writing a resource through the graph produces a new version without
//! disturbing any earlier pass's view of it (so scheduling can reason about
//! hazards purely from version numbers, never from wall-clock order of
//! mutation).

use ash::vk;

use crate::resource::{BufferHandle, BufferUsage, TextureHandle, TextureUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualResourceId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Buffer,
    Texture,
}

/// A resource handle as seen by pass setup code: the id plus the version it
/// was obtained at. Reading an out-of-date version is a builder-time bug —
/// `FrameGraphBuilder` always hands out the current version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualResource {
    pub id: VirtualResourceId,
    pub version: u32,
    pub kind: ResourceKind,
}

/// Texture layout as tracked by the graph, narrowed to the layouts a pass
/// actually declares. Mirrors the original engine's `ETextureLayout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureLayout {
    Undefined,
    General,
    ColorAttachment,
    DepthStencilAttachment,
    ReadOnly,
    TransferSrc,
    TransferDst,
    PresentSrc,
}

impl TextureLayout {
    pub fn to_vk(self) -> vk::ImageLayout {
        match self {
            TextureLayout::Undefined => vk::ImageLayout::UNDEFINED,
            TextureLayout::General => vk::ImageLayout::GENERAL,
            TextureLayout::ColorAttachment => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            TextureLayout::DepthStencilAttachment => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
            TextureLayout::ReadOnly => vk::ImageLayout::READ_ONLY_OPTIMAL,
            TextureLayout::TransferSrc => vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
            TextureLayout::TransferDst => vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            TextureLayout::PresentSrc => vk::ImageLayout::PRESENT_SRC_KHR,
        }
    }
}

/// Setup-time description of a texture the graph should allocate itself
/// (as opposed to one imported from an existing [`TextureHandle`]).
#[derive(Debug, Clone)]
pub struct TransientTextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: vk::Format,
    pub usage: TextureUsage,
    pub name: String,
}

/// Setup-time description of a buffer the graph should allocate itself.
#[derive(Debug, Clone)]
pub struct TransientBufferInfo {
    pub size: vk::DeviceSize,
    pub usage: BufferUsage,
    pub name: String,
}

#[derive(Debug, Clone)]
pub(crate) enum PhysicalBinding {
    Buffer(BufferHandle),
    Texture(TextureHandle),
    TransientTexture(TransientTextureInfo),
    TransientBuffer(TransientBufferInfo),
}

pub(crate) struct ResourceEntry {
    pub kind: ResourceKind,
    pub binding: PhysicalBinding,
    pub current_version: u32,
    /// The layout this resource starts the frame in: `Undefined` for
    /// transients and plain imports, or the caller-declared value for
    /// resources registered with `register_external_texture`.
    pub initial_layout: TextureLayout,
    /// If set, the graph inserts a closing transition to this layout after
    /// the last pass that touches the resource — used to hand the
    /// swapchain image back in `PresentSrc`.
    pub final_layout: Option<TextureLayout>,
}
