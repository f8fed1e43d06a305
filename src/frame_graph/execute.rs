use std::collections::HashMap;

use ash::vk;

use crate::command::CommandBufferRecording;
use crate::frame_graph::resource::VirtualResourceId;
use crate::resource::{BufferHandle, TextureHandle};

#[derive(Debug, Clone, Copy)]
pub struct ResolvedTexture {
    pub image: vk::Image,
    pub view: vk::ImageView,
    pub layout: vk::ImageLayout,
    pub aspect: vk::ImageAspectFlags,
}

#[derive(Debug, Clone, Copy)]
pub struct ResolvedBuffer {
    pub buffer: vk::Buffer,
    pub size: vk::DeviceSize,
}

/// Bridges native resource handles back to the data a command needs
/// (image/view/layout, buffer/size). `compile()` never needs this — only
/// `CompiledGraph::execute` does, which is why the graph's scheduling logic
/// can be unit-tested without a device.
pub trait ResourceResolver {
    fn resolve_texture(&self, handle: TextureHandle) -> ResolvedTexture;
    fn resolve_buffer(&self, handle: BufferHandle) -> ResolvedBuffer;
}

/// Which native handle a virtual resource id is bound to by execute time.
/// Transient resources start out without one — `CompiledGraph::materialize`
/// fills this in before `execute()` ever runs a pass closure.
#[derive(Clone, Copy)]
pub(crate) enum BoundHandle {
    Texture(TextureHandle),
    Buffer(BufferHandle),
}

pub struct ExecuteContext<'a> {
    pub cmd: &'a CommandBufferRecording,
    pub resolver: &'a dyn ResourceResolver,
    pub(crate) bindings: &'a HashMap<VirtualResourceId, BoundHandle>,
}

impl<'a> ExecuteContext<'a> {
    /// # Panics
    /// Panics if `id` doesn't name a texture, or a transient texture wasn't
    /// materialized before `execute()` ran.
    pub fn texture(&self, id: VirtualResourceId) -> ResolvedTexture {
        match self.bindings.get(&id) {
            Some(BoundHandle::Texture(handle)) => self.resolver.resolve_texture(*handle),
            other => panic!("frame graph resource {id:?} is not a bound texture (got {other:?})"),
        }
    }

    /// # Panics
    /// Panics if `id` doesn't name a buffer, or a transient buffer wasn't
    /// materialized before `execute()` ran.
    pub fn buffer(&self, id: VirtualResourceId) -> ResolvedBuffer {
        match self.bindings.get(&id) {
            Some(BoundHandle::Buffer(handle)) => self.resolver.resolve_buffer(*handle),
            other => panic!("frame graph resource {id:?} is not a bound buffer (got {other:?})"),
        }
    }
}

impl std::fmt::Debug for BoundHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundHandle::Texture(h) => write!(f, "Texture({h:?})"),
            BoundHandle::Buffer(h) => write!(f, "Buffer({h:?})"),
        }
    }
}
