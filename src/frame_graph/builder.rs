use crate::error::RhiError;
use crate::frame_graph::execute::ExecuteContext;
use crate::frame_graph::pass::{AccessKind, ColorAttachmentRef, PassKind, PassRecord, ResourceAccess};
use crate::frame_graph::resource::{
    PhysicalBinding, ResourceEntry, ResourceKind, TextureLayout, TransientBufferInfo, TransientTextureInfo,
    VirtualResource, VirtualResourceId,
};
use crate::frame_graph::schedule::{compile_schedule, CompiledGraph};
use crate::pipeline_builder::MAX_COLOR_ATTACHMENTS;
use crate::resource::{BufferHandle, TextureHandle};

/// Declarative pass registration over a set of imported, externally
/// registered, and transient resources. Passes are scheduled in the order
/// they were added — there is no DAG reordering or dead-pass culling, so
/// submission order is always exactly registration order.
#[derive(Default)]
pub struct FrameGraphBuilder {
    pub(crate) resources: Vec<ResourceEntry>,
    pub(crate) passes: Vec<PassRecord>,
}

pub struct PassBuilder<'g> {
    graph: &'g mut FrameGraphBuilder,
    pass_index: usize,
}

impl FrameGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn import_buffer(&mut self, handle: BufferHandle) -> VirtualResource {
        let id = VirtualResourceId(self.resources.len() as u32);
        self.resources.push(ResourceEntry {
            kind: ResourceKind::Buffer,
            binding: PhysicalBinding::Buffer(handle),
            current_version: 0,
            initial_layout: TextureLayout::Undefined,
            final_layout: None,
        });
        VirtualResource { id, version: 0, kind: ResourceKind::Buffer }
    }

    pub fn import_texture(&mut self, handle: TextureHandle) -> VirtualResource {
        self.register_external_texture(handle, TextureLayout::Undefined, None)
    }

    /// Brings an existing texture (typically the current swapchain image)
    /// into the graph with a declared initial layout and, optionally, a
    /// layout it must be handed back in. When `final_layout` is set, the
    /// graph appends a closing transition to it after the last pass that
    /// touches the resource, even if no pass itself requested that layout —
    /// this is how the swapchain image ends a frame in `PresentSrc`.
    pub fn register_external_texture(
        &mut self,
        handle: TextureHandle,
        initial_layout: TextureLayout,
        final_layout: Option<TextureLayout>,
    ) -> VirtualResource {
        let id = VirtualResourceId(self.resources.len() as u32);
        self.resources.push(ResourceEntry {
            kind: ResourceKind::Texture,
            binding: PhysicalBinding::Texture(handle),
            current_version: 0,
            initial_layout,
            final_layout,
        });
        VirtualResource { id, version: 0, kind: ResourceKind::Texture }
    }

    /// Registers a pass. `setup` declares the pass's resource accesses
    /// through the supplied [`PassBuilder`] and returns the closure that
    /// records commands for it; the closure only runs once `execute()` is
    /// called on the compiled graph, never during `add_pass` itself.
    pub fn add_pass<F, E>(&mut self, name: impl Into<String>, kind: PassKind, setup: F) -> Result<(), RhiError>
    where
        F: FnOnce(&mut PassBuilder) -> E,
        E: FnOnce(&mut ExecuteContext<'_>) + 'static,
    {
        let pass_index = self.passes.len();
        self.passes.push(PassRecord {
            name: name.into(),
            kind,
            accesses: Vec::new(),
            color_attachments: Vec::new(),
            depth_attachment: None,
            execute: None,
        });
        let mut builder = PassBuilder { graph: self, pass_index };
        let execute = setup(&mut builder);
        self.passes[pass_index].execute = Some(Box::new(execute));
        Ok(())
    }

    /// Produces a pure, GPU-independent schedule: pass order, per-resource
    /// lifetime ranges and layout transitions, and any transient resources
    /// still needing allocation. Nothing here touches `ash`/`vk::Device`.
    /// Consumes the builder's passes — build a fresh graph each frame.
    pub fn compile(&mut self) -> CompiledGraph {
        let passes = std::mem::take(&mut self.passes);
        let resources = std::mem::take(&mut self.resources);
        compile_schedule(passes, resources)
    }
}

impl<'g> PassBuilder<'g> {
    /// Allocates a new virtual texture local to this frame's graph — no
    /// existing [`TextureHandle`] required. The scheduler materializes it
    /// (via `CompiledGraph::materialize_transients`) before running any
    /// pass that touches it.
    pub fn create_texture(&mut self, info: TransientTextureInfo) -> VirtualResource {
        let id = VirtualResourceId(self.graph.resources.len() as u32);
        self.graph.resources.push(ResourceEntry {
            kind: ResourceKind::Texture,
            binding: PhysicalBinding::TransientTexture(info),
            current_version: 0,
            initial_layout: TextureLayout::Undefined,
            final_layout: None,
        });
        VirtualResource { id, version: 0, kind: ResourceKind::Texture }
    }

    /// Allocates a new virtual buffer local to this frame's graph.
    pub fn create_buffer(&mut self, info: TransientBufferInfo) -> VirtualResource {
        let id = VirtualResourceId(self.graph.resources.len() as u32);
        self.graph.resources.push(ResourceEntry {
            kind: ResourceKind::Buffer,
            binding: PhysicalBinding::TransientBuffer(info),
            current_version: 0,
            initial_layout: TextureLayout::Undefined,
            final_layout: None,
        });
        VirtualResource { id, version: 0, kind: ResourceKind::Buffer }
    }

    /// Declares a read, with the layout the pass needs the texture in (for
    /// buffers this layout is recorded but never consulted). Emits a
    /// transition before the pass if the resource isn't already there.
    pub fn reads(&mut self, resource: VirtualResource, layout: TextureLayout) -> VirtualResource {
        self.graph.passes[self.pass_index].accesses.push(ResourceAccess {
            resource: resource.id,
            kind: AccessKind::Read,
            layout,
        });
        resource
    }

    /// Bumps the resource to a new version and records the write at the
    /// given target layout. The returned [`VirtualResource`] is what
    /// subsequent passes must read to see this pass's output.
    pub fn writes(&mut self, resource: VirtualResource, layout: TextureLayout) -> VirtualResource {
        let entry = &mut self.graph.resources[resource.id.0 as usize];
        entry.current_version += 1;
        let new_version = entry.current_version;
        self.graph.passes[self.pass_index].accesses.push(ResourceAccess {
            resource: resource.id,
            kind: AccessKind::Write,
            layout,
        });
        VirtualResource { id: resource.id, version: new_version, kind: resource.kind }
    }

    /// Binds `resource` as color attachment `slot` (`< MAX_COLOR_ATTACHMENTS`),
    /// implicitly writing it at the `ColorAttachment` layout.
    ///
    /// # Panics
    /// Panics if `slot >= MAX_COLOR_ATTACHMENTS`.
    pub fn add_color_attachment(&mut self, resource: VirtualResource, slot: u32) -> VirtualResource {
        assert!(
            (slot as usize) < MAX_COLOR_ATTACHMENTS,
            "color attachment slot {slot} exceeds the max of {MAX_COLOR_ATTACHMENTS}"
        );
        let written = self.writes(resource, TextureLayout::ColorAttachment);
        self.graph.passes[self.pass_index]
            .color_attachments
            .push(ColorAttachmentRef { resource: resource.id, slot });
        written
    }

    /// Binds `resource` as the pass's depth/stencil attachment, implicitly
    /// writing it at the `DepthStencilAttachment` layout.
    pub fn set_depth_attachment(&mut self, resource: VirtualResource) -> VirtualResource {
        let written = self.writes(resource, TextureLayout::DepthStencilAttachment);
        self.graph.passes[self.pass_index].depth_attachment = Some(resource.id);
        written
    }
}
