//! Turns a linear list of [`PassRecord`]s into a schedule: pass order
//! (always registration order — there is no DAG reordering or dead-pass
//! culling), per-resource `{first_use, last_use}` lifetime ranges, the
//! image layout transitions each pass needs before it records, and the
//! render target descriptions graphics passes need for
//! `vkCmdBeginRendering`.
//!
//! This module never touches `ash::Device` so the scheduling algorithm can
//! be unit-tested on plain data; only [`CompiledGraph::execute`] and the
//! transient-materialization accessors need a live device, through the
//! [`ResourceResolver`]/allocator seams.

use std::collections::HashMap;

use ash::vk;

use crate::frame_graph::execute::{BoundHandle, ExecuteContext, ResourceResolver};
use crate::frame_graph::pass::{ColorAttachmentRef, PassKind, PassRecord};
use crate::frame_graph::resource::{PhysicalBinding, ResourceEntry, ResourceKind, TextureLayout, TransientBufferInfo, TransientTextureInfo, VirtualResourceId};

/// A resource's first and last pass index in the schedule, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLifetime {
    pub first_use: usize,
    pub last_use: usize,
}

/// A single `oldLayout -> newLayout` transition the scheduler inserted
/// before a pass runs, or in the graph's closing pass for resources with a
/// declared `final_layout`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ImageTransition {
    pub resource: VirtualResourceId,
    pub old_layout: TextureLayout,
    pub new_layout: TextureLayout,
}

pub(crate) struct CompiledPass {
    pub name: String,
    pub kind: PassKind,
    pub transitions: Vec<ImageTransition>,
    /// Whether a buffer touched by this pass was also touched by an earlier
    /// one — buffers have no layout, so they fall back to one conservative
    /// memory barrier per re-touch rather than a tracked transition.
    pub buffer_barrier: bool,
    pub color_attachments: Vec<ColorAttachmentRef>,
    pub depth_attachment: Option<VirtualResourceId>,
    pub execute: Option<Box<dyn FnOnce(&mut ExecuteContext<'_>) + 'static>>,
}

pub struct CompiledGraph {
    pub(crate) passes: Vec<CompiledPass>,
    pub(crate) lifetimes: HashMap<VirtualResourceId, ResourceLifetime>,
    pub(crate) resource_kinds: HashMap<VirtualResourceId, ResourceKind>,
    pub(crate) bindings: HashMap<VirtualResourceId, PhysicalBinding>,
    /// Closing transitions for resources with a declared `final_layout`,
    /// e.g. the swapchain image handed back in `PresentSrc`. Emitted once,
    /// after the last real pass.
    pub(crate) final_transitions: Vec<ImageTransition>,
    /// The layout every texture resource is left in once `execute()`
    /// finishes, including the effect of `final_transitions`. Callers that
    /// keep their own authoritative layout per handle (like `GpuDevice`'s
    /// texture pool) read this after `execute()` to stay in sync with what
    /// the graph actually recorded.
    pub(crate) final_layouts: HashMap<VirtualResourceId, TextureLayout>,
}

impl CompiledGraph {
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn pass_name(&self, index: usize) -> &str {
        &self.passes[index].name
    }

    /// Resources whose layout is transitioned before this pass records,
    /// oldest-declared first.
    pub fn transitions_before(&self, index: usize) -> Vec<VirtualResourceId> {
        self.passes[index].transitions.iter().map(|t| t.resource).collect()
    }

    pub fn lifetime_of(&self, id: VirtualResourceId) -> Option<ResourceLifetime> {
        self.lifetimes.get(&id).copied()
    }

    pub fn kind_of(&self, id: VirtualResourceId) -> Option<ResourceKind> {
        self.resource_kinds.get(&id).copied()
    }

    /// Transient textures still needing a real [`crate::resource::TextureHandle`]
    /// allocated for them before `execute()` can run.
    pub fn pending_transient_textures(&self) -> Vec<(VirtualResourceId, TransientTextureInfo)> {
        self.bindings
            .iter()
            .filter_map(|(id, binding)| match binding {
                PhysicalBinding::TransientTexture(info) => Some((*id, info.clone())),
                _ => None,
            })
            .collect()
    }

    /// Transient buffers still needing a real [`crate::resource::BufferHandle`]
    /// allocated for them before `execute()` can run.
    pub fn pending_transient_buffers(&self) -> Vec<(VirtualResourceId, TransientBufferInfo)> {
        self.bindings
            .iter()
            .filter_map(|(id, binding)| match binding {
                PhysicalBinding::TransientBuffer(info) => Some((*id, info.clone())),
                _ => None,
            })
            .collect()
    }

    /// Binds a materialized handle to a transient texture id, replacing its
    /// `TransientTexture` placeholder. Call once per id returned from
    /// [`Self::pending_transient_textures`] before `execute()`.
    pub fn bind_transient_texture(&mut self, id: VirtualResourceId, handle: crate::resource::TextureHandle) {
        self.bindings.insert(id, PhysicalBinding::Texture(handle));
    }

    /// Binds a materialized handle to a transient buffer id. See
    /// [`Self::bind_transient_texture`].
    pub fn bind_transient_buffer(&mut self, id: VirtualResourceId, handle: crate::resource::BufferHandle) {
        self.bindings.insert(id, PhysicalBinding::Buffer(handle));
    }

    /// Every texture resource currently bound to a real handle (imported,
    /// externally registered, or an already-materialized transient), paired
    /// with the handle it resolves to. Used by callers that need to push
    /// `final_layouts` back onto their own resource records after
    /// `execute()` consumes the graph.
    pub fn bound_texture_handles(&self) -> Vec<(VirtualResourceId, crate::resource::TextureHandle)> {
        self.bindings
            .iter()
            .filter_map(|(id, binding)| match binding {
                PhysicalBinding::Texture(handle) => Some((*id, *handle)),
                _ => None,
            })
            .collect()
    }

    /// Runs every pass's execute closure in schedule order: transitions each
    /// touched texture to the layout it declared, emits one conservative
    /// memory barrier for re-touched buffers, wraps `Graphics` passes with
    /// `vkCmdBeginRendering`/`vkCmdEndRendering` built from their attachment
    /// list, then emits the graph's closing transitions.
    ///
    /// # Panics
    /// Panics if a transient resource is still unbound — call
    /// `bind_transient_texture`/`bind_transient_buffer` for every id
    /// `pending_transient_textures`/`pending_transient_buffers` returned
    /// first.
    pub fn execute(mut self, ctx_cmd: &crate::command::CommandBufferRecording, resolver: &dyn ResourceResolver) -> HashMap<VirtualResourceId, TextureLayout> {
        let bound: HashMap<VirtualResourceId, BoundHandle> = self
            .bindings
            .iter()
            .map(|(id, binding)| {
                let handle = match binding {
                    PhysicalBinding::Texture(h) => BoundHandle::Texture(*h),
                    PhysicalBinding::Buffer(h) => BoundHandle::Buffer(*h),
                    PhysicalBinding::TransientTexture(info) => {
                        panic!("frame graph resource {id:?} ({}) was never materialized", info.name)
                    }
                    PhysicalBinding::TransientBuffer(info) => {
                        panic!("frame graph resource {id:?} ({}) was never materialized", info.name)
                    }
                };
                (*id, handle)
            })
            .collect();

        for mut pass in self.passes.drain(..) {
            for transition in &pass.transitions {
                apply_transition(ctx_cmd, resolver, &bound, transition);
            }
            if pass.buffer_barrier {
                ctx_cmd.memory_barrier();
            }

            let is_render_pass = pass.kind == PassKind::Graphics && (!pass.color_attachments.is_empty() || pass.depth_attachment.is_some());
            if is_render_pass {
                let rendering_info = build_rendering_info(resolver, &bound, &pass.color_attachments, pass.depth_attachment);
                ctx_cmd.begin_rendering(&rendering_info.info);
                if let Some(execute) = pass.execute.take() {
                    let mut ctx = ExecuteContext { cmd: ctx_cmd, resolver, bindings: &bound };
                    execute(&mut ctx);
                }
                ctx_cmd.end_rendering();
            } else if let Some(execute) = pass.execute.take() {
                let mut ctx = ExecuteContext { cmd: ctx_cmd, resolver, bindings: &bound };
                execute(&mut ctx);
            }
        }

        for transition in &self.final_transitions {
            apply_transition(ctx_cmd, resolver, &bound, transition);
        }

        self.final_layouts
    }
}

fn apply_transition(
    ctx_cmd: &crate::command::CommandBufferRecording,
    resolver: &dyn ResourceResolver,
    bound: &HashMap<VirtualResourceId, BoundHandle>,
    transition: &ImageTransition,
) {
    let Some(BoundHandle::Texture(handle)) = bound.get(&transition.resource) else {
        panic!("frame graph resource {:?} has an image transition but is not a bound texture", transition.resource);
    };
    let resolved = resolver.resolve_texture(*handle);
    ctx_cmd.transition_image(resolved.image, resolved.aspect, transition.old_layout.to_vk(), transition.new_layout.to_vk());
}

/// Owns the `vk::RenderingAttachmentInfo` storage that `rendering_info`
/// borrows from, so the two can't be separated and dangle.
struct RenderingInfoStorage<'a> {
    info: vk::RenderingInfo<'a>,
    _color_attachments: Vec<vk::RenderingAttachmentInfo<'a>>,
    _depth_attachment: Option<Box<vk::RenderingAttachmentInfo<'a>>>,
}

fn build_rendering_info(
    resolver: &dyn ResourceResolver,
    bound: &HashMap<VirtualResourceId, BoundHandle>,
    color_attachments: &[ColorAttachmentRef],
    depth_attachment: Option<VirtualResourceId>,
) -> RenderingInfoStorage<'static> {
    let resolve = |id: VirtualResourceId| -> crate::frame_graph::execute::ResolvedTexture {
        match bound.get(&id) {
            Some(BoundHandle::Texture(handle)) => resolver.resolve_texture(*handle),
            other => panic!("frame graph resource {id:?} is not a bound texture (got {other:?})"),
        }
    };

    let max_slot = color_attachments.iter().map(|a| a.slot).max().map(|s| s as usize + 1).unwrap_or(0);
    let mut slots: Vec<Option<VirtualResourceId>> = vec![None; max_slot];
    for attachment in color_attachments {
        slots[attachment.slot as usize] = Some(attachment.resource);
    }

    let extent = vk::Extent2D { width: 0, height: 0 };
    let color_infos: Vec<vk::RenderingAttachmentInfo<'static>> = slots
        .iter()
        .map(|slot| {
            let resolved = slot.map(resolve).unwrap_or_else(|| panic!("color attachment slot has no bound resource"));
            vk::RenderingAttachmentInfo {
                s_type: vk::StructureType::RENDERING_ATTACHMENT_INFO,
                p_next: std::ptr::null(),
                image_view: resolved.view,
                // `add_color_attachment` always writes at `ColorAttachment`, so
                // this is the layout the preceding transition just put the
                // image in — not whatever the resolver's own bookkeeping
                // reports, which may not be updated until `execute()` returns.
                image_layout: TextureLayout::ColorAttachment.to_vk(),
                resolve_mode: vk::ResolveModeFlags::NONE,
                resolve_image_view: vk::ImageView::null(),
                resolve_image_layout: vk::ImageLayout::UNDEFINED,
                load_op: vk::AttachmentLoadOp::LOAD,
                store_op: vk::AttachmentStoreOp::STORE,
                clear_value: vk::ClearValue::default(),
                _marker: Default::default(),
            }
        })
        .collect();

    let depth_info = depth_attachment.map(|id| {
        let resolved = resolve(id);
        Box::new(vk::RenderingAttachmentInfo {
            s_type: vk::StructureType::RENDERING_ATTACHMENT_INFO,
            p_next: std::ptr::null(),
            image_view: resolved.view,
            image_layout: TextureLayout::DepthStencilAttachment.to_vk(),
            resolve_mode: vk::ResolveModeFlags::NONE,
            resolve_image_view: vk::ImageView::null(),
            resolve_image_layout: vk::ImageLayout::UNDEFINED,
            load_op: vk::AttachmentLoadOp::LOAD,
            store_op: vk::AttachmentStoreOp::STORE,
            clear_value: vk::ClearValue::default(),
            _marker: Default::default(),
        })
    });

    let render_area = vk::Rect2D { offset: vk::Offset2D { x: 0, y: 0 }, extent };

    let info = vk::RenderingInfo {
        s_type: vk::StructureType::RENDERING_INFO,
        p_next: std::ptr::null(),
        flags: vk::RenderingFlags::empty(),
        render_area,
        layer_count: 1,
        view_mask: 0,
        color_attachment_count: color_infos.len() as u32,
        p_color_attachments: color_infos.as_ptr(),
        p_depth_attachment: depth_info.as_deref().map(|d| d as *const _).unwrap_or(std::ptr::null()),
        p_stencil_attachment: std::ptr::null(),
        _marker: Default::default(),
    };

    RenderingInfoStorage { info, _color_attachments: color_infos, _depth_attachment: depth_info }
}

/// Computes pass order, per-resource lifetimes, and layout transitions.
/// Buffers keep the old conservative "touched before, touch again" barrier
/// model since they have no layout to track. Textures get a real
/// `old_layout -> new_layout` transition recorded whenever a pass's
/// declared access layout differs from where the scheduler last left the
/// resource, starting from each resource's declared `initial_layout`.
pub(crate) fn compile_schedule(passes: Vec<PassRecord>, resources: Vec<ResourceEntry>) -> CompiledGraph {
    let mut resource_kinds = HashMap::with_capacity(resources.len());
    let mut bindings = HashMap::with_capacity(resources.len());
    let mut current_layout: HashMap<VirtualResourceId, TextureLayout> = HashMap::new();
    let mut final_layout: HashMap<VirtualResourceId, TextureLayout> = HashMap::new();

    for (index, entry) in resources.into_iter().enumerate() {
        let id = VirtualResourceId(index as u32);
        resource_kinds.insert(id, entry.kind);
        current_layout.insert(id, entry.initial_layout);
        if let Some(layout) = entry.final_layout {
            final_layout.insert(id, layout);
        }
        bindings.insert(id, entry.binding);
    }

    let mut lifetimes: HashMap<VirtualResourceId, ResourceLifetime> = HashMap::new();
    let mut buffer_touched: std::collections::HashSet<VirtualResourceId> = std::collections::HashSet::new();
    let mut compiled = Vec::with_capacity(passes.len());

    for (index, mut pass) in passes.into_iter().enumerate() {
        let mut transitions = Vec::new();
        let mut buffer_barrier = false;

        for access in &pass.accesses {
            let id = access.resource;
            lifetimes
                .entry(id)
                .and_modify(|lt| lt.last_use = index)
                .or_insert(ResourceLifetime { first_use: index, last_use: index });

            match resource_kinds.get(&id) {
                Some(ResourceKind::Texture) => {
                    let old_layout = *current_layout.get(&id).unwrap_or(&TextureLayout::Undefined);
                    if old_layout != access.layout {
                        transitions.push(ImageTransition { resource: id, old_layout, new_layout: access.layout });
                        current_layout.insert(id, access.layout);
                    }
                }
                Some(ResourceKind::Buffer) => {
                    if buffer_touched.contains(&id) {
                        buffer_barrier = true;
                    }
                    buffer_touched.insert(id);
                }
                None => {}
            }
        }

        compiled.push(CompiledPass {
            name: std::mem::take(&mut pass.name),
            kind: pass.kind,
            transitions,
            buffer_barrier,
            color_attachments: std::mem::take(&mut pass.color_attachments),
            depth_attachment: pass.depth_attachment,
            execute: pass.execute.take(),
        });
    }

    let mut final_transitions = Vec::new();
    for (id, target) in final_layout {
        let old_layout = *current_layout.get(&id).unwrap_or(&TextureLayout::Undefined);
        if old_layout != target {
            final_transitions.push(ImageTransition { resource: id, old_layout, new_layout: target });
        }
        current_layout.insert(id, target);
    }

    let final_layouts: HashMap<VirtualResourceId, TextureLayout> = current_layout
        .into_iter()
        .filter(|(id, _)| resource_kinds.get(id) == Some(&ResourceKind::Texture))
        .collect();

    CompiledGraph { passes: compiled, lifetimes, resource_kinds, bindings, final_transitions, final_layouts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_graph::pass::{AccessKind, ResourceAccess};

    fn texture_access(resource: u32, kind: AccessKind, layout: TextureLayout) -> ResourceAccess {
        ResourceAccess { resource: VirtualResourceId(resource), kind, layout }
    }

    fn pass(name: &str, kind: PassKind, accesses: Vec<ResourceAccess>) -> PassRecord {
        PassRecord { name: name.to_string(), kind, accesses, color_attachments: Vec::new(), depth_attachment: None, execute: None }
    }

    fn imported_texture(initial: TextureLayout, final_layout: Option<TextureLayout>) -> ResourceEntry {
        ResourceEntry {
            kind: ResourceKind::Texture,
            binding: PhysicalBinding::Texture(crate::resource::TextureHandle::from_bits(0)),
            current_version: 0,
            initial_layout: initial,
            final_layout,
        }
    }

    #[test]
    fn first_access_at_the_declared_initial_layout_needs_no_transition() {
        let passes = vec![pass("p0", PassKind::Graphics, vec![texture_access(0, AccessKind::Write, TextureLayout::Undefined)])];
        let resources = vec![imported_texture(TextureLayout::Undefined, None)];
        let graph = compile_schedule(passes, resources);
        assert!(graph.transitions_before(0).is_empty());
    }

    #[test]
    fn write_then_read_at_a_different_layout_inserts_a_transition() {
        let passes = vec![
            pass("producer", PassKind::Graphics, vec![texture_access(0, AccessKind::Write, TextureLayout::ColorAttachment)]),
            pass("consumer", PassKind::Graphics, vec![texture_access(0, AccessKind::Read, TextureLayout::ReadOnly)]),
        ];
        let resources = vec![imported_texture(TextureLayout::Undefined, None)];
        let graph = compile_schedule(passes, resources);
        assert_eq!(graph.transitions_before(0), vec![VirtualResourceId(0)]);
        assert_eq!(graph.transitions_before(1), vec![VirtualResourceId(0)]);
    }

    #[test]
    fn declared_final_layout_gets_a_closing_transition() {
        let passes = vec![pass("render", PassKind::Graphics, vec![texture_access(0, AccessKind::Write, TextureLayout::ColorAttachment)])];
        let resources = vec![imported_texture(TextureLayout::Undefined, Some(TextureLayout::PresentSrc))];
        let graph = compile_schedule(passes, resources);
        assert_eq!(graph.final_transitions.len(), 1);
        assert_eq!(graph.final_transitions[0].old_layout, TextureLayout::ColorAttachment);
        assert_eq!(graph.final_transitions[0].new_layout, TextureLayout::PresentSrc);
    }

    #[test]
    fn independent_resources_do_not_cross_transition() {
        let passes = vec![
            pass("p0", PassKind::Graphics, vec![texture_access(0, AccessKind::Write, TextureLayout::ColorAttachment)]),
            pass("p1", PassKind::Graphics, vec![texture_access(1, AccessKind::Write, TextureLayout::ColorAttachment)]),
        ];
        let resources = vec![imported_texture(TextureLayout::Undefined, None), imported_texture(TextureLayout::Undefined, None)];
        let graph = compile_schedule(passes, resources);
        assert_eq!(graph.transitions_before(0), vec![VirtualResourceId(0)]);
        assert_eq!(graph.transitions_before(1), vec![VirtualResourceId(1)]);
    }

    #[test]
    fn lifetime_spans_first_to_last_touching_pass() {
        let passes = vec![
            pass("p0", PassKind::Graphics, vec![texture_access(0, AccessKind::Write, TextureLayout::ColorAttachment)]),
            pass("p1", PassKind::Graphics, vec![]),
            pass("p2", PassKind::Graphics, vec![texture_access(0, AccessKind::Read, TextureLayout::ReadOnly)]),
        ];
        let resources = vec![imported_texture(TextureLayout::Undefined, None)];
        let graph = compile_schedule(passes, resources);
        let lifetime = graph.lifetime_of(VirtualResourceId(0)).unwrap();
        assert_eq!(lifetime.first_use, 0);
        assert_eq!(lifetime.last_use, 2);
    }

    #[test]
    fn schedule_order_is_always_registration_order() {
        let passes = vec![pass("a", PassKind::Transfer, vec![]), pass("b", PassKind::Transfer, vec![]), pass("c", PassKind::Transfer, vec![])];
        let graph = compile_schedule(passes, Vec::new());
        assert_eq!(graph.pass_name(0), "a");
        assert_eq!(graph.pass_name(1), "b");
        assert_eq!(graph.pass_name(2), "c");
    }

    #[test]
    fn repeated_buffer_access_gets_a_conservative_barrier() {
        let passes = vec![
            pass("producer", PassKind::Transfer, vec![ResourceAccess { resource: VirtualResourceId(0), kind: AccessKind::Write, layout: TextureLayout::Undefined }]),
            pass("consumer", PassKind::Transfer, vec![ResourceAccess { resource: VirtualResourceId(0), kind: AccessKind::Read, layout: TextureLayout::Undefined }]),
        ];
        let resources = vec![ResourceEntry {
            kind: ResourceKind::Buffer,
            binding: PhysicalBinding::Buffer(crate::resource::BufferHandle::from_bits(0)),
            current_version: 0,
            initial_layout: TextureLayout::Undefined,
            final_layout: None,
        }];
        let graph = compile_schedule(passes, resources);
        assert!(!graph.passes[0].buffer_barrier);
        assert!(graph.passes[1].buffer_barrier);
    }
}
