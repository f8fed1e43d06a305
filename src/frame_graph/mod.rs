//! Declarative pass registration over versioned virtual resources. Passes
//! run in exactly the order they were registered — there is no dependency
//! graph to reorder or cull, which keeps `compile()` linear in the pass
//! count and easy to reason about. Textures get a real tracked
//! `old_layout -> new_layout` transition before any pass whose declared
//! access layout differs from where the scheduler last left the resource;
//! buffers, which have no layout, fall back to a conservative memory
//! barrier on every re-touch.
//!
//! `compile()` never needs a device; only [`schedule::CompiledGraph::execute`]
//! and its transient-materialization accessors do, through the
//! [`execute::ResourceResolver`] seam.

mod builder;
mod execute;
mod pass;
mod resource;
mod schedule;

pub use builder::{FrameGraphBuilder, PassBuilder};
pub use execute::{ExecuteContext, ResolvedBuffer, ResolvedTexture, ResourceResolver};
pub use pass::{AccessKind, ColorAttachmentRef, PassKind};
pub use resource::{ResourceKind, TextureLayout, TransientBufferInfo, TransientTextureInfo, VirtualResource, VirtualResourceId};
pub use schedule::{CompiledGraph, ResourceLifetime};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;

    #[test]
    fn single_pass_graph_has_no_transitions() {
        let mut graph = FrameGraphBuilder::new();
        let color = graph.import_texture(Handle::from_bits(0));
        graph
            .add_pass("clear", PassKind::Graphics, |pb| {
                pb.writes(color, TextureLayout::Undefined);
                |_ctx: &mut ExecuteContext<'_>| {}
            })
            .unwrap();
        let compiled = graph.compile();
        assert_eq!(compiled.pass_count(), 1);
        assert!(compiled.transitions_before(0).is_empty());
    }

    #[test]
    fn write_then_read_across_passes_inserts_a_transition() {
        let mut graph = FrameGraphBuilder::new();
        let color = graph.import_texture(Handle::from_bits(0));
        graph
            .add_pass("opaque", PassKind::Graphics, |pb| {
                let written = pb.writes(color, TextureLayout::ColorAttachment);
                let _ = written;
                |_ctx: &mut ExecuteContext<'_>| {}
            })
            .unwrap();
        graph
            .add_pass("post", PassKind::Graphics, |pb| {
                pb.reads(color, TextureLayout::ReadOnly);
                |_ctx: &mut ExecuteContext<'_>| {}
            })
            .unwrap();
        let compiled = graph.compile();
        assert!(compiled.transitions_before(0).is_empty());
        assert_eq!(compiled.transitions_before(1).len(), 1);
    }

    #[test]
    fn writing_a_resource_bumps_its_version() {
        let mut graph = FrameGraphBuilder::new();
        let buf = graph.import_buffer(Handle::from_bits(0));
        assert_eq!(buf.version, 0);
        let mut after = buf;
        graph
            .add_pass("upload", PassKind::Transfer, |pb| {
                after = pb.writes(buf, TextureLayout::Undefined);
                |_ctx: &mut ExecuteContext<'_>| {}
            })
            .unwrap();
        assert_eq!(after.version, 1);
    }

    #[test]
    fn registering_the_swapchain_image_with_a_final_layout_closes_the_frame() {
        let mut graph = FrameGraphBuilder::new();
        let swapchain = graph.register_external_texture(Handle::from_bits(0), TextureLayout::Undefined, Some(TextureLayout::PresentSrc));
        graph
            .add_pass("blit", PassKind::Graphics, |pb| {
                pb.add_color_attachment(swapchain, 0);
                |_ctx: &mut ExecuteContext<'_>| {}
            })
            .unwrap();
        let compiled = graph.compile();
        assert_eq!(compiled.transitions_before(0).len(), 1);
    }
}
