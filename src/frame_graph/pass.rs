use crate::frame_graph::resource::{TextureLayout, VirtualResourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceAccess {
    pub resource: VirtualResourceId,
    pub kind: AccessKind,
    /// Target layout for a texture access. Ignored for buffers, which have
    /// no layout concept — they're synchronized by a conservative memory
    /// barrier on every access after the first instead.
    pub layout: TextureLayout,
}

/// What kind of work a pass records, carried through so the scheduler knows
/// whether to wrap it in `vkCmdBeginRendering`/`vkCmdEndRendering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Graphics,
    Compute,
    Transfer,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorAttachmentRef {
    pub resource: VirtualResourceId,
    pub slot: u32,
}

pub(crate) struct PassRecord {
    pub name: String,
    pub kind: PassKind,
    pub accesses: Vec<ResourceAccess>,
    pub color_attachments: Vec<ColorAttachmentRef>,
    pub depth_attachment: Option<VirtualResourceId>,
    pub execute: Option<Box<dyn FnOnce(&mut crate::frame_graph::execute::ExecuteContext<'_>) + 'static>>,
}
