use ash::vk;

use crate::resource::DescriptorSetLayoutHandle;

/// DescriptorSet record: native handle + set index + the layout it was
/// allocated from.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    pub handle: vk::DescriptorSet,
    pub set_index: u32,
    pub layout: DescriptorSetLayoutHandle,
    /// Whether this set was allocated from the current frame's per-frame
    /// pool (reset every `BeginFrame`) rather than a long-lived pool.
    pub per_frame: bool,
}
