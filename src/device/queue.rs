use ash::vk;

/// A queue handle plus the metadata needed to submit correctly (family
/// index, whether it can present). The core runs single-threaded so no
/// internal locking is needed here.
#[derive(Debug, Copy, Clone)]
pub struct Queue {
    pub handle: vk::Queue,
    pub family_index: u32,
    pub can_present: bool,
}

impl Queue {
    pub fn new(handle: vk::Queue, family_index: u32, can_present: bool) -> Self {
        Self {
            handle,
            family_index,
            can_present,
        }
    }
}
