//! Frame ring: `FRAMES_IN_FLIGHT` slots, each owning everything the main
//! loop touches once per frame — a fence gating CPU reuse, the
//! acquire/render semaphore pair, a command pool/buffer, a per-frame
//! destroy queue, and a per-frame descriptor pool for transient sets.

use std::sync::Arc;

use anyhow::{Context, Result};
use ash::vk;

use crate::command::{CommandBuffer, CommandPool};
use crate::descriptor::{DescriptorPool, PoolSize};
use crate::destroy_queue::DestroyQueue;
use crate::sync::{BinarySemaphore, Fence};

pub const FRAMES_IN_FLIGHT: u32 = 2;

pub struct FrameSlot {
    pub fence: Fence,
    pub acquire_semaphore: BinarySemaphore,
    pub render_semaphore: BinarySemaphore,
    pub command_pool: CommandPool,
    pub command_buffer: Option<CommandBuffer>,
    pub destroy_queue: DestroyQueue,
    pub descriptor_pool: DescriptorPool,
}

impl FrameSlot {
    fn new(device: &Arc<ash::Device>, queue_family: u32, transient_pool_sizes: &[PoolSize]) -> Result<Self> {
        let command_pool = CommandPool::new(device.clone(), queue_family, vk::CommandPoolCreateFlags::empty())?;
        let command_buffer = command_pool
            .allocate(1, vk::CommandBufferLevel::PRIMARY)?
            .pop()
            .context("command pool allocated zero buffers")?;
        let descriptor_pool = DescriptorPool::new(
            device,
            vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET,
            64,
            transient_pool_sizes,
        )?;
        Ok(Self {
            fence: Fence::new(device, vk::FenceCreateFlags::SIGNALED)?,
            acquire_semaphore: BinarySemaphore::new(device)?,
            render_semaphore: BinarySemaphore::new(device)?,
            command_pool,
            command_buffer: Some(command_buffer),
            destroy_queue: DestroyQueue::new(),
            descriptor_pool,
        })
    }

    fn destroy(&mut self, device: &ash::Device) {
        self.destroy_queue.drain_all();
        self.fence.destroy(device);
        self.acquire_semaphore.destroy(device);
        self.render_semaphore.destroy(device);
        self.descriptor_pool.destroy(device);
        self.command_pool.destroy();
    }
}

pub struct FrameRing {
    slots: Vec<FrameSlot>,
    frame_index: u64,
}

impl FrameRing {
    pub fn new(device: &Arc<ash::Device>, queue_family: u32, transient_pool_sizes: &[PoolSize]) -> Result<Self> {
        let slots = (0..FRAMES_IN_FLIGHT)
            .map(|_| FrameSlot::new(device, queue_family, transient_pool_sizes))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { slots, frame_index: 0 })
    }

    /// The monotonically increasing frame counter, used as the timestamp a
    /// deferred destroyer is pushed with.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn slot_for(&self, frame_index: u64) -> usize {
        (frame_index % self.slots.len() as u64) as usize
    }

    pub fn current(&self) -> &FrameSlot {
        let idx = self.slot_for(self.frame_index);
        &self.slots[idx]
    }

    pub fn current_mut(&mut self) -> &mut FrameSlot {
        let idx = self.slot_for(self.frame_index);
        &mut self.slots[idx]
    }

    /// Moves to the next slot in the ring. Called once per `BeginFrame`,
    /// after the previous occupant's fence has been waited on.
    pub fn advance(&mut self) {
        self.frame_index += 1;
    }

    pub fn destroy(&mut self, device: &ash::Device) {
        for slot in self.slots.iter_mut() {
            slot.destroy(device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_rotation_wraps_at_frames_in_flight() {
        let n = FRAMES_IN_FLIGHT as u64;
        for start in 0..4 * n {
            let idx = (start % n) as usize;
            assert!(idx < n as usize);
        }
    }
}
