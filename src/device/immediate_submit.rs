//! One-shot command submission outside the frame ring: its own fence,
//! command pool, and command buffer, reused across calls rather than
//! allocated per upload.

use std::sync::Arc;

use anyhow::Result;
use ash::vk;

use crate::command::{CommandBuffer, CommandBufferRecording, CommandPool};
use crate::device::Queue;
use crate::sync::Fence;

const IMMEDIATE_FENCE_TIMEOUT_NS: u64 = 10_000_000_000;

pub struct ImmediateSubmit {
    fence: Fence,
    command_buffer: Option<CommandBuffer>,
    command_pool: CommandPool,
    device: Arc<ash::Device>,
    queue: Queue,
}

pub struct ImmediateSubmitContext<'a> {
    pub cmd: &'a CommandBufferRecording,
    pub queue: &'a Queue,
}

impl ImmediateSubmit {
    pub fn new(device: Arc<ash::Device>, queue: Queue) -> Result<Self> {
        let fence = Fence::new(&device, vk::FenceCreateFlags::SIGNALED)?;
        let command_pool = CommandPool::new(device.clone(), queue.family_index, vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)?;
        let command_buffer = command_pool.allocate(1, vk::CommandBufferLevel::PRIMARY)?.pop();
        Ok(Self {
            fence,
            command_buffer,
            command_pool,
            device,
            queue,
        })
    }

    /// Runs `record` against a freshly begun one-time-submit command
    /// buffer, then submits and blocks until the GPU has finished it.
    pub fn submit<F>(&mut self, record: F) -> Result<()>
    where
        F: FnOnce(&ImmediateSubmitContext<'_>) -> Result<()>,
    {
        self.fence.wait(&self.device, IMMEDIATE_FENCE_TIMEOUT_NS)?;
        self.fence.reset(&self.device)?;

        let command_buffer = self
            .command_buffer
            .take()
            .expect("immediate command buffer is always returned before the next submit");
        command_buffer.reset(vk::CommandBufferResetFlags::empty())?;
        let recording = command_buffer.begin(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)?;

        let context = ImmediateSubmitContext {
            cmd: &recording,
            queue: &self.queue,
        };
        record(&context)?;

        let executable = recording.end()?;
        let cmd_submit_info = executable.submit_info();
        let submit_info = vk::SubmitInfo2 {
            s_type: vk::StructureType::SUBMIT_INFO_2,
            p_next: std::ptr::null(),
            flags: vk::SubmitFlags::empty(),
            wait_semaphore_info_count: 0,
            p_wait_semaphore_infos: std::ptr::null(),
            command_buffer_info_count: 1,
            p_command_buffer_infos: &cmd_submit_info,
            signal_semaphore_info_count: 0,
            p_signal_semaphore_infos: std::ptr::null(),
            _marker: Default::default(),
        };
        let returned = executable.submit(self.queue.handle, &[submit_info], self.fence.handle)?;
        self.fence.wait(&self.device, IMMEDIATE_FENCE_TIMEOUT_NS)?;
        self.command_buffer = Some(returned);
        Ok(())
    }

    pub fn destroy(&mut self, device: &ash::Device) {
        self.fence.destroy(device);
        self.command_pool.destroy();
    }
}
