use std::ptr;
use std::sync::Arc;

use anyhow::Result;
use tracing::trace;
use ash::vk;

use crate::command::CommandBuffer;

#[derive(Clone)]
pub struct CommandPool {
    handle: vk::CommandPool,
    device: Arc<ash::Device>,
}

impl std::fmt::Debug for CommandPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandPool").field("handle", &self.handle).finish()
    }
}

impl CommandPool {
    pub fn new(device: Arc<ash::Device>, queue_family: u32, flags: vk::CommandPoolCreateFlags) -> Result<Self> {
        let create_info = vk::CommandPoolCreateInfo {
            s_type: vk::StructureType::COMMAND_POOL_CREATE_INFO,
            p_next: ptr::null(),
            flags,
            queue_family_index: queue_family,
            _marker: Default::default(),
        };
        let handle = unsafe { device.create_command_pool(&create_info, None)? };

        #[cfg(feature = "log-lifetimes")]
        trace!("created VkCommandPool {:p}", handle);

        Ok(Self { handle, device })
    }

    pub fn handle(&self) -> vk::CommandPool {
        self.handle
    }

    pub fn reset(&self, flags: vk::CommandPoolResetFlags) -> Result<()> {
        unsafe { self.device.reset_command_pool(self.handle, flags)? };
        Ok(())
    }

    pub fn allocate(&self, count: u32, level: vk::CommandBufferLevel) -> Result<Vec<CommandBuffer>> {
        let alloc_info = vk::CommandBufferAllocateInfo {
            s_type: vk::StructureType::COMMAND_BUFFER_ALLOCATE_INFO,
            p_next: ptr::null(),
            command_pool: self.handle,
            level,
            command_buffer_count: count,
            _marker: Default::default(),
        };
        let buffers = unsafe { self.device.allocate_command_buffers(&alloc_info)? };
        Ok(buffers
            .into_iter()
            .map(|handle| CommandBuffer::new(handle, self.device.clone()))
            .collect())
    }

    pub fn destroy(&self) {
        unsafe { self.device.destroy_command_pool(self.handle, None) };
    }
}
