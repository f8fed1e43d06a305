use ash::vk;
use bitflags::bitflags;

use crate::allocators::Allocation;

bitflags! {
    /// Mirrors the subset of `vk::BufferUsageFlags` the device's
    /// `CreateBuffer` contract cares about.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const VERTEX = 1 << 0;
        const INDEX = 1 << 1;
        const UNIFORM = 1 << 2;
        const STORAGE = 1 << 3;
        const TRANSFER_SRC = 1 << 4;
        const TRANSFER_DST = 1 << 5;
        const INDIRECT = 1 << 6;
    }
}

impl BufferUsage {
    /// Whether this usage set requires a bindless buffer-table slot, per
    /// Uniform and storage buffers always claim a bindless slot.
    pub fn wants_bindless_slot(self) -> bool {
        self.intersects(BufferUsage::UNIFORM | BufferUsage::STORAGE)
    }

    pub fn to_vk(self) -> vk::BufferUsageFlags {
        let mut flags = vk::BufferUsageFlags::empty();
        if self.contains(BufferUsage::VERTEX) {
            flags |= vk::BufferUsageFlags::VERTEX_BUFFER;
        }
        if self.contains(BufferUsage::INDEX) {
            flags |= vk::BufferUsageFlags::INDEX_BUFFER;
        }
        if self.contains(BufferUsage::UNIFORM) {
            flags |= vk::BufferUsageFlags::UNIFORM_BUFFER;
        }
        if self.contains(BufferUsage::STORAGE) {
            flags |= vk::BufferUsageFlags::STORAGE_BUFFER;
        }
        if self.contains(BufferUsage::TRANSFER_SRC) {
            flags |= vk::BufferUsageFlags::TRANSFER_SRC;
        }
        if self.contains(BufferUsage::TRANSFER_DST) {
            flags |= vk::BufferUsageFlags::TRANSFER_DST;
        }
        if self.contains(BufferUsage::INDIRECT) {
            flags |= vk::BufferUsageFlags::INDIRECT_BUFFER;
        }
        flags
    }
}

/// Buffer record: native handle + allocation + usage + size + optional
/// device address + optional mapped pointer + debug name. Plain data —
/// destruction goes through [`crate::destroy_queue::DestroyQueue`], never a
/// `Drop` impl on this type directly.
#[derive(Debug)]
pub struct Buffer<A: Allocation> {
    pub handle: vk::Buffer,
    pub allocation: A,
    pub usage: BufferUsage,
    pub size: vk::DeviceSize,
    pub device_address: Option<vk::DeviceAddress>,
    pub bindless_slot: Option<u32>,
    pub name: Option<String>,
}

impl<A: Allocation> Buffer<A> {
    pub fn mapped_ptr(&self) -> Option<std::ptr::NonNull<std::ffi::c_void>> {
        self.allocation.mapped_ptr()
    }
}
