//! Bindless Table / bindless descriptor set layout.
//!
//! Four independent [`SlotAllocator`]s (one per binding), so sampled-image
//! and storage-image slots for the same texture don't fight over one index
//! space; see `DESIGN.md` for the rationale.

use std::ptr;

use anyhow::Result;
use ash::vk;

use crate::descriptor::descriptor_pool::{DescriptorPool, PoolSize};
use crate::descriptor::layout_builder::{DescriptorSetLayoutBuilder, LayoutBinding};
use crate::descriptor::slot_allocator::{SlotAllocator, SlotFull};
use crate::error::RhiError;

/// Must stay large enough to cover worst-case material/texture counts.
pub const MAX_SAMPLERS: u32 = 1024;
pub const MAX_SAMPLED_IMAGES: u32 = 8192;
pub const MAX_STORAGE_IMAGES: u32 = 2048;
pub const MAX_BUFFERS: u32 = 4096;

pub const SAMPLER_BINDING: u32 = 0;
pub const SAMPLED_IMAGE_BINDING: u32 = 1;
pub const STORAGE_IMAGE_BINDING: u32 = 2;
pub const BUFFER_BINDING: u32 = 3;

pub struct BindlessTable {
    pub layout: vk::DescriptorSetLayout,
    pub pool: DescriptorPool,
    pub set: vk::DescriptorSet,

    samplers: SlotAllocator,
    sampled_images: SlotAllocator,
    storage_images: SlotAllocator,
    buffers: SlotAllocator,
}

impl BindlessTable {
    pub fn new(device: &ash::Device) -> Result<Self> {
        let pool_sizes = [
            PoolSize::default()
                .descriptor_type(vk::DescriptorType::SAMPLER)
                .descriptor_count(MAX_SAMPLERS),
            PoolSize::default()
                .descriptor_type(vk::DescriptorType::SAMPLED_IMAGE)
                .descriptor_count(MAX_SAMPLED_IMAGES),
            PoolSize::default()
                .descriptor_type(vk::DescriptorType::STORAGE_IMAGE)
                .descriptor_count(MAX_STORAGE_IMAGES),
            PoolSize::default()
                .descriptor_type(vk::DescriptorType::STORAGE_BUFFER)
                .descriptor_count(MAX_BUFFERS),
        ];
        let pool = DescriptorPool::new(
            device,
            vk::DescriptorPoolCreateFlags::UPDATE_AFTER_BIND_EXT,
            1,
            &pool_sizes,
        )?;

        let indexing_flags = vk::DescriptorBindingFlags::PARTIALLY_BOUND
            | vk::DescriptorBindingFlags::UPDATE_AFTER_BIND
            | vk::DescriptorBindingFlags::UPDATE_UNUSED_WHILE_PENDING;

        let layout = DescriptorSetLayoutBuilder::default()
            .add_binding(LayoutBinding {
                binding: SAMPLER_BINDING,
                descriptor_type: vk::DescriptorType::SAMPLER,
                descriptor_count: MAX_SAMPLERS,
                stage_flags: vk::ShaderStageFlags::ALL,
                binding_flags: indexing_flags,
            })
            .add_binding(LayoutBinding {
                binding: SAMPLED_IMAGE_BINDING,
                descriptor_type: vk::DescriptorType::SAMPLED_IMAGE,
                descriptor_count: MAX_SAMPLED_IMAGES,
                stage_flags: vk::ShaderStageFlags::ALL,
                binding_flags: indexing_flags,
            })
            .add_binding(LayoutBinding {
                binding: STORAGE_IMAGE_BINDING,
                descriptor_type: vk::DescriptorType::STORAGE_IMAGE,
                descriptor_count: MAX_STORAGE_IMAGES,
                stage_flags: vk::ShaderStageFlags::ALL,
                binding_flags: indexing_flags,
            })
            .add_binding(LayoutBinding {
                binding: BUFFER_BINDING,
                descriptor_type: vk::DescriptorType::STORAGE_BUFFER,
                descriptor_count: MAX_BUFFERS,
                stage_flags: vk::ShaderStageFlags::ALL,
                binding_flags: indexing_flags,
            })
            .build(device, vk::DescriptorSetLayoutCreateFlags::UPDATE_AFTER_BIND_POOL_EXT)?;

        let set = pool.allocate(device, layout)?;

        Ok(Self {
            layout,
            pool,
            set,
            samplers: SlotAllocator::new(MAX_SAMPLERS),
            sampled_images: SlotAllocator::new(MAX_SAMPLED_IMAGES),
            storage_images: SlotAllocator::new(MAX_STORAGE_IMAGES),
            buffers: SlotAllocator::new(MAX_BUFFERS),
        })
    }

    pub fn allocate_sampler_slot(&mut self) -> Result<u32, SlotFull> {
        self.samplers.allocate()
    }
    pub fn free_sampler_slot(&mut self, slot: u32) {
        self.samplers.free(slot);
    }

    pub fn allocate_sampled_image_slot(&mut self) -> Result<u32, SlotFull> {
        self.sampled_images.allocate()
    }
    pub fn free_sampled_image_slot(&mut self, slot: u32) {
        self.sampled_images.free(slot);
    }

    pub fn allocate_storage_image_slot(&mut self) -> Result<u32, SlotFull> {
        self.storage_images.allocate()
    }
    pub fn free_storage_image_slot(&mut self, slot: u32) {
        self.storage_images.free(slot);
    }

    pub fn allocate_buffer_slot(&mut self) -> Result<u32, SlotFull> {
        self.buffers.allocate()
    }
    pub fn free_buffer_slot(&mut self, slot: u32) {
        self.buffers.free(slot);
    }

    pub fn write_sampled_image(
        &self,
        device: &ash::Device,
        slot: u32,
        view: vk::ImageView,
        layout: vk::ImageLayout,
    ) {
        let image_info = vk::DescriptorImageInfo {
            sampler: vk::Sampler::null(),
            image_view: view,
            image_layout: layout,
        };
        let write = vk::WriteDescriptorSet {
            s_type: vk::StructureType::WRITE_DESCRIPTOR_SET,
            p_next: ptr::null(),
            dst_set: self.set,
            dst_binding: SAMPLED_IMAGE_BINDING,
            dst_array_element: slot,
            descriptor_count: 1,
            descriptor_type: vk::DescriptorType::SAMPLED_IMAGE,
            p_image_info: &image_info,
            p_buffer_info: ptr::null(),
            p_texel_buffer_view: ptr::null(),
            _marker: Default::default(),
        };
        unsafe { device.update_descriptor_sets(&[write], &[]) };
    }

    pub fn write_storage_image(&self, device: &ash::Device, slot: u32, view: vk::ImageView) {
        let image_info = vk::DescriptorImageInfo {
            sampler: vk::Sampler::null(),
            image_view: view,
            image_layout: vk::ImageLayout::GENERAL,
        };
        let write = vk::WriteDescriptorSet {
            s_type: vk::StructureType::WRITE_DESCRIPTOR_SET,
            p_next: ptr::null(),
            dst_set: self.set,
            dst_binding: STORAGE_IMAGE_BINDING,
            dst_array_element: slot,
            descriptor_count: 1,
            descriptor_type: vk::DescriptorType::STORAGE_IMAGE,
            p_image_info: &image_info,
            p_buffer_info: ptr::null(),
            p_texel_buffer_view: ptr::null(),
            _marker: Default::default(),
        };
        unsafe { device.update_descriptor_sets(&[write], &[]) };
    }

    pub fn write_sampler(&self, device: &ash::Device, slot: u32, sampler: vk::Sampler) {
        let image_info = vk::DescriptorImageInfo {
            sampler,
            image_view: vk::ImageView::null(),
            image_layout: vk::ImageLayout::UNDEFINED,
        };
        let write = vk::WriteDescriptorSet {
            s_type: vk::StructureType::WRITE_DESCRIPTOR_SET,
            p_next: ptr::null(),
            dst_set: self.set,
            dst_binding: SAMPLER_BINDING,
            dst_array_element: slot,
            descriptor_count: 1,
            descriptor_type: vk::DescriptorType::SAMPLER,
            p_image_info: &image_info,
            p_buffer_info: ptr::null(),
            p_texel_buffer_view: ptr::null(),
            _marker: Default::default(),
        };
        unsafe { device.update_descriptor_sets(&[write], &[]) };
    }

    pub fn write_buffer(&self, device: &ash::Device, slot: u32, buffer: vk::Buffer, size: vk::DeviceSize) {
        let buffer_info = vk::DescriptorBufferInfo {
            buffer,
            offset: 0,
            range: size,
        };
        let write = vk::WriteDescriptorSet {
            s_type: vk::StructureType::WRITE_DESCRIPTOR_SET,
            p_next: ptr::null(),
            dst_set: self.set,
            dst_binding: BUFFER_BINDING,
            dst_array_element: slot,
            descriptor_count: 1,
            descriptor_type: vk::DescriptorType::STORAGE_BUFFER,
            p_image_info: ptr::null(),
            p_buffer_info: &buffer_info,
            p_texel_buffer_view: ptr::null(),
            _marker: Default::default(),
        };
        unsafe { device.update_descriptor_sets(&[write], &[]) };
    }

    pub fn destroy(&self, device: &ash::Device) {
        self.pool.destroy(device);
        unsafe { device.destroy_descriptor_set_layout(self.layout, None) };
    }
}

impl From<SlotFull> for RhiError {
    fn from(_: SlotFull) -> Self {
        RhiError::BindlessTableFull
    }
}
