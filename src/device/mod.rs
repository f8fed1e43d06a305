//! `GpuDevice`: the single owner of the instance/device/allocator/bindless
//! table/frame ring and every pool of live resource records. Every
//! operation below is grounded on the equivalent `dagal` bootstrap/device
//! code, generalized to this crate's handle-and-pool resource model.
//!
//! Concrete over [`allocators::DefaultAllocator`] rather than generic over
//! `Allocator` — the teacher's device type carries an `A: Allocator` type
//! parameter through every pool it owns, which here would propagate into
//! `Pool<Buffer<A::Allocation>, BufferKind>` and every function signature
//! that touches it. A single compiled-in backend, selected at build time by
//! feature flag, avoids that generic noise for no loss of capability since
//! nothing in this crate swaps allocators at runtime.

pub mod debug_utils;
pub mod frame_ring;
pub mod immediate_submit;
pub mod instance;
pub mod logical_device;
pub mod physical_device;
pub mod queue;

pub use debug_utils::DebugUtils;
pub use frame_ring::{FrameRing, FrameSlot, FRAMES_IN_FLIGHT};
pub use immediate_submit::{ImmediateSubmit, ImmediateSubmitContext};
pub use instance::Instance;
pub use logical_device::LogicalDevice;
pub use physical_device::{PhysicalDevice, QueueFamilyInfo, RequiredFeatures};
pub use queue::Queue;

use std::ffi::{c_char, CString};
use std::ptr;

use anyhow::{Context, Result};
use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::allocators::{Allocation, Allocator, DefaultAllocator, MemoryLocation};
use crate::command::CommandBufferRecording;
use crate::descriptor::{BindlessTable, DescriptorPool, DescriptorSetLayoutBuilder, PoolSize};
use crate::destroy_queue::DestroyerKind;
use crate::error::{FatalError, RhiError};
use crate::frame_graph::{CompiledGraph, ResolvedBuffer, ResolvedTexture, ResourceResolver};
use crate::handle::Handle;
use crate::pipeline_builder::{build_compute_pipeline, ColorAttachmentSpec, GraphicsPipelineBuilder, PipelineLayoutBuilder};
use crate::pool::Pool;
use crate::resource::descriptor_set_layout::DescriptorSetLayoutBinding;
use crate::resource::{
    BindPoint, Buffer, BufferHandle, BufferKind, BufferUsage, DescriptorSet, DescriptorSetHandle,
    DescriptorSetKind, DescriptorSetLayout, DescriptorSetLayoutHandle, DescriptorSetLayoutKind,
    Pipeline, PipelineHandle, PipelineKind, Sampler, SamplerFilterMode, SamplerHandle, SamplerKind,
    Texture, TextureCold, TextureHandle, TextureHot, TextureKind, TextureType, TextureUsage,
};
use crate::shader::{ShaderCompiler, ShaderStageSpec};
use crate::sync::{BinarySemaphore, Fence};
use crate::wsi::{PresentOutcome, Surface, Swapchain, SwapchainConfig};

type BufferAllocation = <DefaultAllocator as Allocator>::Allocation;

/// `Init(config)` inputs: application identity, the window's raw handles
/// (surface creation happens inside this crate — see `wsi::Surface`),
/// initial framebuffer size, v-sync preference, and whether to enable
/// validation layers + `VK_EXT_debug_utils`.
pub struct GpuDeviceConfig<'a> {
    pub app_name: &'a str,
    pub display_handle: RawDisplayHandle,
    pub window_handle: RawWindowHandle,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub enable_validation: bool,
}

pub struct BufferCreateSpec<'a> {
    pub usage: BufferUsage,
    pub size: vk::DeviceSize,
    /// `CreateMapped`: host-visible, sequential-write, persistently mapped.
    pub mapped: bool,
    pub initial_data: Option<&'a [u8]>,
    pub name: Option<String>,
}

pub struct TextureCreateSpec {
    pub format: vk::Format,
    pub texture_type: TextureType,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_count: u32,
    pub usage: TextureUsage,
    pub name: Option<String>,
    pub add_to_bindless: bool,
}

pub struct SamplerCreateSpec {
    pub filter_mode: SamplerFilterMode,
}

pub enum PipelineCreateSpec {
    Graphics {
        stages: Vec<ShaderStageSpec>,
        topology: vk::PrimitiveTopology,
        cull_mode: vk::CullModeFlags,
        front_face: vk::FrontFace,
        /// Up to `pipeline_builder::MAX_COLOR_ATTACHMENTS` (8) slots, one
        /// per color attachment the pass will bind via dynamic rendering.
        color_attachments: Vec<ColorAttachmentSpec>,
        depth_test: bool,
        depth_format: vk::Format,
        set_layouts: Vec<DescriptorSetLayoutHandle>,
        push_constant_stage_flags: vk::ShaderStageFlags,
        push_constant_size: u32,
    },
    Compute {
        stage: ShaderStageSpec,
        set_layouts: Vec<DescriptorSetLayoutHandle>,
        push_constant_stage_flags: vk::ShaderStageFlags,
        push_constant_size: u32,
    },
}

pub enum DescriptorWrite {
    SampledImage { binding: u32, view: vk::ImageView, layout: vk::ImageLayout },
    StorageImage { binding: u32, view: vk::ImageView },
    UniformBuffer { binding: u32, buffer: vk::Buffer, size: vk::DeviceSize },
}

pub struct DescriptorSetCreateSpec {
    pub layout: DescriptorSetLayoutHandle,
    /// Allocate from this frame's transient pool (reset every
    /// `BeginFrame`) rather than a long-lived pool.
    pub per_frame: bool,
    pub writes: Vec<DescriptorWrite>,
}

pub struct GpuDevice {
    instance: Instance,
    debug_utils: Option<DebugUtils>,
    physical_device: PhysicalDevice,
    logical_device: LogicalDevice,
    graphics_queue: Queue,
    allocator: DefaultAllocator,
    bindless: BindlessTable,
    long_lived_descriptor_pool: DescriptorPool,
    frame_ring: FrameRing,
    immediate: ImmediateSubmit,
    surface: Surface,
    swapchain: Swapchain,
    swapchain_stale: bool,
    swapchain_config: SwapchainConfig,

    buffers: Pool<Buffer<BufferAllocation>, BufferKind>,
    textures: Pool<Texture, TextureKind>,
    samplers: Pool<Sampler, SamplerKind>,
    pipelines: Pool<Pipeline, PipelineKind>,
    descriptor_set_layouts: Pool<DescriptorSetLayout, DescriptorSetLayoutKind>,
    descriptor_sets: Pool<DescriptorSet, DescriptorSetKind>,

    /// Image allocations live here rather than in the `Texture` resource
    /// record itself, since `Texture` is shared with the frame graph's
    /// read-only resolver view and doesn't need allocator-specific state.
    pending_texture_allocations: Vec<(vk::Image, BufferAllocation)>,
    current_image_index: u32,
    current_recording: Option<CommandBufferRecording>,

    /// One pooled, non-destroyable `Texture` per swapchain image, indexed
    /// the same way as `self.swapchain.images()`. Rebuilt whenever the
    /// swapchain is recreated so `present_frame` always transitions from
    /// the image's real last-known layout rather than assuming `Undefined`.
    swapchain_textures: Vec<TextureHandle>,
}

const TRANSIENT_POOL_SIZES: &[PoolSize] = &[];
const LONG_LIVED_POOL_MAX_SETS: u32 = 256;
const IMAGE_WAIT_TIMEOUT_NS: u64 = 5_000_000_000;

impl GpuDevice {
    /// `Init`: validates feature availability implicitly by requesting
    /// Vulkan-1.3-equivalent features at device creation (a driver that
    /// can't satisfy them fails `create_device`, which is fatal here —
    /// there is no fallback feature set).
    pub fn init(config: GpuDeviceConfig<'_>) -> Result<Self> {
        let entry = unsafe { ash::Entry::load().context("failed to load Vulkan loader")? };

        let app_name = CString::new(config.app_name)?;
        let engine_name = CString::new("rhi_core")?;
        let application_info = vk::ApplicationInfo {
            s_type: vk::StructureType::APPLICATION_INFO,
            p_next: ptr::null(),
            p_application_name: app_name.as_ptr(),
            application_version: vk::make_api_version(0, 1, 0, 0),
            p_engine_name: engine_name.as_ptr(),
            engine_version: vk::make_api_version(0, 1, 0, 0),
            api_version: RequiredFeatures::MIN_API_VERSION,
            _marker: Default::default(),
        };

        let mut layers: Vec<CString> = Vec::new();
        if config.enable_validation {
            layers.push(CString::new("VK_LAYER_KHRONOS_validation")?);
        }
        let mut extensions: Vec<CString> = unsafe { ash_window::enumerate_required_extensions(config.display_handle)? }
            .iter()
            .map(|&ptr| unsafe { CString::from(std::ffi::CStr::from_ptr(ptr)) })
            .collect();
        if config.enable_validation {
            extensions.push(CString::new(ash::ext::debug_utils::NAME.to_bytes())?);
        }
        let layer_ptrs: Vec<*const c_char> = layers.iter().map(|s| s.as_ptr()).collect();
        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|s| s.as_ptr()).collect();

        let instance_ci = vk::InstanceCreateInfo {
            s_type: vk::StructureType::INSTANCE_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::InstanceCreateFlags::empty(),
            p_application_info: &application_info,
            enabled_layer_count: layer_ptrs.len() as u32,
            pp_enabled_layer_names: layer_ptrs.as_ptr(),
            enabled_extension_count: extension_ptrs.len() as u32,
            pp_enabled_extension_names: extension_ptrs.as_ptr(),
            _marker: Default::default(),
        };
        let instance = unsafe { Instance::new(entry.clone(), &instance_ci)? };

        let surface = unsafe { Surface::new(&entry, instance.handle(), config.display_handle, config.window_handle) }?;

        let candidates = enumerate_physical_devices(instance.handle(), &surface)?;
        let chosen = PhysicalDevice::select_best(&candidates)?.clone();
        let graphics_family = chosen
            .combined_graphics_present_family()
            .ok_or(RhiError::ImpossibleQueue)?;

        let queue_priority = 1.0f32;
        let queue_ci = vk::DeviceQueueCreateInfo {
            s_type: vk::StructureType::DEVICE_QUEUE_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::DeviceQueueCreateFlags::empty(),
            queue_family_index: graphics_family,
            queue_count: 1,
            p_queue_priorities: &queue_priority,
            _marker: Default::default(),
        };

        let required = RequiredFeatures;
        let mut vulkan13 = required.vulkan13();
        let mut vulkan12 = required.vulkan12();
        vulkan12.p_next = &mut vulkan13 as *mut _ as *mut std::ffi::c_void;
        let features2 = vk::PhysicalDeviceFeatures2 {
            s_type: vk::StructureType::PHYSICAL_DEVICE_FEATURES_2,
            p_next: &mut vulkan12 as *mut _ as *mut std::ffi::c_void,
            features: vk::PhysicalDeviceFeatures::default(),
            _marker: Default::default(),
        };

        let device_extensions = [ash::khr::swapchain::NAME.as_ptr()];
        let device_ci = vk::DeviceCreateInfo {
            s_type: vk::StructureType::DEVICE_CREATE_INFO,
            p_next: &features2 as *const _ as *const std::ffi::c_void,
            flags: vk::DeviceCreateFlags::empty(),
            queue_create_info_count: 1,
            p_queue_create_infos: &queue_ci,
            enabled_layer_count: 0,
            pp_enabled_layer_names: ptr::null(),
            enabled_extension_count: device_extensions.len() as u32,
            pp_enabled_extension_names: device_extensions.as_ptr(),
            p_enabled_features: ptr::null(),
            _marker: Default::default(),
        };
        let raw_device = unsafe { instance.handle().create_device(chosen.handle, &device_ci, None)? };
        let logical_device = LogicalDevice::new(raw_device);

        let debug_utils = if config.enable_validation {
            Some(DebugUtils::new(instance.handle(), logical_device.handle()))
        } else {
            None
        };

        let graphics_queue_handle = unsafe { logical_device.handle().get_device_queue(graphics_family, 0) };
        let graphics_queue = Queue::new(graphics_queue_handle, graphics_family, true);

        let allocator = make_default_allocator(&instance, &chosen, &logical_device)?;
        let bindless = BindlessTable::new(logical_device.handle())?;
        let long_lived_descriptor_pool = DescriptorPool::new(
            logical_device.handle(),
            vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET,
            LONG_LIVED_POOL_MAX_SETS,
            &[
                PoolSize::default().descriptor_type(vk::DescriptorType::UNIFORM_BUFFER).descriptor_count(LONG_LIVED_POOL_MAX_SETS),
                PoolSize::default().descriptor_type(vk::DescriptorType::STORAGE_BUFFER).descriptor_count(LONG_LIVED_POOL_MAX_SETS),
                PoolSize::default().descriptor_type(vk::DescriptorType::SAMPLED_IMAGE).descriptor_count(LONG_LIVED_POOL_MAX_SETS),
                PoolSize::default().descriptor_type(vk::DescriptorType::STORAGE_IMAGE).descriptor_count(LONG_LIVED_POOL_MAX_SETS),
            ],
        )?;

        let frame_ring = FrameRing::new(&logical_device.arc(), graphics_family, TRANSIENT_POOL_SIZES)?;
        let immediate = ImmediateSubmit::new(logical_device.arc(), graphics_queue)?;

        let swapchain_config = SwapchainConfig {
            width: config.width,
            height: config.height,
            vsync: config.vsync,
            image_usage: vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_DST,
        };
        let swapchain = Swapchain::new(
            instance.handle(),
            logical_device.handle(),
            chosen.handle,
            &surface,
            swapchain_config,
            None,
        )?;

        let mut device = Self {
            instance,
            debug_utils,
            physical_device: chosen,
            logical_device,
            graphics_queue,
            allocator,
            bindless,
            long_lived_descriptor_pool,
            frame_ring,
            immediate,
            surface,
            swapchain,
            swapchain_stale: false,
            swapchain_config,
            buffers: Pool::new(),
            textures: Pool::new(),
            samplers: Pool::new(),
            pipelines: Pool::new(),
            descriptor_set_layouts: Pool::new(),
            descriptor_sets: Pool::new(),
            pending_texture_allocations: Vec::new(),
            current_image_index: 0,
            current_recording: None,
            swapchain_textures: Vec::new(),
        };
        device.swapchain_textures = device.pool_swapchain_textures();
        Ok(device)
    }

    /// Wraps every current `self.swapchain.images()` entry in a pooled,
    /// non-destroyable `Texture` record sharing the swapchain's own image
    /// view (not a freshly created one — the swapchain already owns and
    /// destroys those views on recreate/teardown).
    fn pool_swapchain_textures(&mut self) -> Vec<TextureHandle> {
        let format = self.swapchain.format();
        let extent = self.swapchain.extent();
        let images = self.swapchain.images().to_vec();
        let views = self.swapchain.image_views().to_vec();
        images
            .into_iter()
            .zip(views)
            .map(|(image, view)| {
                let record = Texture {
                    hot: TextureHot {
                        image,
                        view,
                        current_layout: vk::ImageLayout::UNDEFINED,
                        width: extent.width,
                        height: extent.height,
                        depth: 1,
                        mip_count: 1,
                        sampled_slot: None,
                        storage_slot: None,
                    },
                    cold: TextureCold {
                        format,
                        texture_type: TextureType::D2,
                        usage: TextureUsage::RENDER_TARGET,
                        aspect: vk::ImageAspectFlags::COLOR,
                        name: Some("swapchain_image".to_string()),
                        is_swapchain_image: true,
                    },
                };
                self.textures.acquire(record)
            })
            .collect()
    }

    /// The pooled `Texture` record backing the image `BeginFrame` just
    /// acquired. Used by `present_frame` to read/update the real current
    /// layout instead of assuming `Undefined`, and by frame graph callers
    /// to register the swapchain image as an external resource.
    pub fn current_swapchain_texture(&self) -> TextureHandle {
        self.swapchain_textures[self.current_image_index as usize]
    }

    pub fn device(&self) -> &ash::Device {
        self.logical_device.handle()
    }

    pub fn bindless_layout(&self) -> vk::DescriptorSetLayout {
        self.bindless.layout
    }

    pub fn bindless_set(&self) -> vk::DescriptorSet {
        self.bindless.set
    }

    pub fn swapchain_extent(&self) -> vk::Extent2D {
        self.swapchain.extent()
    }

    pub fn swapchain_format(&self) -> vk::Format {
        self.swapchain.format()
    }

    pub fn access_texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.access(handle)
    }

    pub fn access_buffer(&self, handle: BufferHandle) -> Option<&Buffer<BufferAllocation>> {
        self.buffers.access(handle)
    }

    pub fn access_pipeline(&self, handle: PipelineHandle) -> Option<&Pipeline> {
        self.pipelines.access(handle)
    }

    // ---- resource creation -------------------------------------------------

    pub fn create_buffer(&mut self, spec: &BufferCreateSpec<'_>) -> Result<BufferHandle> {
        let location = if spec.mapped { MemoryLocation::CpuToGpu } else { MemoryLocation::GpuOnly };
        let mut vk_usage = spec.usage.to_vk() | vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS;
        if spec.initial_data.is_some() && !spec.mapped {
            vk_usage |= vk::BufferUsageFlags::TRANSFER_DST;
        }
        let buffer_ci = vk::BufferCreateInfo {
            s_type: vk::StructureType::BUFFER_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::BufferCreateFlags::empty(),
            size: spec.size,
            usage: vk_usage,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            queue_family_index_count: 0,
            p_queue_family_indices: ptr::null(),
            _marker: Default::default(),
        };
        let (handle, allocation) = self.allocator.create_buffer(&buffer_ci, location)?;

        let address_info = vk::BufferDeviceAddressInfo {
            s_type: vk::StructureType::BUFFER_DEVICE_ADDRESS_INFO,
            p_next: ptr::null(),
            buffer: handle,
            _marker: Default::default(),
        };
        let device_address = unsafe { self.device().get_buffer_device_address(&address_info) };

        let bindless_slot = if spec.usage.wants_bindless_slot() {
            let slot = self.bindless.allocate_buffer_slot().map_err(RhiError::from)?;
            self.bindless.write_buffer(self.device(), slot, handle, spec.size);
            Some(slot)
        } else {
            None
        };

        if let Some(bytes) = spec.initial_data {
            if spec.mapped {
                let ptr = allocation.mapped_ptr().ok_or(RhiError::NoMappedPointer)?;
                if bytes.len() as vk::DeviceSize > spec.size {
                    return Err(RhiError::InsufficientSpace.into());
                }
                unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr().cast(), bytes.len()) };
            } else {
                self.upload_buffer_via_staging(handle, bytes)?;
            }
        }

        let record = Buffer {
            handle,
            allocation,
            usage: spec.usage,
            size: spec.size,
            device_address: Some(device_address),
            bindless_slot,
            name: spec.name.clone(),
        };
        Ok(self.buffers.acquire(record))
    }

    fn upload_buffer_via_staging(&mut self, dst: vk::Buffer, bytes: &[u8]) -> Result<()> {
        let staging_ci = vk::BufferCreateInfo {
            s_type: vk::StructureType::BUFFER_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::BufferCreateFlags::empty(),
            size: bytes.len() as vk::DeviceSize,
            usage: vk::BufferUsageFlags::TRANSFER_SRC,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            queue_family_index_count: 0,
            p_queue_family_indices: ptr::null(),
            _marker: Default::default(),
        };
        let (staging, staging_allocation) = self.allocator.create_buffer(&staging_ci, MemoryLocation::CpuToGpu)?;
        let ptr = staging_allocation.mapped_ptr().ok_or(RhiError::NoMappedPointer)?;
        unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr().cast(), bytes.len()) };

        let size = bytes.len() as vk::DeviceSize;
        self.immediate.submit(|ctx| {
            ctx.cmd.copy_buffer(staging, dst, &[vk::BufferCopy { src_offset: 0, dst_offset: 0, size }]);
            Ok(())
        })?;

        self.allocator.destroy_buffer(staging, staging_allocation);
        Ok(())
    }

    pub fn create_texture(&mut self, spec: &TextureCreateSpec) -> Result<TextureHandle> {
        let aspect = spec.usage.aspect();
        let image_ci = vk::ImageCreateInfo {
            s_type: vk::StructureType::IMAGE_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::ImageCreateFlags::empty(),
            image_type: spec.texture_type.to_vk(),
            format: spec.format,
            extent: vk::Extent3D { width: spec.width, height: spec.height, depth: spec.depth },
            mip_levels: spec.mip_count,
            array_layers: 1,
            samples: vk::SampleCountFlags::TYPE_1,
            tiling: vk::ImageTiling::OPTIMAL,
            usage: spec.usage.to_vk(),
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            queue_family_index_count: 0,
            p_queue_family_indices: ptr::null(),
            initial_layout: vk::ImageLayout::UNDEFINED,
            _marker: Default::default(),
        };
        let (image, allocation) = self.allocator.create_image(&image_ci, MemoryLocation::GpuOnly)?;
        let view = create_image_view(self.device(), image, spec.format, aspect, spec.mip_count)?;

        let sampled_slot = if spec.add_to_bindless && spec.usage.contains(TextureUsage::SAMPLED) {
            let slot = self.bindless.allocate_sampled_image_slot().map_err(RhiError::from)?;
            self.bindless
                .write_sampled_image(self.device(), slot, view, vk::ImageLayout::READ_ONLY_OPTIMAL);
            Some(slot)
        } else {
            None
        };
        let storage_slot = if spec.add_to_bindless && spec.usage.contains(TextureUsage::STORAGE_IMAGE) {
            let slot = self.bindless.allocate_storage_image_slot().map_err(RhiError::from)?;
            self.bindless.write_storage_image(self.device(), slot, view);
            Some(slot)
        } else {
            None
        };

        let record = Texture {
            hot: TextureHot {
                image,
                view,
                current_layout: vk::ImageLayout::UNDEFINED,
                width: spec.width,
                height: spec.height,
                depth: spec.depth,
                mip_count: spec.mip_count,
                sampled_slot,
                storage_slot,
            },
            cold: TextureCold {
                format: spec.format,
                texture_type: spec.texture_type,
                usage: spec.usage,
                aspect,
                name: spec.name.clone(),
                is_swapchain_image: false,
            },
        };
        // the allocation itself has no resource-record field to live in —
        // held alive here until Destroy<Texture> pushes it to the destroy
        // queue alongside the image and view.
        self.pending_texture_allocations.push((image, allocation));
        Ok(self.textures.acquire(record))
    }

    pub fn upload_texture_using_staging_buffer(&mut self, handle: TextureHandle, bytes: &[u8]) -> Result<()> {
        let (image, aspect, width, height, depth, current_layout) = {
            let texture = self.textures.access(handle).ok_or(RhiError::HandleStale)?;
            (
                texture.hot.image,
                texture.cold.aspect,
                texture.hot.width,
                texture.hot.height,
                texture.hot.depth,
                texture.hot.current_layout,
            )
        };

        let staging_ci = vk::BufferCreateInfo {
            s_type: vk::StructureType::BUFFER_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::BufferCreateFlags::empty(),
            size: bytes.len() as vk::DeviceSize,
            usage: vk::BufferUsageFlags::TRANSFER_SRC,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            queue_family_index_count: 0,
            p_queue_family_indices: ptr::null(),
            _marker: Default::default(),
        };
        let (staging, staging_allocation) = self.allocator.create_buffer(&staging_ci, MemoryLocation::CpuToGpu)?;
        let ptr = staging_allocation.mapped_ptr().ok_or(RhiError::NoMappedPointer)?;
        unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr().cast(), bytes.len()) };

        let region = vk::BufferImageCopy {
            buffer_offset: 0,
            buffer_row_length: 0,
            buffer_image_height: 0,
            image_subresource: vk::ImageSubresourceLayers {
                aspect_mask: aspect,
                mip_level: 0,
                base_array_layer: 0,
                layer_count: 1,
            },
            image_offset: vk::Offset3D::default(),
            image_extent: vk::Extent3D { width, height, depth },
        };

        self.immediate.submit(|ctx| {
            ctx.cmd.transition_image(image, aspect, current_layout, vk::ImageLayout::TRANSFER_DST_OPTIMAL);
            ctx.cmd
                .copy_buffer_to_texture(staging, image, vk::ImageLayout::TRANSFER_DST_OPTIMAL, &[region]);
            ctx.cmd
                .transition_image(image, aspect, vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::ImageLayout::READ_ONLY_OPTIMAL);
            Ok(())
        })?;

        self.allocator.destroy_buffer(staging, staging_allocation);

        if let Some(texture) = self.textures.access_mut(handle) {
            texture.hot.current_layout = vk::ImageLayout::READ_ONLY_OPTIMAL;
        }
        Ok(())
    }

    pub fn create_sampler(&mut self, spec: &SamplerCreateSpec) -> Result<SamplerHandle> {
        let sampler_ci = vk::SamplerCreateInfo {
            s_type: vk::StructureType::SAMPLER_CREATE_INFO,
            p_next: ptr::null(),
            flags: vk::SamplerCreateFlags::empty(),
            mag_filter: spec.filter_mode.mag_filter,
            min_filter: spec.filter_mode.min_filter,
            mipmap_mode: vk::SamplerMipmapMode::LINEAR,
            address_mode_u: spec.filter_mode.address_mode,
            address_mode_v: spec.filter_mode.address_mode,
            address_mode_w: spec.filter_mode.address_mode,
            mip_lod_bias: 0.0,
            anisotropy_enable: vk::FALSE,
            max_anisotropy: 1.0,
            compare_enable: vk::FALSE,
            compare_op: vk::CompareOp::ALWAYS,
            min_lod: 0.0,
            max_lod: vk::LOD_CLAMP_NONE,
            border_color: vk::BorderColor::FLOAT_TRANSPARENT_BLACK,
            unnormalized_coordinates: vk::FALSE,
            _marker: Default::default(),
        };
        let handle = unsafe { self.device().create_sampler(&sampler_ci, None)? };
        let slot = self.bindless.allocate_sampler_slot().map_err(RhiError::from)?;
        self.bindless.write_sampler(self.device(), slot, handle);

        let record = Sampler { handle, filter_mode: spec.filter_mode, bindless_slot: Some(slot) };
        Ok(self.samplers.acquire(record))
    }

    pub fn create_descriptor_set_layout(&mut self, bindings: Vec<DescriptorSetLayoutBinding>) -> Result<DescriptorSetLayoutHandle> {
        let mut builder = DescriptorSetLayoutBuilder::default();
        for binding in &bindings {
            builder = builder.add_binding(crate::descriptor::layout_builder::LayoutBinding {
                binding: binding.binding,
                descriptor_type: binding.descriptor_type,
                descriptor_count: binding.descriptor_count,
                stage_flags: binding.stage_flags,
                binding_flags: vk::DescriptorBindingFlags::empty(),
            });
        }
        let handle = builder.build(self.device(), vk::DescriptorSetLayoutCreateFlags::empty())?;
        let record = DescriptorSetLayout { handle, set_index: 1, bindings };
        Ok(self.descriptor_set_layouts.acquire(record))
    }

    pub fn create_pipeline(&mut self, compiler: &dyn ShaderCompiler, spec: PipelineCreateSpec) -> Result<PipelineHandle> {
        match spec {
            PipelineCreateSpec::Graphics {
                stages,
                topology,
                cull_mode,
                front_face,
                color_attachments,
                depth_test,
                depth_format,
                set_layouts,
                push_constant_stage_flags,
                push_constant_size,
            } => {
                let (layout, pc_size) = self.build_pipeline_layout(&set_layouts, push_constant_stage_flags, push_constant_size)?;
                let mut builder = GraphicsPipelineBuilder::default()
                    .topology(topology)
                    .cull_mode(cull_mode, front_face)
                    .color_attachments(color_attachments)
                    .depth_attachment_format(depth_format);
                if !depth_test {
                    builder = builder.disable_depth_test();
                }
                for stage_spec in &stages {
                    let compiled = compiler.compile(self.device(), stage_spec)?;
                    builder = builder.add_stage(compiled);
                }
                let handle = builder.build(self.device(), layout)?;
                let record = Pipeline { handle, layout, bind_point: BindPoint::Graphics, set_layouts, push_constant_size: pc_size };
                Ok(self.pipelines.acquire(record))
            }
            PipelineCreateSpec::Compute { stage, set_layouts, push_constant_stage_flags, push_constant_size } => {
                let (layout, pc_size) = self.build_pipeline_layout(&set_layouts, push_constant_stage_flags, push_constant_size)?;
                let compiled = compiler.compile(self.device(), &stage)?;
                let handle = build_compute_pipeline(self.device(), layout, &compiled)?;
                let record = Pipeline { handle, layout, bind_point: BindPoint::Compute, set_layouts, push_constant_size: pc_size };
                Ok(self.pipelines.acquire(record))
            }
        }
    }

    fn build_pipeline_layout(
        &self,
        set_layouts: &[DescriptorSetLayoutHandle],
        push_constant_stage_flags: vk::ShaderStageFlags,
        push_constant_size: u32,
    ) -> Result<(vk::PipelineLayout, u32)> {
        let mut builder = PipelineLayoutBuilder::default().add_set_layout(self.bindless.layout);
        for &handle in set_layouts {
            let layout = self.descriptor_set_layouts.access(handle).ok_or(RhiError::HandleStale)?;
            builder = builder.add_set_layout(layout.handle);
        }
        builder = builder.push_constants(push_constant_stage_flags, push_constant_size);
        Ok(builder.build(self.device())?)
    }

    pub fn create_descriptor_set(&mut self, spec: DescriptorSetCreateSpec) -> Result<DescriptorSetHandle> {
        let layout_record = self.descriptor_set_layouts.access(spec.layout).ok_or(RhiError::HandleStale)?;
        let layout = layout_record.handle;

        let set = if spec.per_frame {
            self.frame_ring.current().descriptor_pool.allocate(self.logical_device.handle(), layout)?
        } else {
            self.long_lived_descriptor_pool.allocate(self.logical_device.handle(), layout)?
        };

        for write in &spec.writes {
            self.apply_descriptor_write(set, write);
        }

        let record = DescriptorSet { handle: set, set_index: 1, layout: spec.layout, per_frame: spec.per_frame };
        Ok(self.descriptor_sets.acquire(record))
    }

    fn apply_descriptor_write(&self, set: vk::DescriptorSet, write: &DescriptorWrite) {
        match *write {
            DescriptorWrite::SampledImage { binding, view, layout } => {
                let image_info = vk::DescriptorImageInfo { sampler: vk::Sampler::null(), image_view: view, image_layout: layout };
                let write = vk::WriteDescriptorSet {
                    s_type: vk::StructureType::WRITE_DESCRIPTOR_SET,
                    p_next: ptr::null(),
                    dst_set: set,
                    dst_binding: binding,
                    dst_array_element: 0,
                    descriptor_count: 1,
                    descriptor_type: vk::DescriptorType::SAMPLED_IMAGE,
                    p_image_info: &image_info,
                    p_buffer_info: ptr::null(),
                    p_texel_buffer_view: ptr::null(),
                    _marker: Default::default(),
                };
                unsafe { self.device().update_descriptor_sets(&[write], &[]) };
            }
            DescriptorWrite::StorageImage { binding, view } => {
                let image_info = vk::DescriptorImageInfo { sampler: vk::Sampler::null(), image_view: view, image_layout: vk::ImageLayout::GENERAL };
                let write = vk::WriteDescriptorSet {
                    s_type: vk::StructureType::WRITE_DESCRIPTOR_SET,
                    p_next: ptr::null(),
                    dst_set: set,
                    dst_binding: binding,
                    dst_array_element: 0,
                    descriptor_count: 1,
                    descriptor_type: vk::DescriptorType::STORAGE_IMAGE,
                    p_image_info: &image_info,
                    p_buffer_info: ptr::null(),
                    p_texel_buffer_view: ptr::null(),
                    _marker: Default::default(),
                };
                unsafe { self.device().update_descriptor_sets(&[write], &[]) };
            }
            DescriptorWrite::UniformBuffer { binding, buffer, size } => {
                let buffer_info = vk::DescriptorBufferInfo { buffer, offset: 0, range: size };
                let write = vk::WriteDescriptorSet {
                    s_type: vk::StructureType::WRITE_DESCRIPTOR_SET,
                    p_next: ptr::null(),
                    dst_set: set,
                    dst_binding: binding,
                    dst_array_element: 0,
                    descriptor_count: 1,
                    descriptor_type: vk::DescriptorType::UNIFORM_BUFFER,
                    p_image_info: ptr::null(),
                    p_buffer_info: &buffer_info,
                    p_texel_buffer_view: ptr::null(),
                    _marker: Default::default(),
                };
                unsafe { self.device().update_descriptor_sets(&[write], &[]) };
            }
        }
    }

    // ---- destruction --------------------------------------------------------

    pub fn destroy_buffer(&mut self, handle: BufferHandle) {
        let Some(record) = self.buffers.release(handle) else { return };
        if let Some(slot) = record.bindless_slot {
            self.bindless.free_buffer_slot(slot);
        }
        let current_frame = self.frame_ring.frame_index();
        let mut allocator = AllocatorHandle(&mut self.allocator as *mut DefaultAllocator);
        self.frame_ring.current_mut().destroy_queue.push(DestroyerKind::Buffer, current_frame, move || {
            // SAFETY: the destroy queue runs this closure only after
            // `frames_in_flight` frames have elapsed, by which point this
            // device (and its allocator) are guaranteed still alive since
            // destruction always goes through `GpuDevice`.
            let allocator = allocator;
            let allocator = unsafe { &mut *allocator.0 };
            allocator.destroy_buffer(record.handle, record.allocation);
            let _ = &mut allocator;
        });
    }

    /// No-ops (without releasing the handle) on a swapchain image — those
    /// are owned by `Swapchain` and torn down on resize/shutdown, not by
    /// user `destroy_texture` calls.
    pub fn destroy_texture(&mut self, handle: TextureHandle) {
        if matches!(self.textures.access(handle), Some(t) if t.cold.is_swapchain_image) {
            return;
        }
        let Some(record) = self.textures.release(handle) else { return };
        if let Some(slot) = record.hot.sampled_slot {
            self.bindless.free_sampled_image_slot(slot);
        }
        if let Some(slot) = record.hot.storage_slot {
            self.bindless.free_storage_image_slot(slot);
        }
        let allocation_index = self
            .pending_texture_allocations
            .iter()
            .position(|(image, _)| *image == record.hot.image);
        let allocation = allocation_index.map(|i| self.pending_texture_allocations.swap_remove(i).1);

        let device = self.logical_device.arc();
        let view = record.hot.view;
        let image = record.hot.image;
        let current_frame = self.frame_ring.frame_index();
        let mut allocator = AllocatorHandle(&mut self.allocator as *mut DefaultAllocator);
        self.frame_ring.current_mut().destroy_queue.push(DestroyerKind::ImageAndView, current_frame, move || {
            let allocator = allocator;
            unsafe { device.destroy_image_view(view, None) };
            if let Some(allocation) = allocation {
                let allocator = unsafe { &mut *allocator.0 };
                allocator.destroy_image(image, allocation);
            }
            let _ = &mut allocator;
        });
    }

    pub fn destroy_sampler(&mut self, handle: SamplerHandle) {
        let Some(record) = self.samplers.release(handle) else { return };
        if let Some(slot) = record.bindless_slot {
            self.bindless.free_sampler_slot(slot);
        }
        let device = self.logical_device.arc();
        let current_frame = self.frame_ring.frame_index();
        self.frame_ring.current_mut().destroy_queue.push(DestroyerKind::Sampler, current_frame, move || {
            unsafe { device.destroy_sampler(record.handle, None) };
        });
    }

    pub fn destroy_pipeline(&mut self, handle: PipelineHandle) {
        let Some(record) = self.pipelines.release(handle) else { return };
        let device = self.logical_device.arc();
        let current_frame = self.frame_ring.frame_index();
        self.frame_ring.current_mut().destroy_queue.push(DestroyerKind::Pipeline, current_frame, move || {
            unsafe {
                device.destroy_pipeline(record.handle, None);
                device.destroy_pipeline_layout(record.layout, None);
            }
        });
    }

    pub fn destroy_descriptor_set_layout(&mut self, handle: DescriptorSetLayoutHandle) {
        let Some(record) = self.descriptor_set_layouts.release(handle) else { return };
        let device = self.logical_device.arc();
        let current_frame = self.frame_ring.frame_index();
        self.frame_ring.current_mut().destroy_queue.push(DestroyerKind::DescriptorSetLayout, current_frame, move || {
            unsafe { device.destroy_descriptor_set_layout(record.handle, None) };
        });
    }

    // ---- frame lifecycle ------------------------------------------------

    /// `BeginFrame`: returns `false` when the swapchain needed a rebuild
    /// this call and so no image is ready to record into yet.
    pub fn begin_frame(&mut self) -> Result<bool> {
        if self.swapchain_stale {
            self.resize_swapchain()?;
        }

        let frames_in_flight = self.frame_ring.slot_count() as u64;
        let frame_index = self.frame_ring.frame_index();
        {
            let slot = self.frame_ring.current();
            slot.fence.wait(self.device(), IMAGE_WAIT_TIMEOUT_NS)?;
            slot.fence.reset(self.device())?;
        }

        let acquire_semaphore = self.frame_ring.current().acquire_semaphore;
        let (image_index, outcome) = self.swapchain.acquire_next_image(IMAGE_WAIT_TIMEOUT_NS, Some(&acquire_semaphore), None)?;
        if outcome == PresentOutcome::Stale {
            self.swapchain_stale = true;
            return Ok(false);
        }
        self.current_image_index = image_index;

        let slot = self.frame_ring.current_mut();
        slot.command_pool.reset(vk::CommandPoolResetFlags::empty())?;
        slot.destroy_queue.flush_due(frame_index, frames_in_flight);
        slot.descriptor_pool.reset(self.logical_device.handle(), vk::DescriptorPoolResetFlags::empty())?;

        let command_buffer = slot.command_buffer.take().expect("frame slot always returns its command buffer before the next begin_frame");
        let recording = command_buffer.begin(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)?;
        self.current_recording = Some(recording);
        Ok(true)
    }

    pub fn recording(&self) -> Option<&CommandBufferRecording> {
        self.current_recording.as_ref()
    }

    /// `PresentFrame`.
    pub fn present_frame(&mut self) -> Result<()> {
        let recording = self.current_recording.take().context("present_frame called without a successful begin_frame")?;
        let swapchain_handle = self.current_swapchain_texture();
        let swapchain_texture = self.textures.access(swapchain_handle).ok_or(RhiError::HandleStale)?;
        let swapchain_image = swapchain_texture.hot.image;
        let current_layout = swapchain_texture.hot.current_layout;
        recording.transition_image(
            swapchain_image,
            vk::ImageAspectFlags::COLOR,
            current_layout,
            vk::ImageLayout::PRESENT_SRC_KHR,
        );
        if let Some(texture) = self.textures.access_mut(swapchain_handle) {
            texture.hot.current_layout = vk::ImageLayout::PRESENT_SRC_KHR;
        }
        let executable = recording.end()?;

        let slot = self.frame_ring.current();
        let cmd_info = executable.submit_info();
        let wait_info = vk::SemaphoreSubmitInfo {
            s_type: vk::StructureType::SEMAPHORE_SUBMIT_INFO,
            p_next: ptr::null(),
            semaphore: slot.acquire_semaphore.handle,
            value: 0,
            stage_mask: vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT,
            device_index: 0,
            _marker: Default::default(),
        };
        let signal_info = vk::SemaphoreSubmitInfo {
            s_type: vk::StructureType::SEMAPHORE_SUBMIT_INFO,
            p_next: ptr::null(),
            semaphore: slot.render_semaphore.handle,
            value: 0,
            stage_mask: vk::PipelineStageFlags2::ALL_GRAPHICS,
            device_index: 0,
            _marker: Default::default(),
        };
        let submit_info = vk::SubmitInfo2 {
            s_type: vk::StructureType::SUBMIT_INFO_2,
            p_next: ptr::null(),
            flags: vk::SubmitFlags::empty(),
            wait_semaphore_info_count: 1,
            p_wait_semaphore_infos: &wait_info,
            command_buffer_info_count: 1,
            p_command_buffer_infos: &cmd_info,
            signal_semaphore_info_count: 1,
            p_signal_semaphore_infos: &signal_info,
            _marker: Default::default(),
        };
        let fence = slot.fence.handle;
        let command_buffer = executable.submit(self.graphics_queue.handle, &[submit_info], fence)?;
        self.frame_ring.current_mut().command_buffer = Some(command_buffer);

        let wait_semaphores = [self.frame_ring.current().render_semaphore.handle];
        let outcome = self.swapchain.present(self.graphics_queue.handle, self.current_image_index, &wait_semaphores)?;
        if outcome == PresentOutcome::Stale {
            self.swapchain_stale = true;
        }
        self.frame_ring.advance();
        Ok(())
    }

    /// Runs a compiled frame graph against the current frame's recording:
    /// allocates a real resource for every transient the graph asked for,
    /// binds it back onto the graph, then executes. `BeginFrame` must have
    /// succeeded first — this records into `self.current_recording`, it
    /// does not open its own command buffer.
    ///
    /// After execution, every texture the graph touched has its pooled
    /// `Texture::hot.current_layout` updated to match where the graph left
    /// it, so a later `present_frame` (or another frame graph run) sees the
    /// real layout rather than assuming `Undefined`.
    pub fn run_frame_graph(&mut self, mut graph: CompiledGraph) -> Result<()> {
        for (id, info) in graph.pending_transient_textures() {
            let handle = self.create_texture(&TextureCreateSpec {
                format: info.format,
                texture_type: TextureType::D2,
                width: info.width,
                height: info.height,
                depth: 1,
                mip_count: 1,
                usage: info.usage,
                name: Some(info.name),
                add_to_bindless: false,
            })?;
            graph.bind_transient_texture(id, handle);
        }
        for (id, info) in graph.pending_transient_buffers() {
            let handle = self.create_buffer(&BufferCreateSpec {
                usage: info.usage,
                size: info.size,
                mapped: false,
                initial_data: None,
                name: Some(info.name),
            })?;
            graph.bind_transient_buffer(id, handle);
        }

        let texture_handles = graph.bound_texture_handles();
        let recording = self.current_recording.as_ref().context("run_frame_graph called without a successful begin_frame")?;
        let final_layouts = graph.execute(recording, self);

        for (id, handle) in texture_handles {
            if let Some(layout) = final_layouts.get(&id) {
                if let Some(texture) = self.textures.access_mut(handle) {
                    texture.hot.current_layout = layout.to_vk();
                }
            }
        }
        Ok(())
    }

    fn resize_swapchain(&mut self) -> Result<()> {
        self.logical_device.wait_idle()?;
        let caps = self.surface.capabilities(self.physical_device.handle)?;
        self.swapchain_config.width = caps.current_extent.width;
        self.swapchain_config.height = caps.current_extent.height;
        self.swapchain.recreate(
            self.instance.handle(),
            self.logical_device.handle(),
            self.physical_device.handle,
            &self.surface,
            self.swapchain_config,
        )?;
        self.swapchain_stale = false;

        for handle in self.swapchain_textures.drain(..) {
            self.textures.release(handle);
        }
        self.swapchain_textures = self.pool_swapchain_textures();
        Ok(())
    }

    pub fn immediate_submit<F>(&mut self, record: F) -> Result<()>
    where
        F: FnOnce(&ImmediateSubmitContext<'_>) -> Result<()>,
    {
        self.immediate.submit(record)
    }

    pub fn shutdown(&mut self) {
        if self.logical_device.wait_idle().is_err() {
            FatalError::Backend("device_wait_idle failed during shutdown").terminate();
        }
        let device = self.device().clone();
        self.frame_ring.destroy(&device);
        self.immediate.destroy(&device);
        self.long_lived_descriptor_pool.destroy(&device);
        self.bindless.destroy(&device);
        self.swapchain.destroy(&device);
        self.surface.destroy();
        self.logical_device.destroy();
        self.instance.destroy();
    }
}

/// Lets `CompiledGraph::execute` turn the handles a pass setup declared
/// back into the native image/buffer a command actually needs, without the
/// scheduling code in `frame_graph` ever depending on `ash::Device` itself.
impl ResourceResolver for GpuDevice {
    fn resolve_texture(&self, handle: TextureHandle) -> ResolvedTexture {
        let texture = self.textures.access(handle).expect("frame graph resolved a stale texture handle");
        ResolvedTexture {
            image: texture.hot.image,
            view: texture.hot.view,
            layout: texture.hot.current_layout,
            aspect: texture.cold.aspect,
        }
    }

    fn resolve_buffer(&self, handle: BufferHandle) -> ResolvedBuffer {
        let buffer = self.buffers.access(handle).expect("frame graph resolved a stale buffer handle");
        ResolvedBuffer { buffer: buffer.handle, size: buffer.size }
    }
}

struct AllocatorHandle(*mut DefaultAllocator);
unsafe impl Send for AllocatorHandle {}

fn create_image_view(
    device: &ash::Device,
    image: vk::Image,
    format: vk::Format,
    aspect: vk::ImageAspectFlags,
    mip_count: u32,
) -> Result<vk::ImageView> {
    let view_ci = vk::ImageViewCreateInfo {
        s_type: vk::StructureType::IMAGE_VIEW_CREATE_INFO,
        p_next: ptr::null(),
        flags: vk::ImageViewCreateFlags::empty(),
        image,
        view_type: vk::ImageViewType::TYPE_2D,
        format,
        components: vk::ComponentMapping::default(),
        subresource_range: vk::ImageSubresourceRange {
            aspect_mask: aspect,
            base_mip_level: 0,
            level_count: mip_count,
            base_array_layer: 0,
            layer_count: 1,
        },
        _marker: Default::default(),
    };
    Ok(unsafe { device.create_image_view(&view_ci, None)? })
}

fn make_default_allocator(instance: &Instance, physical_device: &PhysicalDevice, device: &LogicalDevice) -> Result<DefaultAllocator> {
    #[cfg(feature = "vk-mem-rs")]
    {
        let create_info = vk_mem::AllocatorCreateInfo::new(instance.handle(), device.handle(), physical_device.handle);
        let inner = unsafe { vk_mem::Allocator::new(create_info)? };
        Ok(crate::allocators::vma::VmaAllocator { inner })
    }
    #[cfg(all(feature = "gpu-allocator", not(feature = "vk-mem-rs")))]
    {
        let inner = gpu_allocator::vulkan::Allocator::new(&gpu_allocator::vulkan::AllocatorCreateDesc {
            instance: instance.handle().clone(),
            device: device.handle().clone(),
            physical_device: physical_device.handle,
            debug_settings: Default::default(),
            buffer_device_address: true,
            allocation_sizes: Default::default(),
        })?;
        Ok(crate::allocators::gpu_alloc::GpuAllocatorBackend { inner, device: device.handle().clone() })
    }
}

fn enumerate_physical_devices(instance: &ash::Instance, surface: &Surface) -> Result<Vec<PhysicalDevice>> {
    let handles = unsafe { instance.enumerate_physical_devices()? };
    let mut result = Vec::with_capacity(handles.len());
    for handle in handles {
        let properties = unsafe { instance.get_physical_device_properties(handle) };
        let family_properties = unsafe { instance.get_physical_device_queue_family_properties(handle) };
        let mut queue_families = Vec::with_capacity(family_properties.len());
        for (index, family) in family_properties.iter().enumerate() {
            let index = index as u32;
            let graphics = family.queue_flags.contains(vk::QueueFlags::GRAPHICS);
            let transfer = family.queue_flags.contains(vk::QueueFlags::TRANSFER);
            let present = surface.supports_present(handle, index)?;
            queue_families.push(QueueFamilyInfo { family_index: index, graphics, present, transfer });
        }
        result.push(PhysicalDevice {
            handle,
            properties,
            queue_families,
            is_discrete: properties.device_type == vk::PhysicalDeviceType::DISCRETE_GPU,
        });
    }
    Ok(result)
}
