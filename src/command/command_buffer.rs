//! Typestate command buffer: `CommandBuffer` (ready) -> `begin()` ->
//! `CommandBufferRecording` -> `end()` -> `CommandBufferExecutable` ->
//! `submit()` -> `CommandBuffer`. Recording methods only exist on
//! `CommandBufferRecording`, so a caller cannot record after `end()` or
//! submit before it.

use std::cell::Cell;
use std::ptr;
use std::sync::Arc;

use anyhow::Result;
use ash::vk;

#[derive(Clone)]
pub struct CommandBuffer {
    handle: vk::CommandBuffer,
    device: Arc<ash::Device>,
}

impl std::fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuffer").field("handle", &self.handle).finish()
    }
}

impl CommandBuffer {
    pub fn new(handle: vk::CommandBuffer, device: Arc<ash::Device>) -> Self {
        Self { handle, device }
    }

    pub fn handle(&self) -> vk::CommandBuffer {
        self.handle
    }

    pub fn reset(&self, flags: vk::CommandBufferResetFlags) -> Result<()> {
        unsafe { self.device.reset_command_buffer(self.handle, flags)? };
        Ok(())
    }

    pub fn begin(self, flags: vk::CommandBufferUsageFlags) -> Result<CommandBufferRecording> {
        let begin_info = vk::CommandBufferBeginInfo {
            s_type: vk::StructureType::COMMAND_BUFFER_BEGIN_INFO,
            p_next: ptr::null(),
            flags,
            p_inheritance_info: ptr::null(),
            _marker: Default::default(),
        };
        unsafe { self.device.begin_command_buffer(self.handle, &begin_info)? };
        Ok(CommandBufferRecording {
            handle: self.handle,
            device: self.device,
            bound_pipeline: Cell::new(None),
        })
    }
}

/// A pipeline bound on a [`CommandBufferRecording`]: its layout (needed to
/// resolve descriptor-set and push-constant calls) and its bind point
/// (needed to infer push-constant stage visibility). Recording-scoped —
/// every fresh recording starts with nothing bound, matching Vulkan's own
/// rule that pipeline state does not survive a command buffer reset.
#[derive(Debug, Copy, Clone)]
struct BoundPipeline {
    layout: vk::PipelineLayout,
    bind_point: vk::PipelineBindPoint,
}

pub struct CommandBufferRecording {
    handle: vk::CommandBuffer,
    device: Arc<ash::Device>,
    bound_pipeline: Cell<Option<BoundPipeline>>,
}

impl std::fmt::Debug for CommandBufferRecording {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBufferRecording")
            .field("handle", &self.handle)
            .field("bound_pipeline", &self.bound_pipeline)
            .finish()
    }
}

impl CommandBufferRecording {
    pub fn handle(&self) -> vk::CommandBuffer {
        self.handle
    }

    pub fn end(self) -> Result<CommandBufferExecutable> {
        unsafe { self.device.end_command_buffer(self.handle)? };
        Ok(CommandBufferExecutable {
            handle: self.handle,
            device: self.device,
        })
    }

    /// Conservative `ALL_COMMANDS` / `MEMORY_WRITE|MEMORY_READ` barrier for
    /// an image layout transition. The aspect mask is supplied by the
    /// caller because depth/stencil images need `DEPTH` (or
    /// `DEPTH | STENCIL`) rather than `COLOR`. Elides the barrier entirely
    /// when `old_layout == new_layout` — the caller is expected to pass the
    /// resource's actual tracked layout, not assume `Undefined`.
    pub fn transition_image(
        &self,
        image: vk::Image,
        aspect_mask: vk::ImageAspectFlags,
        old_layout: vk::ImageLayout,
        new_layout: vk::ImageLayout,
    ) {
        if old_layout == new_layout {
            return;
        }
        let barrier = vk::ImageMemoryBarrier2 {
            s_type: vk::StructureType::IMAGE_MEMORY_BARRIER_2,
            p_next: ptr::null(),
            src_stage_mask: vk::PipelineStageFlags2::ALL_COMMANDS,
            src_access_mask: vk::AccessFlags2::MEMORY_WRITE,
            dst_stage_mask: vk::PipelineStageFlags2::ALL_COMMANDS,
            dst_access_mask: vk::AccessFlags2::MEMORY_WRITE | vk::AccessFlags2::MEMORY_READ,
            old_layout,
            new_layout,
            src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            image,
            subresource_range: vk::ImageSubresourceRange {
                aspect_mask,
                base_mip_level: 0,
                level_count: vk::REMAINING_MIP_LEVELS,
                base_array_layer: 0,
                layer_count: vk::REMAINING_ARRAY_LAYERS,
            },
            _marker: Default::default(),
        };
        let dep_info = vk::DependencyInfo {
            s_type: vk::StructureType::DEPENDENCY_INFO,
            p_next: ptr::null(),
            dependency_flags: vk::DependencyFlags::empty(),
            memory_barrier_count: 0,
            p_memory_barriers: ptr::null(),
            buffer_memory_barrier_count: 0,
            p_buffer_memory_barriers: ptr::null(),
            image_memory_barrier_count: 1,
            p_image_memory_barriers: &barrier,
            _marker: Default::default(),
        };
        unsafe { self.device.cmd_pipeline_barrier2(self.handle, &dep_info) };
    }

    pub fn buffer_barrier(&self, buffer: vk::Buffer, offset: vk::DeviceSize, size: vk::DeviceSize) {
        let barrier = vk::BufferMemoryBarrier2 {
            s_type: vk::StructureType::BUFFER_MEMORY_BARRIER_2,
            p_next: ptr::null(),
            src_stage_mask: vk::PipelineStageFlags2::ALL_COMMANDS,
            src_access_mask: vk::AccessFlags2::MEMORY_WRITE,
            dst_stage_mask: vk::PipelineStageFlags2::ALL_COMMANDS,
            dst_access_mask: vk::AccessFlags2::MEMORY_WRITE | vk::AccessFlags2::MEMORY_READ,
            src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            buffer,
            offset,
            size,
            _marker: Default::default(),
        };
        let dep_info = vk::DependencyInfo {
            s_type: vk::StructureType::DEPENDENCY_INFO,
            p_next: ptr::null(),
            dependency_flags: vk::DependencyFlags::empty(),
            memory_barrier_count: 0,
            p_memory_barriers: ptr::null(),
            buffer_memory_barrier_count: 1,
            p_buffer_memory_barriers: &barrier,
            image_memory_barrier_count: 0,
            p_image_memory_barriers: ptr::null(),
            _marker: Default::default(),
        };
        unsafe { self.device.cmd_pipeline_barrier2(self.handle, &dep_info) };
    }

    /// Whole-pipeline `ALL_COMMANDS`/`MEMORY_WRITE|MEMORY_READ` barrier with
    /// no image or buffer specifics — the form a scheduler uses when it
    /// knows a hazard exists between two passes but isn't tracking per-
    /// resource layouts itself.
    pub fn memory_barrier(&self) {
        let barrier = vk::MemoryBarrier2 {
            s_type: vk::StructureType::MEMORY_BARRIER_2,
            p_next: ptr::null(),
            src_stage_mask: vk::PipelineStageFlags2::ALL_COMMANDS,
            src_access_mask: vk::AccessFlags2::MEMORY_WRITE,
            dst_stage_mask: vk::PipelineStageFlags2::ALL_COMMANDS,
            dst_access_mask: vk::AccessFlags2::MEMORY_WRITE | vk::AccessFlags2::MEMORY_READ,
            _marker: Default::default(),
        };
        let dep_info = vk::DependencyInfo {
            s_type: vk::StructureType::DEPENDENCY_INFO,
            p_next: ptr::null(),
            dependency_flags: vk::DependencyFlags::empty(),
            memory_barrier_count: 1,
            p_memory_barriers: &barrier,
            buffer_memory_barrier_count: 0,
            p_buffer_memory_barriers: ptr::null(),
            image_memory_barrier_count: 0,
            p_image_memory_barriers: ptr::null(),
            _marker: Default::default(),
        };
        unsafe { self.device.cmd_pipeline_barrier2(self.handle, &dep_info) };
    }

    pub fn clear_image(&self, image: vk::Image, layout: vk::ImageLayout, color: vk::ClearColorValue) {
        let range = vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: vk::REMAINING_MIP_LEVELS,
            base_array_layer: 0,
            layer_count: vk::REMAINING_ARRAY_LAYERS,
        };
        unsafe {
            self.device
                .cmd_clear_color_image(self.handle, image, layout, &color, &[range])
        };
    }

    pub fn blit_image(
        &self,
        src: vk::Image,
        src_layout: vk::ImageLayout,
        dst: vk::Image,
        dst_layout: vk::ImageLayout,
        region: vk::ImageBlit,
        filter: vk::Filter,
    ) {
        unsafe {
            self.device
                .cmd_blit_image(self.handle, src, src_layout, dst, dst_layout, &[region], filter)
        };
    }

    pub fn copy_buffer(&self, src: vk::Buffer, dst: vk::Buffer, regions: &[vk::BufferCopy]) {
        unsafe { self.device.cmd_copy_buffer(self.handle, src, dst, regions) };
    }

    pub fn copy_buffer_to_texture(
        &self,
        buffer: vk::Buffer,
        image: vk::Image,
        layout: vk::ImageLayout,
        regions: &[vk::BufferImageCopy],
    ) {
        unsafe {
            self.device
                .cmd_copy_buffer_to_image(self.handle, buffer, image, layout, regions)
        };
    }

    /// Binds `pipeline` and remembers its layout and bind point so later
    /// `bind_descriptor_set`/`push_constants` calls on this recording don't
    /// need the caller to carry them around separately.
    pub fn bind_pipeline(&self, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline, layout: vk::PipelineLayout) {
        unsafe { self.device.cmd_bind_pipeline(self.handle, bind_point, pipeline) };
        self.bound_pipeline.set(Some(BoundPipeline { layout, bind_point }));
    }

    /// Binds `set` at `set_index` against the layout and bind point of
    /// whatever pipeline was last bound with `bind_pipeline` on this
    /// recording.
    ///
    /// # Panics
    /// Panics if no pipeline has been bound yet.
    pub fn bind_descriptor_set(&self, set_index: u32, set: vk::DescriptorSet) {
        let bound = self
            .bound_pipeline
            .get()
            .expect("bind_descriptor_set called before bind_pipeline");
        unsafe {
            self.device
                .cmd_bind_descriptor_sets(self.handle, bound.bind_point, bound.layout, set_index, &[set], &[])
        };
    }

    pub fn bind_index_buffer(&self, buffer: vk::Buffer, offset: vk::DeviceSize, index_type: vk::IndexType) {
        unsafe { self.device.cmd_bind_index_buffer(self.handle, buffer, offset, index_type) };
    }

    pub fn begin_rendering(&self, rendering_info: &vk::RenderingInfo) {
        unsafe { self.device.cmd_begin_rendering(self.handle, rendering_info) };
    }

    pub fn end_rendering(&self) {
        unsafe { self.device.cmd_end_rendering(self.handle) };
    }

    pub fn set_viewport(&self, viewport: vk::Viewport) {
        unsafe { self.device.cmd_set_viewport(self.handle, 0, &[viewport]) };
    }

    pub fn set_scissor(&self, scissor: vk::Rect2D) {
        unsafe { self.device.cmd_set_scissor(self.handle, 0, &[scissor]) };
    }

    pub fn draw(&self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        unsafe {
            self.device
                .cmd_draw(self.handle, vertex_count, instance_count, first_vertex, first_instance)
        };
    }

    pub fn draw_indexed(
        &self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        unsafe {
            self.device.cmd_draw_indexed(
                self.handle,
                index_count,
                instance_count,
                first_index,
                vertex_offset,
                first_instance,
            )
        };
    }

    pub fn dispatch(&self, group_x: u32, group_y: u32, group_z: u32) {
        unsafe { self.device.cmd_dispatch(self.handle, group_x, group_y, group_z) };
    }

    /// Pushes constants against the layout of whatever pipeline was last
    /// bound with `bind_pipeline`, inferring stage visibility from its bind
    /// point (`Graphics` -> vertex+fragment, `Compute` -> compute).
    ///
    /// # Panics
    /// Panics if no pipeline has been bound yet, or if the bound pipeline's
    /// bind point is neither `GRAPHICS` nor `COMPUTE`.
    pub fn push_constants(&self, offset: u32, data: &[u8]) {
        let bound = self
            .bound_pipeline
            .get()
            .expect("push_constants called before bind_pipeline");
        let stage_flags = match bound.bind_point {
            vk::PipelineBindPoint::GRAPHICS => vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            vk::PipelineBindPoint::COMPUTE => vk::ShaderStageFlags::COMPUTE,
            other => panic!("push_constants: unsupported bind point {other:?}"),
        };
        unsafe {
            self.device
                .cmd_push_constants(self.handle, bound.layout, stage_flags, offset, data)
        };
    }
}

pub struct CommandBufferExecutable {
    handle: vk::CommandBuffer,
    device: Arc<ash::Device>,
}

impl std::fmt::Debug for CommandBufferExecutable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBufferExecutable").field("handle", &self.handle).finish()
    }
}

impl CommandBufferExecutable {
    pub fn handle(&self) -> vk::CommandBuffer {
        self.handle
    }

    pub fn submit_info(&self) -> vk::CommandBufferSubmitInfo<'static> {
        vk::CommandBufferSubmitInfo {
            s_type: vk::StructureType::COMMAND_BUFFER_SUBMIT_INFO,
            p_next: ptr::null(),
            command_buffer: self.handle,
            device_mask: 0,
            _marker: Default::default(),
        }
    }

    pub fn submit(self, queue: vk::Queue, submit_infos: &[vk::SubmitInfo2], fence: vk::Fence) -> Result<CommandBuffer> {
        unsafe { self.device.queue_submit2(queue, submit_infos, fence)? };
        Ok(CommandBuffer {
            handle: self.handle,
            device: self.device,
        })
    }
}
