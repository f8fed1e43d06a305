use std::ptr;

use anyhow::Result;
use ash::vk;
use tracing::trace;

use crate::sync::{BinarySemaphore, Fence};
use crate::wsi::surface::{pick_present_mode, pick_surface_format};
use crate::wsi::Surface;

/// Caller-supplied intent for swapchain (re)creation. Resolved against the
/// surface's queried capabilities at `Swapchain::new`/`recreate` time.
#[derive(Debug, Clone, Copy)]
pub struct SwapchainConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub image_usage: vk::ImageUsageFlags,
}

impl Default for SwapchainConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            vsync: true,
            image_usage: vk::ImageUsageFlags::COLOR_ATTACHMENT,
        }
    }
}

/// Outcome of a present call. `Stale` means the surface no longer matches
/// the swapchain (resize, or the platform reporting out-of-date/suboptimal);
/// rebuilding happens on the *next* `BeginFrame`, never mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    Ok,
    Stale,
}

pub struct Swapchain {
    handle: vk::SwapchainKHR,
    ext: ash::khr::swapchain::Device,
    format: vk::Format,
    extent: vk::Extent2D,
    present_mode: vk::PresentModeKHR,
    image_usage: vk::ImageUsageFlags,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
}

impl std::fmt::Debug for Swapchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Swapchain")
            .field("handle", &self.handle)
            .field("format", &self.format)
            .field("extent", &self.extent)
            .finish()
    }
}

impl Swapchain {
    pub fn new(
        instance: &ash::Instance,
        device: &ash::Device,
        physical_device: vk::PhysicalDevice,
        surface: &Surface,
        config: SwapchainConfig,
        old: Option<vk::SwapchainKHR>,
    ) -> Result<Self> {
        let ext = ash::khr::swapchain::Device::new(instance, device);
        let caps = surface.capabilities(physical_device)?;
        let formats = surface.formats(physical_device)?;
        let present_modes = surface.present_modes(physical_device)?;

        let surface_format = pick_surface_format(&formats);
        let present_mode = pick_present_mode(&present_modes, config.vsync);
        let extent = resolve_extent(&caps, config.width, config.height);

        let mut image_count = caps.min_image_count + 1;
        if caps.max_image_count > 0 {
            image_count = image_count.min(caps.max_image_count);
        }

        let create_info = vk::SwapchainCreateInfoKHR {
            s_type: vk::StructureType::SWAPCHAIN_CREATE_INFO_KHR,
            p_next: ptr::null(),
            flags: vk::SwapchainCreateFlagsKHR::empty(),
            surface: surface.handle(),
            min_image_count: image_count,
            image_format: surface_format.format,
            image_color_space: surface_format.color_space,
            image_extent: extent,
            image_array_layers: 1,
            image_usage: config.image_usage,
            image_sharing_mode: vk::SharingMode::EXCLUSIVE,
            queue_family_index_count: 0,
            p_queue_family_indices: ptr::null(),
            pre_transform: caps.current_transform,
            composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE,
            present_mode,
            clipped: vk::TRUE,
            old_swapchain: old.unwrap_or(vk::SwapchainKHR::null()),
            _marker: Default::default(),
        };

        let handle = unsafe { ext.create_swapchain(&create_info, None)? };

        #[cfg(feature = "log-lifetimes")]
        trace!("created VkSwapchainKHR {:p}", handle);

        let images = unsafe { ext.get_swapchain_images(handle)? };
        let image_views = create_image_views(device, &images, surface_format.format)?;

        Ok(Self {
            handle,
            ext,
            format: surface_format.format,
            extent,
            present_mode,
            image_usage: config.image_usage,
            images,
            image_views,
        })
    }

    /// Rebuilds the swapchain in place, reusing the old handle per the
    /// Vulkan spec's `oldSwapchain` retirement mechanism. Only called at the
    /// top of `BeginFrame`, never mid-frame.
    pub fn recreate(
        &mut self,
        instance: &ash::Instance,
        device: &ash::Device,
        physical_device: vk::PhysicalDevice,
        surface: &Surface,
        config: SwapchainConfig,
    ) -> Result<()> {
        let rebuilt = Self::new(instance, device, physical_device, surface, config, Some(self.handle))?;
        self.destroy_views_and_swapchain(device);
        *self = rebuilt;
        Ok(())
    }

    pub fn handle(&self) -> vk::SwapchainKHR {
        self.handle
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }

    pub fn present_mode(&self) -> vk::PresentModeKHR {
        self.present_mode
    }

    pub fn images(&self) -> &[vk::Image] {
        &self.images
    }

    pub fn image_views(&self) -> &[vk::ImageView] {
        &self.image_views
    }

    /// Returns `Ok(index)` plus whether the platform already flagged this
    /// image as suboptimal (caller should still present it this frame, but
    /// schedule a rebuild before the next `BeginFrame`).
    pub fn acquire_next_image(
        &self,
        timeout_ns: u64,
        semaphore: Option<&BinarySemaphore>,
        fence: Option<&Fence>,
    ) -> Result<(u32, PresentOutcome)> {
        let result = unsafe {
            self.ext.acquire_next_image(
                self.handle,
                timeout_ns,
                semaphore.map_or(vk::Semaphore::null(), |s| s.handle),
                fence.map_or(vk::Fence::null(), |f| f.handle),
            )
        };
        match result {
            Ok((index, suboptimal)) => {
                let outcome = if suboptimal { PresentOutcome::Stale } else { PresentOutcome::Ok };
                Ok((index, outcome))
            }
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok((0, PresentOutcome::Stale)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn present(
        &self,
        queue: vk::Queue,
        image_index: u32,
        wait_semaphores: &[vk::Semaphore],
    ) -> Result<PresentOutcome> {
        let swapchains = [self.handle];
        let indices = [image_index];
        let present_info = vk::PresentInfoKHR {
            s_type: vk::StructureType::PRESENT_INFO_KHR,
            p_next: ptr::null(),
            wait_semaphore_count: wait_semaphores.len() as u32,
            p_wait_semaphores: wait_semaphores.as_ptr(),
            swapchain_count: 1,
            p_swapchains: swapchains.as_ptr(),
            p_image_indices: indices.as_ptr(),
            p_results: ptr::null_mut(),
            _marker: Default::default(),
        };
        let result = unsafe { self.ext.queue_present(queue, &present_info) };
        match result {
            Ok(suboptimal) => Ok(if suboptimal { PresentOutcome::Stale } else { PresentOutcome::Ok }),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(PresentOutcome::Stale),
            Err(e) => Err(e.into()),
        }
    }

    fn destroy_views_and_swapchain(&mut self, device: &ash::Device) {
        for view in self.image_views.drain(..) {
            unsafe { device.destroy_image_view(view, None) };
        }
        unsafe { self.ext.destroy_swapchain(self.handle, None) };
    }

    pub fn destroy(&mut self, device: &ash::Device) {
        self.destroy_views_and_swapchain(device);
    }
}

fn resolve_extent(caps: &vk::SurfaceCapabilitiesKHR, want_width: u32, want_height: u32) -> vk::Extent2D {
    if caps.current_extent.width != u32::MAX {
        return caps.current_extent;
    }
    vk::Extent2D {
        width: want_width.clamp(caps.min_image_extent.width, caps.max_image_extent.width),
        height: want_height.clamp(caps.min_image_extent.height, caps.max_image_extent.height),
    }
}

fn create_image_views(device: &ash::Device, images: &[vk::Image], format: vk::Format) -> Result<Vec<vk::ImageView>> {
    images
        .iter()
        .map(|&image| {
            let create_info = vk::ImageViewCreateInfo {
                s_type: vk::StructureType::IMAGE_VIEW_CREATE_INFO,
                p_next: ptr::null(),
                flags: vk::ImageViewCreateFlags::empty(),
                image,
                view_type: vk::ImageViewType::TYPE_2D,
                format,
                components: vk::ComponentMapping::default(),
                subresource_range: vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                },
                _marker: Default::default(),
            };
            Ok(unsafe { device.create_image_view(&create_info, None)? })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(current_w: u32) -> vk::SurfaceCapabilitiesKHR {
        let mut c = vk::SurfaceCapabilitiesKHR::default();
        c.current_extent = vk::Extent2D { width: current_w, height: 600 };
        c.min_image_extent = vk::Extent2D { width: 1, height: 1 };
        c.max_image_extent = vk::Extent2D { width: 4096, height: 4096 };
        c
    }

    #[test]
    fn extent_prefers_current_extent_when_defined() {
        let c = caps(800);
        let extent = resolve_extent(&c, 1920, 1080);
        assert_eq!(extent, vk::Extent2D { width: 800, height: 600 });
    }

    #[test]
    fn extent_falls_back_to_requested_size_when_undefined() {
        let c = caps(u32::MAX);
        let extent = resolve_extent(&c, 1920, 1080);
        assert_eq!(extent.width, 1920);
    }

    #[test]
    fn extent_clamps_requested_size_to_surface_bounds() {
        let mut c = caps(u32::MAX);
        c.max_image_extent = vk::Extent2D { width: 1024, height: 1024 };
        let extent = resolve_extent(&c, 4096, 4096);
        assert_eq!(extent, vk::Extent2D { width: 1024, height: 1024 });
    }
}
