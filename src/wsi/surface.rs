use anyhow::Result;
use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

/// Window and event-loop ownership stay outside this crate; this type only
/// wraps the `VkSurfaceKHR` built from a raw-window-handle pair handed in by
/// the external window owner, plus the capability queries swapchain
/// creation needs.
pub struct Surface {
    handle: vk::SurfaceKHR,
    ext: ash::khr::surface::Instance,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("handle", &self.handle).finish()
    }
}

impl Surface {
    /// # Safety
    /// `display_handle`/`window_handle` must be valid for the lifetime of
    /// the returned surface.
    pub unsafe fn new(
        entry: &ash::Entry,
        instance: &ash::Instance,
        display_handle: RawDisplayHandle,
        window_handle: RawWindowHandle,
    ) -> Result<Self> {
        let ext = ash::khr::surface::Instance::new(entry, instance);
        let handle =
            ash_window::create_surface(entry, instance, display_handle, window_handle, None)?;
        Ok(Self { handle, ext })
    }

    pub fn handle(&self) -> vk::SurfaceKHR {
        self.handle
    }

    pub fn capabilities(&self, physical_device: vk::PhysicalDevice) -> Result<vk::SurfaceCapabilitiesKHR> {
        Ok(unsafe {
            self.ext
                .get_physical_device_surface_capabilities(physical_device, self.handle)?
        })
    }

    pub fn formats(&self, physical_device: vk::PhysicalDevice) -> Result<Vec<vk::SurfaceFormatKHR>> {
        Ok(unsafe {
            self.ext
                .get_physical_device_surface_formats(physical_device, self.handle)?
        })
    }

    pub fn present_modes(&self, physical_device: vk::PhysicalDevice) -> Result<Vec<vk::PresentModeKHR>> {
        Ok(unsafe {
            self.ext
                .get_physical_device_surface_present_modes(physical_device, self.handle)?
        })
    }

    pub fn supports_present(&self, physical_device: vk::PhysicalDevice, queue_family: u32) -> Result<bool> {
        Ok(unsafe {
            self.ext
                .get_physical_device_surface_support(physical_device, queue_family, self.handle)?
        })
    }

    pub fn destroy(&self) {
        unsafe { self.ext.destroy_surface(self.handle, None) };
    }
}

/// Format preference: 8-bit sRGB BGRA, falling back to the first
/// format the surface reports.
pub fn pick_surface_format(formats: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    formats
        .iter()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .copied()
        .unwrap_or_else(|| formats[0])
}

/// Present-mode preference: `immediate` when v-sync is disabled, else
/// `mailbox`, else `fifo` (`fifo` is always supported per the Vulkan spec,
/// so it is the guaranteed fallback).
pub fn pick_present_mode(available: &[vk::PresentModeKHR], vsync: bool) -> vk::PresentModeKHR {
    if !vsync && available.contains(&vk::PresentModeKHR::IMMEDIATE) {
        return vk::PresentModeKHR::IMMEDIATE;
    }
    if available.contains(&vk::PresentModeKHR::MAILBOX) {
        return vk::PresentModeKHR::MAILBOX;
    }
    vk::PresentModeKHR::FIFO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_prefers_srgb_bgra() {
        let formats = [
            vk::SurfaceFormatKHR {
                format: vk::Format::R8G8B8A8_UNORM,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            },
            vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_SRGB,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            },
        ];
        let picked = pick_surface_format(&formats);
        assert_eq!(picked.format, vk::Format::B8G8R8A8_SRGB);
    }

    #[test]
    fn format_falls_back_to_first() {
        let formats = [vk::SurfaceFormatKHR {
            format: vk::Format::R8G8B8A8_UNORM,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        }];
        assert_eq!(pick_surface_format(&formats).format, vk::Format::R8G8B8A8_UNORM);
    }

    #[test]
    fn present_mode_vsync_off_prefers_immediate() {
        let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::IMMEDIATE, vk::PresentModeKHR::MAILBOX];
        assert_eq!(pick_present_mode(&modes, false), vk::PresentModeKHR::IMMEDIATE);
    }

    #[test]
    fn present_mode_vsync_on_prefers_mailbox_then_fifo() {
        let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
        assert_eq!(pick_present_mode(&modes, true), vk::PresentModeKHR::MAILBOX);
        let modes = [vk::PresentModeKHR::FIFO];
        assert_eq!(pick_present_mode(&modes, true), vk::PresentModeKHR::FIFO);
    }
}
