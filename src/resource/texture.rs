use ash::vk;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        const RENDER_TARGET = 1 << 0;
        const DEPTH_STENCIL = 1 << 1;
        const STORAGE_IMAGE = 1 << 2;
        const SAMPLED = 1 << 3;
        const TRANSFER_SRC = 1 << 4;
        const TRANSFER_DST = 1 << 5;
    }
}

impl TextureUsage {
    pub fn to_vk(self) -> vk::ImageUsageFlags {
        let mut flags = vk::ImageUsageFlags::empty();
        if self.contains(TextureUsage::RENDER_TARGET) {
            flags |= vk::ImageUsageFlags::COLOR_ATTACHMENT;
        }
        if self.contains(TextureUsage::DEPTH_STENCIL) {
            flags |= vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT;
        }
        if self.contains(TextureUsage::STORAGE_IMAGE) {
            flags |= vk::ImageUsageFlags::STORAGE;
        }
        if self.contains(TextureUsage::SAMPLED) {
            flags |= vk::ImageUsageFlags::SAMPLED;
        }
        if self.contains(TextureUsage::TRANSFER_SRC) {
            flags |= vk::ImageUsageFlags::TRANSFER_SRC;
        }
        if self.contains(TextureUsage::TRANSFER_DST) {
            flags |= vk::ImageUsageFlags::TRANSFER_DST;
        }
        flags
    }

    pub fn aspect(self) -> vk::ImageAspectFlags {
        if self.contains(TextureUsage::DEPTH_STENCIL) {
            vk::ImageAspectFlags::DEPTH
        } else {
            vk::ImageAspectFlags::COLOR
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureType {
    D1,
    D2,
    D3,
}

impl TextureType {
    pub fn to_vk(self) -> vk::ImageType {
        match self {
            TextureType::D1 => vk::ImageType::TYPE_1D,
            TextureType::D2 => vk::ImageType::TYPE_2D,
            TextureType::D3 => vk::ImageType::TYPE_3D,
        }
    }
}

/// The hot half of the texture record: everything the recorder touches
/// every frame (current layout, in particular, mutates on every barrier).
#[derive(Debug, Clone)]
pub struct TextureHot {
    pub image: vk::Image,
    pub view: vk::ImageView,
    pub current_layout: vk::ImageLayout,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_count: u32,
    pub sampled_slot: Option<u32>,
    pub storage_slot: Option<u32>,
}

/// The cold half: metadata read at creation/destruction time, not touched
/// during recording.
#[derive(Debug, Clone)]
pub struct TextureCold {
    pub format: vk::Format,
    pub texture_type: TextureType,
    pub usage: TextureUsage,
    pub aspect: vk::ImageAspectFlags,
    pub name: Option<String>,
    /// Swapchain-owned textures are non-destroyable by user code.
    pub is_swapchain_image: bool,
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub hot: TextureHot,
    pub cold: TextureCold,
}

impl Texture {
    pub fn is_depth(&self) -> bool {
        self.cold.aspect.contains(vk::ImageAspectFlags::DEPTH)
    }
}
