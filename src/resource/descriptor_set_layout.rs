use ash::vk;

#[derive(Debug, Clone)]
pub struct DescriptorSetLayoutBinding {
    pub binding: u32,
    pub descriptor_type: vk::DescriptorType,
    pub descriptor_count: u32,
    pub stage_flags: vk::ShaderStageFlags,
}

/// DescriptorSetLayout record: native handle + set index + binding
/// metadata.
#[derive(Debug, Clone)]
pub struct DescriptorSetLayout {
    pub handle: vk::DescriptorSetLayout,
    pub set_index: u32,
    pub bindings: Vec<DescriptorSetLayoutBinding>,
}
