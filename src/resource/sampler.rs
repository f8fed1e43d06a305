use ash::vk;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SamplerFilterMode {
    pub min_filter: vk::Filter,
    pub mag_filter: vk::Filter,
    pub address_mode: vk::SamplerAddressMode,
}

/// Sampler record: native sampler + filter/address-mode tuple + bindless
/// slot.
#[derive(Debug, Clone)]
pub struct Sampler {
    pub handle: vk::Sampler,
    pub filter_mode: SamplerFilterMode,
    pub bindless_slot: Option<u32>,
}
