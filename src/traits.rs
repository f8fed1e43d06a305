/// Resources that wrap a native GPU object implement this to release it.
///
/// A single `destroy` entry point that every destroy-queue entry and every
/// RAII `Drop` impl funnels through, so there is exactly one place that
/// issues the backend destroy call.
pub trait Destructible {
    fn destroy(&mut self);
}

/// Gives access to the raw native handle backing a wrapper type, for the
/// rare call sites (descriptor writes, barriers) that must reach past the
/// wrapper into `ash` directly.
pub trait AsRaw {
    type Raw;
    fn as_raw(&self) -> Self::Raw;
}

/// Resources that can carry a `VK_EXT_debug_utils` object name.
pub trait Nameable {
    const OBJECT_TYPE: ash::vk::ObjectType;
    fn set_name(&mut self, debug_utils: &ash::ext::debug_utils::Device, name: &str) -> anyhow::Result<()>;
}
