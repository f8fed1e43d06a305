use anyhow::Result;
use ash::vk;

/// A thin owning wrapper so the entry point and instance handle travel
/// together and the instance is destroyed exactly once.
#[derive(Clone)]
pub struct Instance {
    entry: ash::Entry,
    handle: ash::Instance,
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance").finish_non_exhaustive()
    }
}

impl Instance {
    /// # Safety
    /// `entry` must outlive every object created from the resulting
    /// instance.
    pub unsafe fn new(entry: ash::Entry, create_info: &vk::InstanceCreateInfo) -> Result<Self> {
        let handle = entry.create_instance(create_info, None)?;
        #[cfg(feature = "log-lifetimes")]
        tracing::trace!("created VkInstance {:?}", handle.handle());
        Ok(Self { entry, handle })
    }

    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    pub fn handle(&self) -> &ash::Instance {
        &self.handle
    }

    pub fn destroy(&self) {
        #[cfg(feature = "log-lifetimes")]
        tracing::trace!("destroying VkInstance {:?}", self.handle.handle());
        unsafe { self.handle.destroy_instance(None) };
    }
}
