use std::sync::Arc;

/// An `Arc`-wrapped `ash::Device` so every subsystem (bindless table, frame
/// ring, command pools) can hold a cheap clone without lifetime gymnastics.
/// The core is single-threaded so no `RwLock`/`Mutex` wrapping is needed
/// around the handle itself.
#[derive(Clone)]
pub struct LogicalDevice {
    inner: Arc<ash::Device>,
}

impl std::fmt::Debug for LogicalDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicalDevice").finish_non_exhaustive()
    }
}

impl LogicalDevice {
    pub fn new(device: ash::Device) -> Self {
        Self {
            inner: Arc::new(device),
        }
    }

    pub fn handle(&self) -> &ash::Device {
        &self.inner
    }

    pub fn arc(&self) -> Arc<ash::Device> {
        self.inner.clone()
    }

    pub fn wait_idle(&self) -> anyhow::Result<()> {
        unsafe { self.inner.device_wait_idle()? };
        Ok(())
    }

    pub fn destroy(&self) {
        #[cfg(feature = "log-lifetimes")]
        tracing::trace!("destroying VkDevice");
        unsafe { self.inner.destroy_device(None) };
    }
}
