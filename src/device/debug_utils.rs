use std::ffi::CString;

use anyhow::Result;
use ash::vk;

/// Names native handles through `VK_EXT_debug_utils` when the extension
/// was enabled.
#[derive(Clone)]
pub struct DebugUtils {
    ext: ash::ext::debug_utils::Device,
}

impl std::fmt::Debug for DebugUtils {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugUtils").finish_non_exhaustive()
    }
}

impl DebugUtils {
    pub fn new(instance: &ash::Instance, device: &ash::Device) -> Self {
        Self {
            ext: ash::ext::debug_utils::Device::new(instance, device),
        }
    }

    pub fn set_object_name(
        &self,
        object_type: vk::ObjectType,
        object_handle: u64,
        name: &str,
    ) -> Result<()> {
        let c_name = CString::new(name)?;
        let name_info = vk::DebugUtilsObjectNameInfoEXT {
            s_type: vk::StructureType::DEBUG_UTILS_OBJECT_NAME_INFO_EXT,
            p_next: std::ptr::null(),
            object_type,
            object_handle,
            p_object_name: c_name.as_ptr(),
            _marker: Default::default(),
        };
        unsafe { self.ext.set_debug_utils_object_name(&name_info)? };
        Ok(())
    }
}
