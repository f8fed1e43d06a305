pub mod surface;
pub mod swapchain;

pub use surface::Surface;
pub use swapchain::{PresentOutcome, Swapchain, SwapchainConfig};
