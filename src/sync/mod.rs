pub mod binary_semaphore;
pub mod fence;
pub mod timeline_semaphore;

pub use binary_semaphore::BinarySemaphore;
pub use fence::Fence;
pub use timeline_semaphore::TimelineSemaphore;
