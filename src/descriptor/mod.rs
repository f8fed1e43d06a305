pub mod bindless;
pub mod descriptor_pool;
pub mod layout_builder;
pub mod slot_allocator;

pub use bindless::BindlessTable;
pub use descriptor_pool::{DescriptorPool, PoolSize};
pub use layout_builder::DescriptorSetLayoutBuilder;
