pub mod compute;
pub mod graphics;
pub mod layout;

pub use compute::build_compute_pipeline;
pub use graphics::{ColorAttachmentSpec, GraphicsPipelineBuilder, MAX_COLOR_ATTACHMENTS};
pub use layout::PipelineLayoutBuilder;
