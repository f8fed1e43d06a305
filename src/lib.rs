//! A thin, explicit GPU abstraction layer over Vulkan 1.3: generational
//! resource handles, a bindless descriptor table, a deferred multi-frame
//! destroy queue, a declarative frame graph, and a two-deep frame ring
//! driving acquire/record/submit/present.
//!
//! Nothing here owns a window or an event loop — [`device::GpuDevice`] is
//! handed raw display/window handles at `init` and otherwise only talks to
//! the driver.

pub mod allocators;
pub mod command;
pub mod descriptor;
pub mod destroy_queue;
pub mod device;
pub mod error;
pub mod frame_graph;
pub mod handle;
pub mod pipeline_builder;
pub mod pool;
pub mod resource;
pub mod shader;
pub mod sync;
pub mod traits;
pub mod wsi;

pub mod prelude;

pub use device::{GpuDevice, GpuDeviceConfig};
pub use error::{ExitCode, FatalError, RhiError};
pub use handle::Handle;
pub use pool::Pool;
