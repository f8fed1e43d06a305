use thiserror::Error;

/// Errors surfaced by fallible, non-fatal operations.
///
/// Creation failures, pool exhaustion and other
/// backend failures are *not* represented here because they are contract
/// fatal — see [`fatal`] instead. This enum only covers conditions a caller
/// is expected to branch on (e.g. a stale handle lookup).
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RhiError {
    #[error("handle generation mismatch, resource no longer live")]
    HandleStale,

    #[error("frame graph references an unknown resource handle")]
    UnknownGraphHandle,

    #[error("frame graph pass has no execute callback")]
    MissingExecuteCallback,

    #[error("bindless slot table exhausted for this binding")]
    BindlessTableFull,

    #[error("no suitable physical device found")]
    NoPhysicalDevice,

    #[error("requested queue family combination is impossible")]
    ImpossibleQueue,

    #[error("buffer lacks SHADER_DEVICE_ADDRESS usage")]
    NoShaderDeviceAddress,

    #[error("resource has no host-visible mapped pointer")]
    NoMappedPointer,

    #[error("write would exceed buffer bounds")]
    InsufficientSpace,
}

/// The exit codes the outer engine exposes to its caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    WindowCreationError = 1,
    RhiCriticalError = 2,
    DeviceNotSupported = 3,
}

/// Process-fatal error classes. These never unwind past the call
/// site that detects them: the contract treats them as unrecoverable.
#[derive(Debug, Copy, Clone)]
pub enum FatalError<'a> {
    /// Missing required device feature, failed instance/device/swapchain
    /// create, shader compile failure, pipeline link failure.
    Init(&'a str),
    /// The 12-bit generation counter wrapped on a pool slot.
    PoolExhausted,
    /// Any other backend error with no defined recovery path.
    Backend(&'a str),
}

impl<'a> FatalError<'a> {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            FatalError::Init(_) => ExitCode::RhiCriticalError,
            FatalError::PoolExhausted => ExitCode::RhiCriticalError,
            FatalError::Backend(_) => ExitCode::RhiCriticalError,
        }
    }

    /// Logs the failure and terminates the process with the documented
    /// exit code. Never returns.
    pub fn terminate(self) -> ! {
        match &self {
            FatalError::Init(msg) => tracing::error!("fatal init error: {msg}"),
            FatalError::PoolExhausted => {
                tracing::error!("pool generation counter exhausted (4096 reuses)")
            }
            FatalError::Backend(msg) => tracing::error!("fatal backend error: {msg}"),
        }
        std::process::exit(self.exit_code() as i32)
    }
}
