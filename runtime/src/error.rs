//! Error types for kernel specialization and launch.

use snafu::Snafu;
use spindle_codegen::KernelTemplate;
use spindle_device::DeviceStatus;

use crate::OperationKey;

/// Result type for runtime operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Where a launch failure was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Launch,
    Synchronize,
}

impl std::fmt::Display for LaunchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Launch => f.write_str("launch"),
            Self::Synchronize => f.write_str("synchronize"),
        }
    }
}

/// Errors that can occur while specializing or launching a kernel.
///
/// Compile and launch failures are fatal for the call that hit them; nothing is
/// retried and no fallback kernel exists.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Device-side compilation of the rendered source failed.
    #[snafu(display("failed to compile kernel '{key}': {source}"))]
    Compile { key: OperationKey, source: spindle_device::Error },

    /// The device reported a non-success status.
    #[snafu(display("kernel '{kernel}' failed at {stage}: {status}"))]
    Launch { kernel: String, stage: LaunchStage, status: DeviceStatus },

    /// Argument count does not match the kernel's parameter list.
    #[snafu(display("kernel '{kernel}' expects {expected} arguments, got {actual}"))]
    ArityMismatch { kernel: String, expected: usize, actual: usize },

    /// An argument slot holds the wrong kind of value.
    #[snafu(display("kernel '{kernel}' argument {index} ('{param}') expects a {expected}, got a {actual}"))]
    ArgumentKind { kernel: String, index: usize, param: String, expected: &'static str, actual: &'static str },

    /// Element count does not fit in a launch grid.
    #[snafu(display("launch of {count} elements exceeds the maximum grid size of {max} blocks"))]
    GridOverflow { count: usize, max: u64 },

    /// The key is already bound to a kernel computing something else.
    #[snafu(display("kernel '{key}' is cached as {cached}, cannot reuse it for {requested}"))]
    KernelConflict { key: OperationKey, cached: KernelTemplate, requested: KernelTemplate },

    /// Device could not be opened.
    #[snafu(display("Device error: {source}"))]
    Device { source: spindle_device::Error },
}
