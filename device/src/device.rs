//! Device abstraction.
//!
//! A device owns the compiler that turns rendered source into a [`Program`] and
//! the execution queue programs are launched on:
//! - **compile**: source text → executable program (NVRTC + module load for CUDA)
//! - **launch**: program + geometry + ordered arguments → status
//! - **synchronize**: block until all launched work finished → status

use spindle_codegen::RenderedKernel;

use crate::error::Result;
use crate::{DeviceStatus, KernelArg, LaunchDescriptor};

/// A compiled, launchable kernel.
///
/// Programs are cached and shared across threads for the lifetime of a runtime
/// session, hence `Send + Sync`.
pub trait Program: Send + Sync {
    /// Launch the kernel.
    ///
    /// Returns the status of the launch itself. Execution errors may only be
    /// observable at the next synchronization.
    ///
    /// # Safety
    ///
    /// - Pointer arguments must be valid device addresses for every access the
    ///   kernel performs with the given scalars
    /// - `args` must match the kernel's parameter list in count and order
    unsafe fn launch(&self, launch: &LaunchDescriptor, args: &[KernelArg]) -> DeviceStatus;

    /// Get the kernel name (for debugging/profiling).
    fn name(&self) -> &str;
}

/// A device that compiles, launches and synchronizes kernels.
pub trait DeviceRuntime: Send + Sync {
    /// Compile a rendered kernel into a launchable program.
    fn compile(&self, kernel: &RenderedKernel) -> Result<Box<dyn Program>>;

    /// Launch `program` on this device.
    ///
    /// # Safety
    ///
    /// Same contract as [`Program::launch`]; `program` must have been compiled by
    /// this device.
    unsafe fn launch(&self, program: &dyn Program, launch: &LaunchDescriptor, args: &[KernelArg]) -> DeviceStatus {
        unsafe { program.launch(launch, args) }
    }

    /// Block until all previously launched work has completed.
    fn synchronize(&self) -> DeviceStatus;

    /// Device name (e.g., "HOST", "CUDA:0").
    fn name(&self) -> &str;
}
