//! Device runtimes for spindle kernels.
//!
//! A [`DeviceRuntime`] turns rendered kernel source into an executable
//! [`Program`], launches programs with a [`LaunchDescriptor`] and an ordered
//! argument list, and synchronizes the device. Launch and synchronization report
//! a native [`DeviceStatus`] rather than an error; deciding what a non-success
//! status means is left to the caller.
//!
//! Backends:
//! - [`HostRuntime`]: reference executor over host memory
//! - `CudaRuntime` (feature `cuda`): NVRTC + CUDA driver via `cudarc`

pub mod args;
pub mod device;
pub mod devices;
pub mod error;
pub mod launch;
pub mod registry;
pub mod status;


pub use args::{DevicePtr, KernelArg};
pub use device::{DeviceRuntime, Program};
#[cfg(feature = "cuda")]
pub use devices::cuda::CudaRuntime;
pub use devices::host::HostRuntime;
pub use error::*;
pub use launch::{Dim3, LaunchDescriptor, Stream};
pub use registry::{DeviceSpec, create_device};
pub use status::DeviceStatus;
