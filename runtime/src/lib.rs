//! Kernel specialization runtime for spindle.
//!
//! Emitters such as [`emit_broadcast`] and [`emit_elementwise_op`] turn a tensor
//! operation into a device kernel specialized for its element types, compile it
//! once per session, launch it and wait for the device.
//!
//! # Sessions
//!
//! A [`RuntimeContext`] binds one [`DeviceRuntime`](spindle_device::DeviceRuntime)
//! to one [`KernelCache`]. There is no global state: every emitter takes the
//! session by reference, and compiled kernels live exactly as long as it does.
//!
//! ```ignore
//! use std::sync::Arc;
//! use spindle_device::HostRuntime;
//! use spindle_runtime::{RuntimeContext, emit_broadcast};
//!
//! let ctx = RuntimeContext::builder().device(Arc::new(HostRuntime::new())).build();
//! unsafe { emit_broadcast(&ctx, "broadcast", ["float", "float"], input, output, 4, 3, 12)? };
//! ```
//!
//! # Configuration
//!
//! [`RuntimeContext::from_env`] reads `SPINDLE_DEVICE`, `SPINDLE_BLOCK_SIZE` and
//! `SPINDLE_DUMP_SOURCE`; see [`RuntimeConfig::from_env`].

pub mod config;
pub mod context;
pub mod emitters;
pub mod error;
pub mod kernel_cache;
pub mod launch_planner;
pub mod marshal;
pub mod signature;

#[cfg(test)]
pub mod test;

pub use config::{LaunchPolicy, RuntimeConfig};
pub use context::RuntimeContext;
pub use emitters::{
    MaxPool1dParams, emit_1d_max_pool, emit_broadcast, emit_elementwise_op, emit_onehot, emit_reshape,
};
pub use error::*;
pub use kernel_cache::*;
pub use launch_planner::{LaunchPlanner, MAX_GRID_X};
pub use marshal::{ArgumentList, ArgumentMarshaler};
pub use signature::OperationKey;
