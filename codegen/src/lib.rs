//! Kernel source rendering for spindle.
//!
//! Every kernel spindle launches is described by a [`KernelTemplate`] (what the
//! kernel computes) and a [`TypeSignature`] (which element types it is
//! specialized for). A [`SourceBuilder`] turns that pair into device source.
//!
//! # Parameter order
//!
//! [`KernelTemplate::params`] is the single source of truth for a kernel's
//! parameter list. Renderers emit the parameter list from it and the runtime's
//! argument marshaler validates launch arguments against it, so the two sides
//! cannot disagree about argument order.
//!
//! # Usage
//!
//! ```ignore
//! use spindle_codegen::{CudaSourceBuilder, ElementwiseOp, KernelTemplate, SourceBuilder, TypeSignature};
//!
//! let signature = TypeSignature::new(["float", "float"]);
//! let kernel = CudaSourceBuilder::new().render("add_float_float", KernelTemplate::Elementwise(ElementwiseOp::Add), &signature);
//! ```

pub mod cuda;
pub mod ops;
pub mod signature;
pub mod template;
pub mod traits;
pub mod types;


pub use cuda::CudaSourceBuilder;
pub use ops::{ElementwiseOp, OpDescriptor};
pub use signature::TypeSignature;
pub use template::{KernelParam, KernelTemplate, ParamKind};
pub use traits::*;
pub use types::*;
