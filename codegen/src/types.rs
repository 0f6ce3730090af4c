//! Types for code generation.

use crate::{KernelTemplate, TypeSignature};

/// A rendered kernel ready for compilation.
#[derive(Debug, Clone)]
pub struct RenderedKernel {
    /// Kernel name (for debugging/caching).
    pub name: String,

    /// Entry point function name.
    pub entry_point: String,

    /// The generated source.
    pub code: String,

    /// What the kernel computes.
    ///
    /// Backends that execute kernels without a device compiler dispatch on this
    /// instead of parsing `code`.
    pub template: KernelTemplate,

    /// Element types the kernel is specialized for.
    pub signature: TypeSignature,
}
