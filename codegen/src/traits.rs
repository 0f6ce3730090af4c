//! Core traits for code generation.

use crate::{KernelTemplate, RenderedKernel, TypeSignature};

/// Renders device source for a kernel template specialized to a type signature.
///
/// Implementations must be pure: the same `(name, template, signature)` always
/// renders the same source. The runtime relies on this to compile each cache key
/// exactly once.
pub trait SourceBuilder: Send + Sync {
    /// Render a kernel.
    ///
    /// # Arguments
    ///
    /// * `name` - Kernel name, unique per `(operation, signature)` pair; the entry
    ///   point is derived from it
    /// * `template` - What the kernel computes
    /// * `signature` - Operand and result element types
    fn render(&self, name: &str, template: KernelTemplate, signature: &TypeSignature) -> RenderedKernel;

    /// Get the backend name (e.g., "cuda").
    fn backend_name(&self) -> &str;
}
