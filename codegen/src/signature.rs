//! Canonical element-type signatures.

use itertools::Itertools;

/// Operand and result element types a kernel is specialized for.
///
/// Type names are canonicalized on construction: leading and trailing whitespace
/// is dropped and inner whitespace runs collapse to a single space, so
/// `" unsigned  char"` and `"unsigned char"` produce the same signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSignature {
    types: [String; 2],
}

impl TypeSignature {
    /// Build a signature from `[operand, result]` type names.
    pub fn new<S: AsRef<str>>(types: [S; 2]) -> Self {
        Self { types: types.map(|name| canonical_type_name(name.as_ref())) }
    }

    /// Element type of the kernel's inputs.
    pub fn operand(&self) -> &str {
        &self.types[0]
    }

    /// Element type of the kernel's output.
    pub fn result(&self) -> &str {
        &self.types[1]
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Identifier-safe suffix, e.g. `_unsigned_char_float`.
    ///
    /// Appended to operation names to form cache keys and helper function names.
    pub fn suffix(&self) -> String {
        self.types.iter().map(|name| format!("_{}", name.replace(' ', "_"))).collect()
    }
}

fn canonical_type_name(name: &str) -> String {
    name.split_whitespace().join(" ")
}
