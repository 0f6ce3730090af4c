//! Cache keys.

use spindle_codegen::TypeSignature;

/// Identity of a specialized kernel: operation name plus type signature suffix.
///
/// Built from a canonical [`TypeSignature`], so names that differ only in
/// whitespace (`"float "` vs `"float"`) map to the same key, and spaces inside a
/// type name become underscores (`add_unsigned_char_float`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationKey(String);

impl OperationKey {
    pub fn new(name: &str, signature: &TypeSignature) -> Self {
        Self(format!("{name}{}", signature.suffix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
