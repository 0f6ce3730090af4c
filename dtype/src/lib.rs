//! Element types of kernel operands.
//!
//! Kernels are specialized by the C type names of their operands (`"float"`,
//! `"unsigned char"`, ...). This crate maps those names onto [`ScalarDType`] so
//! that backends which execute kernels themselves know how to read and write
//! operand memory.

pub mod ext;


pub use ext::HasDType;

/// Scalar element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::VariantArray)]
pub enum ScalarDType {
    Bool,

    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,

    Float32,
    Float64,
}

impl ScalarDType {
    pub const fn bytes(&self) -> usize {
        match self {
            Self::Bool => 1,
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 => 4,
            Self::Int64 | Self::UInt64 => 8,
            Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    pub const fn is_int(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Canonical C spelling used in rendered kernel source.
    ///
    /// Fixed-width integer names rely on the typedef preamble emitted by the
    /// source builder.
    pub const fn c_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8_t",
            Self::UInt8 => "uint8_t",
            Self::Int16 => "int16_t",
            Self::UInt16 => "uint16_t",
            Self::Int32 => "int32_t",
            Self::UInt32 => "uint32_t",
            Self::Int64 => "int64_t",
            Self::UInt64 => "uint64_t",
            Self::Float32 => "float",
            Self::Float64 => "double",
        }
    }

    /// Builtin C type a fixed-width integer name is defined as.
    pub const fn c_builtin(&self) -> &'static str {
        match self {
            Self::Int8 => "signed char",
            Self::UInt8 => "unsigned char",
            Self::Int16 => "short",
            Self::UInt16 => "unsigned short",
            Self::Int32 => "int",
            Self::UInt32 => "unsigned int",
            Self::Int64 => "long long",
            Self::UInt64 => "unsigned long long",
            _ => self.c_name(),
        }
    }

    /// Parse a C type name.
    ///
    /// Whitespace runs are collapsed before matching, so `" unsigned  char "`
    /// parses like `"unsigned char"`. Common builtin spellings are accepted next to
    /// the fixed-width names; `long` is taken as 64-bit, matching the LP64 targets
    /// kernels are compiled for.
    pub fn from_c_name(name: &str) -> Option<Self> {
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        let dtype = match name.as_str() {
            "bool" => Self::Bool,
            "int8_t" | "char" | "signed char" => Self::Int8,
            "uint8_t" | "unsigned char" => Self::UInt8,
            "int16_t" | "short" | "signed short" => Self::Int16,
            "uint16_t" | "unsigned short" => Self::UInt16,
            "int32_t" | "int" | "signed int" => Self::Int32,
            "uint32_t" | "unsigned int" | "unsigned" => Self::UInt32,
            "int64_t" | "long" | "long long" | "signed long" | "signed long long" => Self::Int64,
            "uint64_t" | "unsigned long" | "unsigned long long" | "size_t" => Self::UInt64,
            "float" => Self::Float32,
            "double" => Self::Float64,
            _ => return None,
        };
        Some(dtype)
    }
}

impl std::fmt::Display for ScalarDType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.c_name())
    }
}
