//! Elementwise operation descriptor table.
//!
//! Each [`ElementwiseOp`] maps to an [`OpDescriptor`]: the name the kernel body
//! calls, an optional device helper expression, and the number of inputs the
//! operation takes. Helper expressions name their inputs `x0`, `x1`, ...

/// Static description of an elementwise operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDescriptor {
    /// Function the kernel body calls.
    ///
    /// For operations with a helper this is the helper's base name; the rendered
    /// helper appends the type signature so that different element types do not
    /// collide. Otherwise it names a device math library function.
    pub name: &'static str,
    /// Body of the device helper, if the operation needs one.
    pub helper: Option<&'static str>,
    /// Number of inputs.
    pub arity: usize,
}

impl OpDescriptor {
    const fn library(name: &'static str, arity: usize) -> Self {
        Self { name, helper: None, arity }
    }

    const fn helper(name: &'static str, helper: &'static str, arity: usize) -> Self {
        Self { name, helper: Some(helper), arity }
    }
}

/// Elementwise operations the runtime can specialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::VariantArray)]
pub enum ElementwiseOp {
    // Unary, device math library
    Abs,
    Sqrt,
    Exp,
    Log,
    Sin,
    Cos,
    Tan,
    Tanh,
    Ceil,
    Floor,

    // Unary, helper
    Negative,
    Sign,
    Relu,
    Sigmoid,
    Convert,

    // Binary
    Add,
    Subtract,
    Multiply,
    Divide,
    Maximum,
    Minimum,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    // Ternary
    Select,
}

impl ElementwiseOp {
    pub const fn descriptor(self) -> OpDescriptor {
        match self {
            Self::Abs => OpDescriptor::library("fabs", 1),
            Self::Sqrt => OpDescriptor::library("sqrt", 1),
            Self::Exp => OpDescriptor::library("exp", 1),
            Self::Log => OpDescriptor::library("log", 1),
            Self::Sin => OpDescriptor::library("sin", 1),
            Self::Cos => OpDescriptor::library("cos", 1),
            Self::Tan => OpDescriptor::library("tan", 1),
            Self::Tanh => OpDescriptor::library("tanh", 1),
            Self::Ceil => OpDescriptor::library("ceil", 1),
            Self::Floor => OpDescriptor::library("floor", 1),

            Self::Negative => OpDescriptor::helper("negative", "-x0", 1),
            Self::Sign => OpDescriptor::helper("sign", "(x0 > 0) - (x0 < 0)", 1),
            Self::Relu => OpDescriptor::helper("relu", "x0 > 0 ? x0 : 0", 1),
            Self::Sigmoid => OpDescriptor::helper("sigmoid", "1 / (1 + exp(-x0))", 1),
            Self::Convert => OpDescriptor::helper("convert", "x0", 1),

            Self::Add => OpDescriptor::helper("add", "x0 + x1", 2),
            Self::Subtract => OpDescriptor::helper("subtract", "x0 - x1", 2),
            Self::Multiply => OpDescriptor::helper("multiply", "x0 * x1", 2),
            Self::Divide => OpDescriptor::helper("divide", "x0 / x1", 2),
            Self::Maximum => OpDescriptor::helper("maximum", "x0 > x1 ? x0 : x1", 2),
            Self::Minimum => OpDescriptor::helper("minimum", "x0 < x1 ? x0 : x1", 2),
            Self::Power => OpDescriptor::library("pow", 2),
            Self::Equal => OpDescriptor::helper("equal", "x0 == x1", 2),
            Self::NotEqual => OpDescriptor::helper("not_equal", "x0 != x1", 2),
            Self::Less => OpDescriptor::helper("less", "x0 < x1", 2),
            Self::LessEq => OpDescriptor::helper("less_eq", "x0 <= x1", 2),
            Self::Greater => OpDescriptor::helper("greater", "x0 > x1", 2),
            Self::GreaterEq => OpDescriptor::helper("greater_eq", "x0 >= x1", 2),

            Self::Select => OpDescriptor::helper("select", "x0 ? x1 : x2", 3),
        }
    }

    pub const fn arity(self) -> usize {
        self.descriptor().arity
    }
}

impl std::fmt::Display for ElementwiseOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.descriptor().name)
    }
}
