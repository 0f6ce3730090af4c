//! Kernel templates and their parameter lists.

use crate::ElementwiseOp;

/// Role of a kernel parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Device pointer to operand elements.
    Input,
    /// Device pointer to result elements.
    Output,
    /// Device pointer to a `size_t` array (strides).
    Indices,
    /// `size_t` scalar.
    Size,
}

impl ParamKind {
    /// Whether the parameter is passed as a device address.
    pub const fn is_pointer(self) -> bool {
        !matches!(self, Self::Size)
    }
}

/// A named kernel parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelParam {
    pub name: String,
    pub kind: ParamKind,
}

impl KernelParam {
    fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self { name: name.into(), kind }
    }
}

/// Name of the trailing element-count parameter every kernel takes.
pub const COUNT_PARAM: &str = "n";

/// Names of the scalar pooling parameters, in kernel order.
pub const MAX_POOL_1D_SCALARS: [&str; 5] = ["input_width", "output_width", "window", "stride", "padding"];

/// What a kernel computes.
///
/// Templates are specialized only by element types. Shapes, strides and pooling
/// windows are launch arguments, so one compiled kernel serves every
/// configuration of its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelTemplate {
    /// Repeat contiguous runs of `repeat_size` input elements `repeat_times` times.
    Broadcast,
    /// Expand integer indices into one-hot vectors of width `repeat_size`.
    OneHot,
    /// Apply an elementwise operation to `op.arity()` inputs.
    Elementwise(ElementwiseOp),
    /// Scatter elements through runtime stride tables (reshape/transpose).
    Reshape,
    /// Sliding-window maximum along the innermost axis.
    MaxPool1d,
}

impl KernelTemplate {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::OneHot => "onehot",
            Self::Elementwise(_) => "elementwise",
            Self::Reshape => "reshape",
            Self::MaxPool1d => "max_pool_1d",
        }
    }

    /// Parameter list in the order the kernel declares it.
    ///
    /// The element count is always last.
    pub fn params(&self) -> Vec<KernelParam> {
        use ParamKind::*;

        let mut params = match self {
            Self::Broadcast | Self::OneHot => vec![
                KernelParam::new("in", Input),
                KernelParam::new("out", Output),
                KernelParam::new("repeat_size", Size),
                KernelParam::new("repeat_times", Size),
            ],
            Self::Elementwise(op) => {
                let mut params: Vec<_> = (0..op.arity()).map(|i| KernelParam::new(format!("in{i}"), Input)).collect();
                params.push(KernelParam::new("out", Output));
                params
            }
            Self::Reshape => vec![
                KernelParam::new("in", Input),
                KernelParam::new("out", Output),
                KernelParam::new("input_strides", Indices),
                KernelParam::new("trans_strides", Indices),
                KernelParam::new("rank", Size),
            ],
            Self::MaxPool1d => {
                let mut params = vec![KernelParam::new("in", Input), KernelParam::new("out", Output)];
                params.extend(MAX_POOL_1D_SCALARS.iter().map(|name| KernelParam::new(*name, Size)));
                params
            }
        };
        params.push(KernelParam::new(COUNT_PARAM, Size));
        params
    }
}

impl std::fmt::Display for KernelTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Elementwise(op) => write!(f, "elementwise({op})"),
            other => f.write_str(other.name()),
        }
    }
}
