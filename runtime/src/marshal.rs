//! Kernel argument marshaling.
//!
//! Arguments are collected in call order and checked slot by slot against the
//! template's parameter list, which is the same list the source builder renders
//! the kernel signature from.

use smallvec::SmallVec;
use snafu::ensure;
use spindle_codegen::{KernelParam, KernelTemplate};
use spindle_device::{DevicePtr, KernelArg};

use crate::error::*;

type Args = SmallVec<[KernelArg; 8]>;

/// Validated, ordered kernel arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentList {
    args: Args,
}

impl ArgumentList {
    pub fn as_slice(&self) -> &[KernelArg] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Builds an [`ArgumentList`] for one kernel.
#[derive(Debug, Clone)]
pub struct ArgumentMarshaler {
    kernel: String,
    params: Vec<KernelParam>,
    args: Args,
}

impl ArgumentMarshaler {
    pub fn new(kernel: impl Into<String>, template: KernelTemplate) -> Self {
        let params = template.params();
        Self { kernel: kernel.into(), args: Args::with_capacity(params.len()), params }
    }

    pub fn input(self, ptr: DevicePtr) -> Self {
        self.arg(KernelArg::Ptr(ptr))
    }

    pub fn inputs(mut self, ptrs: &[DevicePtr]) -> Self {
        self.args.extend(ptrs.iter().copied().map(KernelArg::Ptr));
        self
    }

    pub fn output(self, ptr: DevicePtr) -> Self {
        self.arg(KernelArg::Ptr(ptr))
    }

    /// Device address of a `size_t` table.
    pub fn indices(self, ptr: DevicePtr) -> Self {
        self.arg(KernelArg::Ptr(ptr))
    }

    pub fn size(self, value: usize) -> Self {
        self.arg(KernelArg::size(value))
    }

    pub fn arg(mut self, arg: KernelArg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn args(mut self, args: &[KernelArg]) -> Self {
        self.args.extend_from_slice(args);
        self
    }

    /// Check the collected arguments against the parameter list.
    pub fn finish(self) -> Result<ArgumentList> {
        let Self { kernel, params, args } = self;
        ensure!(
            args.len() == params.len(),
            ArityMismatchSnafu { kernel: kernel.as_str(), expected: params.len(), actual: args.len() }
        );

        for (index, (param, arg)) in params.iter().zip(&args).enumerate() {
            let expected = if param.kind.is_pointer() { "pointer" } else { "size" };
            ensure!(
                param.kind.is_pointer() == arg.is_pointer(),
                ArgumentKindSnafu {
                    kernel: kernel.as_str(),
                    index,
                    param: param.name.as_str(),
                    expected,
                    actual: arg.kind_name(),
                }
            );
        }

        Ok(ArgumentList { args })
    }
}
