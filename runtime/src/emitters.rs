//! Operation emitters.
//!
//! Each emitter specializes a kernel template to a name and a pair of element
//! types, compiles it on the first call for that key, launches it over `count`
//! elements and blocks until the device is idle.
//!
//! # Safety
//!
//! All emitters are `unsafe`: the caller guarantees that every device pointer
//! is valid for the reads and writes the kernel performs (`count` elements, or
//! the extents implied by the shape arguments) until the emitter returns.

use std::sync::Arc;

use snafu::{ResultExt, ensure};
use spindle_codegen::{ElementwiseOp, KernelTemplate, TypeSignature};
use spindle_device::{DevicePtr, KernelArg};
use tracing::{debug, trace};

use crate::error::*;
use crate::{ArgumentList, ArgumentMarshaler, CachedKernel, OperationKey, RuntimeContext};

/// One specialized kernel invocation.
struct KernelCall {
    key: OperationKey,
    template: KernelTemplate,
    signature: TypeSignature,
}

impl KernelCall {
    fn new(name: &str, template: KernelTemplate, data_types: [&str; 2]) -> Self {
        let signature = TypeSignature::new(data_types);
        Self { key: OperationKey::new(name, &signature), template, signature }
    }

    fn marshaler(&self) -> ArgumentMarshaler {
        ArgumentMarshaler::new(self.key.as_str(), self.template)
    }

    /// Fetch the compiled kernel for this key, compiling it on a miss.
    fn compile(&self, ctx: &RuntimeContext) -> Result<Arc<CachedKernel>> {
        if let Some(kernel) = ctx.cache().get(&self.key) {
            trace!(kernel.key = %self.key, "kernel cache hit");
            return self.check_template(kernel);
        }

        let kernel = ctx.cache().get_or_compile(&self.key, || {
            debug!(kernel.key = %self.key, kernel.template = %self.template, "kernel cache miss, compiling");

            let rendered = ctx.source_builder().render(self.key.as_str(), self.template, &self.signature);
            if ctx.config().dump_source {
                trace!(kernel.key = %self.key, source = %rendered.code, "rendered kernel source");
            }

            let program = ctx.device().compile(&rendered).context(CompileSnafu { key: self.key.clone() })?;
            debug!(kernel.key = %self.key, kernel.entry = %rendered.entry_point, "kernel compiled");

            Ok(CachedKernel {
                program,
                key: self.key.clone(),
                template: self.template,
                entry_point: rendered.entry_point,
                code: rendered.code,
            })
        })?;
        self.check_template(kernel)
    }

    fn check_template(&self, kernel: Arc<CachedKernel>) -> Result<Arc<CachedKernel>> {
        ensure!(
            kernel.template == self.template,
            KernelConflictSnafu { key: self.key.clone(), cached: kernel.template, requested: self.template }
        );
        Ok(kernel)
    }

    /// Compile on miss, launch over `count` elements, then synchronize.
    ///
    /// A zero count compiles the kernel but launches nothing.
    ///
    /// # Safety
    ///
    /// Pointers in `args` must be valid for the accesses the kernel performs.
    unsafe fn run(&self, ctx: &RuntimeContext, args: &ArgumentList, count: usize) -> Result<()> {
        let kernel = self.compile(ctx)?;

        let Some(launch) = ctx.planner().plan(count)? else {
            trace!(kernel.key = %self.key, "zero elements, launch skipped");
            return Ok(());
        };

        trace!(
            kernel.entry = %kernel.entry_point,
            grid = launch.grid.x,
            block = launch.block.x,
            args = args.len(),
            "launching kernel"
        );

        // SAFETY: the caller guarantees the pointers; slot count and kinds were
        // checked against the kernel's parameter list by the marshaler.
        let status = unsafe { ctx.device().launch(kernel.program.as_ref(), &launch, args.as_slice()) };
        ensure!(status.is_success(), LaunchSnafu { kernel: self.key.as_str(), stage: LaunchStage::Launch, status });

        let status = ctx.device().synchronize();
        ensure!(
            status.is_success(),
            LaunchSnafu { kernel: self.key.as_str(), stage: LaunchStage::Synchronize, status }
        );

        Ok(())
    }
}

/// Repeat contiguous runs of `repeat_size` input elements `repeat_times` times.
///
/// Output element `i` reads input element
/// `i / (repeat_size * repeat_times) * repeat_size + i % repeat_size`, so
/// `repeat_times == 1` copies the input. `count` is the number of output elements.
///
/// # Safety
///
/// `input` must be valid for the elements read and `output` for `count` writes.
#[allow(clippy::too_many_arguments)]
pub unsafe fn emit_broadcast(
    ctx: &RuntimeContext,
    name: &str,
    data_types: [&str; 2],
    input: DevicePtr,
    output: DevicePtr,
    repeat_size: usize,
    repeat_times: usize,
    count: usize,
) -> Result<()> {
    let call = KernelCall::new(name, KernelTemplate::Broadcast, data_types);
    let args = call.marshaler().input(input).output(output).size(repeat_size).size(repeat_times).size(count).finish()?;
    unsafe { call.run(ctx, &args, count) }
}

/// Expand `count` integer indices into one-hot vectors of width `repeat_size`.
///
/// `repeat_times` is the inner stride of the hot axis (1 when the hot axis is
/// innermost). Indices outside `0..repeat_size` produce all-zero vectors.
///
/// # Safety
///
/// `input` must be valid for `count` reads and `output` for
/// `count * repeat_size` writes.
#[allow(clippy::too_many_arguments)]
pub unsafe fn emit_onehot(
    ctx: &RuntimeContext,
    name: &str,
    data_types: [&str; 2],
    input: DevicePtr,
    output: DevicePtr,
    repeat_size: usize,
    repeat_times: usize,
    count: usize,
) -> Result<()> {
    let call = KernelCall::new(name, KernelTemplate::OneHot, data_types);
    let args = call.marshaler().input(input).output(output).size(repeat_size).size(repeat_times).size(count).finish()?;
    unsafe { call.run(ctx, &args, count) }
}

/// Apply `op` to `inputs` element by element.
///
/// `data_types` is `[operand, result]`. The number of inputs must equal the
/// operation's arity; this is checked before anything is compiled.
///
/// # Safety
///
/// Every input must be valid for `count` reads and `output` for `count` writes.
pub unsafe fn emit_elementwise_op(
    ctx: &RuntimeContext,
    op: ElementwiseOp,
    name: &str,
    data_types: [&str; 2],
    inputs: &[DevicePtr],
    output: DevicePtr,
    count: usize,
) -> Result<()> {
    ensure!(inputs.len() == op.arity(), ArityMismatchSnafu { kernel: name, expected: op.arity(), actual: inputs.len() });

    let call = KernelCall::new(name, KernelTemplate::Elementwise(op), data_types);
    let args = call.marshaler().inputs(inputs).output(output).size(count).finish()?;
    unsafe { call.run(ctx, &args, count) }
}

/// Scatter `count` input elements through stride tables.
///
/// For element `i`, walks the `rank` axes accumulating
/// `(idx / input_strides[a]) * trans_strides[a]` with `idx %= input_strides[a]`,
/// then writes `output[acc] = input[i]`. Both tables live in device memory.
///
/// # Safety
///
/// `input` and `output` must be valid for `count` elements, and both stride
/// tables for `rank` `size_t` reads.
#[allow(clippy::too_many_arguments)]
pub unsafe fn emit_reshape(
    ctx: &RuntimeContext,
    name: &str,
    data_types: [&str; 2],
    input: DevicePtr,
    output: DevicePtr,
    input_strides: DevicePtr,
    trans_strides: DevicePtr,
    rank: usize,
    count: usize,
) -> Result<()> {
    let call = KernelCall::new(name, KernelTemplate::Reshape, data_types);
    let args = call
        .marshaler()
        .input(input)
        .output(output)
        .indices(input_strides)
        .indices(trans_strides)
        .size(rank)
        .size(count)
        .finish()?;
    unsafe { call.run(ctx, &args, count) }
}

/// Sliding-window maximum over the innermost axis.
///
/// `params` is the kernel's parameter list without the trailing count, as built
/// by [`MaxPool1dParams::to_args`]. An empty list does nothing: no compilation,
/// no cache entry, no launch.
///
/// # Safety
///
/// Pointers in `params` must be valid for the pooled extents.
pub unsafe fn emit_1d_max_pool(
    ctx: &RuntimeContext,
    name: &str,
    data_types: [&str; 2],
    count: usize,
    params: &[KernelArg],
) -> Result<()> {
    if params.is_empty() {
        trace!(kernel.name = name, "max pool without parameters, nothing to do");
        return Ok(());
    }

    let call = KernelCall::new(name, KernelTemplate::MaxPool1d, data_types);
    let args = call.marshaler().args(params).size(count).finish()?;
    unsafe { call.run(ctx, &args, count) }
}

/// Parameters of a 1-D max pool over rows of `input_width` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPool1dParams {
    pub input: DevicePtr,
    pub output: DevicePtr,
    pub input_width: usize,
    pub output_width: usize,
    pub window: usize,
    pub stride: usize,
    pub padding: usize,
}

impl MaxPool1dParams {
    /// Number of windows that fit a padded row, or 0 if none does.
    pub fn output_width_for(input_width: usize, window: usize, stride: usize, padding: usize) -> usize {
        let padded = input_width + 2 * padding;
        if stride == 0 || window == 0 || window > padded {
            return 0;
        }
        (padded - window) / stride + 1
    }

    /// Kernel arguments in parameter order, without the trailing count.
    pub fn to_args(&self) -> [KernelArg; 7] {
        [
            KernelArg::Ptr(self.input),
            KernelArg::Ptr(self.output),
            KernelArg::size(self.input_width),
            KernelArg::size(self.output_width),
            KernelArg::size(self.window),
            KernelArg::size(self.stride),
            KernelArg::size(self.padding),
        ]
    }
}
