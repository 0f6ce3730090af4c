//! CUDA C source rendering for NVRTC.
//!
//! # Kernel Signature
//!
//! ```c
//! extern "C" __global__ void cuda_<name>(<params from KernelTemplate::params>);
//! ```
//! - pointer parameters carry operand/result element types
//! - scalars are `size_t`
//! - the element count `n` is always last
//!
//! Each thread handles one element: `tid = blockIdx.x * blockDim.x + threadIdx.x`,
//! and threads with `tid >= n` return immediately, so any 1-D geometry covering
//! `n` threads is valid.

pub mod kernels;

use itertools::Itertools;
use spindle_dtype::ScalarDType;
use strum::VariantArray;

use crate::{ElementwiseOp, KernelParam, KernelTemplate, ParamKind, RenderedKernel, SourceBuilder, TypeSignature};

/// CUDA C source builder.
pub struct CudaSourceBuilder;

impl CudaSourceBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CudaSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceBuilder for CudaSourceBuilder {
    fn render(&self, name: &str, template: KernelTemplate, signature: &TypeSignature) -> RenderedKernel {
        render(name, template, signature)
    }

    fn backend_name(&self) -> &str {
        "cuda"
    }
}

/// Entry point of the kernel rendered under `name`.
pub fn entry_point(name: &str) -> String {
    format!("cuda_{name}")
}

/// Render a kernel as CUDA C.
pub fn render(name: &str, template: KernelTemplate, signature: &TypeSignature) -> RenderedKernel {
    let entry_point = entry_point(name);
    let mut code_lines: Vec<String> = Vec::new();

    pod_typedefs(&mut code_lines);
    code_lines.push(String::new());

    // Helpers must precede the kernel that calls them.
    let mut body: Vec<String> = Vec::new();
    match template {
        KernelTemplate::Broadcast => kernels::broadcast(&mut body, signature),
        KernelTemplate::OneHot => kernels::onehot(&mut body, signature),
        KernelTemplate::Elementwise(op) => {
            let callee = elementwise_callee(&mut code_lines, op, signature);
            let arg_cast = library_arg_cast(op, signature);
            kernels::elementwise(&mut body, &callee, arg_cast, op.arity(), signature)
        }
        KernelTemplate::Reshape => kernels::reshape(&mut body, signature),
        KernelTemplate::MaxPool1d => kernels::max_pool_1d(&mut body, signature),
    }

    let params = template.params().iter().map(|param| render_param(param, signature)).join(", ");
    code_lines.push(format!("extern \"C\" __global__ void {entry_point}({params})"));
    code_lines.push("{".to_string());
    code_lines.push("  size_t tid = (size_t)blockIdx.x * blockDim.x + threadIdx.x;".to_string());
    code_lines.push("  if (tid >= n) return;".to_string());
    code_lines.extend(body);
    code_lines.push("}".to_string());

    let code = code_lines.join("\n") + "\n";
    tracing::trace!(kernel.name = %name, kernel.template = %template, lines = code_lines.len(), "cuda kernel rendered");

    RenderedKernel { name: name.to_string(), entry_point, code, template, signature: signature.clone() }
}

/// Emit the device helper of `op`, if it has one, and return the function the
/// kernel body calls.
fn elementwise_callee(code_lines: &mut Vec<String>, op: ElementwiseOp, signature: &TypeSignature) -> String {
    let descriptor = op.descriptor();
    let Some(expr) = descriptor.helper else {
        return descriptor.name.to_string();
    };

    let helper_name = format!("{}{}", descriptor.name, signature.suffix());
    kernels::device_helper(code_lines, &helper_name, expr, descriptor.arity, signature);
    code_lines.push(String::new());
    helper_name
}

/// Cast applied to library call arguments.
///
/// The device math library only overloads `float` and `double`, so integer and
/// bool operands are widened to `double` to keep the call unambiguous.
fn library_arg_cast(op: ElementwiseOp, signature: &TypeSignature) -> Option<&'static str> {
    let is_library_call = op.descriptor().helper.is_none();
    let is_float = ScalarDType::from_c_name(signature.operand()).is_none_or(|dtype| dtype.is_float());
    (is_library_call && !is_float).then_some("double")
}

/// NVRTC has no `<stdint.h>`; define the fixed-width names kernels use.
fn pod_typedefs(code_lines: &mut Vec<String>) {
    for dtype in ScalarDType::VARIANTS.iter().filter(|dtype| dtype.is_int()) {
        code_lines.push(format!("typedef {} {};", dtype.c_builtin(), dtype.c_name()));
    }
}

fn render_param(param: &KernelParam, signature: &TypeSignature) -> String {
    let ty = match param.kind {
        ParamKind::Input => format!("const {}*", signature.operand()),
        ParamKind::Output => format!("{}*", signature.result()),
        ParamKind::Indices => "const size_t*".to_string(),
        ParamKind::Size => "size_t".to_string(),
    };
    format!("{ty} {}", param.name)
}
