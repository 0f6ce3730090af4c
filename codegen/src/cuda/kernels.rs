//! Kernel bodies.
//!
//! Each function appends the statements that follow the `tid < n` guard.

use itertools::Itertools;

use crate::TypeSignature;

/// `__device__` helper computing `expr` over inputs `x0..x{arity}`.
pub fn device_helper(code_lines: &mut Vec<String>, name: &str, expr: &str, arity: usize, signature: &TypeSignature) {
    let (operand, result) = (signature.operand(), signature.result());
    let args = (0..arity).map(|i| format!("{operand} x{i}")).join(", ");
    code_lines.push(format!("__device__ __forceinline__ {result} {name}({args})"));
    code_lines.push("{".to_string());
    code_lines.push(format!("  return ({result})({expr});"));
    code_lines.push("}".to_string());
}

pub fn broadcast(code_lines: &mut Vec<String>, signature: &TypeSignature) {
    let result = signature.result();
    code_lines.push("  size_t idx = tid / (repeat_size * repeat_times) * repeat_size + tid % repeat_size;".to_string());
    code_lines.push(format!("  out[tid] = ({result})in[idx];"));
}

/// Out-of-range indices leave every slot of the vector at zero.
pub fn onehot(code_lines: &mut Vec<String>, signature: &TypeSignature) {
    let result = signature.result();
    code_lines.push("  size_t base = (tid / repeat_times) * repeat_size * repeat_times + tid % repeat_times;".to_string());
    code_lines.push("  long long hot = (long long)in[tid];".to_string());
    code_lines.push("  for (size_t j = 0; j < repeat_size; j++)".to_string());
    code_lines.push("  {".to_string());
    code_lines.push(format!("    out[base + j * repeat_times] = ({result})((long long)j == hot ? 1 : 0);"));
    code_lines.push("  }".to_string());
}

/// `arg_cast`, if any, converts each input before the call.
pub fn elementwise(
    code_lines: &mut Vec<String>,
    callee: &str,
    arg_cast: Option<&str>,
    arity: usize,
    signature: &TypeSignature,
) {
    let result = signature.result();
    let cast = arg_cast.map(|ty| format!("({ty})")).unwrap_or_default();
    let args = (0..arity).map(|i| format!("{cast}in{i}[tid]")).join(", ");
    code_lines.push(format!("  out[tid] = ({result}){callee}({args});"));
}

pub fn reshape(code_lines: &mut Vec<String>, signature: &TypeSignature) {
    let result = signature.result();
    code_lines.push("  size_t idx = tid;".to_string());
    code_lines.push("  size_t out_idx = 0;".to_string());
    code_lines.push("  for (size_t i = 0; i < rank; i++)".to_string());
    code_lines.push("  {".to_string());
    code_lines.push("    out_idx += (idx / input_strides[i]) * trans_strides[i];".to_string());
    code_lines.push("    idx %= input_strides[i];".to_string());
    code_lines.push("  }".to_string());
    code_lines.push(format!("  out[out_idx] = ({result})in[tid];"));
}

/// Window positions outside `[0, input_width)` are padding and never win.
pub fn max_pool_1d(code_lines: &mut Vec<String>, signature: &TypeSignature) {
    let (operand, result) = (signature.operand(), signature.result());
    code_lines.push("  size_t row = tid / output_width;".to_string());
    code_lines.push("  long long start = (long long)((tid % output_width) * stride) - (long long)padding;".to_string());
    code_lines.push(format!("  const {operand}* src = in + row * input_width;"));
    code_lines.push("  bool seen = false;".to_string());
    code_lines.push(format!("  {operand} acc = 0;"));
    code_lines.push("  for (long long i = start; i < start + (long long)window; i++)".to_string());
    code_lines.push("  {".to_string());
    code_lines.push("    if (i < 0 || i >= (long long)input_width) continue;".to_string());
    code_lines.push(format!("    {operand} v = src[i];"));
    code_lines.push("    if (!seen || v > acc)".to_string());
    code_lines.push("    {".to_string());
    code_lines.push("      acc = v;".to_string());
    code_lines.push("      seen = true;".to_string());
    code_lines.push("    }".to_string());
    code_lines.push("  }".to_string());
    code_lines.push(format!("  out[tid] = ({result})acc;"));
}
