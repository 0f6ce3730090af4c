//! CUDA renderer tests.

use crate::cuda::render;
use crate::{CudaSourceBuilder, ElementwiseOp, KernelTemplate, SourceBuilder, TypeSignature};

fn float_signature() -> TypeSignature {
    TypeSignature::new(["float", "float"])
}

#[test]
fn test_entry_point() {
    let kernel = render("add_float_float", KernelTemplate::Elementwise(ElementwiseOp::Add), &float_signature());
    assert_eq!(kernel.entry_point, "cuda_add_float_float");
    assert_eq!(kernel.name, "add_float_float");
    assert!(kernel.code.contains("extern \"C\" __global__ void cuda_add_float_float("), "{}", kernel.code);
}

#[test]
fn test_helper_precedes_kernel() {
    let kernel = render("add_float_float", KernelTemplate::Elementwise(ElementwiseOp::Add), &float_signature());

    let helper = kernel.code.find("__device__ __forceinline__ float add_float_float(float x0, float x1)");
    let entry = kernel.code.find("__global__");
    assert!(helper.is_some(), "Missing helper:\n{}", kernel.code);
    assert!(helper < entry, "Helper must precede the kernel:\n{}", kernel.code);
    assert!(kernel.code.contains("out[tid] = (float)add_float_float(in0[tid], in1[tid]);"), "{}", kernel.code);
}

#[test]
fn test_helper_named_by_signature() {
    let signature = TypeSignature::new(["unsigned char", "unsigned char"]);
    let kernel = render("add_u8", KernelTemplate::Elementwise(ElementwiseOp::Add), &signature);
    assert!(kernel.code.contains("unsigned char add_unsigned_char_unsigned_char("), "{}", kernel.code);
}

#[test]
fn test_library_op_has_no_helper() {
    let kernel = render("abs_float_float", KernelTemplate::Elementwise(ElementwiseOp::Abs), &float_signature());
    assert!(!kernel.code.contains("__device__"), "{}", kernel.code);
    assert!(kernel.code.contains("out[tid] = (float)fabs(in0[tid]);"), "{}", kernel.code);
}

#[test]
fn test_library_op_widens_integer_operands() {
    let signature = TypeSignature::new(["int", "int"]);
    let kernel = render("abs_int_int", KernelTemplate::Elementwise(ElementwiseOp::Abs), &signature);
    assert!(kernel.code.contains("out[tid] = (int)fabs((double)in0[tid]);"), "{}", kernel.code);

    let signature = TypeSignature::new(["unsigned char", "float"]);
    let kernel = render("pow_uchar_float", KernelTemplate::Elementwise(ElementwiseOp::Power), &signature);
    assert!(kernel.code.contains("pow((double)in0[tid], (double)in1[tid])"), "{}", kernel.code);
}

#[test]
fn test_helper_op_keeps_integer_operands() {
    let signature = TypeSignature::new(["int", "int"]);
    let kernel = render("add_int_int", KernelTemplate::Elementwise(ElementwiseOp::Add), &signature);
    assert!(kernel.code.contains("add_int_int(in0[tid], in1[tid])"), "{}", kernel.code);
    assert!(!kernel.code.contains("(double)"), "{}", kernel.code);
}

#[test]
fn test_ternary_params() {
    let kernel = render("select_float_float", KernelTemplate::Elementwise(ElementwiseOp::Select), &float_signature());
    assert!(
        kernel.code.contains("(const float* in0, const float* in1, const float* in2, float* out, size_t n)"),
        "{}",
        kernel.code
    );
}

#[test]
fn test_typedef_preamble() {
    let kernel = render("broadcast_float_float", KernelTemplate::Broadcast, &float_signature());
    assert!(kernel.code.starts_with("typedef signed char int8_t;"), "{}", kernel.code);
    assert!(kernel.code.contains("typedef unsigned long long uint64_t;"), "{}", kernel.code);
}

#[test]
fn test_reshape_reads_strides() {
    let signature = TypeSignature::new(["int64_t", "int64_t"]);
    let kernel = render("reshape_i64", KernelTemplate::Reshape, &signature);
    assert!(kernel.code.contains("const size_t* input_strides, const size_t* trans_strides, size_t rank, size_t n"));
    assert!(kernel.code.contains("out_idx += (idx / input_strides[i]) * trans_strides[i];"), "{}", kernel.code);
}

#[test]
fn test_max_pool_params() {
    let kernel = render("pool", KernelTemplate::MaxPool1d, &TypeSignature::new(["double", "float"]));
    assert!(
        kernel.code.contains(
            "(const double* in, float* out, size_t input_width, size_t output_width, size_t window, size_t stride, size_t padding, size_t n)"
        ),
        "{}",
        kernel.code
    );
    assert!(kernel.code.contains("out[tid] = (float)acc;"), "{}", kernel.code);
}

#[test]
fn test_guarded_thread_index() {
    for template in [KernelTemplate::Broadcast, KernelTemplate::OneHot, KernelTemplate::Reshape, KernelTemplate::MaxPool1d]
    {
        let kernel = render("k", template, &float_signature());
        assert!(kernel.code.contains("if (tid >= n) return;"), "{template}: {}", kernel.code);
    }
}

#[test]
fn test_render_is_deterministic() {
    let builder = CudaSourceBuilder::new();
    let template = KernelTemplate::Elementwise(ElementwiseOp::Sigmoid);
    let first = builder.render("sigmoid_float_float", template, &float_signature());
    let second = builder.render("sigmoid_float_float", template, &TypeSignature::new([" float", "float "]));
    assert_eq!(first.code, second.code);
    assert_eq!(builder.backend_name(), "cuda");
}
