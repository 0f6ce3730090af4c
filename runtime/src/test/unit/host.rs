//! End-to-end emitter tests on the host reference device.

use proptest::prelude::*;
use spindle_codegen::ElementwiseOp;
use spindle_device::DevicePtr;

use crate::test::helpers::{host_session, host_session_with};
use crate::{
    Error, LaunchPolicy, MaxPool1dParams, RuntimeConfig, emit_1d_max_pool, emit_broadcast, emit_elementwise_op,
    emit_onehot, emit_reshape,
};

fn ptr<T>(data: &[T]) -> DevicePtr {
    DevicePtr::from_host(data.as_ptr())
}

fn ptr_mut<T>(data: &mut [T]) -> DevicePtr {
    DevicePtr::from_host_mut(data.as_mut_ptr())
}

#[test]
fn test_broadcast_repeats_rows() {
    let ctx = host_session();
    let input = [1.0f32, 2.0, 3.0];
    let mut output = [0.0f32; 6];

    unsafe { emit_broadcast(&ctx, "broadcast", ["float", "float"], ptr(&input), ptr_mut(&mut output), 3, 2, 6) }
        .unwrap();

    assert_eq!(output, [1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_broadcast_with_blocked_geometry() {
    let ctx = host_session_with(RuntimeConfig::builder().launch_policy(LaunchPolicy::Blocked { block_size: 4 }).build());
    let input = [5i32, 6];
    let mut output = [0i32; 10];

    unsafe { emit_broadcast(&ctx, "broadcast", ["int", "int"], ptr(&input), ptr_mut(&mut output), 1, 5, 10) }
        .unwrap();

    assert_eq!(output, [5, 5, 5, 5, 5, 6, 6, 6, 6, 6]);
}

#[test]
fn test_elementwise_unary_library_call() {
    let ctx = host_session();
    let input = [-1.5f64, 0.0, 2.25];
    let mut output = [0.0f64; 3];

    unsafe {
        emit_elementwise_op(&ctx, ElementwiseOp::Abs, "abs", ["double", "double"], &[ptr(&input)], ptr_mut(&mut output), 3)
    }
    .unwrap();

    assert_eq!(output, [1.5, 0.0, 2.25]);
}

#[test]
fn test_elementwise_binary_helper() {
    let ctx = host_session();
    let lhs = [1i32, 8, -3];
    let rhs = [4i32, 2, -7];
    let mut output = [0i32; 3];

    unsafe {
        emit_elementwise_op(
            &ctx,
            ElementwiseOp::Maximum,
            "maximum",
            ["int", "int"],
            &[ptr(&lhs), ptr(&rhs)],
            ptr_mut(&mut output),
            3,
        )
    }
    .unwrap();

    assert_eq!(output, [4, 8, -3]);
}

#[test]
fn test_elementwise_convert() {
    let ctx = host_session();
    let input = [1u8, 200, 255];
    let mut output = [0.0f32; 3];

    unsafe {
        emit_elementwise_op(
            &ctx,
            ElementwiseOp::Convert,
            "convert",
            ["unsigned char", "float"],
            &[ptr(&input)],
            ptr_mut(&mut output),
            3,
        )
    }
    .unwrap();

    assert_eq!(output, [1.0, 200.0, 255.0]);
}

#[test]
fn test_reshape_transpose() {
    let ctx = host_session();
    // [2, 3] -> [3, 2]
    let input = [0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0];
    let mut output = [0.0f32; 6];
    let input_strides = [3u64, 1];
    let trans_strides = [1u64, 2];

    unsafe {
        emit_reshape(
            &ctx,
            "transpose",
            ["float", "float"],
            ptr(&input),
            ptr_mut(&mut output),
            ptr(&input_strides),
            ptr(&trans_strides),
            2,
            6,
        )
    }
    .unwrap();

    assert_eq!(output, [0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
}

#[test]
fn test_max_pool() {
    let ctx = host_session();
    let input = [1.0f32, 4.0, 2.0, 0.5, 3.0, 3.5];
    let output_width = MaxPool1dParams::output_width_for(6, 2, 2, 0);
    let mut output = vec![0.0f32; output_width];
    let params = MaxPool1dParams {
        input: ptr(&input),
        output: ptr_mut(&mut output),
        input_width: 6,
        output_width,
        window: 2,
        stride: 2,
        padding: 0,
    };

    unsafe { emit_1d_max_pool(&ctx, "max_pool", ["float", "float"], output_width, &params.to_args()) }.unwrap();

    assert_eq!(output, [4.0, 2.0, 3.5]);
}

#[test]
fn test_output_width_for() {
    assert_eq!(MaxPool1dParams::output_width_for(6, 2, 2, 0), 3);
    assert_eq!(MaxPool1dParams::output_width_for(5, 2, 2, 1), 3);
    assert_eq!(MaxPool1dParams::output_width_for(5, 3, 1, 0), 3);
    assert_eq!(MaxPool1dParams::output_width_for(2, 5, 1, 1), 0);
    assert_eq!(MaxPool1dParams::output_width_for(4, 2, 0, 0), 0);
}

#[test]
fn test_unsupported_type_is_a_compile_error() {
    let ctx = host_session();
    let input = [0u16; 4];
    let mut output = [0u16; 4];

    let err = unsafe { emit_broadcast(&ctx, "broadcast", ["half", "half"], ptr(&input), ptr_mut(&mut output), 1, 1, 4) }
        .unwrap_err();

    assert!(matches!(err, Error::Compile { .. }), "{err}");
    assert!(ctx.cache().is_empty());
}

proptest! {
    #[test]
    fn broadcast_once_is_identity(input in proptest::collection::vec(any::<i32>(), 1..64)) {
        let ctx = host_session();
        let mut output = vec![0i32; input.len()];

        unsafe {
            emit_broadcast(&ctx, "broadcast", ["int", "int"], ptr(&input), ptr_mut(&mut output), input.len(), 1, input.len())
        }
        .unwrap();

        prop_assert_eq!(output, input);
    }

    #[test]
    fn onehot_has_single_hot_entry(
        (width, indices) in (1usize..16).prop_flat_map(|width| {
            (Just(width), proptest::collection::vec(0..width as i64, 1..32))
        })
    ) {
        let ctx = host_session();
        let mut output = vec![7.0f32; indices.len() * width];

        unsafe {
            emit_onehot(&ctx, "onehot", ["int64_t", "float"], ptr(&indices), ptr_mut(&mut output), width, 1, indices.len())
        }
        .unwrap();

        for (row, &hot) in output.chunks(width).zip(&indices) {
            for (j, &value) in row.iter().enumerate() {
                prop_assert_eq!(value, if j as i64 == hot { 1.0 } else { 0.0 });
            }
        }
    }
}
