//! Host reference runtime.
//!
//! Executes kernel templates directly on host memory: device pointers are host
//! addresses and every thread of the launch geometry runs sequentially on the
//! calling thread. Each template is interpreted with the same per-thread
//! semantics as the CUDA source the codegen crate renders, which makes this
//! runtime the reference for kernel results and lets the rest of the stack run
//! without an accelerator.
//!
//! Arithmetic and comparisons on integer operands use wrapping 128-bit integer
//! math truncated to the result type, matching C conversion rules. Everything
//! else, and every math library call, is evaluated in `f64` and converted to the
//! result type.

use snafu::OptionExt;
use spindle_codegen::{ElementwiseOp, KernelParam, KernelTemplate, RenderedKernel};
use spindle_dtype::ScalarDType;
use tracing::{debug, trace};

use crate::error::{Result, UnsupportedTypeSnafu};
use crate::{DeviceRuntime, DeviceStatus, KernelArg, LaunchDescriptor, Program, Stream};

/// Reference runtime executing kernels on the host.
#[derive(Debug, Clone, Default)]
pub struct HostRuntime;

impl HostRuntime {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceRuntime for HostRuntime {
    fn compile(&self, kernel: &RenderedKernel) -> Result<Box<dyn Program>> {
        let operand = parse_dtype(kernel.signature.operand())?;
        let result = parse_dtype(kernel.signature.result())?;

        debug!(kernel.entry = %kernel.entry_point, kernel.template = %kernel.template, %operand, %result, "host kernel compiled");

        Ok(Box::new(HostProgram {
            name: kernel.entry_point.clone(),
            template: kernel.template,
            params: kernel.template.params(),
            operand,
            result,
        }))
    }

    fn synchronize(&self) -> DeviceStatus {
        // Launches run to completion before returning.
        DeviceStatus::SUCCESS
    }

    fn name(&self) -> &str {
        "HOST"
    }
}

fn parse_dtype(name: &str) -> Result<ScalarDType> {
    ScalarDType::from_c_name(name).context(UnsupportedTypeSnafu { name })
}

/// A kernel template bound to concrete element types.
struct HostProgram {
    name: String,
    template: KernelTemplate,
    params: Vec<KernelParam>,
    operand: ScalarDType,
    result: ScalarDType,
}

impl Program for HostProgram {
    unsafe fn launch(&self, launch: &LaunchDescriptor, args: &[KernelArg]) -> DeviceStatus {
        if launch.stream != Stream::Null || !self.accepts(args) {
            return DeviceStatus::INVALID_VALUE;
        }

        let args = Args(args);
        let n = args.size(self.params.len() - 1);
        let threads = launch.threads().min(n as u64) as usize;

        trace!(kernel.name = %self.name, threads, n, "host kernel launch");

        unsafe {
            match self.template {
                KernelTemplate::Broadcast => self.broadcast(&args, threads),
                KernelTemplate::OneHot => self.onehot(&args, threads),
                KernelTemplate::Elementwise(op) => self.elementwise(op, &args, threads),
                KernelTemplate::Reshape => self.reshape(&args, threads),
                KernelTemplate::MaxPool1d => self.max_pool_1d(&args, threads),
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl HostProgram {
    /// Whether `args` matches the parameter list slot for slot.
    fn accepts(&self, args: &[KernelArg]) -> bool {
        args.len() == self.params.len()
            && self.params.iter().zip(args).all(|(param, arg)| param.kind.is_pointer() == arg.is_pointer())
    }

    unsafe fn broadcast(&self, args: &Args, threads: usize) -> DeviceStatus {
        let (input, output) = (args.raw(0), args.raw(1));
        let (repeat_size, repeat_times) = (args.size(2), args.size(3));
        let Some(span) = repeat_size.checked_mul(repeat_times).filter(|&span| span > 0) else {
            return if threads == 0 { DeviceStatus::SUCCESS } else { DeviceStatus::INVALID_VALUE };
        };

        for tid in 0..threads {
            let idx = tid / span * repeat_size + tid % repeat_size;
            unsafe { store(self.result, output, tid, load(self.operand, input, idx)) };
        }
        DeviceStatus::SUCCESS
    }

    unsafe fn onehot(&self, args: &Args, threads: usize) -> DeviceStatus {
        let (input, output) = (args.raw(0), args.raw(1));
        let (repeat_size, repeat_times) = (args.size(2), args.size(3));
        if repeat_times == 0 && threads > 0 {
            return DeviceStatus::INVALID_VALUE;
        }

        for tid in 0..threads {
            let base = (tid / repeat_times) * repeat_size * repeat_times + tid % repeat_times;
            let hot = unsafe { load(self.operand, input, tid) }.to_i64();
            for j in 0..repeat_size {
                let value = HostScalar::Int((j as i64 == hot) as i64);
                unsafe { store(self.result, output, base + j * repeat_times, value) };
            }
        }
        DeviceStatus::SUCCESS
    }

    unsafe fn elementwise(&self, op: ElementwiseOp, args: &Args, threads: usize) -> DeviceStatus {
        let arity = op.arity();
        let output = args.raw(arity);
        let mut operands = Vec::with_capacity(arity);

        for tid in 0..threads {
            operands.clear();
            operands.extend((0..arity).map(|i| unsafe { load(self.operand, args.raw(i), tid) }));
            let value = if self.operand.is_float() { None } else { eval_int(op, &operands) };
            unsafe { store(self.result, output, tid, value.unwrap_or_else(|| eval(op, &operands))) };
        }
        DeviceStatus::SUCCESS
    }

    unsafe fn reshape(&self, args: &Args, threads: usize) -> DeviceStatus {
        let (input, output) = (args.raw(0), args.raw(1));
        let (input_strides, trans_strides) = (args.raw(2), args.raw(3));
        let rank = args.size(4);

        for tid in 0..threads {
            let mut idx = tid;
            let mut out_idx = 0;
            for axis in 0..rank {
                let stride = unsafe { read_index(input_strides, axis) };
                if stride == 0 {
                    return DeviceStatus::INVALID_VALUE;
                }
                out_idx += (idx / stride) * unsafe { read_index(trans_strides, axis) };
                idx %= stride;
            }
            unsafe { store(self.result, output, out_idx, load(self.operand, input, tid)) };
        }
        DeviceStatus::SUCCESS
    }

    unsafe fn max_pool_1d(&self, args: &Args, threads: usize) -> DeviceStatus {
        let (input, output) = (args.raw(0), args.raw(1));
        let (input_width, output_width) = (args.size(2), args.size(3));
        let (window, stride, padding) = (args.size(4), args.size(5), args.size(6));
        if output_width == 0 && threads > 0 {
            return DeviceStatus::INVALID_VALUE;
        }

        for tid in 0..threads {
            let row = tid / output_width;
            let start = ((tid % output_width) * stride) as i64 - padding as i64;
            let mut acc: Option<HostScalar> = None;
            for i in start..start + window as i64 {
                if i < 0 || i >= input_width as i64 {
                    continue;
                }
                let value = unsafe { load(self.operand, input, row * input_width + i as usize) };
                if acc.is_none_or(|acc| value.greater_than(acc)) {
                    acc = Some(value);
                }
            }
            unsafe { store(self.result, output, tid, acc.unwrap_or(HostScalar::Int(0))) };
        }
        DeviceStatus::SUCCESS
    }
}

/// Launch arguments, already checked against the parameter list.
struct Args<'a>(&'a [KernelArg]);

impl Args<'_> {
    fn raw(&self, index: usize) -> u64 {
        self.0[index].raw()
    }

    fn size(&self, index: usize) -> usize {
        self.0[index].raw() as usize
    }
}

/// A loaded element, widened to the largest type of its class.
#[derive(Debug, Clone, Copy, PartialEq)]
enum HostScalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl HostScalar {
    fn to_f64(self) -> f64 {
        match self {
            Self::Bool(v) => v as u8 as f64,
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    fn to_i64(self) -> i64 {
        match self {
            Self::Bool(v) => v as i64,
            Self::Int(v) => v,
            Self::UInt(v) => v as i64,
            Self::Float(v) => v as i64,
        }
    }

    /// Negative values wrap, as a C conversion to an unsigned type does.
    fn to_u64(self) -> u64 {
        match self {
            Self::Bool(v) => v as u64,
            Self::Int(v) => v as u64,
            Self::UInt(v) => v,
            Self::Float(v) if v < 0.0 => v as i64 as u64,
            Self::Float(v) => v as u64,
        }
    }

    fn to_i128(self) -> i128 {
        match self {
            Self::Bool(v) => v as i128,
            Self::Int(v) => v as i128,
            Self::UInt(v) => v as i128,
            Self::Float(v) => v as i128,
        }
    }

    fn is_truthy(self) -> bool {
        match self {
            Self::Bool(v) => v,
            Self::Int(v) => v != 0,
            Self::UInt(v) => v != 0,
            Self::Float(v) => v != 0.0,
        }
    }

    fn greater_than(self, other: Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a > b,
            (Self::UInt(a), Self::UInt(b)) => a > b,
            (a, b) => a.to_f64() > b.to_f64(),
        }
    }
}

/// Integer evaluation of `op`, or `None` for ops that go through `f64`.
///
/// The result keeps the low 64 bits; storing truncates further to the result
/// type, so unsigned underflow wraps the way it does on the device.
fn eval_int(op: ElementwiseOp, x: &[HostScalar]) -> Option<HostScalar> {
    use ElementwiseOp::*;

    let i = |k: usize| x[k].to_i128();
    let value = match op {
        Negative => i(0).wrapping_neg(),
        Sign => (i(0) > 0) as i128 - (i(0) < 0) as i128,
        Relu => i(0).max(0),

        Add => i(0).wrapping_add(i(1)),
        Subtract => i(0).wrapping_sub(i(1)),
        Multiply => i(0).wrapping_mul(i(1)),
        // Division by zero is undefined on the device.
        Divide => i(0).checked_div(i(1)).unwrap_or(0),
        Maximum => i(0).max(i(1)),
        Minimum => i(0).min(i(1)),

        Equal => return Some(HostScalar::Bool(i(0) == i(1))),
        NotEqual => return Some(HostScalar::Bool(i(0) != i(1))),
        Less => return Some(HostScalar::Bool(i(0) < i(1))),
        LessEq => return Some(HostScalar::Bool(i(0) <= i(1))),
        Greater => return Some(HostScalar::Bool(i(0) > i(1))),
        GreaterEq => return Some(HostScalar::Bool(i(0) >= i(1))),

        _ => return None,
    };
    Some(HostScalar::Int(value as i64))
}

fn eval(op: ElementwiseOp, x: &[HostScalar]) -> HostScalar {
    use ElementwiseOp::*;

    let f = |i: usize| x[i].to_f64();
    let value = match op {
        Convert => return x[0],
        Select => return if x[0].is_truthy() { x[1] } else { x[2] },

        Equal => return HostScalar::Bool(f(0) == f(1)),
        NotEqual => return HostScalar::Bool(f(0) != f(1)),
        Less => return HostScalar::Bool(f(0) < f(1)),
        LessEq => return HostScalar::Bool(f(0) <= f(1)),
        Greater => return HostScalar::Bool(f(0) > f(1)),
        GreaterEq => return HostScalar::Bool(f(0) >= f(1)),

        Abs => f(0).abs(),
        Sqrt => f(0).sqrt(),
        Exp => f(0).exp(),
        Log => f(0).ln(),
        Sin => f(0).sin(),
        Cos => f(0).cos(),
        Tan => f(0).tan(),
        Tanh => f(0).tanh(),
        Ceil => f(0).ceil(),
        Floor => f(0).floor(),
        Negative => -f(0),
        Sign => ((f(0) > 0.0) as i8 - (f(0) < 0.0) as i8) as f64,
        Relu => if f(0) > 0.0 { f(0) } else { 0.0 },
        Sigmoid => 1.0 / (1.0 + (-f(0)).exp()),

        Add => f(0) + f(1),
        Subtract => f(0) - f(1),
        Multiply => f(0) * f(1),
        Divide => f(0) / f(1),
        Maximum => if f(0) > f(1) { f(0) } else { f(1) },
        Minimum => if f(0) < f(1) { f(0) } else { f(1) },
        Power => f(0).powf(f(1)),
    };
    HostScalar::Float(value)
}

unsafe fn read_index(base: u64, index: usize) -> usize {
    unsafe { std::ptr::read_unaligned((base as usize as *const u64).add(index)) as usize }
}

/// Host address of element `index` of a `dtype` buffer at `base`.
fn element_address(dtype: ScalarDType, base: u64, index: usize) -> usize {
    base as usize + index * dtype.bytes()
}

unsafe fn load(dtype: ScalarDType, base: u64, index: usize) -> HostScalar {
    let address = element_address(dtype, base, index);
    macro_rules! read {
        ($ty:ty) => {
            unsafe { std::ptr::read_unaligned(address as *const $ty) }
        };
    }

    match dtype {
        ScalarDType::Bool => HostScalar::Bool(read!(u8) != 0),
        ScalarDType::Int8 => HostScalar::Int(read!(i8) as i64),
        ScalarDType::Int16 => HostScalar::Int(read!(i16) as i64),
        ScalarDType::Int32 => HostScalar::Int(read!(i32) as i64),
        ScalarDType::Int64 => HostScalar::Int(read!(i64)),
        ScalarDType::UInt8 => HostScalar::UInt(read!(u8) as u64),
        ScalarDType::UInt16 => HostScalar::UInt(read!(u16) as u64),
        ScalarDType::UInt32 => HostScalar::UInt(read!(u32) as u64),
        ScalarDType::UInt64 => HostScalar::UInt(read!(u64)),
        ScalarDType::Float32 => HostScalar::Float(read!(f32) as f64),
        ScalarDType::Float64 => HostScalar::Float(read!(f64)),
    }
}

unsafe fn store(dtype: ScalarDType, base: u64, index: usize, value: HostScalar) {
    let address = element_address(dtype, base, index);
    macro_rules! write {
        ($ty:ty, $value:expr) => {
            unsafe { std::ptr::write_unaligned(address as *mut $ty, $value) }
        };
    }

    match dtype {
        ScalarDType::Bool => write!(u8, value.is_truthy() as u8),
        ScalarDType::Int8 => write!(i8, value.to_i64() as i8),
        ScalarDType::Int16 => write!(i16, value.to_i64() as i16),
        ScalarDType::Int32 => write!(i32, value.to_i64() as i32),
        ScalarDType::Int64 => write!(i64, value.to_i64()),
        ScalarDType::UInt8 => write!(u8, value.to_u64() as u8),
        ScalarDType::UInt16 => write!(u16, value.to_u64() as u16),
        ScalarDType::UInt32 => write!(u32, value.to_u64() as u32),
        ScalarDType::UInt64 => write!(u64, value.to_u64()),
        ScalarDType::Float32 => write!(f32, value.to_f64() as f32),
        ScalarDType::Float64 => write!(f64, value.to_f64()),
    }
}
