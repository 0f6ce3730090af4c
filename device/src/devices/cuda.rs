//! CUDA runtime: NVRTC compilation and driver launches via `cudarc`.

use std::sync::Arc;

use cudarc::driver::{CudaContext, CudaFunction, CudaModule, CudaStream, LaunchConfig, PushKernelArg};
use snafu::ResultExt;
use spindle_codegen::RenderedKernel;
use tracing::debug;

use crate::error::{CompileSnafu, CudaSnafu, Result};
use crate::{DeviceRuntime, DeviceStatus, KernelArg, LaunchDescriptor, Program};

/// CUDA device runtime.
///
/// All launches go to the context's default stream; [`DeviceRuntime::synchronize`]
/// synchronizes the whole context.
pub struct CudaRuntime {
    context: Arc<CudaContext>,
    stream: Arc<CudaStream>,
    name: String,
}

impl CudaRuntime {
    pub fn new(device_id: usize) -> Result<Self> {
        let context = CudaContext::new(device_id).context(CudaSnafu)?;
        let stream = context.default_stream();
        Ok(Self { context, stream, name: format!("CUDA:{device_id}") })
    }
}

impl DeviceRuntime for CudaRuntime {
    fn compile(&self, kernel: &RenderedKernel) -> Result<Box<dyn Program>> {
        let ptx = cudarc::nvrtc::compile_ptx(&kernel.code)
            .map_err(|e| CompileSnafu { kernel: kernel.name.clone(), reason: format!("{e:?}") }.build())?;
        let module = self.context.load_module(ptx).context(CudaSnafu)?;
        let function = module.load_function(&kernel.entry_point).context(CudaSnafu)?;

        debug!(kernel.entry = %kernel.entry_point, device = %self.name, "CUDA kernel compiled and loaded");

        Ok(Box::new(CudaProgram {
            name: kernel.entry_point.clone(),
            function,
            _module: module,
            stream: Arc::clone(&self.stream),
        }))
    }

    fn synchronize(&self) -> DeviceStatus {
        match self.context.synchronize() {
            Ok(()) => DeviceStatus::SUCCESS,
            Err(err) => DeviceStatus::from_code(err.0 as i32),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct CudaProgram {
    name: String,
    function: CudaFunction,
    /// Keep the module loaded for as long as the function is reachable.
    _module: Arc<CudaModule>,
    stream: Arc<CudaStream>,
}

// SAFETY: CudaFunction is a handle into a loaded module; the driver allows
// launching it from any thread bound to its context.
unsafe impl Send for CudaProgram {}
unsafe impl Sync for CudaProgram {}

impl Program for CudaProgram {
    unsafe fn launch(&self, launch: &LaunchDescriptor, args: &[KernelArg]) -> DeviceStatus {
        // Every slot is 64 bits wide: device addresses and `size_t` scalars.
        let values: Vec<u64> = args.iter().map(KernelArg::raw).collect();

        let mut builder = self.stream.launch_builder(&self.function);
        for value in &values {
            builder.arg(value);
        }

        let config = LaunchConfig {
            grid_dim: launch.grid.into(),
            block_dim: launch.block.into(),
            shared_mem_bytes: launch.shared_mem_bytes,
        };
        match unsafe { builder.launch(config) } {
            Ok(_) => DeviceStatus::SUCCESS,
            Err(err) => DeviceStatus::from_code(err.0 as i32),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
