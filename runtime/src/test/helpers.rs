//! Instrumented device and session helpers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use spindle_codegen::RenderedKernel;
use spindle_device::{DeviceRuntime, DeviceStatus, HostRuntime, KernelArg, LaunchDescriptor, Program};

use crate::{RuntimeConfig, RuntimeContext};

/// Device call observed by [`FakeDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Compile(String),
    Launch { entry: String, launch: LaunchDescriptor, args: Vec<KernelArg> },
    Synchronize,
}

struct FakeProgram {
    name: String,
}

impl Program for FakeProgram {
    unsafe fn launch(&self, _launch: &LaunchDescriptor, _args: &[KernelArg]) -> DeviceStatus {
        DeviceStatus::SUCCESS
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Device that records every call and executes nothing.
pub struct FakeDevice {
    calls: Mutex<Vec<DeviceCall>>,
    compiles: AtomicUsize,
    launch_status: DeviceStatus,
    sync_status: DeviceStatus,
    fail_compile: bool,
    compile_delay: Duration,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            compiles: AtomicUsize::new(0),
            launch_status: DeviceStatus::SUCCESS,
            sync_status: DeviceStatus::SUCCESS,
            fail_compile: false,
            compile_delay: Duration::ZERO,
        }
    }
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_launch(status: DeviceStatus) -> Self {
        Self { launch_status: status, ..Self::default() }
    }

    pub fn failing_sync(status: DeviceStatus) -> Self {
        Self { sync_status: status, ..Self::default() }
    }

    pub fn failing_compile() -> Self {
        Self { fail_compile: true, ..Self::default() }
    }

    pub fn slow_compile(delay: Duration) -> Self {
        Self { compile_delay: delay, ..Self::default() }
    }

    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().clone()
    }

    pub fn launches(&self) -> Vec<(LaunchDescriptor, Vec<KernelArg>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Launch { launch, args, .. } => Some((*launch, args.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn sync_count(&self) -> usize {
        self.calls.lock().iter().filter(|call| matches!(call, DeviceCall::Synchronize)).count()
    }
}

impl DeviceRuntime for FakeDevice {
    fn compile(&self, kernel: &RenderedKernel) -> spindle_device::Result<Box<dyn Program>> {
        if !self.compile_delay.is_zero() {
            std::thread::sleep(self.compile_delay);
        }
        self.compiles.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(DeviceCall::Compile(kernel.entry_point.clone()));

        if self.fail_compile {
            return spindle_device::CompileSnafu { kernel: kernel.entry_point.clone(), reason: "rejected by fake" }
                .fail();
        }
        Ok(Box::new(FakeProgram { name: kernel.entry_point.clone() }))
    }

    unsafe fn launch(&self, program: &dyn Program, launch: &LaunchDescriptor, args: &[KernelArg]) -> DeviceStatus {
        self.calls.lock().push(DeviceCall::Launch {
            entry: program.name().to_string(),
            launch: *launch,
            args: args.to_vec(),
        });
        self.launch_status
    }

    fn synchronize(&self) -> DeviceStatus {
        self.calls.lock().push(DeviceCall::Synchronize);
        self.sync_status
    }

    fn name(&self) -> &str {
        "FAKE"
    }
}

/// Session over a fake device, keeping a handle for inspection.
pub fn fake_session(device: FakeDevice) -> (RuntimeContext, Arc<FakeDevice>) {
    let device = Arc::new(device);
    let ctx = RuntimeContext::builder().device(device.clone()).build();
    (ctx, device)
}

/// Session over the host reference device.
pub fn host_session() -> RuntimeContext {
    RuntimeContext::builder().device(Arc::new(HostRuntime::new())).build()
}

/// Host session with an explicit configuration.
pub fn host_session_with(config: RuntimeConfig) -> RuntimeContext {
    RuntimeContext::builder().device(Arc::new(HostRuntime::new())).config(config).build()
}
