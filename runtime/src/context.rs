//! Runtime sessions.

use std::sync::Arc;

use bon::bon;
use snafu::ResultExt;
use spindle_codegen::{CudaSourceBuilder, SourceBuilder};
use spindle_device::{DeviceRuntime, create_device};
use tracing::debug;

use crate::error::*;
use crate::{KernelCache, LaunchPlanner, RuntimeConfig};

fn default_source_builder() -> Arc<dyn SourceBuilder> {
    Arc::new(CudaSourceBuilder::new())
}

/// A runtime session: one device, one source builder, one kernel cache.
///
/// Kernels compiled through a session live as long as the session. Sessions
/// are `Send + Sync`; emitters may be called on one session from several
/// threads, and concurrent compilations of a key are collapsed into one.
pub struct RuntimeContext {
    device: Arc<dyn DeviceRuntime>,
    source_builder: Arc<dyn SourceBuilder>,
    cache: KernelCache,
    planner: LaunchPlanner,
    config: RuntimeConfig,
}

#[bon]
impl RuntimeContext {
    /// Create a session with builder pattern.
    ///
    /// `config.device` is not consulted here; the device is passed in directly.
    #[builder]
    pub fn builder(
        device: Arc<dyn DeviceRuntime>,
        #[builder(default = default_source_builder())] source_builder: Arc<dyn SourceBuilder>,
        #[builder(default)] config: RuntimeConfig,
    ) -> Self {
        debug!(
            device = device.name(),
            backend = source_builder.backend_name(),
            launch_policy = ?config.launch_policy,
            "runtime session opened"
        );
        Self { planner: LaunchPlanner::new(config.launch_policy), cache: KernelCache::new(), device, source_builder, config }
    }
}

impl RuntimeContext {
    /// Open the device named by `config` and start a session on it.
    pub fn from_config(config: RuntimeConfig) -> Result<Self> {
        let device = create_device(config.device).context(DeviceSnafu)?;
        Ok(Self::builder().device(device).config(config).build())
    }

    /// Session configured from `SPINDLE_*` environment variables.
    ///
    /// See [`RuntimeConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(RuntimeConfig::from_env())
    }

    pub fn device(&self) -> &dyn DeviceRuntime {
        self.device.as_ref()
    }

    pub fn source_builder(&self) -> &dyn SourceBuilder {
        self.source_builder.as_ref()
    }

    pub fn cache(&self) -> &KernelCache {
        &self.cache
    }

    pub fn planner(&self) -> &LaunchPlanner {
        &self.planner
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl Drop for RuntimeContext {
    fn drop(&mut self) {
        debug!(device = self.device.name(), kernels = self.cache.len(), "runtime session closed");
    }
}
