//! Device selection.

use std::sync::Arc;

use snafu::OptionExt;

use crate::error::{InvalidDeviceSnafu, Result};
use crate::{DeviceRuntime, HostRuntime};

/// Which device a runtime session binds to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeviceSpec {
    /// Host reference runtime.
    #[default]
    Host,
    /// CUDA device by ordinal.
    Cuda { device_id: usize },
}

impl DeviceSpec {
    /// Parse a device string into a DeviceSpec.
    ///
    /// Examples:
    /// - "HOST" / "CPU" -> DeviceSpec::Host
    /// - "CUDA:1" -> DeviceSpec::Cuda { device_id: 1 }
    /// - "cuda" / "GPU" -> DeviceSpec::Cuda { device_id: 0 }
    pub fn parse(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        let (kind, id) = match upper.split_once(':') {
            Some((kind, id)) => (kind, Some(id)),
            None => (upper.as_str(), None),
        };

        match kind {
            "HOST" | "CPU" if id.is_none() => Ok(DeviceSpec::Host),
            "CUDA" | "GPU" => {
                let device_id = match id {
                    Some(id) => id.parse().ok().context(InvalidDeviceSnafu { device: s })?,
                    None => 0,
                };
                Ok(DeviceSpec::Cuda { device_id })
            }
            _ => InvalidDeviceSnafu { device: s }.fail(),
        }
    }

    pub fn canonicalize(&self) -> String {
        match self {
            DeviceSpec::Host => "HOST".to_string(),
            DeviceSpec::Cuda { device_id } => format!("CUDA:{device_id}"),
        }
    }
}

impl std::str::FromStr for DeviceSpec {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Open the runtime for `spec`.
pub fn create_device(spec: DeviceSpec) -> Result<Arc<dyn DeviceRuntime>> {
    match spec {
        DeviceSpec::Host => Ok(Arc::new(HostRuntime::new())),
        #[cfg(feature = "cuda")]
        DeviceSpec::Cuda { device_id } => Ok(Arc::new(crate::CudaRuntime::new(device_id)?)),
        #[cfg(not(feature = "cuda"))]
        DeviceSpec::Cuda { .. } => {
            InvalidDeviceSnafu { device: format!("{} (built without the `cuda` feature)", spec.canonicalize()) }.fail()
        }
    }
}
