//! Runtime configuration.
//!
//! Typed configuration with bon builders and environment variable fallbacks.

use bon::bon;
use spindle_device::DeviceSpec;

/// How element counts map onto launch geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchPolicy {
    /// One single-thread block per element: `grid = count`, `block = 1`.
    #[default]
    ThreadPerBlock,

    /// `ceil(count / block_size)` blocks of `block_size` threads.
    ///
    /// Kernels guard on the element count, so the tail block may be partial.
    Blocked {
        /// Threads per block.
        block_size: u32,
    },
}

impl LaunchPolicy {
    /// Policy for a requested block size; zero selects [`Self::ThreadPerBlock`].
    pub fn from_block_size(block_size: u32) -> Self {
        match block_size {
            0 => Self::ThreadPerBlock,
            block_size => Self::Blocked { block_size },
        }
    }

    /// Get launch policy from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `SPINDLE_BLOCK_SIZE=N` - Blocked geometry with N threads per block
    pub fn from_env() -> Self {
        std::env::var("SPINDLE_BLOCK_SIZE")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .map(Self::from_block_size)
            .unwrap_or_default()
    }

    /// Threads per block under this policy.
    pub fn block_size(&self) -> u32 {
        match self {
            Self::ThreadPerBlock => 1,
            Self::Blocked { block_size } => *block_size,
        }
    }
}

/// Configuration of a runtime session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Device the session opens when constructed from configuration.
    pub device: DeviceSpec,
    /// Launch geometry policy.
    pub launch_policy: LaunchPolicy,
    /// Log every rendered kernel source at `trace` level.
    pub dump_source: bool,
}

#[bon]
impl RuntimeConfig {
    /// Create a runtime configuration with builder pattern.
    #[builder]
    pub fn builder(
        #[builder(default)] device: DeviceSpec,
        #[builder(default)] launch_policy: LaunchPolicy,
        #[builder(default = false)] dump_source: bool,
    ) -> Self {
        Self { device, launch_policy, dump_source }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `SPINDLE_DEVICE` - Device spec such as `HOST` or `CUDA:1` (default: `HOST`)
    /// * `SPINDLE_BLOCK_SIZE` - Threads per block, 0 for one thread per block (default: 0)
    /// * `SPINDLE_DUMP_SOURCE` - Log rendered kernel sources if set
    ///
    /// An unparsable `SPINDLE_DEVICE` falls back to the host device.
    pub fn from_env() -> Self {
        let device = std::env::var("SPINDLE_DEVICE").ok().and_then(|s| DeviceSpec::parse(&s).ok()).unwrap_or_default();
        let launch_policy = LaunchPolicy::from_env();
        let dump_source = std::env::var("SPINDLE_DUMP_SOURCE").is_ok();

        Self { device, launch_policy, dump_source }
    }
}
