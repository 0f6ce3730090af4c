//! Launch geometry planning.

use snafu::ensure;
use spindle_device::{Dim3, LaunchDescriptor, Stream};
use tracing::trace;

use crate::error::*;
use crate::LaunchPolicy;

/// Largest grid extent along x accepted by CUDA devices.
pub const MAX_GRID_X: u64 = (1 << 31) - 1;

/// Turns element counts into launch descriptors.
///
/// Every template launches one logical thread per output element (pooling
/// included, whose windows are launch arguments), so geometry depends only on
/// the element count and the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchPlanner {
    policy: LaunchPolicy,
}

impl LaunchPlanner {
    pub fn new(policy: LaunchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LaunchPolicy {
        self.policy
    }

    /// Plan a launch covering `count` elements.
    ///
    /// Returns `None` for an empty launch.
    pub fn plan(&self, count: usize) -> Result<Option<LaunchDescriptor>> {
        if count == 0 {
            return Ok(None);
        }

        let block_size = u64::from(self.policy.block_size().max(1));
        let blocks = (count as u64).div_ceil(block_size);
        ensure!(blocks <= MAX_GRID_X, GridOverflowSnafu { count, max: MAX_GRID_X });

        let launch = LaunchDescriptor {
            grid: Dim3::linear(blocks as u32),
            block: Dim3::linear(block_size as u32),
            shared_mem_bytes: 0,
            stream: Stream::Null,
        };
        trace!(count, grid = blocks, block = block_size, "planned launch");
        Ok(Some(launch))
    }
}
