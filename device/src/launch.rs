//! Launch geometry.

/// Three-dimensional extent of a grid or a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dim3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dim3 {
    pub const ONE: Self = Self { x: 1, y: 1, z: 1 };

    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// One-dimensional extent `(x, 1, 1)`.
    pub const fn linear(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    pub const fn volume(&self) -> u64 {
        self.x as u64 * self.y as u64 * self.z as u64
    }
}

impl From<Dim3> for (u32, u32, u32) {
    fn from(dim: Dim3) -> Self {
        (dim.x, dim.y, dim.z)
    }
}

/// Execution stream a launch is issued on.
///
/// Launches are always followed by a device-wide synchronization, so only the
/// device's default stream is modelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Stream {
    /// The device's default (null) stream.
    #[default]
    Null,
}

/// How a kernel is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchDescriptor {
    pub grid: Dim3,
    pub block: Dim3,
    pub shared_mem_bytes: u32,
    pub stream: Stream,
}

impl LaunchDescriptor {
    /// Total number of threads launched.
    pub const fn threads(&self) -> u64 {
        self.grid.volume() * self.block.volume()
    }
}
