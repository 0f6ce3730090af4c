//! Native device status codes.

/// Status reported by a device launch or synchronization.
///
/// Codes follow the CUDA driver's `CUresult` numbering so that statuses coming
/// from real hardware and from the host reference runtime read the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceStatus(i32);

impl DeviceStatus {
    pub const SUCCESS: Self = Self(0);
    pub const INVALID_VALUE: Self = Self(1);
    pub const INVALID_HANDLE: Self = Self(400);
    pub const LAUNCH_OUT_OF_RESOURCES: Self = Self(701);
    pub const LAUNCH_FAILED: Self = Self(719);
    pub const NOT_SUPPORTED: Self = Self(801);

    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Symbolic name, or `"UNKNOWN"` for codes without one.
    pub fn name(self) -> &'static str {
        match self {
            Self::SUCCESS => "SUCCESS",
            Self::INVALID_VALUE => "INVALID_VALUE",
            Self::INVALID_HANDLE => "INVALID_HANDLE",
            Self::LAUNCH_OUT_OF_RESOURCES => "LAUNCH_OUT_OF_RESOURCES",
            Self::LAUNCH_FAILED => "LAUNCH_FAILED",
            Self::NOT_SUPPORTED => "NOT_SUPPORTED",
            _ => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}
