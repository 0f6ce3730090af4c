//! Kernel launch arguments.

/// Opaque address of device memory.
///
/// Not dereferenceable on the host, except under [`HostRuntime`](crate::HostRuntime)
/// where device memory is host memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DevicePtr(u64);

impl DevicePtr {
    pub const NULL: Self = Self(0);

    pub const fn from_raw(address: u64) -> Self {
        Self(address)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }

    /// Address of host memory, for backends that execute on the host.
    pub fn from_host<T>(ptr: *const T) -> Self {
        Self(ptr as usize as u64)
    }

    pub fn from_host_mut<T>(ptr: *mut T) -> Self {
        Self(ptr as usize as u64)
    }
}

/// A single type-erased kernel argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelArg {
    /// Device address (operands, results, stride tables).
    Ptr(DevicePtr),
    /// `size_t` scalar.
    Size(u64),
}

impl KernelArg {
    pub fn size(value: usize) -> Self {
        Self::Size(value as u64)
    }

    pub const fn is_pointer(&self) -> bool {
        matches!(self, Self::Ptr(_))
    }

    /// Raw 64-bit value passed to the device.
    pub const fn raw(&self) -> u64 {
        match self {
            Self::Ptr(ptr) => ptr.as_raw(),
            Self::Size(value) => *value,
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Ptr(_) => "pointer",
            Self::Size(_) => "size",
        }
    }
}

impl From<DevicePtr> for KernelArg {
    fn from(ptr: DevicePtr) -> Self {
        Self::Ptr(ptr)
    }
}
