use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Kernel source was rejected by the device compiler.
    #[snafu(display("compilation of '{kernel}' failed: {reason}"))]
    Compile { kernel: String, reason: String },

    /// Element type the backend cannot execute.
    #[snafu(display("unsupported element type '{name}'"))]
    UnsupportedType { name: String },

    /// Invalid device specification.
    #[snafu(display("invalid device: {device}"))]
    InvalidDevice { device: String },

    #[cfg(feature = "cuda")]
    /// CUDA-specific errors.
    #[snafu(display("CUDA error: {source}"))]
    CudaError { source: cudarc::driver::DriverError },
}
