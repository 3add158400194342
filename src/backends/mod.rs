//! Kernels that evaluate `sin()` over the battery and return the bitplane
//!
//! - `host`: scalar `f32::sin` on the CPU, rendered through the same padded
//!   RGBA8 layout a GPU texture copy produces
//! - `gpu`: WGSL compute kernel via wgpu (feature `gpu`)
//!
//! Every kernel evaluates the whole battery in one call: one dispatch, one
//! readback. Callers never fan out per input.

pub mod gpu;
pub mod host;

pub use host::HostKernel;

#[cfg(feature = "gpu")]
pub use gpu::GpuKernel;

use tracing::{info, warn};

use crate::codec::Bitplane;
use crate::config::ProbeConfig;
use crate::error::Result;
#[cfg(not(feature = "gpu"))]
use crate::error::ProbeError;
use crate::Backend;

/// A kernel that computes `sin(input[r])` and writes its bit pattern to row `r`
pub trait SinKernel {
    /// Short kernel name for reports
    fn name(&self) -> &str;

    /// Opaque description of the execution environment
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be initialized.
    fn runtime_info(&mut self) -> Result<String>;

    /// Evaluate all inputs in one round trip
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty batch, or a device/readback error.
    fn evaluate(&mut self, inputs: &[f32]) -> Result<Bitplane>;
}

/// Build the kernel selected by `config`
///
/// # Errors
///
/// Returns `BackendUnavailable` when the GPU kernel is requested but the
/// crate was built without the `gpu` feature.
pub fn select_kernel(config: &ProbeConfig) -> Result<Box<dyn SinKernel>> {
    let backend = match config.backend {
        Backend::Auto => {
            let best = Backend::select_best();
            if best == Backend::Host {
                warn!("no GPU adapter available, falling back to host sin()");
            }
            best
        }
        explicit => explicit,
    };
    info!(?backend, "selected kernel backend");

    match backend {
        #[cfg(feature = "gpu")]
        Backend::Gpu | Backend::Auto => Ok(Box::new(GpuKernel::new(config.power))),
        #[cfg(not(feature = "gpu"))]
        Backend::Gpu | Backend::Auto => Err(ProbeError::BackendUnavailable(Backend::Gpu)),
        Backend::Host => Ok(Box::new(HostKernel::new())),
    }
}
