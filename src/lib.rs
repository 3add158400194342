//! sinprobe: GPU vendor fingerprinting from bit-exact `sin()` output
//!
//! Different GPU vendors implement `sin()` with different argument reduction
//! and subnormal handling, so the exact float32 bit pattern returned for a
//! few well-chosen inputs identifies the vendor. sinprobe runs a fixed
//! battery of 9 inputs through one compute dispatch, reads the results back
//! as a 32×9 one-bit-per-pixel bitplane, and matches each row against known
//! vendor signatures.
//!
//! # Pipeline
//!
//! 1. **Battery** - 9 fixed inputs (subnormals, signed zeros, `≈π`, `114514`)
//! 2. **Kernel** - `sin()` evaluated on the GPU (`wgpu`) or the host
//! 3. **Codec** - bitplane rows decoded back into exact bit patterns
//! 4. **Classifier** - per-row vendor match and ULP error, strict verdict
//! 5. **Report** - text table, JSON, bitplane preview
//!
//! # Quick Start
//!
//! ```rust
//! use sinprobe::{classify, ReferenceTable, Vendor};
//!
//! let table = ReferenceTable::builtin();
//! assert_eq!(classify(table, 0x3900_F990, 0x3900_CF88), Vendor::Nvidia);
//! assert_eq!(classify(table, 0x4049_0FF1, 0xB6B4_00B4), Vendor::Intel);
//! ```
//!
//! Running a whole probe on the CPU kernel:
//!
//! ```rust
//! use sinprobe::{probe, Backend, ProbeConfig};
//!
//! let config = ProbeConfig::default().with_backend(Backend::Host);
//! let report = probe::run(&config).unwrap();
//! assert_eq!(report.rows.len(), 9);
//! ```

pub mod backends;
pub mod battery;
pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod probe;
pub mod reference;
pub mod report;
pub mod ulp;

pub use backends::{HostKernel, SinKernel};
pub use classify::{aggregate, classify, classify_sample, ClassifiedRow, Sample, Verdict};
pub use codec::Bitplane;
pub use config::{PowerPreference, ProbeConfig};
pub use error::{ProbeError, Result};
pub use probe::{run_probe, ProbeReport};
pub use reference::{ReferenceEntry, ReferenceTable, Vendor};
pub use report::OutputFormat;

#[cfg(feature = "gpu")]
pub use backends::GpuKernel;

/// Kernel execution target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// GPU if one is available, host otherwise
    #[default]
    Auto,
    /// GPU compute (wgpu)
    Gpu,
    /// Scalar `f32::sin` on the CPU
    Host,
}

impl Backend {
    /// Select the best available backend for this machine
    ///
    /// Returns [`Backend::Gpu`] when the crate was built with the `gpu`
    /// feature and an adapter can be found, [`Backend::Host`] otherwise.
    pub fn select_best() -> Self {
        if gpu_available() {
            Backend::Gpu
        } else {
            Backend::Host
        }
    }
}

#[cfg(feature = "gpu")]
fn gpu_available() -> bool {
    GpuKernel::is_available()
}

#[cfg(not(feature = "gpu"))]
fn gpu_available() -> bool {
    false
}
