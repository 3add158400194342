//! Scalar host kernel
//!
//! Evaluates `f32::sin` on the CPU and writes the results into an RGBA8 image
//! laid out like a GPU texture copy (rows padded to 256 bytes), then decodes
//! it through [`Bitplane::from_rgba8`]. The probe pipeline downstream of the
//! kernel is identical for both backends.

use tracing::debug;

use super::SinKernel;
use crate::codec::{encode_row, padded_bytes_per_row, Bitplane, BIT_WIDTH, RGBA8_TEXEL_BYTES};
use crate::error::{ProbeError, Result};

/// CPU `sin()` kernel
#[derive(Debug, Default, Clone, Copy)]
pub struct HostKernel;

impl HostKernel {
    /// Create a host kernel
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render `sin(input[r])` into padded RGBA8 rows
    fn render_rgba8(inputs: &[f32]) -> (usize, Vec<u8>) {
        let pitch = padded_bytes_per_row(BIT_WIDTH);
        let mut data = vec![0u8; pitch * inputs.len()];

        for (row, &x) in inputs.iter().enumerate() {
            let bits = x.sin().to_bits();
            for (column, intensity) in encode_row(bits).iter().enumerate() {
                let offset = row * pitch + column * RGBA8_TEXEL_BYTES;
                let level = (intensity * 255.0).round() as u8;
                data[offset..offset + RGBA8_TEXEL_BYTES].copy_from_slice(&[level, level, level, 255]);
            }
        }

        (pitch, data)
    }
}

impl SinKernel for HostKernel {
    fn name(&self) -> &str {
        "host"
    }

    fn runtime_info(&mut self) -> Result<String> {
        Ok(format!(
            "Platform={}-{}, API=host, Name=\"f32::sin\"",
            std::env::consts::OS,
            std::env::consts::ARCH
        ))
    }

    fn evaluate(&mut self, inputs: &[f32]) -> Result<Bitplane> {
        if inputs.is_empty() {
            return Err(ProbeError::InvalidInput(
                "cannot evaluate an empty battery".to_string(),
            ));
        }

        let (pitch, data) = Self::render_rgba8(inputs);
        debug!(rows = inputs.len(), pitch, "rendered host bitplane");
        Bitplane::from_rgba8(BIT_WIDTH, inputs.len(), pitch, &data)
    }
}
