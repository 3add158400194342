//! Bitplane codec: one float32 bit pattern per image row, one bit per column
//!
//! A kernel writes bit `i` of its 32-bit result as the intensity of column `i`
//! (least-significant bit first). Intensities are exactly 0.0 or 1.0 when
//! written, but the image may pass through 8-bit normalized storage before it
//! is read back. Decoding thresholds every column at 0.5, so quantization to
//! `0/255` and `255/255` never flips a bit.
//!
//! The codec assumes point-exact texel access. Any filtering that blends
//! neighbouring columns corrupts the pattern and cannot be detected here.
//!
//! # Example
//!
//! ```rust
//! use sinprobe::codec::{decode_row, encode_row};
//!
//! let row = encode_row(0x3900_F990);
//! assert_eq!(decode_row(&row).unwrap(), 0x3900_F990);
//! ```

use crate::error::{ProbeError, Result};

/// Columns per bitplane row (one per bit of a float32)
pub const BIT_WIDTH: usize = 32;

/// Intensity above which a column counts as a set bit
pub const THRESHOLD: f32 = 0.5;

/// Bytes per texel in RGBA8 readback
pub const RGBA8_TEXEL_BYTES: usize = 4;

/// Row pitch alignment of texture-to-buffer copies
pub const COPY_ROW_ALIGNMENT: usize = 256;

/// Padded row pitch of an RGBA8 copy `width` texels wide
#[must_use]
pub const fn padded_bytes_per_row(width: usize) -> usize {
    (width * RGBA8_TEXEL_BYTES).div_ceil(COPY_ROW_ALIGNMENT) * COPY_ROW_ALIGNMENT
}

/// Encode a 32-bit pattern as 32 binary intensities, LSB in column 0
#[must_use]
pub fn encode_row(bits: u32) -> [f32; BIT_WIDTH] {
    let mut row = [0.0f32; BIT_WIDTH];
    for (column, intensity) in row.iter_mut().enumerate() {
        if (bits >> column) & 1 == 1 {
            *intensity = 1.0;
        }
    }
    row
}

/// Decode a row of intensities back into the exact 32-bit pattern
///
/// # Errors
///
/// Returns `InvalidInput` if the row is not exactly [`BIT_WIDTH`] wide.
pub fn decode_row(row: &[f32]) -> Result<u32> {
    if row.len() != BIT_WIDTH {
        return Err(ProbeError::InvalidInput(format!(
            "bitplane row must have {} columns, got {}",
            BIT_WIDTH,
            row.len()
        )));
    }

    Ok(row
        .iter()
        .enumerate()
        .filter(|&(_, &intensity)| intensity > THRESHOLD)
        .fold(0u32, |bits, (column, _)| bits | (1u32 << column)))
}

/// Single-channel image carrying one 32-bit pattern per row
///
/// Row `r` holds the result for input `r`. Storage is row-major with the
/// first row at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitplane {
    width: usize,
    height: usize,
    intensities: Vec<f32>,
}

impl Bitplane {
    /// Build a plane with an exact 0/1 writer, one row per value
    #[must_use]
    pub fn from_bits(values: &[u32]) -> Self {
        let mut intensities = Vec::with_capacity(values.len() * BIT_WIDTH);
        for &bits in values {
            intensities.extend_from_slice(&encode_row(bits));
        }
        Self {
            width: BIT_WIDTH,
            height: values.len(),
            intensities,
        }
    }

    /// Build a plane from raw intensities in row-major order
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `intensities.len() != width * height`.
    pub fn from_intensities(width: usize, height: usize, intensities: Vec<f32>) -> Result<Self> {
        if intensities.len() != width * height {
            return Err(ProbeError::InvalidInput(format!(
                "expected {} intensities for a {}x{} plane, got {}",
                width * height,
                width,
                height,
                intensities.len()
            )));
        }
        Ok(Self {
            width,
            height,
            intensities,
        })
    }

    /// Build a plane from the red channel of padded RGBA8 readback
    ///
    /// `bytes_per_row` is the padded row pitch of the copy (a multiple of
    /// 256 for GPU texture copies). Each red byte is normalized to `byte / 255`.
    ///
    /// # Errors
    ///
    /// Returns `Readback` if the pitch is narrower than a row of texels, the
    /// buffer is too short for `height` rows, or the dimensions overflow.
    pub fn from_rgba8(width: usize, height: usize, bytes_per_row: usize, data: &[u8]) -> Result<Self> {
        let row_bytes = width.checked_mul(RGBA8_TEXEL_BYTES).ok_or_else(|| {
            ProbeError::Readback(format!("row of {} texels overflows the address space", width))
        })?;
        if bytes_per_row < row_bytes {
            return Err(ProbeError::Readback(format!(
                "row pitch {} is narrower than {} texels",
                bytes_per_row, width
            )));
        }
        if height > 0 {
            let required = (height - 1)
                .checked_mul(bytes_per_row)
                .and_then(|bytes| bytes.checked_add(row_bytes))
                .ok_or_else(|| {
                    ProbeError::Readback(format!(
                        "{} rows of pitch {} overflow the address space",
                        height, bytes_per_row
                    ))
                })?;
            if data.len() < required {
                return Err(ProbeError::Readback(format!(
                    "readback holds {} bytes, too short for {} rows of pitch {}",
                    data.len(),
                    height,
                    bytes_per_row
                )));
            }
        }

        let mut intensities = Vec::with_capacity(width * height);
        for row in 0..height {
            let start = row * bytes_per_row;
            let texels = &data[start..start + row_bytes];
            intensities.extend(
                texels
                    .chunks_exact(RGBA8_TEXEL_BYTES)
                    .map(|texel| f32::from(texel[0]) / 255.0),
            );
        }

        Ok(Self {
            width,
            height,
            intensities,
        })
    }

    /// Width in columns
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in rows
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Intensities of row `r`, or `None` past the last row
    #[must_use]
    pub fn row(&self, r: usize) -> Option<&[f32]> {
        if r >= self.height {
            return None;
        }
        let start = r * self.width;
        Some(&self.intensities[start..start + self.width])
    }

    /// Whether the column at (`r`, `c`) reads as a set bit
    #[must_use]
    pub fn bit(&self, r: usize, c: usize) -> bool {
        self.row(r)
            .and_then(|row| row.get(c))
            .is_some_and(|&intensity| intensity > THRESHOLD)
    }

    /// Decode every row into its 32-bit pattern
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the plane is not [`BIT_WIDTH`] columns wide.
    pub fn decode_rows(&self) -> Result<Vec<u32>> {
        (0..self.height)
            .map(|r| decode_row(&self.intensities[r * self.width..(r + 1) * self.width]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lsb_first() {
        let row = encode_row(0b101);
        assert_eq!(row[0], 1.0);
        assert_eq!(row[1], 0.0);
        assert_eq!(row[2], 1.0);
        assert!(row[3..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_encode_sign_bit_in_last_column() {
        let row = encode_row(0x8000_0000);
        assert_eq!(row[31], 1.0);
        assert!(row[..31].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_decode_threshold_is_strict() {
        let mut row = [0.0f32; BIT_WIDTH];
        row[0] = 0.5;
        row[1] = 0.51;
        assert_eq!(decode_row(&row).unwrap(), 0b10);
    }

    #[test]
    fn test_decode_tolerates_quantization() {
        let mut row = encode_row(0xB6AF_EDE4);
        for v in &mut row {
            *v = if *v > 0.0 { 254.0 / 255.0 } else { 1.0 / 255.0 };
        }
        assert_eq!(decode_row(&row).unwrap(), 0xB6AF_EDE4);
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        let result = decode_row(&[1.0; 31]);
        assert!(matches!(result, Err(ProbeError::InvalidInput(_))));
    }

    #[test]
    fn test_padded_bytes_per_row() {
        assert_eq!(padded_bytes_per_row(BIT_WIDTH), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
    }

    #[test]
    fn test_from_bits_dimensions() {
        let plane = Bitplane::from_bits(&[1, 2, 3]);
        assert_eq!(plane.width(), BIT_WIDTH);
        assert_eq!(plane.height(), 3);
        assert_eq!(plane.decode_rows().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_row_out_of_range() {
        let plane = Bitplane::from_bits(&[0xFFFF_FFFF]);
        assert!(plane.row(1).is_none());
        assert!(!plane.bit(1, 0));
        assert!(plane.bit(0, 31));
    }

    #[test]
    fn test_from_rgba8_padded_rows() {
        let values = [0x0000_0100u32, 0x807F_FFFF];
        let pitch = 256;
        let mut data = vec![0u8; pitch * values.len()];
        for (r, &bits) in values.iter().enumerate() {
            for c in 0..BIT_WIDTH {
                if (bits >> c) & 1 == 1 {
                    let offset = r * pitch + c * RGBA8_TEXEL_BYTES;
                    data[offset] = 255;
                    data[offset + 3] = 255;
                }
            }
        }

        let plane = Bitplane::from_rgba8(BIT_WIDTH, values.len(), pitch, &data).unwrap();
        assert_eq!(plane.decode_rows().unwrap(), values.to_vec());
    }

    #[test]
    fn test_from_rgba8_ignores_other_channels() {
        let data = vec![0u8, 255, 255, 255].repeat(BIT_WIDTH);
        let plane = Bitplane::from_rgba8(BIT_WIDTH, 1, BIT_WIDTH * 4, &data).unwrap();
        assert_eq!(plane.decode_rows().unwrap(), vec![0]);
    }

    #[test]
    fn test_from_rgba8_short_buffer() {
        let data = vec![0u8; 256 + 64];
        let result = Bitplane::from_rgba8(BIT_WIDTH, 2, 256, &data);
        assert!(matches!(result, Err(ProbeError::Readback(_))));
    }

    #[test]
    fn test_from_rgba8_oversized_dimensions() {
        let data = vec![0u8; 1024];
        let result = Bitplane::from_rgba8(BIT_WIDTH, usize::MAX, 256, &data);
        assert!(matches!(result, Err(ProbeError::Readback(_))));
        let result = Bitplane::from_rgba8(BIT_WIDTH, 3, usize::MAX / 2, &data);
        assert!(matches!(result, Err(ProbeError::Readback(_))));
        let result = Bitplane::from_rgba8(usize::MAX, 1, 256, &data);
        assert!(matches!(result, Err(ProbeError::Readback(_))));
    }

    #[test]
    fn test_from_rgba8_narrow_pitch() {
        let data = vec![0u8; 1024];
        let result = Bitplane::from_rgba8(BIT_WIDTH, 1, 64, &data);
        assert!(matches!(result, Err(ProbeError::Readback(_))));
    }

    #[test]
    fn test_from_intensities_length_check() {
        assert!(Bitplane::from_intensities(32, 2, vec![0.0; 64]).is_ok());
        assert!(Bitplane::from_intensities(32, 2, vec![0.0; 63]).is_err());
    }

    #[test]
    fn test_decode_rows_rejects_narrow_plane() {
        let plane = Bitplane::from_intensities(16, 1, vec![0.0; 16]).unwrap();
        assert!(plane.decode_rows().is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn test_row_round_trip(bits in any::<u32>()) {
            prop_assert_eq!(decode_row(&encode_row(bits)).unwrap(), bits);
        }

        #[test]
        fn test_rgba8_round_trip(values in prop::collection::vec(any::<u32>(), 1..16)) {
            let pitch = 256;
            let mut data = vec![0u8; pitch * values.len()];
            for (r, &bits) in values.iter().enumerate() {
                for (c, intensity) in encode_row(bits).iter().enumerate() {
                    data[r * pitch + c * RGBA8_TEXEL_BYTES] = (intensity * 255.0).round() as u8;
                }
            }
            let plane = Bitplane::from_rgba8(BIT_WIDTH, values.len(), pitch, &data).unwrap();
            prop_assert_eq!(plane.decode_rows().unwrap(), values);
        }
    }
}
