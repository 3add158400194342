//! The fixed 9-value input battery
//!
//! Order is part of the kernel contract: five inputs given as raw bit
//! patterns, then four given as decimal literals.

use serde::Serialize;

/// Number of inputs in the battery (and rows in the bitplane)
pub const BATTERY_LEN: usize = 9;

const RAW_PATTERNS: [u32; 5] = [0x0000_0100, 0x007F_FFFF, 0x807F_FFFF, 0x8000_0000, 0x0000_0000];

#[allow(clippy::excessive_precision)]
const DECIMALS: [f32; 4] = [
    0.000_123_000_005_260_109_9,
    3.141_597_986_221_313_5,
    -2.339_999_914_169_311_5,
    114_514.0,
];

/// One battery input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryInput {
    /// Position in the battery (bitplane row)
    pub index: usize,
    /// Input value
    pub value: f32,
    /// Bit pattern of `value`
    pub bits: u32,
}

/// The battery in kernel order
#[must_use]
pub fn battery() -> [BatteryInput; BATTERY_LEN] {
    let mut inputs = [BatteryInput {
        index: 0,
        value: 0.0,
        bits: 0,
    }; BATTERY_LEN];

    let values = RAW_PATTERNS
        .iter()
        .map(|&bits| f32::from_bits(bits))
        .chain(DECIMALS.iter().copied());

    for (index, (slot, value)) in inputs.iter_mut().zip(values).enumerate() {
        *slot = BatteryInput {
            index,
            value,
            bits: value.to_bits(),
        };
    }
    inputs
}

/// Input values in kernel order
#[must_use]
pub fn battery_values() -> [f32; BATTERY_LEN] {
    battery().map(|input| input.value)
}
