//! Per-row vendor classification and whole-battery verdict
//!
//! A row is classified by exact comparison against the reference table,
//! scanning vendors in the fixed order NVIDIA, Intel, AMD. The verdict is
//! strict: every row that has a reference entry must match, and one vendor
//! must match in all of them. There is no majority vote.

use serde::Serialize;

use crate::reference::{ReferenceTable, Vendor};
use crate::ulp;

/// Scan order used when several vendors share a signature
pub const PRIORITY: [Vendor; 3] = [Vendor::Nvidia, Vendor::Intel, Vendor::Amd];

/// One decoded kernel result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Battery position
    pub index: usize,
    /// Input value
    pub input_value: f32,
    /// Input bit pattern
    pub input_bits: u32,
    /// Bit pattern read back from the kernel
    pub output_bits: u32,
}

impl Sample {
    /// Decoded output as a float
    #[must_use]
    pub fn output_value(&self) -> f32 {
        f32::from_bits(self.output_bits)
    }
}

/// A sample with its vendor guess and error against the correct result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRow {
    /// The decoded sample
    pub sample: Sample,
    /// First matching vendor in [`PRIORITY`] order
    pub vendor: Vendor,
    /// Every vendor whose signature matched, in [`PRIORITY`] order
    pub candidates: Vec<Vendor>,
    /// Whether the input has a reference entry
    pub has_reference: bool,
    /// Correctly rounded result, when known
    pub correct_bits: Option<u32>,
    /// ULP distance between output and correct result
    pub ulp_distance: Option<u32>,
}

/// Overall vendor guess for a probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Agreed vendor, or [`Vendor::Unknown`]
    pub overall: Vendor,
    /// Rows that had a reference entry
    pub considered: usize,
}

/// Every vendor whose signature for `input_bits` equals `output_bits`
#[must_use]
pub fn matching_vendors(table: &ReferenceTable, input_bits: u32, output_bits: u32) -> Vec<Vendor> {
    table.lookup(input_bits).map_or_else(Vec::new, |entry| {
        PRIORITY
            .iter()
            .copied()
            .filter(|&vendor| entry.vendor_outputs.get(vendor) == Some(output_bits))
            .collect()
    })
}

/// Vendor guess for one input/output pair
#[must_use]
pub fn classify(table: &ReferenceTable, input_bits: u32, output_bits: u32) -> Vendor {
    table
        .lookup(input_bits)
        .and_then(|entry| {
            PRIORITY
                .iter()
                .copied()
                .find(|&vendor| entry.vendor_outputs.get(vendor) == Some(output_bits))
        })
        .unwrap_or(Vendor::Unknown)
}

/// Classify a sample and measure it against the correct result
#[must_use]
pub fn classify_sample(table: &ReferenceTable, sample: Sample) -> ClassifiedRow {
    let entry = table.lookup(sample.input_bits);
    let candidates = matching_vendors(table, sample.input_bits, sample.output_bits);
    let correct_bits = entry.and_then(|e| e.correct_bits);

    ClassifiedRow {
        sample,
        vendor: candidates.first().copied().unwrap_or(Vendor::Unknown),
        candidates,
        has_reference: entry.is_some(),
        correct_bits,
        ulp_distance: correct_bits.map(|correct| ulp::distance(sample.output_bits, correct)),
    }
}

/// Combine classified rows into one verdict
///
/// Only rows with a reference entry are considered. The verdict is the
/// first vendor in [`PRIORITY`] order that matched every considered row.
/// It is [`Vendor::Unknown`] when no row was considered, when a considered
/// row matched nothing, or when no vendor is common to all of them.
#[must_use]
pub fn aggregate(rows: &[ClassifiedRow]) -> Verdict {
    let considered: Vec<&ClassifiedRow> = rows.iter().filter(|row| row.has_reference).collect();

    let overall = if considered.is_empty() || considered.iter().any(|row| row.candidates.is_empty()) {
        Vendor::Unknown
    } else {
        PRIORITY
            .iter()
            .copied()
            .find(|vendor| considered.iter().all(|row| row.candidates.contains(vendor)))
            .unwrap_or(Vendor::Unknown)
    };

    Verdict {
        overall,
        considered: considered.len(),
    }
}
