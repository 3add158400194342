//! One probe run: battery → kernel → decode → classify → verdict
//!
//! The whole battery goes through the kernel in a single `evaluate` call.
//! A plane of the wrong shape fails the run; there is no partial result and
//! no retry.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::backends::{select_kernel, SinKernel};
use crate::battery::{battery, BATTERY_LEN};
use crate::classify::{aggregate, classify_sample, ClassifiedRow, Sample, Verdict};
use crate::codec::{Bitplane, BIT_WIDTH};
use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::reference::{format_hex, ReferenceTable};

/// Everything one probe run produced
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// Kernel that evaluated `sin()`
    pub kernel: String,
    /// Opaque execution environment description
    pub runtime_info: String,
    /// One classified row per battery input
    pub rows: Vec<ClassifiedRow>,
    /// Overall vendor guess
    pub verdict: Verdict,
    /// Decoded bitplane, for preview
    #[serde(skip)]
    pub plane: Bitplane,
}

/// Run the battery through `kernel` and classify against `table`
///
/// # Errors
///
/// Returns the kernel's error, or `PlaneShape` if the readback is not
/// 32 columns by one row per input.
#[instrument(skip_all, fields(kernel = %kernel.name()))]
pub fn run_probe<K: SinKernel + ?Sized>(kernel: &mut K, table: &ReferenceTable) -> Result<ProbeReport> {
    let inputs = battery();
    let values = inputs.map(|input| input.value);

    let runtime_info = kernel.runtime_info()?;
    info!(%runtime_info, "probing sin()");

    let plane = kernel.evaluate(&values)?;
    if plane.width() != BIT_WIDTH || plane.height() != BATTERY_LEN {
        return Err(ProbeError::PlaneShape {
            expected_width: BIT_WIDTH,
            expected_height: BATTERY_LEN,
            width: plane.width(),
            height: plane.height(),
        });
    }

    let outputs = plane.decode_rows()?;
    let rows: Vec<ClassifiedRow> = inputs
        .iter()
        .zip(outputs)
        .map(|(input, output_bits)| {
            let row = classify_sample(
                table,
                Sample {
                    index: input.index,
                    input_value: input.value,
                    input_bits: input.bits,
                    output_bits,
                },
            );
            debug!(
                index = input.index,
                input = %format_hex(input.bits),
                output = %format_hex(output_bits),
                vendor = %row.vendor,
                "row decoded"
            );
            row
        })
        .collect();

    let verdict = aggregate(&rows);
    info!(overall = %verdict.overall, considered = verdict.considered, "probe verdict");

    Ok(ProbeReport {
        kernel: kernel.name().to_string(),
        runtime_info,
        rows,
        verdict,
        plane,
    })
}

/// Select a kernel from `config` and probe it with the built-in table
///
/// # Errors
///
/// Returns an error if the kernel cannot be built or the run fails.
pub fn run(config: &ProbeConfig) -> Result<ProbeReport> {
    let mut kernel = select_kernel(config)?;
    run_probe(kernel.as_mut(), ReferenceTable::builtin())
}
