//! End-to-end probe scenarios
//!
//! A scripted kernel replays known vendor signatures through the full
//! pipeline: 8-bit RGBA readback, bitplane decode, classification and
//! verdict. The host kernel and (when present) the GPU kernel are exercised
//! through the same entry point.
//!
//! # Running
//! ```bash
//! cargo test --test probe_e2e -- --nocapture
//! ```

use sinprobe::battery::battery;
use sinprobe::codec::{encode_row, padded_bytes_per_row, BIT_WIDTH, RGBA8_TEXEL_BYTES};
use sinprobe::{
    run_probe, Bitplane, HostKernel, ProbeReport, ReferenceTable, Result, SinKernel, Vendor,
};

/// Replays fixed outputs through an 8-bit RGBA readback
struct ScriptedKernel {
    outputs: Vec<u32>,
}

impl ScriptedKernel {
    fn vendor_column(vendor: Vendor) -> Self {
        let table = ReferenceTable::builtin();
        let outputs = battery()
            .iter()
            .map(|input| {
                table
                    .lookup(input.bits)
                    .and_then(|entry| entry.vendor_outputs.get(vendor))
                    .expect("battery input without reference")
            })
            .collect();
        Self { outputs }
    }
}

impl SinKernel for ScriptedKernel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn runtime_info(&mut self) -> Result<String> {
        Ok("Platform=test, API=scripted".to_string())
    }

    fn evaluate(&mut self, _inputs: &[f32]) -> Result<Bitplane> {
        let pitch = padded_bytes_per_row(BIT_WIDTH);
        let mut data = vec![0u8; pitch * self.outputs.len()];
        for (row, &bits) in self.outputs.iter().enumerate() {
            for (column, intensity) in encode_row(bits).iter().enumerate() {
                let offset = row * pitch + column * RGBA8_TEXEL_BYTES;
                data[offset] = (intensity * 255.0) as u8;
                data[offset + 3] = 255;
            }
        }
        Bitplane::from_rgba8(BIT_WIDTH, self.outputs.len(), pitch, &data)
    }
}

fn probe(kernel: &mut ScriptedKernel) -> ProbeReport {
    run_probe(kernel, ReferenceTable::builtin()).expect("probe failed")
}

#[test]
fn e2e_amd_signatures_give_amd() {
    let report = probe(&mut ScriptedKernel::vendor_column(Vendor::Amd));
    assert_eq!(report.verdict.overall, Vendor::Amd);
    assert_eq!(report.verdict.considered, 9);
}

#[test]
fn e2e_intel_signatures_give_intel() {
    let report = probe(&mut ScriptedKernel::vendor_column(Vendor::Intel));
    assert_eq!(report.verdict.overall, Vendor::Intel);
}

#[test]
fn e2e_nvidia_signatures_give_nvidia() {
    let report = probe(&mut ScriptedKernel::vendor_column(Vendor::Nvidia));
    assert_eq!(report.verdict.overall, Vendor::Nvidia);
    assert_eq!(report.rows[5].vendor, Vendor::Nvidia);
}

#[test]
fn e2e_mixed_amd_intel_is_unknown() {
    let mut kernel = ScriptedKernel::vendor_column(Vendor::Amd);
    // sin(π) row answers like Intel
    kernel.outputs[6] = 0xB6B4_00B4;
    let report = probe(&mut kernel);
    assert_eq!(report.rows[5].vendor, Vendor::Amd);
    assert_eq!(report.rows[6].vendor, Vendor::Intel);
    assert_eq!(report.verdict.overall, Vendor::Unknown);
}

#[test]
fn e2e_unmatched_row_is_unknown() {
    let mut kernel = ScriptedKernel::vendor_column(Vendor::Nvidia);
    // correctly rounded sin(114514) matches no vendor
    kernel.outputs[8] = 0x3E45_3A34;
    let report = probe(&mut kernel);
    assert_eq!(report.rows[8].vendor, Vendor::Unknown);
    assert_eq!(report.rows[8].ulp_distance, Some(0));
    assert_eq!(report.verdict.overall, Vendor::Unknown);
}

#[test]
fn e2e_sin_pi_ulp_error() {
    let report = probe(&mut ScriptedKernel::vendor_column(Vendor::Amd));
    let row = &report.rows[6];
    assert_eq!(row.sample.input_bits, 0x4049_0FF1);
    assert_eq!(row.sample.output_bits, 0xB6AF_EDE4);
    assert_eq!(row.correct_bits, Some(0xB6B2_EEF5));
    assert_eq!(row.ulp_distance, Some(196_881));
}

#[test]
fn e2e_subnormal_flush_ulp_error() {
    let report = probe(&mut ScriptedKernel::vendor_column(Vendor::Intel));
    // Intel flushes the subnormal input: sin(0x00000100) = 0
    assert_eq!(report.rows[0].sample.output_bits, 0);
    assert_eq!(report.rows[0].ulp_distance, Some(256));
}

#[test]
fn e2e_host_kernel_report() {
    let mut kernel = HostKernel::new();
    let report = run_probe(&mut kernel, ReferenceTable::builtin()).expect("host probe failed");
    assert_eq!(report.rows.len(), 9);
    for row in &report.rows {
        assert_eq!(
            row.sample.output_bits,
            row.sample.input_value.sin().to_bits(),
            "row {} decoded wrong",
            row.sample.index
        );
        assert!(row.ulp_distance.is_some());
    }
    // sin(±0) is exact on any libm
    assert_eq!(report.rows[3].ulp_distance, Some(0));
    assert_eq!(report.rows[4].ulp_distance, Some(0));
}

#[cfg(feature = "gpu")]
#[test]
fn e2e_gpu_kernel_report() {
    use sinprobe::{GpuKernel, PowerPreference};

    if !GpuKernel::is_available() {
        eprintln!("GPU not available, skipping GPU e2e test");
        return;
    }

    let mut kernel = GpuKernel::new(PowerPreference::HighPerformance);
    let report = run_probe(&mut kernel, ReferenceTable::builtin()).expect("GPU probe failed");
    assert_eq!(report.rows.len(), 9);
    assert_eq!(report.kernel, "wgpu");
    assert!(report.runtime_info.contains("API="));
    eprintln!(
        "GPU verdict: {} ({})",
        report.verdict.overall, report.runtime_info
    );
}
