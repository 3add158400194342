//! Output formatters for probe reports
//!
//! Supports a fixed-width text table (terminal), JSON, and an ASCII preview
//! of the bitplane.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use crate::classify::ClassifiedRow;
use crate::codec::Bitplane;
use crate::config::ProbeConfig;
use crate::error::Result;
use crate::probe::ProbeReport;
use crate::reference::{format_hex, ReferenceTable, Vendor};

/// Report title
pub const TITLE: &str = "sin() bitplane probe (32x9, 1bit/px, RGBA8)";

const RULE_WIDTH: usize = 110;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Fixed-width text table for terminal
    #[default]
    Text,
    /// JSON output for tooling and CI
    Json,
}

/// Format a float with 9 significant digits, .NET "G9" style
///
/// Fixed notation is used when the decimal exponent lies in `[-4, 9)`,
/// scientific (`d.ddddddddE±XX`) otherwise. Trailing zeros are trimmed and
/// negative zero keeps its sign.
#[must_use]
pub fn format_g9(value: f32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // d.dddddddde±x with exactly 9 significant digits
    let scientific = format!("{:.8e}", f64::from(value));
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if !(-4..9).contains(&exponent) {
        let fraction = digits[1..].trim_end_matches('0');
        let point = if fraction.is_empty() { "" } else { "." };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{sign}{}{point}{fraction}E{exp_sign}{:02}",
            &digits[..1],
            exponent.unsigned_abs()
        );
    }

    if exponent >= 0 {
        let split = exponent as usize + 1;
        let fraction = digits[split..].trim_end_matches('0');
        if fraction.is_empty() {
            format!("{sign}{}", &digits[..split])
        } else {
            format!("{sign}{}.{fraction}", &digits[..split])
        }
    } else {
        let zeros = "0".repeat(exponent.unsigned_abs() as usize - 1);
        format!("{sign}0.{zeros}{}", digits.trim_end_matches('0'))
    }
}

fn vendor_tag(vendor: Vendor) -> ColoredString {
    match vendor {
        Vendor::Unknown => "".normal(),
        known => format!("[{known}]").cyan().bold(),
    }
}

fn verdict_label(vendor: Vendor) -> ColoredString {
    match vendor {
        Vendor::Unknown => "(unknown)".yellow(),
        known => known.name().green().bold(),
    }
}

fn format_row(row: &ClassifiedRow) -> String {
    let sample = &row.sample;
    format!(
        "{:<3} | {:>14} | {:>12} | {:>14} | {:>12} | {:>12} | {:>10}  {}",
        sample.index,
        format_g9(sample.input_value),
        format_hex(sample.input_bits),
        format_g9(sample.output_value()),
        format_hex(sample.output_bits),
        row.correct_bits.map(format_hex).unwrap_or_default(),
        row.ulp_distance.map(|d| d.to_string()).unwrap_or_default(),
        vendor_tag(row.vendor)
    )
}

/// Format a probe report as a fixed-width text table
#[must_use]
pub fn format_text(report: &ProbeReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", TITLE.white().bold()));
    output.push_str(&format!("Kernel={}, {}\n", report.kernel, report.runtime_info));
    output.push_str(&format!(
        "{:<3} | {:>14} | {:>12} | {:>14} | {:>12} | {:>12} | {:>10}\n",
        "idx", "in_dec", "in_hex", "sin_dec", "sin_hex", "correct_hex", "ulp_error"
    ));
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');

    for row in &report.rows {
        output.push_str(&format_row(row));
        output.push('\n');
    }

    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "Overall vendor guess: {}\n",
        verdict_label(report.verdict.overall)
    ));

    output
}

/// Render the bitplane as ASCII, last row on top and row 0 at the bottom
///
/// Column 0 (the least-significant bit) is leftmost.
#[must_use]
pub fn format_plane(plane: &Bitplane) -> String {
    let mut output = String::with_capacity((plane.width() + 4) * plane.height());
    for r in (0..plane.height()).rev() {
        output.push_str(&format!("{r:>2} "));
        output.extend((0..plane.width()).map(|c| if plane.bit(r, c) { '#' } else { '.' }));
        output.push('\n');
    }
    output
}

/// Format a single classification (no battery context)
#[must_use]
pub fn format_classification(row: &ClassifiedRow) -> String {
    let sample = &row.sample;
    let mut output = format!(
        "input  {} ({})\noutput {} ({})\n",
        format_hex(sample.input_bits),
        format_g9(sample.input_value),
        format_hex(sample.output_bits),
        format_g9(sample.output_value())
    );

    if !row.has_reference {
        output.push_str("no reference entry for this input\n");
        return output;
    }

    if let (Some(correct), Some(ulp)) = (row.correct_bits, row.ulp_distance) {
        output.push_str(&format!("correct {} ({} ulp)\n", format_hex(correct), ulp));
    }
    output.push_str(&format!("vendor {}\n", verdict_label(row.vendor)));
    output
}

/// Format the reference table as text
#[must_use]
pub fn format_reference_table(table: &ReferenceTable) -> String {
    let mut output = format!(
        "{:>12} | {:>12} | {:>12} | {:>12} | {:>12}\n",
        "in_hex", "amd", "intel", "nvidia", "correct_hex"
    );
    output.push_str(&"-".repeat(72));
    output.push('\n');
    for entry in table.entries() {
        let outputs = &entry.vendor_outputs;
        output.push_str(&format!(
            "{:>12} | {:>12} | {:>12} | {:>12} | {:>12}\n",
            format_hex(entry.input_bits),
            format_hex(outputs.amd),
            format_hex(outputs.intel),
            format_hex(outputs.nvidia),
            entry.correct_bits.map(format_hex).unwrap_or_default()
        ));
    }
    output
}

/// Format a probe report as JSON
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn format_json(report: &ProbeReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Turn ANSI colors off, or restore terminal/env detection
pub fn apply_color(color: bool) {
    if color {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

/// Write report to stdout using the format, preview and color of `config`
///
/// # Errors
///
/// Returns `Io` if writing to stdout fails or `Json` if serialization fails.
pub fn write_report(report: &ProbeReport, config: &ProbeConfig) -> Result<()> {
    apply_color(config.color);
    let mut stdout = io::stdout().lock();

    match config.format {
        OutputFormat::Text => {
            if config.show_plane {
                write!(stdout, "{}", format_plane(&report.plane))?;
            }
            write!(stdout, "{}", format_text(report))?;
        }
        OutputFormat::Json => {
            writeln!(stdout, "{}", format_json(report)?)?;
        }
    }

    Ok(())
}
