//! sinprobe CLI
//!
//! Fingerprints the GPU vendor/driver from the bit-exact output of `sin()`.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use sinprobe::reference::parse_hex_bits;
use sinprobe::report::{self, format_classification, format_reference_table};
use sinprobe::{
    classify_sample, probe, ulp, Backend, OutputFormat, PowerPreference, ProbeConfig, ReferenceTable,
    Sample,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sinprobe")]
#[command(author, version, about = "GPU vendor fingerprinting from bit-exact sin() output")]
#[command(long_about = "
Runs a fixed battery of 9 float32 inputs through the GPU's sin(), reads
the results back as a 32x9 one-bit-per-pixel bitplane, and matches every
result against known AMD, Intel and NVIDIA signatures.

Set RUST_LOG=debug to trace adapter selection and per-row decoding.
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    /// GPU if available, host otherwise
    Auto,
    /// wgpu compute kernel
    Gpu,
    /// CPU f32::sin
    Host,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => Backend::Auto,
            BackendArg::Gpu => Backend::Gpu,
            BackendArg::Host => Backend::Host,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sin() battery and guess the vendor (default)
    Probe {
        /// Kernel backend
        #[arg(short, long, value_enum, default_value = "auto")]
        backend: BackendArg,

        /// Prefer the low-power (integrated) adapter
        #[arg(long)]
        low_power: bool,

        /// Print the decoded bitplane before the table
        #[arg(long)]
        show_plane: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify one input/output bit pattern pair
    Classify {
        /// Input bit pattern, e.g. 0x40490FF1
        input: String,

        /// Output bit pattern, e.g. 0xB6B400B4
        output: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// ULP distance between two bit patterns
    Ulp {
        /// First bit pattern
        a: String,

        /// Second bit pattern
        b: String,
    },

    /// Print the built-in reference table
    Table {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout carries only the report
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> sinprobe::Result<()> {
    let command = cli.command.unwrap_or(Commands::Probe {
        backend: BackendArg::Auto,
        low_power: false,
        show_plane: false,
        no_color: false,
        json: false,
    });

    match command {
        Commands::Probe {
            backend,
            low_power,
            show_plane,
            no_color,
            json,
        } => {
            let config = ProbeConfig::default()
                .with_backend(backend.into())
                .with_power(if low_power {
                    PowerPreference::LowPower
                } else {
                    PowerPreference::HighPerformance
                })
                .with_format(if json { OutputFormat::Json } else { OutputFormat::Text })
                .with_show_plane(show_plane)
                .with_color(!no_color && !json);

            let report = probe::run(&config)?;
            report::write_report(&report, &config)?;
        }

        Commands::Classify {
            input,
            output,
            json,
        } => {
            let input_bits = parse_hex_bits(&input)?;
            let output_bits = parse_hex_bits(&output)?;
            let row = classify_sample(
                ReferenceTable::builtin(),
                Sample {
                    index: 0,
                    input_value: f32::from_bits(input_bits),
                    input_bits,
                    output_bits,
                },
            );

            let mut stdout = std::io::stdout().lock();
            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&row)?)?;
            } else {
                write!(stdout, "{}", format_classification(&row))?;
            }
        }

        Commands::Ulp { a, b } => {
            let distance = ulp::distance(parse_hex_bits(&a)?, parse_hex_bits(&b)?);
            println!("{}", distance);
        }

        Commands::Table { json } => {
            let table = ReferenceTable::builtin();
            let mut stdout = std::io::stdout().lock();
            if json {
                let entries: Vec<_> = table.entries().collect();
                writeln!(stdout, "{}", serde_json::to_string_pretty(&entries)?)?;
            } else {
                write!(stdout, "{}", format_reference_table(table))?;
            }
        }
    }

    Ok(())
}
