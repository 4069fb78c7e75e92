mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::assumptions::{InputArgs, MigrateArgs};
use commands::proforma::ComputeArgs;
use commands::scenarios::SweepArgs;

/// Real-estate development pro forma projections
#[derive(Parser)]
#[command(
    name = "proforma",
    version,
    about = "Real-estate development pro forma projections",
    long_about = "A CLI for projecting for-sale development deals with decimal precision. \
                  Builds cost and revenue stacks, a monthly construction-loan schedule, \
                  equity returns, and scenario comparisons from a JSON or YAML \
                  assumptions document."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pro forma
    Compute(ComputeArgs),
    /// Print only the monthly cashflow rows
    Monthly(ComputeArgs),
    /// Compare the base case with the stored scenario deltas
    Compare(InputArgs),
    /// Sweep one scenario knob across its slider range
    Sweep(SweepArgs),
    /// Check an assumptions document against the allowed ranges
    Validate(InputArgs),
    /// Upgrade a legacy assumptions document to the current schema
    Migrate(MigrateArgs),
    /// Print default assumptions and scenario slider ranges
    Defaults,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    let start = Instant::now();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compute(args) => commands::proforma::run_compute(args),
        Commands::Monthly(args) => commands::proforma::run_monthly(args),
        Commands::Compare(args) => commands::scenarios::run_compare(args),
        Commands::Sweep(args) => commands::scenarios::run_sweep(args),
        Commands::Validate(args) => commands::assumptions::run_validate(args),
        Commands::Migrate(args) => commands::assumptions::run_migrate(args),
        Commands::Defaults => commands::assumptions::run_defaults(),
        Commands::Version => {
            println!("proforma {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    debug!(
        ok = result.is_ok(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "command finished"
    );

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
