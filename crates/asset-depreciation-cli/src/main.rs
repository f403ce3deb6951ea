mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::depreciation::{DepreciationArgs, ScheduleArgs};
use commands::format::FormatMoneyArgs;
use commands::register::RegisterArgs;

/// Fixed-asset depreciation calculations
#[derive(Parser)]
#[command(
    name = "depr",
    version,
    about = "Fixed-asset depreciation calculations",
    long_about = "Computes depreciation positions, year-by-year schedules and asset \
                  register roll-ups with decimal precision. Supports straight-line and \
                  reducing-balance methods, disposals, and CSV export."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Depreciation position of one asset at a date
    Depreciation(DepreciationArgs),
    /// Year-by-year depreciation schedule of one asset
    Schedule(ScheduleArgs),
    /// Roll up an asset register (JSON/YAML list of assets)
    Register(RegisterArgs),
    /// Format an amount as money for display
    FormatMoney(FormatMoneyArgs),
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

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Depreciation(args) => commands::depreciation::run_depreciation(args),
        Commands::Schedule(args) => commands::depreciation::run_schedule(args),
        Commands::Register(args) => commands::register::run_register(args),
        Commands::FormatMoney(args) => commands::format::run_format_money(args),
        Commands::Version => {
            println!("depr {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
