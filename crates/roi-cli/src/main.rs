mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::projection::ProjectArgs;
use commands::sensitivity::SensitivityArgs;
use output::{Language, Presentation};

/// Year-by-year ROI projection for off-plan property purchases
#[derive(Parser)]
#[command(
    name = "roi",
    version,
    about = "Year-by-year ROI projection for off-plan property purchases",
    long_about = "Projects appreciation, rent, maintenance, instalments and net profit \
                  year by year for a leveraged off-plan property purchase, with decimal \
                  precision, and reports the global ROI over the holding period."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Language for table and csv column labels
    #[arg(long, default_value = "en", global = true)]
    language: Language,

    /// Currency symbol used in table output
    #[arg(long, default_value = "£", global = true)]
    currency_symbol: String,

    /// Log filter (e.g. "debug", "roi_core=trace"); defaults to RUST_LOG or "warn"
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the annual ledger and global ROI of a purchase
    Project(ProjectArgs),
    /// Sweep one or two scenario fields and tabulate the effect on a headline figure
    Sensitivity(SensitivityArgs),
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
    logging::init(cli.log_level.as_deref());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("roi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    let presentation = Presentation {
        language: cli.language,
        currency_symbol: cli.currency_symbol,
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, &presentation);
            process::exit(0);
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
