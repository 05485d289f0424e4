mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::amortization::{AmortizeArgs, FrequencyArgs, ScheduleArgs};

/// Mortgage amortization schedules and payoff analysis
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Mortgage amortization schedules and payoff analysis",
    long_about = "Computes mortgage payments and amortization schedules with decimal \
                  precision. Supports monthly, bi-weekly, weekly and custom payment \
                  frequencies, extra principal payments on their own cadence, and \
                  solving for the term of a locked payment."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true, env = "MORTGAGE_LOG_LEVEL")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute payment, costs, summary and schedule
    Amortize(AmortizeArgs),
    /// Export the amortization schedule as CSV
    Schedule(ScheduleArgs),
    /// Resolve a payment frequency to periods per year
    Frequency(FrequencyArgs),
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

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Frequency(args) => commands::amortization::run_frequency(args),
        Commands::Schedule(args) => match commands::amortization::run_schedule(args) {
            Ok(()) => process::exit(0),
            Err(e) => fail(e),
        },
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}
