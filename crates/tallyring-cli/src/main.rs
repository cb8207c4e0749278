//! Tallyring CLI - feed a record stream into buffers and aggregators.
//!
//! The library has no I/O of its own; this binary is the driver that reads
//! records, decides what to buffer and what to aggregate, and prints results.

mod commands;
mod input;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tallyring_core::aggregate::{AggregateFunction, Comparison};

use crate::commands::DriverConfig;

/// Summarize record streams from files or stdin.
///
/// Records are read one per line: JSON scalars, JSON objects (pick a value
/// with `--field`), or bare text.
#[derive(Parser)]
#[command(name = "tallyring")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress results and info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Options shared by every command that aggregates.
#[derive(clap::Args)]
struct AggregateArgs {
    /// Input file, or `-` for stdin (default)
    input: Option<PathBuf>,

    /// Aggregate functions to compute (count, sum, avg, min, max, last)
    #[arg(
        long = "agg",
        short = 'a',
        value_delimiter = ',',
        default_values_t = AggregateFunction::ALL
    )]
    functions: Vec<AggregateFunction>,

    /// Field to read from JSON object records
    #[arg(long, short)]
    field: Option<String>,

    /// Only aggregate records matching a comparison, e.g. `>0` or `ge:2.5`
    #[arg(long, allow_hyphen_values = true)]
    filter: Option<Comparison>,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Aggregate every record of the stream
    Summary {
        #[command(flatten)]
        args: AggregateArgs,
    },

    /// Keep the most recent records and aggregate over them
    Tail {
        #[command(flatten)]
        args: AggregateArgs,

        /// Number of records to keep
        #[arg(long, short)]
        capacity: usize,
    },
}

impl DriverConfig {
    fn from_args(
        args: AggregateArgs,
        capacity: Option<usize>,
        format: OutputFormat,
        quiet: bool,
    ) -> Self {
        Self {
            input: args.input.filter(|p| p.as_os_str() != "-"),
            capacity,
            field: args.field,
            filter: args.filter,
            functions: args.functions,
            format: format.into(),
            quiet,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries results
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Summary { args } => {
            let config = DriverConfig::from_args(args, None, cli.format, cli.quiet);
            commands::summary::run(&config)
        }
        Commands::Tail { args, capacity } => {
            let config = DriverConfig::from_args(args, Some(capacity), cli.format, cli.quiet);
            commands::tail::run(&config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
