//! netcheck CLI
//!
//! Command-line front end: reads captures and manifests from disk, runs the
//! validation engine and prints JSON or text reports.

use clap::{Parser, Subcommand, ValueEnum};
use netcheck_core::logging_facility::{self, Profile};
use std::process::ExitCode;

mod commands;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "netcheck")]
#[command(about = "netcheck - Pre/post upgrade device state validation", long_about = None)]
struct Cli {
    /// Log output on stderr (RUST_LOG overrides the level)
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Split a raw capture into command blocks
    Segment(commands::segment::SegmentArgs),
    /// Parse a raw capture into a snapshot
    Parse(commands::parse::ParseArgs),
    /// Compare one device's pre and post captures
    Compare(commands::compare::CompareArgs),
    /// Validate every device listed in a run manifest
    Run(commands::run::RunArgs),
    /// List or validate command schemas
    Schemas(commands::schemas::SchemasArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Segment(args) => commands::segment::execute(args),
        Commands::Parse(args) => commands::parse::execute(args),
        Commands::Compare(args) => commands::compare::execute(args),
        Commands::Run(args) => commands::run::execute(args),
        Commands::Schemas(args) => commands::schemas::execute(args),
    };

    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(commands::EXIT_ERROR)
        }
    }
}
