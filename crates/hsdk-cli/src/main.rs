//! # hsdk CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hsdk_cli::entity::{run_entity, EntityArgs};
use hsdk_cli::precheck::{run_precheck, PrecheckArgs};

/// Client SDK operator tool.
///
/// Encodes and decodes entity identifiers in the network's wire format and
/// explains how the client treats a node's precheck codes.
#[derive(Parser, Debug)]
#[command(name = "hsdk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode or decode `EntityID` wire bytes.
    Entity(EntityArgs),

    /// Classify precheck codes or list the code table.
    Precheck(PrecheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Entity(args) => run_entity(&args),
        Commands::Precheck(args) => run_precheck(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
