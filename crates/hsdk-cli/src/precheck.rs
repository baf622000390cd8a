//! # Precheck CLI — Inspect precheck codes and their policy classes.
//!
//! ```bash
//! hsdk precheck classify 12      # BUSY (12) -> retry_after_delay
//! hsdk precheck classify -- -1   # UNRECOGNIZED (-1) -> fail
//! hsdk precheck list
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use hsdk_core::{PrecheckCode, ResponseCode};

/// Precheck subcommand arguments.
#[derive(Args, Debug)]
pub struct PrecheckArgs {
    #[command(subcommand)]
    pub command: PrecheckCommand,
}

/// Available precheck subcommands.
#[derive(Subcommand, Debug)]
pub enum PrecheckCommand {
    /// Classify a raw precheck value.
    Classify {
        /// Raw `ResponseCodeEnum` value as received from a node.
        #[arg(allow_negative_numbers = true)]
        raw: i32,
    },

    /// List every known precheck code with its policy class.
    List {
        /// Emit the table as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Execute the precheck subcommand.
pub fn run_precheck(args: &PrecheckArgs) -> Result<u8> {
    match &args.command {
        PrecheckCommand::Classify { raw } => {
            let code = PrecheckCode::from_raw(*raw);
            if !code.is_recognized() {
                tracing::warn!(raw, "value is not in the known code table");
            }
            println!("{}", describe(code));
            Ok(0)
        }
        PrecheckCommand::List { json } => {
            if *json {
                let rows: Vec<serde_json::Value> = ResponseCode::all()
                    .iter()
                    .map(|code| {
                        serde_json::json!({
                            "code": code.as_raw(),
                            "name": code.name(),
                            "policy": code.policy(),
                        })
                    })
                    .collect();
                let out = serde_json::to_string_pretty(&rows)
                    .context("failed to serialize code table")?;
                println!("{out}");
            } else {
                for line in table_lines() {
                    println!("{line}");
                }
                println!();
                println!("Total: {} codes", ResponseCode::all().len());
            }
            Ok(0)
        }
    }
}

/// One-line summary: `NAME (raw) -> policy`.
pub fn describe(code: PrecheckCode) -> String {
    format!("{code} -> {}", code.policy())
}

fn table_lines() -> Vec<String> {
    ResponseCode::all()
        .iter()
        .map(|code| format!("  {:>3}  {:<45} {}", code.as_raw(), code.name(), code.policy()))
        .collect()
}
