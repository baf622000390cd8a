//! # Entity CLI — Encode and decode `EntityID` bytes.
//!
//! ## Usage
//!
//! ```bash
//! # Encode an account address:
//! hsdk entity encode --kind account --id 0.0.1001
//!
//! # Encode a claim (account + attested hash):
//! hsdk entity encode --kind claim --id 0.0.2 --hash abcd
//!
//! # Decode wire bytes to JSON:
//! hsdk entity decode 0a0318e907
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use hsdk_core::{AccountId, ContractId, EntityIdentifier, FileId};

/// Entity subcommand arguments.
#[derive(Args, Debug)]
pub struct EntityArgs {
    #[command(subcommand)]
    pub command: EntityCommand,
}

/// Available entity subcommands.
#[derive(Subcommand, Debug)]
pub enum EntityCommand {
    /// Encode an identifier and print its wire bytes as hex.
    Encode {
        /// Which entity kind to build.
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Address as `shard.realm.num`. Required for every kind but `empty`.
        #[arg(long)]
        id: Option<String>,

        /// Attested hash as hex (claims only).
        #[arg(long)]
        hash: Option<String>,
    },

    /// Decode `EntityID` hex and print the identifier as JSON.
    Decode {
        /// Wire bytes as hex, optionally prefixed with `0x`.
        hex: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Account,
    File,
    Contract,
    Claim,
    Empty,
}

/// Execute the entity subcommand.
pub fn run_entity(args: &EntityArgs) -> Result<u8> {
    match &args.command {
        EntityCommand::Encode { kind, id, hash } => {
            let identifier = build_identifier(*kind, id.as_deref(), hash.as_deref())?;
            tracing::debug!(%identifier, "encoding identifier");
            println!("{}", hex::encode(identifier.to_wire()));
            Ok(0)
        }
        EntityCommand::Decode { hex } => {
            let identifier = decode_hex(hex)?;
            let json = serde_json::to_string_pretty(&identifier)
                .context("failed to serialize identifier")?;
            println!("{json}");
            Ok(0)
        }
    }
}

/// Build an identifier from command-line parts.
pub fn build_identifier(kind: KindArg, id: Option<&str>, hash: Option<&str>) -> Result<EntityIdentifier> {
    if hash.is_some() && kind != KindArg::Claim {
        bail!("--hash is only valid with --kind claim");
    }
    if kind == KindArg::Empty {
        if id.is_some() {
            bail!("--id is not valid with --kind empty");
        }
        return Ok(EntityIdentifier::Empty);
    }

    let id = id.context("--id is required for this kind")?;
    let identifier = match kind {
        KindArg::Account => EntityIdentifier::Account(
            id.parse::<AccountId>().with_context(|| format!("invalid account id '{id}'"))?,
        ),
        KindArg::File => EntityIdentifier::File(
            id.parse::<FileId>().with_context(|| format!("invalid file id '{id}'"))?,
        ),
        KindArg::Contract => EntityIdentifier::Contract(
            id.parse::<ContractId>().with_context(|| format!("invalid contract id '{id}'"))?,
        ),
        KindArg::Claim => {
            let account = id
                .parse::<AccountId>()
                .with_context(|| format!("invalid claim account id '{id}'"))?;
            let hash = match hash {
                Some(h) => hex::decode(strip_hex_prefix(h))
                    .with_context(|| format!("invalid claim hash '{h}'"))?,
                None => Vec::new(),
            };
            EntityIdentifier::claim(account, hash)
        }
        KindArg::Empty => EntityIdentifier::Empty,
    };
    Ok(identifier)
}

/// Decode `EntityID` wire bytes given as hex.
pub fn decode_hex(input: &str) -> Result<EntityIdentifier> {
    let bytes = hex::decode(strip_hex_prefix(input))
        .with_context(|| format!("input is not valid hex: '{input}'"))?;
    EntityIdentifier::from_wire(&bytes).context("failed to decode EntityID")
}

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x").unwrap_or(s)
}
