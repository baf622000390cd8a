//! # hsdk-cli — Operator Tooling for the Client SDK
//!
//! Provides the `hsdk` command-line interface for inspecting what the client
//! puts on the wire and how it reads a node's precheck answer.
//!
//! ## Subcommands
//!
//! - `hsdk entity` — Encode an identifier to `EntityID` hex, or decode hex
//!   back to a JSON identifier.
//! - `hsdk precheck` — Classify a raw precheck value, or list the code table.
//!
//! ```bash
//! hsdk entity encode --kind account --id 0.0.1001
//! hsdk entity decode 0a0318e907
//! hsdk precheck classify 12
//! hsdk precheck list
//! ```

pub mod entity;
pub mod precheck;
