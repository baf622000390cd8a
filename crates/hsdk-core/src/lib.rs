//! # hsdk-core — Identity and Precheck Primitives
//!
//! The leaf crate of the client SDK. It defines what the network can be
//! asked about and how to read its first answer:
//!
//! - [`entity`]: the [`EntityIdentifier`] union over accounts, files,
//!   contracts, and claims.
//! - [`wire`]: bit-exact protobuf encoding of identifiers and precheck
//!   responses.
//! - [`precheck`]: the `ResponseCodeEnum` table and the
//!   proceed / retry / fail policy over it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hsdk-*` crates.
//! - Everything here is pure: no I/O, no clocks, no shared state.
//! - No `unsafe` code. No `.unwrap()` outside tests.

pub mod entity;
pub mod error;
pub mod precheck;
pub mod wire;

pub use entity::{AccountId, Claim, ContractId, EntityIdentifier, EntityKind, FileId};
pub use error::{DecodeError, ParseIdError};
pub use precheck::{classify, is_retryable, PolicyClass, PrecheckCode, ResponseCode};
pub use wire::TransactionResponse;
