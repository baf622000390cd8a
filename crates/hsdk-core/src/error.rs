//! # Error Types
//!
//! Errors raised by the identifier layer. Decode failures are local and
//! never retryable: the caller sees them immediately.

use thiserror::Error;

/// Failure to decode wire bytes into an identifier or response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte sequence violates the wire grammar: truncated input,
    /// out-of-range varint, reserved wire types, field number zero, or a
    /// known field carrying the wrong wire type.
    #[error("malformed wire bytes: {0}")]
    Malformed(String),

    /// More than one arm of the `EntityID` oneof was present.
    #[error("more than one entity variant set in EntityID")]
    MultipleVariantsSet,
}

impl From<prost::DecodeError> for DecodeError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Failure to parse a `shard.realm.num` identifier string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// The string did not have exactly three dot-separated parts.
    #[error("expected `shard.realm.num`, got {0:?}")]
    Format(String),

    /// One of the parts was not a non-negative 64-bit integer.
    #[error("invalid number {part:?} in {input:?}")]
    Number {
        /// The offending component.
        part: String,
        /// The whole input string.
        input: String,
    },
}
