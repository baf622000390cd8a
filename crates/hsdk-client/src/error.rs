//! Client error types.

use hsdk_core::DecodeError;

/// Errors that stop a request before anything is transmitted.
///
/// Everything that happens after transmission is reported through
/// [`crate::ExecutionResult`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    /// The target identifier bytes could not be decoded.
    #[error("invalid target identifier: {0}")]
    Decode(#[from] DecodeError),
}
