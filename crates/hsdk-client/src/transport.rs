//! # Transport Seam
//!
//! The executor never opens connections itself. It hands encoded request
//! bytes to a [`Transport`] and gets back the node's raw precheck code plus
//! an opaque continuation token for the consensus-polling layer.
//!
//! Implementations own connection management, TLS, and node selection. A
//! single `send` call must perform at most one transmission.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use hsdk_core::wire::decode_transaction_response;
use hsdk_core::DecodeError;

/// Opaque handle returned with an accepted request, consumed by whatever
/// polls for the consensus result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContinuationToken(Vec<u8>);

impl ContinuationToken {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A node's synchronous answer to one transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecheckResponse {
    /// Raw `ResponseCodeEnum` value, not yet classified.
    pub code: i32,
    /// Handle for the consensus-polling layer.
    pub token: ContinuationToken,
}

impl PrecheckResponse {
    pub fn new(code: i32, token: ContinuationToken) -> Self {
        Self { code, token }
    }

    /// Build from an encoded `TransactionResponse` message.
    ///
    /// # Errors
    ///
    /// Returns the decode error if `bytes` is not a valid message.
    pub fn from_wire(bytes: &[u8], token: ContinuationToken) -> Result<Self, DecodeError> {
        let response = decode_transaction_response(bytes)?;
        Ok(Self::new(response.code, token))
    }
}

/// Failure to get any precheck answer from the node.
///
/// The executor treats every variant as transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection refused: {0}")]
    ConnectionRefused(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport I/O error: {0}")]
    Io(String),
}

/// Sends encoded requests to a network node.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transmit `request` once and wait for the node's precheck answer.
    async fn send(&self, request: &[u8]) -> Result<PrecheckResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &[u8]) -> Result<PrecheckResponse, TransportError> {
        (**self).send(request).await
    }
}
