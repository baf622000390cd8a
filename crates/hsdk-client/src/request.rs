//! The logical request handed to the executor.

use hsdk_core::{wire, EntityIdentifier};

/// A signed request addressed to at most one entity.
///
/// The body is built and signed once by the caller. Retries resend the
/// exact same bytes; nothing here is rebuilt per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    target: EntityIdentifier,
    body: Vec<u8>,
}

impl Request {
    pub fn new(target: EntityIdentifier, body: impl Into<Vec<u8>>) -> Self {
        Self {
            target,
            body: body.into(),
        }
    }

    /// A request that addresses no particular entity.
    pub fn untargeted(body: impl Into<Vec<u8>>) -> Self {
        Self::new(EntityIdentifier::Empty, body)
    }

    pub fn target(&self) -> &EntityIdentifier {
        &self.target
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The envelope bytes handed to the transport.
    pub fn encode(&self) -> Vec<u8> {
        wire::encode_request(&self.target, &self.body)
    }
}
