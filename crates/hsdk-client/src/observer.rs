//! # Execution Observer
//!
//! The executor reports every state change to an [`ExecutionObserver`]
//! instead of logging inline. [`TracingObserver`] is the default and turns
//! transitions into `tracing` events; tests and metrics layers plug in
//! their own.
//!
//! ```text
//! Idle ──▶ Sent ──▶ Succeeded
//!           │  ▲
//!           │  └──── Retrying
//!           ▼          │
//!         Failed ◀─────┘ (cancelled)
//! ```

use std::fmt;
use std::time::Duration;

use hsdk_core::{DecodeError, EntityIdentifier, PrecheckCode};

use crate::transport::TransportError;

/// Executor state for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    /// Nothing transmitted yet.
    Idle,
    /// A transmission is in flight.
    Sent,
    /// Waiting out a backoff before the next transmission.
    Retrying,
    /// The node accepted the request (terminal).
    Succeeded,
    /// Rejected, exhausted, cancelled, or invalid (terminal).
    Failed,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Sent => "sent",
            Self::Retrying => "retrying",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause<'a> {
    /// A transmission is starting.
    Transmit,
    /// The node answered with this precheck code.
    Precheck(PrecheckCode),
    /// The transport could not get an answer.
    Transport(&'a TransportError),
    /// The caller cancelled the request.
    Cancelled,
    /// The target identifier bytes did not decode.
    InvalidTarget(&'a DecodeError),
}

/// One state change of one logical request.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub from: ExecutionState,
    pub to: ExecutionState,
    /// Transmissions made so far (1-based once anything is sent).
    pub attempt: u32,
    pub max_attempts: u32,
    pub target: &'a EntityIdentifier,
    pub cause: TransitionCause<'a>,
    /// Backoff about to be waited; set only when entering `Retrying`.
    pub delay: Option<Duration>,
}

/// Receives executor state changes.
pub trait ExecutionObserver: Send + Sync {
    fn on_transition(&self, _transition: &Transition<'_>) {}

    /// The node returned a value outside the known code table.
    fn on_unrecognized_code(&self, _raw: i32, _target: &EntityIdentifier) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {}

/// Emits `tracing` events for executor transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExecutionObserver for TracingObserver {
    fn on_transition(&self, t: &Transition<'_>) {
        match (t.to, t.cause) {
            (ExecutionState::Sent, _) => tracing::trace!(
                target_entity = %t.target,
                attempt = t.attempt,
                max_attempts = t.max_attempts,
                "transmitting request"
            ),
            (ExecutionState::Succeeded, cause) => tracing::debug!(
                target_entity = %t.target,
                attempt = t.attempt,
                ?cause,
                "precheck passed"
            ),
            (ExecutionState::Retrying, TransitionCause::Precheck(code)) => tracing::warn!(
                target_entity = %t.target,
                attempt = t.attempt,
                max_attempts = t.max_attempts,
                delay = ?t.delay,
                "node answered {code}, retrying"
            ),
            (ExecutionState::Retrying, TransitionCause::Transport(err)) => tracing::warn!(
                target_entity = %t.target,
                attempt = t.attempt,
                max_attempts = t.max_attempts,
                delay = ?t.delay,
                "transport failed, retrying: {err}"
            ),
            (ExecutionState::Failed, TransitionCause::Precheck(code)) => tracing::info!(
                target_entity = %t.target,
                attempt = t.attempt,
                "request failed precheck: {code}"
            ),
            (ExecutionState::Failed, TransitionCause::Transport(err)) => tracing::info!(
                target_entity = %t.target,
                attempt = t.attempt,
                "retries exhausted, last transport error: {err}"
            ),
            (ExecutionState::Failed, TransitionCause::Cancelled) => tracing::info!(
                target_entity = %t.target,
                attempt = t.attempt,
                "request cancelled"
            ),
            (ExecutionState::Failed, TransitionCause::InvalidTarget(err)) => tracing::info!(
                "request not sent, invalid target: {err}"
            ),
            (to, cause) => tracing::debug!(from = %t.from, %to, ?cause, "executor transition"),
        }
    }

    fn on_unrecognized_code(&self, raw: i32, target: &EntityIdentifier) {
        tracing::warn!(
            raw,
            target_entity = %target,
            "unrecognized precheck code, treating as rejection"
        );
    }
}
