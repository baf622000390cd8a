//! # Request Executor
//!
//! Runs one logical request through send → precheck → decide:
//!
//! - `Proceed`: done, hand the continuation token back.
//! - `RetryAfterDelay` or a transport failure: wait `base_delay * attempt`
//!   and resend the same bytes, until `max_attempts` transmissions.
//! - `Fail`: stop immediately, whatever the attempt count.
//!
//! Transmissions for one request are strictly sequential, so a
//! side-effecting request is never in flight twice at once. The request
//! envelope is encoded once; retries reuse the buffer.
//!
//! Cancellation is checked before every transmission and raced against
//! both the transport wait and the backoff sleep. Once it fires no further
//! transmission starts. When a transport timeout is set, a wait that
//! outlasts it is a [`TransportError::Timeout`] and retried like any other
//! transport failure.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use hsdk_core::{EntityIdentifier, PolicyClass, PrecheckCode};

use crate::config::ExecutorConfig;
use crate::error::ExecuteError;
use crate::observer::{
    ExecutionObserver, ExecutionState, TracingObserver, Transition, TransitionCause,
};
use crate::request::Request;
use crate::retry::{self, RetryPolicy};
use crate::transport::{ContinuationToken, PrecheckResponse, Transport, TransportError};

/// What made the last retryable attempt fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryCause {
    /// The node answered with a retryable precheck code.
    Busy(PrecheckCode),
    /// No answer from the node.
    Transport(TransportError),
}

impl RetryCause {
    fn as_transition_cause(&self) -> TransitionCause<'_> {
        match self {
            Self::Busy(code) => TransitionCause::Precheck(*code),
            Self::Transport(err) => TransitionCause::Transport(err),
        }
    }
}

/// Terminal result of one logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The node accepted the request.
    Proceed {
        token: ContinuationToken,
        attempts: u32,
    },
    /// Every allowed attempt hit a retryable condition.
    Exhausted { attempts: u32, last: RetryCause },
    /// The node rejected the request. Unknown codes land here as
    /// [`PrecheckCode::Unrecognized`].
    Rejected { code: PrecheckCode, attempts: u32 },
    /// The caller cancelled before the request reached a decision.
    /// `last` is the most recent precheck code seen, if any.
    Cancelled {
        attempts: u32,
        last: Option<PrecheckCode>,
    },
}

impl ExecutionResult {
    /// Number of transmissions made.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Proceed { attempts, .. }
            | Self::Exhausted { attempts, .. }
            | Self::Rejected { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Proceed { .. })
    }

    pub fn state(&self) -> ExecutionState {
        if self.is_success() {
            ExecutionState::Succeeded
        } else {
            ExecutionState::Failed
        }
    }
}

/// Per-call state. Lives inside a single `execute` future and is never
/// shared.
struct Session<'a> {
    target: &'a EntityIdentifier,
    policy: RetryPolicy,
    observer: &'a dyn ExecutionObserver,
    state: ExecutionState,
    attempt: u32,
    last: Option<PrecheckCode>,
}

impl<'a> Session<'a> {
    fn new(
        target: &'a EntityIdentifier,
        policy: RetryPolicy,
        observer: &'a dyn ExecutionObserver,
    ) -> Self {
        Self {
            target,
            policy,
            observer,
            state: ExecutionState::Idle,
            attempt: 0,
            last: None,
        }
    }

    fn transition(&mut self, to: ExecutionState, cause: TransitionCause<'_>, delay: Option<Duration>) {
        self.observer.on_transition(&Transition {
            from: self.state,
            to,
            attempt: self.attempt,
            max_attempts: self.policy.max_attempts(),
            target: self.target,
            cause,
            delay,
        });
        self.state = to;
    }

    fn cancelled(&mut self) -> ExecutionResult {
        self.transition(ExecutionState::Failed, TransitionCause::Cancelled, None);
        ExecutionResult::Cancelled {
            attempts: self.attempt,
            last: self.last,
        }
    }
}

/// Sends requests through a [`Transport`] and interprets the precheck.
pub struct RequestExecutor<T> {
    transport: T,
    policy: RetryPolicy,
    transport_timeout: Option<Duration>,
    observer: Arc<dyn ExecutionObserver>,
}

impl<T: Transport> RequestExecutor<T> {
    /// Executor with `policy` as its default and a [`TracingObserver`].
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            transport_timeout: None,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Executor using the configured policy and transport timeout.
    pub fn from_config(transport: T, config: &ExecutorConfig) -> Self {
        Self::new(transport, config.policy()).with_transport_timeout(config.transport_timeout)
    }

    /// Bound each transport wait; an elapsed wait counts as
    /// [`TransportError::Timeout`].
    pub fn with_transport_timeout(mut self, limit: Duration) -> Self {
        self.transport_timeout = Some(limit);
        self
    }

    /// Replace the observer that receives state transitions.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport_timeout(&self) -> Option<Duration> {
        self.transport_timeout
    }

    async fn send_once(&self, wire: &[u8]) -> Result<PrecheckResponse, TransportError> {
        match self.transport_timeout {
            Some(limit) => tokio::time::timeout(limit, self.transport.send(wire))
                .await
                .unwrap_or(Err(TransportError::Timeout(limit))),
            None => self.transport.send(wire).await,
        }
    }

    /// Execute `request` with the executor's default policy.
    pub async fn execute(&self, request: &Request, cancel: &CancellationToken) -> ExecutionResult {
        self.execute_with(request, self.policy, cancel).await
    }

    /// Execute `request` with an explicit policy.
    pub async fn execute_with(
        &self,
        request: &Request,
        policy: RetryPolicy,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        let wire = request.encode();
        let mut session = Session::new(request.target(), policy, self.observer.as_ref());

        loop {
            if cancel.is_cancelled() {
                return session.cancelled();
            }

            session.attempt += 1;
            session.transition(ExecutionState::Sent, TransitionCause::Transmit, None);

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return session.cancelled(),
                outcome = self.send_once(&wire) => outcome,
            };

            let cause = match outcome {
                Ok(response) => {
                    let code = PrecheckCode::from_raw(response.code);
                    if !code.is_recognized() {
                        self.observer.on_unrecognized_code(response.code, session.target);
                    }
                    session.last = Some(code);

                    match code.policy() {
                        PolicyClass::Proceed => {
                            session.transition(
                                ExecutionState::Succeeded,
                                TransitionCause::Precheck(code),
                                None,
                            );
                            return ExecutionResult::Proceed {
                                token: response.token,
                                attempts: session.attempt,
                            };
                        }
                        PolicyClass::Fail => {
                            session.transition(
                                ExecutionState::Failed,
                                TransitionCause::Precheck(code),
                                None,
                            );
                            return ExecutionResult::Rejected {
                                code,
                                attempts: session.attempt,
                            };
                        }
                        PolicyClass::RetryAfterDelay => RetryCause::Busy(code),
                    }
                }
                Err(err) => RetryCause::Transport(err),
            };

            if !policy.allows_another(session.attempt) {
                session.transition(ExecutionState::Failed, cause.as_transition_cause(), None);
                return ExecutionResult::Exhausted {
                    attempts: session.attempt,
                    last: cause,
                };
            }

            let delay = policy.delay_for(session.attempt);
            session.transition(
                ExecutionState::Retrying,
                cause.as_transition_cause(),
                Some(delay),
            );
            if !retry::backoff(delay, cancel).await {
                return session.cancelled();
            }
        }
    }

    /// Execute a request whose target arrives as encoded `EntityID` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Decode`] without transmitting if
    /// `target_wire` does not decode.
    pub async fn execute_wire(
        &self,
        target_wire: &[u8],
        body: impl Into<Vec<u8>>,
        policy: RetryPolicy,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, ExecuteError> {
        let target = match EntityIdentifier::from_wire(target_wire) {
            Ok(target) => target,
            Err(err) => {
                let empty = EntityIdentifier::Empty;
                let mut session = Session::new(&empty, policy, self.observer.as_ref());
                session.transition(
                    ExecutionState::Failed,
                    TransitionCause::InvalidTarget(&err),
                    None,
                );
                return Err(err.into());
            }
        };
        let request = Request::new(target, body);
        Ok(self.execute_with(&request, policy, cancel).await)
    }
}
