//! # hsdk-client — Precheck-Aware Request Execution
//!
//! Sends a signed request to a network node through a pluggable
//! [`Transport`], reads the node's synchronous precheck answer, and decides
//! whether to hand back a continuation token, retry after a delay, or give
//! up. Every terminal outcome is an explicit [`ExecutionResult`] variant.
//!
//! ## Architecture
//!
//! - [`transport`]: the seam to connection management, which lives
//!   outside this crate.
//! - [`executor`]: the send/classify/decide loop with bounded linear
//!   backoff and cancellation.
//! - [`observer`]: state-transition hooks; [`TracingObserver`] logs them.
//! - [`config`]: environment-driven defaults.
//!
//! Identifier encoding and code classification come from `hsdk-core`.

pub mod config;
pub mod error;
pub mod executor;
pub mod observer;
pub mod request;
pub mod retry;
pub mod transport;

pub use config::{ConfigError, ExecutorConfig};
pub use error::ExecuteError;
pub use executor::{ExecutionResult, RequestExecutor, RetryCause};
pub use observer::{
    ExecutionObserver, ExecutionState, NoopObserver, TracingObserver, Transition, TransitionCause,
};
pub use request::Request;
pub use retry::RetryPolicy;
pub use transport::{ContinuationToken, PrecheckResponse, Transport, TransportError};

pub use tokio_util::sync::CancellationToken;
