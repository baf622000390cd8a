//! # Request Executor Scenarios
//!
//! Drives [`RequestExecutor`] against a scripted transport that counts
//! transmissions and records the bytes it was given. Time is paused so
//! backoff delays resolve instantly while still being measurable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use hsdk_client::{
    CancellationToken, ContinuationToken, ExecutionResult, ExecutorConfig, NoopObserver,
    PrecheckResponse,
    Request, RequestExecutor, RetryCause, RetryPolicy, Transport, TransportError,
};
use hsdk_core::{AccountId, EntityIdentifier, PrecheckCode, ResponseCode};

#[derive(Debug, Clone)]
enum Reply {
    Code(i32),
    Error(TransportError),
    /// Never answers.
    Hang,
}

/// Transport stub: replays a script, then repeats `fallback` forever.
struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    latency: Duration,
    calls: AtomicU32,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
    sent: Mutex<Vec<(Instant, Vec<u8>)>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Reply>, fallback: Reply) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            latency: Duration::ZERO,
            calls: AtomicU32::new(0),
            in_flight: AtomicU32::new(0),
            max_in_flight: AtomicU32::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn always(code: ResponseCode) -> Self {
        Self::new(Vec::new(), Reply::Code(code.as_raw()))
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &[u8]) -> Result<PrecheckResponse, TransportError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.sent.lock().push((Instant::now(), request.to_vec()));

        let reply = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Reply::Code(code) => Ok(PrecheckResponse::new(
                code,
                ContinuationToken::new(format!("tx-{n}").into_bytes()),
            )),
            Reply::Error(err) => Err(err),
            Reply::Hang => std::future::pending().await,
        }
    }
}

fn policy(max_attempts: u32, base_delay_ms: u64) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(base_delay_ms)).unwrap()
}

fn executor(transport: ScriptedTransport, policy: RetryPolicy) -> RequestExecutor<ScriptedTransport> {
    RequestExecutor::new(transport, policy).with_observer(Arc::new(NoopObserver))
}

fn transfer_request() -> Request {
    Request::new(EntityIdentifier::account(0, 0, 1001), b"signed-transfer".to_vec())
}

// ── Retry bound ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn always_busy_transmits_exactly_max_attempts() {
    for n in [1u32, 2, 5, 8] {
        let exec = executor(ScriptedTransport::always(ResponseCode::Busy), policy(n, 10));
        let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;

        assert_eq!(
            result,
            ExecutionResult::Exhausted {
                attempts: n,
                last: RetryCause::Busy(PrecheckCode::Known(ResponseCode::Busy)),
            }
        );
        assert_eq!(exec.transport().calls(), n);
    }
}

#[tokio::test(start_paused = true)]
async fn platform_not_active_is_retried_like_busy() {
    let exec = executor(
        ScriptedTransport::new(
            vec![Reply::Code(ResponseCode::PlatformNotActive.as_raw())],
            Reply::Code(ResponseCode::Ok.as_raw()),
        ),
        policy(3, 10),
    );
    let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;
    assert!(result.is_success());
    assert_eq!(result.attempts(), 2);
}

// ── No duplicate side effects ────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn busy_busy_ok_sends_three_times_and_proceeds() {
    let busy = Reply::Code(ResponseCode::Busy.as_raw());
    let exec = executor(
        ScriptedTransport::new(vec![busy.clone(), busy], Reply::Code(ResponseCode::Ok.as_raw())),
        policy(5, 10),
    );
    let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;

    assert_eq!(
        result,
        ExecutionResult::Proceed {
            token: ContinuationToken::new(b"tx-3".to_vec()),
            attempts: 3,
        }
    );
    assert_eq!(exec.transport().calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn every_retry_resends_identical_bytes() {
    let request = transfer_request();
    let exec = executor(ScriptedTransport::always(ResponseCode::Busy), policy(4, 10));
    exec.execute(&request, &CancellationToken::new()).await;

    let sent = exec.transport().sent.lock();
    assert_eq!(sent.len(), 4);
    for (_, bytes) in sent.iter() {
        assert_eq!(bytes, &request.encode());
    }
}

#[tokio::test(start_paused = true)]
async fn retries_never_overlap() {
    let exec = executor(
        ScriptedTransport::always(ResponseCode::Busy).with_latency(Duration::from_millis(50)),
        policy(4, 10),
    );
    exec.execute(&transfer_request(), &CancellationToken::new()).await;
    assert_eq!(exec.transport().max_in_flight.load(Ordering::SeqCst), 1);
}

// ── Immediate failure ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn rejection_on_first_call_stops_immediately() {
    for code in [
        ResponseCode::InvalidSignature,
        ResponseCode::InsufficientPayerBalance,
        ResponseCode::DuplicateTransaction,
        ResponseCode::InvalidAccountId,
    ] {
        let exec = executor(ScriptedTransport::always(code), policy(10, 10));
        let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;

        assert_eq!(
            result,
            ExecutionResult::Rejected {
                code: PrecheckCode::Known(code),
                attempts: 1,
            }
        );
        assert_eq!(exec.transport().calls(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn rejection_after_busy_is_not_retried() {
    let exec = executor(
        ScriptedTransport::new(
            vec![Reply::Code(ResponseCode::Busy.as_raw())],
            Reply::Code(ResponseCode::InvalidSignature.as_raw()),
        ),
        policy(10, 10),
    );
    let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;
    assert!(matches!(result, ExecutionResult::Rejected { attempts: 2, .. }));
    assert_eq!(exec.transport().calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn unknown_code_is_rejected_and_distinguishable() {
    let exec = executor(ScriptedTransport::new(Vec::new(), Reply::Code(1_000)), policy(3, 10));
    let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;
    match result {
        ExecutionResult::Rejected { code, attempts } => {
            assert_eq!(code, PrecheckCode::Unrecognized(1_000));
            assert!(!code.is_recognized());
            assert_eq!(attempts, 1);
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

// ── Transport errors ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn transport_errors_are_transient() {
    let exec = executor(
        ScriptedTransport::new(
            vec![
                Reply::Error(TransportError::ConnectionRefused("node-3".into())),
                Reply::Error(TransportError::Timeout(Duration::from_secs(30))),
            ],
            Reply::Code(ResponseCode::Ok.as_raw()),
        ),
        policy(3, 10),
    );
    let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;
    assert!(result.is_success());
    assert_eq!(exec.transport().calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn persistent_transport_error_exhausts() {
    let err = TransportError::Io("broken pipe".into());
    let exec = executor(
        ScriptedTransport::new(Vec::new(), Reply::Error(err.clone())),
        policy(3, 10),
    );
    let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;
    assert_eq!(
        result,
        ExecutionResult::Exhausted {
            attempts: 3,
            last: RetryCause::Transport(err),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_bounds_each_transport_wait() {
    let config = ExecutorConfig {
        policy: policy(2, 100),
        transport_timeout: Duration::from_secs(1),
    };
    let exec = RequestExecutor::from_config(ScriptedTransport::new(Vec::new(), Reply::Hang), &config)
        .with_observer(Arc::new(NoopObserver));
    assert_eq!(exec.policy(), config.policy);
    assert_eq!(exec.transport_timeout(), Some(Duration::from_secs(1)));

    let start = Instant::now();
    let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;
    assert_eq!(
        result,
        ExecutionResult::Exhausted {
            attempts: 2,
            last: RetryCause::Transport(TransportError::Timeout(Duration::from_secs(1))),
        }
    );
    assert_eq!(exec.transport().calls(), 2);
    // Two waits of 1s plus one 100ms backoff.
    assert!(start.elapsed() >= Duration::from_millis(2100));
}

#[tokio::test(start_paused = true)]
async fn timeout_is_retried_then_proceeds() {
    let exec = executor(
        ScriptedTransport::new(vec![Reply::Hang], Reply::Code(ResponseCode::Ok.as_raw())),
        policy(3, 10),
    )
    .with_transport_timeout(Duration::from_millis(500));
    let result = exec.execute(&transfer_request(), &CancellationToken::new()).await;
    assert!(result.is_success());
    assert_eq!(result.attempts(), 2);
}

// ── Backoff curve ────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn backoff_is_linear_in_attempt_number() {
    let exec = executor(ScriptedTransport::always(ResponseCode::Busy), policy(4, 100));
    let start = Instant::now();
    exec.execute(&transfer_request(), &CancellationToken::new()).await;

    let sent_at: Vec<Instant> = exec.transport().sent.lock().iter().map(|(at, _)| *at).collect();
    assert_eq!(sent_at.len(), 4);
    assert!(sent_at[0].duration_since(start) < Duration::from_millis(5));

    // Waits of 100ms, 200ms, 300ms between the four sends; the timer
    // rounds to whole milliseconds.
    for (i, pair) in sent_at.windows(2).enumerate() {
        let gap = pair[1].duration_since(pair[0]);
        let expected = Duration::from_millis(100 * (i as u64 + 1));
        assert!(
            gap >= expected && gap < expected + Duration::from_millis(5),
            "gap {i} was {gap:?}, expected about {expected:?}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn exhaustion_does_not_sleep_after_last_attempt() {
    let exec = executor(ScriptedTransport::always(ResponseCode::Busy), policy(2, 1_000));
    let start = Instant::now();
    exec.execute(&transfer_request(), &CancellationToken::new()).await;
    // One wait of 1s between the two sends, none after the second.
    assert!(start.elapsed() < Duration::from_millis(1_500));
}

// ── Cancellation ─────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn cancel_during_backoff_stops_further_sends() {
    let exec = executor(ScriptedTransport::always(ResponseCode::Busy), policy(10, 60_000));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let result = exec.execute(&transfer_request(), &cancel).await;

    assert_eq!(
        result,
        ExecutionResult::Cancelled {
            attempts: 1,
            last: Some(PrecheckCode::Known(ResponseCode::Busy)),
        }
    );
    assert!(start.elapsed() < Duration::from_secs(60));

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(exec.transport().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_while_waiting_on_transport() {
    let exec = executor(ScriptedTransport::new(Vec::new(), Reply::Hang), policy(3, 10));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let result = exec.execute(&transfer_request(), &cancel).await;
    assert_eq!(result, ExecutionResult::Cancelled { attempts: 1, last: None });
    assert_eq!(exec.transport().calls(), 1);
}

// ── Concurrency ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn independent_requests_run_concurrently() {
    let transport = Arc::new(
        ScriptedTransport::always(ResponseCode::Ok).with_latency(Duration::from_millis(100)),
    );
    let exec = Arc::new(RequestExecutor::new(transport.clone(), policy(3, 10)));

    let mut handles = Vec::new();
    for num in 0..4u64 {
        let exec = exec.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::new(
                EntityIdentifier::claim(AccountId::new(0, 0, num), vec![num as u8; 4]),
                b"signed".to_vec(),
            );
            exec.execute(&request, &CancellationToken::new()).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }
    assert_eq!(transport.calls(), 4);
    assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 4);
}

// ── Untargeted requests ──────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn empty_target_is_sent_without_entity_field() {
    let exec = executor(ScriptedTransport::always(ResponseCode::Ok), policy(1, 0));
    let request = Request::untargeted(b"query".to_vec());
    let result = exec.execute(&request, &CancellationToken::new()).await;

    assert!(result.is_success());
    let sent = exec.transport().sent.lock();
    let (target, body) = hsdk_core::wire::decode_request(&sent[0].1).unwrap();
    assert!(target.is_empty());
    assert_eq!(body, b"query");
}
