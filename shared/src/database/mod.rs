//! Startup connection to the relational store.
//!
//! The store may not be reachable yet when the process starts, so both
//! opening the connection and the liveness probe are retried with
//! exponential backoff until they succeed or the retry budget runs out.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::error::{BoxError, ConnectError, RetryError, Stage};

pub mod postgres;

pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(5_000);
const MAX_JITTER_MS: u64 = 10;

/// How long to keep retrying and how far apart attempts may drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_duration: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_duration: Duration) -> Self {
        Self {
            max_duration,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Wait after the given failed attempt (1-based): `(attempt + 1)²` ms plus
    /// up to 10ms of jitter, never more than `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let step = u64::from(attempt.saturating_add(1));
        let jitter = rand::random::<u64>() % MAX_JITTER_MS;
        let wait = Duration::from_millis(step.saturating_mul(step).saturating_add(jitter));
        wait.min(self.max_backoff)
    }
}

/// A successful retried value and the number of attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retried<T> {
    pub value: T,
    pub attempts: u32,
}

/// Calls `op` until it succeeds or `policy.max_duration` elapses.
///
/// Attempts run one at a time. The loop races a deadline timer; when the
/// timer wins, the attempt in flight is dropped and the last observed error
/// is returned.
pub async fn retry_result<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<Retried<T>, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    if policy.max_duration.is_zero() {
        return Err(RetryError::InvalidDuration);
    }

    let mut attempts: u32 = 0;
    let mut last_error: Option<E> = None;

    let outcome = tokio::time::timeout(policy.max_duration, async {
        loop {
            attempts += 1;
            match op().await {
                Ok(value) => return value,
                Err(err) => {
                    let wait = policy.backoff(attempts);
                    debug!("Attempt {} failed, retrying in {:?}: {}", attempts, wait, err);
                    last_error = Some(err);
                    tokio::time::sleep(wait).await;
                }
            }
        }
    })
    .await;

    match outcome {
        Ok(value) => Ok(Retried { value, attempts }),
        Err(_) => match last_error {
            Some(last) => Err(RetryError::Exhausted {
                attempts,
                max_duration: policy.max_duration,
                last,
            }),
            None => Err(RetryError::DeadlineExceeded {
                attempts,
                max_duration: policy.max_duration,
            }),
        },
    }
}

/// Unit form of [`retry_result`]; returns the attempt count.
pub async fn retry<E, F, Fut>(policy: &RetryPolicy, op: F) -> Result<u32, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    retry_result(policy, op).await.map(|retried| retried.attempts)
}

/// Something that can open, probe and close a store connection.
#[async_trait]
pub trait Connect: Send + Sync {
    type Handle: Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn open(&self) -> Result<Self::Handle, Self::Error>;

    async fn ping(&self, handle: &Self::Handle) -> Result<(), Self::Error>;

    async fn close(&self, handle: Self::Handle);
}

/// Opens a connection and health-checks it, retrying both steps.
///
/// If the liveness probe never succeeds the opened handle is closed before
/// the error is returned.
pub async fn connect<C: Connect>(
    connector: &C,
    policy: &RetryPolicy,
) -> Result<C::Handle, ConnectError> {
    if policy.max_duration.is_zero() {
        return Err(ConnectError::InvalidRetryDuration(policy.max_duration));
    }

    info!("Attempting to connect to database");
    let opened = retry_result(policy, || connector.open())
        .await
        .map_err(|err| exhausted(Stage::Connect, policy, err))?;
    info!("Successfully connected to database: retry_count={}", opened.attempts);

    let handle = opened.value;

    info!("Attempting to ping database");
    let pinged = retry(policy, || connector.ping(&handle)).await;
    match pinged {
        Ok(attempts) => {
            info!("Successfully pinged database: retry_count={}", attempts);
        }
        Err(err) => {
            error!("Database never answered ping, closing connection");
            connector.close(handle).await;
            return Err(exhausted(Stage::Ping, policy, err));
        }
    }

    info!("Database connection established");
    Ok(handle)
}

fn exhausted<E>(stage: Stage, policy: &RetryPolicy, err: RetryError<E>) -> ConnectError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ConnectError::Exhausted {
        stage,
        max_duration: policy.max_duration,
        attempts: err.attempts(),
        source: BoxError::from(err),
    }
}
