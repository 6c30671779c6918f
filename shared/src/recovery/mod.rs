//! Fault boundary around a single unit of work.
//!
//! A request or queue record runs on its own task so that a panic inside the
//! service is caught at the join point instead of tearing down the runtime.
//! An optional deadline aborts the task when it runs past its budget.

use std::any::Any;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::error;

use crate::error::Fault;

/// Body returned to callers whenever a fault is recovered.
pub const INTERNAL_ERROR_BODY: &str = r#"{"error":"Internal server error"}"#;

/// Runs `fut` on its own task and reports panics and overruns as [`Fault`]s.
pub async fn run_guarded<T, F>(fut: F, deadline: Option<Duration>) -> Result<T, Fault>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut task = tokio::spawn(fut);

    let joined = match deadline {
        Some(limit) => match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                task.abort();
                error!("Unit of work exceeded its deadline of {:?}", limit);
                return Err(Fault::DeadlineExceeded(limit));
            }
        },
        None => task.await,
    };

    match joined {
        Ok(value) => Ok(value),
        Err(err) if err.is_panic() => {
            let message = panic_message(err.into_panic());
            error!("Recovered from panic: {}", message);
            Err(Fault::Panicked(message))
        }
        Err(_) => Err(Fault::Cancelled),
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Time left until a deadline given in milliseconds since the Unix epoch.
///
/// Zero means no deadline was supplied. A deadline already in the past
/// leaves a zero budget.
pub fn remaining(deadline_ms: u64) -> Option<Duration> {
    if deadline_ms == 0 {
        return None;
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Some(Duration::from_millis(deadline_ms).saturating_sub(now))
}
