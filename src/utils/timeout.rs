//! Async timeout helpers.

use std::future::Future;
use std::time::Duration;

use crate::error::{NetError, Result};

/// Default timeout for a single network operation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound accepted for configured timeouts
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// Run `future` with a deadline, mapping expiry to [`NetError::Timeout`]
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(NetError::Timeout),
    }
}

/// Like [`with_timeout`], but an unset duration waits without bound
pub async fn maybe_timeout<F, T>(duration: Option<Duration>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match duration {
        Some(duration) => with_timeout(duration, future).await,
        None => future.await,
    }
}
