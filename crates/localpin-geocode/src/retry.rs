//! Retry with exponential back-off and jitter for geocoder requests.

use std::future::Future;
use std::time::Duration;

use crate::error::GeocodeError;

/// Network timeouts, refused connections and 5xx responses are worth another
/// attempt. Anything else (4xx, malformed bodies, bad configuration) is not.
pub(crate) fn is_retriable(err: &GeocodeError) -> bool {
    match err {
        GeocodeError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GeocodeError::Deserialize { .. } | GeocodeError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
///
/// The n-th retry sleeps `backoff_base_ms * 2^(n-1)` with ±25 % jitter,
/// capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, GeocodeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GeocodeError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "geocoder request failed, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
