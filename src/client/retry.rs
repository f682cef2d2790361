//! Bounded retry with exponential backoff.
//!
//! Retries wrap transport attempts only. A completed HTTP exchange is a
//! success at this layer no matter what status code came back; non-200
//! statuses are handled by the orchestrator and never retried.

use crate::TokengateError;
use std::time::Duration;
use tracing::warn;

/// Delay slept before the given zero-indexed attempt.
///
/// No delay before the first attempt, then `base * 2^(attempt - 1)`:
/// with a 1-second base that is 0 ms, 1000 ms, 2000 ms.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    if attempt == 0 {
        Duration::ZERO
    } else {
        base * 2u32.saturating_pow(attempt - 1)
    }
}

/// Run `op` up to `max_attempts` times, sleeping the backoff delay
/// before each retry.
///
/// Stops on the first success; if every attempt fails, the last
/// attempt's error is returned.
pub fn with_retry<T, F>(
    max_attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, TokengateError>
where
    F: FnMut() -> Result<T, TokengateError>,
{
    let mut last_error = None;

    for attempt in 0..max_attempts {
        let delay = backoff_delay(attempt, base_delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    error = %e,
                    "transport attempt failed"
                );
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| TokengateError::NetworkError("no attempts were made".to_string())))
}
