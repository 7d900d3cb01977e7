//! Bounded retry with jittered backoff
//!
//! Retryable failures (optimistic-concurrency conflicts, transient store
//! unavailability) are retried up to the configured bound; everything
//! else surfaces immediately. Jitter spreads competing writers apart.

use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::config::ValidatorConfig;
use crate::error::{ConcurrencyConflict, EdmError, Result};

/// Run `operation` until it succeeds, fails non-retryably, or the retry
/// bound is reached.
pub fn with_retries<T, F>(config: &ValidatorConfig, name: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut attempts: u32 = 0;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) => {
                attempts += 1;
                if attempts > config.max_write_retries {
                    warn!(operation = name, attempts, last_error = %err, "retry budget exhausted");
                    return Err(EdmError::Conflict(ConcurrencyConflict::RetriesExhausted {
                        attempts,
                    }));
                }
                let jitter = rand::thread_rng().gen_range(0..=config.retry_backoff_ms);
                let delay = config.retry_backoff_ms * u64::from(attempts) + jitter;
                debug!(operation = name, attempts, delay_ms = delay, "retrying after conflict");
                thread::sleep(Duration::from_millis(delay));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreUnavailable;

    fn fast_config() -> ValidatorConfig {
        ValidatorConfig {
            max_write_retries: 3,
            retry_backoff_ms: 0,
            ..ValidatorConfig::default()
        }
    }

    #[test]
    fn test_success_passes_through() {
        let result = with_retries(&fast_config(), "noop", || Ok(7));
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_retries_then_succeeds() {
        let mut calls = 0;
        let result = with_retries(&fast_config(), "flaky", || {
            calls += 1;
            if calls < 3 {
                Err(EdmError::Unavailable(StoreUnavailable {
                    reason: "transient".into(),
                }))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_non_retryable_fails_immediately() {
        let mut calls = 0;
        let result: Result<()> = with_retries(&fast_config(), "bad-input", || {
            calls += 1;
            Err(EdmError::UnknownCollection("nope".into()))
        });
        assert!(matches!(result, Err(EdmError::UnknownCollection(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_budget_exhaustion_surfaces_conflict() {
        let mut calls = 0;
        let result: Result<()> = with_retries(&fast_config(), "contended", || {
            calls += 1;
            Err(EdmError::Unavailable(StoreUnavailable {
                reason: "still down".into(),
            }))
        });
        match result {
            Err(EdmError::Conflict(ConcurrencyConflict::RetriesExhausted { attempts })) => {
                assert_eq!(attempts, 4);
            }
            other => panic!("Expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(calls, 4);
    }
}
