//! Retry policy with exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::FetchError;

/// Backoff strategy for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Fixed delay between retries.
    Fixed {
        delay: Duration,
    },
    /// Exponential delay: `base * (factor ^ attempt)`, capped at `max`,
    /// with optional +/- 50% jitter.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Backoff {
    /// Delay for a 0-based retry attempt.
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt as i32);
                let seconds = base.as_secs_f64() * scale;
                let capped_seconds = seconds.min(max.as_secs_f64());
                let mut delay = Duration::from_secs_f64(capped_seconds);

                if jitter {
                    let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
                    let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                    let total_ms =
                        delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
                    delay = Duration::from_millis(total_ms.max(0) as u64);
                }

                delay
            }
        }
    }
}

/// Configuration for the automatic retry mechanism.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// HTTP status codes that trigger a retry. Anything else surfaces
    /// immediately as a permanent error.
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryConfig {
    /// Provider schedule: three retries at 0.5s, 1.0s, 2.0s on
    /// 429/500/502/503/504.
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(500),
                factor: 2.0,
                max: Duration::from_secs(2),
                jitter: false,
            },
            retry_on_status: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Execute a request, retrying retryable failures per `config`.
///
/// Retryable statuses and retryable transport errors are re-issued after the
/// scheduled backoff; when the budget runs out the last error surfaces. A
/// non-retryable status exits immediately as `FetchError::Permanent`.
pub async fn send_with_retry(
    http: &Arc<dyn HttpClient>,
    request: HttpRequest,
    config: &RetryConfig,
) -> Result<HttpResponse, FetchError> {
    let mut attempt: u32 = 0;
    loop {
        let result = http.execute(request.clone()).await;

        let last_error = match result {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => {
                if !config.should_retry_status(response.status) {
                    return Err(FetchError::Permanent {
                        status: response.status,
                        message: truncate_body(&response.body),
                    });
                }
                FetchError::Transient {
                    status: response.status,
                    message: truncate_body(&response.body),
                }
            }
            Err(error) => {
                if !error.retryable() {
                    return Err(FetchError::Transport(error.message().to_owned()));
                }
                FetchError::Transport(error.message().to_owned())
            }
        };

        if attempt >= config.max_retries {
            return Err(last_error);
        }

        let delay = config.delay_for_attempt(attempt);
        tracing::warn!(
            attempt = attempt + 1,
            max = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %last_error,
            "retrying provider request"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_owned()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_backoff_is_constant() {
        let backoff = Backoff::Fixed {
            delay: Duration::from_millis(100),
        };
        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(5), Duration::from_millis(100));
    }

    #[test]
    fn default_schedule_is_half_one_two_seconds() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(2000));
    }

    #[test]
    fn default_retries_only_transient_statuses() {
        let config = RetryConfig::default();
        for status in [429, 500, 502, 503, 504] {
            assert!(config.should_retry_status(status), "{status} should retry");
        }
        for status in [400, 401, 403, 404] {
            assert!(!config.should_retry_status(status), "{status} must not retry");
        }
    }

    #[test]
    fn jittered_delay_stays_within_half_band() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
            jitter: true,
        };

        for _ in 0..10 {
            for attempt in 0..5 {
                let expected = (100.0 * 2_f64.powi(attempt as i32)).min(1000.0);
                let delay_ms = backoff.delay(attempt).as_millis() as f64;
                assert!(delay_ms >= expected * 0.49);
                assert!(delay_ms <= expected * 1.51);
            }
        }
    }
}
