use std::time::Duration;

use thiserror::Error;

/// Validation and contract errors exposed by `voltick-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("strike price must be a positive finite number: {value}")]
    InvalidStrike { value: f64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("series dates must be strictly increasing: duplicate {date}")]
    DuplicateBarDate { date: time::Date },

    #[error("date range start {from} must not be after end {to}")]
    InvalidDateRange { from: time::Date, to: time::Date },
}

/// Errors surfaced by the market-data fetch layer.
///
/// The taxonomy distinguishes "come back tomorrow" (quota), "retry later"
/// (transient), and "fix your request" (permanent) so the orchestrator can
/// decide per stage whether to abort or degrade.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Daily request budget is spent. Carries the time until the ledger
    /// resets so callers can report when to retry.
    #[error("daily API limit reached, resets in {:.1} hours", .retry_after.as_secs_f64() / 3600.0)]
    QuotaExhausted { retry_after: Duration },

    /// Retryable upstream failure (429/500/502/503/504) that survived the
    /// whole retry budget. Holds the last observed status.
    #[error("provider returned status {status} after retries: {message}")]
    Transient { status: u16, message: String },

    /// Non-retryable upstream failure (401/403/404/...). Surfaced on first
    /// sight, never retried.
    #[error("provider returned status {status}: {message}")]
    Permanent { status: u16, message: String },

    /// Connection, timeout, or body-read failure below the HTTP layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider responded 2xx but the payload did not decode.
    #[error("failed to decode provider payload: {0}")]
    Decode(String),

    /// Well-formed response with no bars for the requested range.
    #[error("no data returned for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FetchError {
    /// True when waiting and re-issuing the same request could succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::QuotaExhausted { .. } | Self::Transient { .. } | Self::Transport(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_error_reports_hours_until_reset() {
        let err = FetchError::QuotaExhausted {
            retry_after: Duration::from_secs(9 * 3600),
        };
        assert_eq!(err.to_string(), "daily API limit reached, resets in 9.0 hours");
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        let err = FetchError::Permanent {
            status: 401,
            message: String::from("unauthorized"),
        };
        assert!(!err.is_retryable());
    }
}
