//! Daily request quota enforcement.
//!
//! Free-plan providers allow a handful of requests per day. The ledger
//! tracks a per-client count that resets when the wall-clock date advances,
//! and enforces a minimum one-second spacing between consecutive requests.
//! State is owned by the client instance that holds the ledger; clients that
//! must share a budget share the ledger.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use time::OffsetDateTime;

use crate::FetchError;

/// Default daily request budget (provider free plan).
pub const DEFAULT_DAILY_LIMIT: u32 = 5;

/// Minimum spacing between consecutive requests.
pub const MIN_REQUEST_SPACING: Duration = Duration::from_secs(1);

/// Wall-clock source, injectable so date rollover is testable offline.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Production clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Deterministic clock for offline tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("manual clock lock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().expect("manual clock lock poisoned")
    }
}

#[derive(Debug, Default)]
struct QuotaState {
    request_count: u32,
    last_request_time: Option<OffsetDateTime>,
    reset_time: Option<OffsetDateTime>,
}

/// Per-client daily quota ledger.
#[derive(Clone)]
pub struct QuotaLedger {
    clock: Arc<dyn Clock>,
    daily_limit: u32,
    state: Arc<Mutex<QuotaState>>,
}

impl QuotaLedger {
    pub fn new(clock: Arc<dyn Clock>, daily_limit: u32) -> Self {
        Self {
            clock,
            daily_limit,
            state: Arc::new(Mutex::new(QuotaState::default())),
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock), DEFAULT_DAILY_LIMIT)
    }

    pub fn request_count(&self) -> u32 {
        self.state.lock().expect("quota state lock poisoned").request_count
    }

    /// Consume one request from the budget.
    ///
    /// On success returns the pacing delay the caller must sleep before
    /// issuing the request (`None` when spacing is already satisfied). The
    /// count is reset when the current date is strictly past `reset_time`'s
    /// date; `reset_time` is stamped on the first request of each day.
    pub fn try_acquire(&self) -> Result<Option<Duration>, FetchError> {
        let now = self.clock.now();
        let mut state = self.state.lock().expect("quota state lock poisoned");

        if let Some(reset_time) = state.reset_time {
            if now.date() > reset_time.date() {
                state.request_count = 0;
                state.reset_time = None;
            }
        }

        if state.reset_time.is_none() {
            state.reset_time = Some(now);
        }

        if state.request_count >= self.daily_limit {
            let reset_at = state.reset_time.expect("reset_time stamped above") + Duration::from_secs(24 * 3600);
            let retry_after = if reset_at > now {
                Duration::try_from(reset_at - now).unwrap_or(Duration::ZERO)
            } else {
                Duration::ZERO
            };
            return Err(FetchError::QuotaExhausted { retry_after });
        }

        let pacing = state.last_request_time.and_then(|last| {
            let since_last = now - last;
            let since_last = Duration::try_from(since_last).unwrap_or(Duration::ZERO);
            MIN_REQUEST_SPACING.checked_sub(since_last)
        });

        state.request_count += 1;
        state.last_request_time = Some(now);

        Ok(pacing.filter(|delay| !delay.is_zero()))
    }
}
