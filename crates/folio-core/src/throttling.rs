use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces batch calls so a run never exceeds `limit` calls per `window`.
///
/// Pacing only delays; nothing is queued for retry.
#[derive(Clone)]
pub struct BatchPacer {
    limiter: Arc<DirectRateLimiter>,
}

impl BatchPacer {
    pub fn new(window: Duration, limit: u32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(window, limit))),
        }
    }

    /// Generous default for the IEX Cloud free tier.
    pub fn iex_default() -> Self {
        Self::new(Duration::from_secs(1), 10)
    }

    /// Waits until the next call is allowed.
    pub async fn ready(&self) {
        self.limiter.until_ready().await;
    }

    /// Takes a slot if one is free right now.
    pub fn try_ready(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for BatchPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchPacer").finish_non_exhaustive()
    }
}

fn quota_from_window(window: Duration, limit: u32) -> Quota {
    let safe_limit = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);

    let seconds_per_cell = (window.as_secs_f64() / f64::from(safe_limit.get())).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(safe_limit))
        .allow_burst(safe_limit)
}
