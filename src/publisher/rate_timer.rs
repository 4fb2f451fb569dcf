//! Fixed-period publication timer.

/// Tracks the last publication instant of one category.
///
/// A category is due once a full period has elapsed. There is no drift
/// correction: missed cycles are not made up, the next `mark` simply
/// resets the phase to the current time.
#[derive(Debug, Clone)]
pub struct RateTimer {
    last_publish_ms: u64,
    period_ms: u64,
}

impl RateTimer {
    pub fn new(now_ms: u64, period_ms: u64) -> Self {
        Self {
            last_publish_ms: now_ms,
            period_ms,
        }
    }

    /// Whether a full period has elapsed since the last `mark`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_publish_ms) >= self.period_ms
    }

    /// Record a successful publication at `now_ms`.
    pub fn mark(&mut self, now_ms: u64) {
        self.last_publish_ms = now_ms;
    }
}
