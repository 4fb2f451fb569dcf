//! Monotonic clock abstraction. The scheduler only ever compares
//! millisecond timestamps from `now_ms`, so tests can inject a manually
//! advanced clock and drive the publication schedule deterministically.

/// Timing primitives required by the publication scheduler: a monotonic
/// millisecond timestamp and an asynchronous delay.
pub trait MonotonicClock {
    /// Milliseconds elapsed since an arbitrary fixed origin. Never decreases.
    fn now_ms(&self) -> u64;

    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(
        &'a mut self,
        millis: u32,
    ) -> impl core::future::Future<Output = ()> + 'a;
}

/// [`MonotonicClock`] backed by `embassy-time`, for targets with an embassy
/// time driver linked in.
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }

    async fn delay_ms(&mut self, millis: u32) {
        embassy_time::Timer::after_millis(millis as u64).await;
    }
}
