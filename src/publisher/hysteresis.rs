//! Engine-running hysteresis for the rapid-update category.
//!
//! A stopped engine does not need a 1 Hz stream of zero-rpm messages, but
//! listeners should still see the coast-down. A bounded grace counter keeps
//! the rapid message flowing for a few cycles after the rpm reading drops
//! to zero, then suppresses it until the engine turns again.

/// Number of zero-rpm cycles still published after the engine stops.
pub const COAST_DOWN_CYCLES: u8 = 5;

/// Grace-counter state. One instance per engine, sampled once per rapid
/// due-cycle.
#[derive(Debug, Clone)]
pub struct EngineRunning {
    grace_cycles: u8,
}

impl EngineRunning {
    pub fn new() -> Self {
        Self {
            grace_cycles: COAST_DOWN_CYCLES,
        }
    }

    /// Whether the rapid message should be published for this rpm sample.
    ///
    /// Any positive reading publishes. A zero, negative, or NaN reading
    /// counts as stopped and publishes only while grace cycles remain.
    /// Pure peek: the state moves in [`EngineRunning::commit`], so a
    /// publish attempt retried after a transmit failure sees the same
    /// decision instead of burning the coast-down window.
    pub fn should_publish(&self, rpm: f64) -> bool {
        rpm > 0.0 || self.grace_cycles > 0
    }

    /// Consume the cycle once the publish attempt has completed: a
    /// positive sample refills the counter, a stopped sample burns one
    /// grace cycle (floor 0).
    pub fn commit(&mut self, rpm: f64) {
        if rpm > 0.0 {
            self.grace_cycles = COAST_DOWN_CYCLES;
        } else {
            self.grace_cycles = self.grace_cycles.saturating_sub(1);
        }
    }
}

impl Default for EngineRunning {
    fn default() -> Self {
        Self::new()
    }
}
