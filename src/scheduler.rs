//! Limits refresh scheduler.
//!
//! Counts control ticks and signals when the limits file is due to be
//! re-read.  The counter always satisfies `0 <= counter < interval`; it
//! wraps to zero on the tick that fires, whether or not the reload that
//! follows succeeds.
//!
//! ```text
//!  tick ──▶ counter+1 ──┬── < interval ──▶ keep counting
//!                       └── = interval ──▶ counter = 0, reload
//! ```

use log::debug;

/// Advance `counter` by one tick.
///
/// Returns the new counter and whether a reload is due.  A counter that
/// is already at or past `interval` (the interval shrank) fires at once.
pub fn tick(counter: u32, refresh_interval_ticks: u32) -> (u32, bool) {
    let next = counter.saturating_add(1);
    if next >= refresh_interval_ticks {
        (0, true)
    } else {
        (next, false)
    }
}

/// Stateful wrapper around [`tick`] owned by the control service.
#[derive(Debug, Clone, Default)]
pub struct RefreshScheduler {
    counter: u32,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Ticks counted since the last reload.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Count one tick against `refresh_interval_ticks`.
    /// Returns `true` when the limits must be reloaded now.
    pub fn advance(&mut self, refresh_interval_ticks: u32) -> bool {
        let (next, due) = tick(self.counter, refresh_interval_ticks);
        self.counter = next;
        if due {
            debug!("Scheduler: limits reload due (every {refresh_interval_ticks} ticks)");
        }
        due
    }
}
