//! Control-loop phase machine.
//!
//! ```text
//!             ┌──────────┐
//!             │ Starting │  load initial limits (fatal on failure)
//!             └────┬─────┘
//!                  ▼
//!   ┌────────▶ ┌─────────┐  read temperature + relay state
//!   │          │ Polling │
//!   │          └────┬────┘
//!   │               ▼
//!   │          ┌──────────┐  decide()
//!   │          │ Deciding │
//!   │          └────┬─────┘
//!   │               ▼
//!   │          ┌──────────┐  should_apply() → set_power() → notify
//!   ├───────── │ Applying │
//!   │          └────┬─────┘
//!   │               ▼ (refresh due)
//!   │          ┌───────────┐  reload limits, keep old ones on failure
//!   └───────── │ Reloading │
//!              └───────────┘
//! ```
//!
//! There is no terminal phase: the loop only ends when the process is
//! stopped.  The machine only tracks and validates the sequencing; the
//! work of each phase is done by
//! [`ControlService`](crate::app::service::ControlService).

use log::{debug, warn};

/// Enumeration of all loop phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Starting = 0,
    Polling = 1,
    Deciding = 2,
    Applying = 3,
    Reloading = 4,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Polling => "Polling",
            Self::Deciding => "Deciding",
            Self::Applying => "Applying",
            Self::Reloading => "Reloading",
        }
    }

    /// Whether the loop may move from `self` to `next`.
    pub const fn can_enter(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Self::Starting, Self::Polling)
                | (Self::Polling, Self::Deciding)
                | (Self::Deciding, Self::Applying)
                | (Self::Applying, Self::Polling | Self::Reloading)
                | (Self::Reloading, Self::Polling)
        )
    }
}

/// The phase tracker owned by the control service.
#[derive(Debug, Clone)]
pub struct Fsm {
    current: Phase,
    /// Completed ticks (wraps at u64::MAX).
    tick_count: u64,
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new()
    }
}

impl Fsm {
    pub fn new() -> Self {
        Self {
            current: Phase::Starting,
            tick_count: 0,
        }
    }

    /// The current phase.
    pub fn current(&self) -> Phase {
        self.current
    }

    /// Ticks completed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Move to `next`.
    ///
    /// An out-of-order move is a bug in the caller: it trips a debug
    /// assertion and is logged in release builds, where the move still
    /// happens so the loop keeps running.
    pub fn transition(&mut self, next: Phase) {
        if !self.current.can_enter(next) {
            debug_assert!(
                false,
                "illegal phase transition {} -> {}",
                self.current.name(),
                next.name()
            );
            warn!(
                "FSM: illegal transition {} -> {}",
                self.current.name(),
                next.name()
            );
        }
        debug!("FSM transition: {} -> {}", self.current.name(), next.name());

        if next == Phase::Polling && self.current != Phase::Starting {
            self.tick_count = self.tick_count.wrapping_add(1);
        }
        self.current = next;
    }
}
