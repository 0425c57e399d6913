//! Reading supervisor.
//!
//! Runs every tick right after the ports are polled and keeps a latched
//! fault bitmask describing how trustworthy this tick's inputs are.  The
//! faults are diagnostic: the fail-safe behaviour itself lives in
//! [`decide`](crate::control::decide) and
//! [`should_apply`](crate::control::should_apply).
//!
//! ## Fault lifecycle
//!
//! 1. A condition holds (e.g. the feed cannot be read).
//! 2. The supervisor sets the bit and logs at `error!`.
//! 3. Each following tick re-evaluates; once the condition clears the bit
//!    is unset and the recovery logged at `info!`.

use core::fmt;

use log::{error, info};

use crate::control::{RelayState, TemperatureSample};

/// Input faults, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadingFault {
    /// The temperature feed returned no usable sample.
    FeedUnavailable = 0b0000_0001,
    /// The relay state could not be read.
    DeviceUnreachable = 0b0000_0010,
    /// Instantaneous and averaged temperature disagree by more than the
    /// configured threshold; the measurement may be wrong.
    ReadingDivergent = 0b0000_0100,
}

impl ReadingFault {
    pub const ALL: [Self; 3] = [
        Self::FeedUnavailable,
        Self::DeviceUnreachable,
        Self::ReadingDivergent,
    ];

    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ReadingFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeedUnavailable => write!(f, "temperature feed unavailable"),
            Self::DeviceUnreachable => write!(f, "relay device unreachable"),
            Self::ReadingDivergent => write!(f, "current/average readings diverge"),
        }
    }
}

/// Reading supervisor.
#[derive(Debug, Clone)]
pub struct ReadingSupervisor {
    divergence_limit: f64,
    /// Latched fault bitmask.
    faults: u8,
}

impl ReadingSupervisor {
    pub fn new(divergence_limit: f64) -> Self {
        Self {
            divergence_limit,
            faults: 0,
        }
    }

    /// Evaluate this tick's inputs.  Returns the updated fault bitmask.
    pub fn evaluate(&mut self, sample: &TemperatureSample, device: RelayState) -> u8 {
        self.eval_fault(ReadingFault::FeedUnavailable, !sample.valid);
        self.eval_fault(ReadingFault::DeviceUnreachable, device == RelayState::Unknown);

        // Divergence is only meaningful for a sample we actually have.
        let divergent = sample
            .divergence()
            .is_some_and(|gap| gap > self.divergence_limit);
        self.eval_fault(ReadingFault::ReadingDivergent, divergent);

        self.faults
    }

    /// Current fault bitmask.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    /// True if **any** fault is active.
    pub fn has_faults(&self) -> bool {
        self.faults != 0
    }

    /// Check if a specific fault is active.
    pub fn has_fault(&self, fault: ReadingFault) -> bool {
        self.faults & fault.mask() != 0
    }

    // ── Internal ──────────────────────────────────────────────────

    /// Set or clear a fault bit based on a boolean condition.
    fn eval_fault(&mut self, fault: ReadingFault, condition: bool) {
        if condition {
            if self.faults & fault.mask() == 0 {
                error!("READING FAULT SET: {fault}");
            }
            self.faults |= fault.mask();
        } else {
            if self.faults & fault.mask() != 0 {
                info!("READING FAULT CLEARED: {fault}");
            }
            self.faults &= !fault.mask();
        }
    }
}
