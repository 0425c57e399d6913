//! Wall-clock adapter.
//!
//! Supplies UTC timestamps for relay transition records.  Only differences
//! between two readings are ever shown to a user, so the zone is irrelevant.

use chrono::{DateTime, Utc};

use crate::app::ports::ClockPort;

/// [`ClockPort`] reading the host system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
