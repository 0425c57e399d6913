//! Relay status-change notifications.
//!
//! Only one "last transition" is kept.  It starts as `None` (no switch seen
//! since startup) and is overwritten every time the relay is actually
//! switched, so the next notification can report how long the previous
//! state lasted.

use core::fmt;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::app::ports::NotifierPort;
use crate::control::{Action, RelayState};

/// A realized relay switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRecord {
    pub from: RelayState,
    pub to: RelayState,
    pub occurred_at: DateTime<Utc>,
}

/// Whole hours, minutes and seconds between two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Elapsed {
    /// Split a number of seconds by successive integer division.
    /// Negative input (clock stepped backwards) counts as zero.
    pub fn from_secs(total: i64) -> Self {
        let total = total.max(0);
        let hours = total / 3600;
        let rem = total % 3600;
        Self {
            hours,
            minutes: rem / 60,
            seconds: rem % 60,
        }
    }

    pub fn between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> Self {
        Self::from_secs((later - earlier).num_seconds())
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} HOURS {} MINUTES {} SECONDS",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Notification text for a switch to `to`.
pub fn switch_message(to: RelayState, elapsed: Option<Elapsed>) -> String {
    let head = match to {
        RelayState::On => "SWITCHED ON",
        RelayState::Off => "SWITCHED OFF",
        RelayState::Unknown => "SWITCHED TO UNKNOWN",
    };
    match elapsed {
        Some(e) => format!("{head} after {e}"),
        None => head.to_owned(),
    }
}

/// Outcome of a realized switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switched {
    /// New "last transition"; replaces the previous one.
    pub record: TransitionRecord,
    pub message: String,
    /// Whether the notifier accepted the message.
    pub delivered: bool,
}

/// Notify about a relay switch that has already been applied.
///
/// Call only after the device accepted the command.  Returns `None` when
/// `applied` does not flip the relay away from `previous`.  A switch out of
/// `Unknown` is notified, but elapsed time is reported only when `last`
/// holds a real earlier switch.  A notifier failure is logged and never
/// cancels the returned record.
pub fn notify_if_changed(
    previous: RelayState,
    applied: Action,
    last: Option<&TransitionRecord>,
    now: DateTime<Utc>,
    notifier: &mut impl NotifierPort,
) -> Option<Switched> {
    let to = applied.target()?;
    if to == previous {
        return None;
    }

    let elapsed = last.map(|record| Elapsed::between(record.occurred_at, now));
    let message = switch_message(to, elapsed);

    let delivered = match notifier.notify(&message) {
        Ok(()) => {
            info!("Notified: {message}");
            true
        }
        Err(e) => {
            warn!("Notification '{message}' not delivered: {e}");
            false
        }
    };

    Some(Switched {
        record: TransitionRecord {
            from: previous,
            to,
            occurred_at: now,
        },
        message,
        delivered,
    })
}
