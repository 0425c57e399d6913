//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: log them, append them to a
//! file, publish them, etc.

use crate::control::{Action, RelayState, TemperatureSample};
use crate::error::Error;
use crate::limits::Limits;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Initial limits loaded; the loop is about to start polling.
    Started(Limits),

    /// Summary of one completed tick.
    Tick(TickReport),

    /// The relay was switched and the notifier was asked to report it.
    Switched {
        to: RelayState,
        message: String,
        delivered: bool,
    },

    /// The device refused or never received a switch command.
    CommandFailed { action: Action, error: Error },

    /// New limits were read on a scheduled refresh.
    LimitsReloaded(Limits),

    /// A scheduled refresh failed; the previous limits stay in force.
    LimitsReloadFailed(Error),

    /// One or more reading faults were raised (new bitmask).
    FaultDetected(u8),

    /// All reading faults have been cleared.
    FaultCleared,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    pub sample: TemperatureSample,
    /// Relay state observed while polling.
    pub device_state: RelayState,
    pub action: Action,
    /// A set-power call was issued to the device.
    pub command_issued: bool,
    /// The set-power call succeeded.
    pub command_ok: bool,
    /// A switch notification was delivered.
    pub notified: bool,
    /// The limits were re-read this tick (successfully or not).
    pub reload_attempted: bool,
    /// Reading fault bitmask after this tick.
    pub fault_flags: u8,
}
