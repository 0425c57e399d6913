//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Adapters (HTTP feed, cloud relay API, webhook, limits file, clock, log)
//! implement these traits.  The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the core never touches the network or
//! the filesystem directly.
//!
//! Every port call is blocking and bounded: adapters enforce their own
//! timeouts and report a timeout exactly like a connection failure.

use chrono::{DateTime, Utc};

use crate::control::{RelayState, TemperatureSample};
use crate::error::Result;
use crate::limits::Limits;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Readings port (driven adapter: temperature feed → domain)
// ───────────────────────────────────────────────────────────────

/// Supplies the current and average temperature.
pub trait ReadingsPort {
    /// Read the feed.  Fails closed: any transport or format error yields
    /// [`TemperatureSample::unavailable`] instead of an error.
    fn read_temperature(&mut self) -> TemperatureSample;
}

// ───────────────────────────────────────────────────────────────
// Device port (driven adapter: domain ↔ smart relay)
// ───────────────────────────────────────────────────────────────

/// Reads and commands the relay.
pub trait DevicePort {
    /// Current relay state.  Connection failures and malformed responses
    /// come back as [`RelayState::Unknown`], never as an error.
    fn read_state(&mut self) -> RelayState;

    /// Switch the relay.  The caller tolerates failure and does not retry
    /// within the same tick.
    fn set_power(&mut self, on: bool) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Notifier port (driven adapter: domain → alert channel)
// ───────────────────────────────────────────────────────────────

/// Best-effort, fire-and-forget alerts on relay switches.
pub trait NotifierPort {
    fn notify(&mut self, message: &str) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Limits port (driven adapter: limits store → domain)
// ───────────────────────────────────────────────────────────────

/// Loads the control band.
pub trait LimitsPort {
    /// Read and validate the limits.  Missing or malformed data is an
    /// [`Error::Config`](crate::error::Error::Config).
    fn load_limits(&self) -> Result<Limits>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source for transition timestamps.
pub trait ClockPort {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (log, file, MQTT, ...).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// Every port the control loop calls, owned by the caller and lent to
/// the service one tick at a time.
pub struct Ports<R, D, N, L, C> {
    pub readings: R,
    pub device: D,
    pub notifier: N,
    pub limits: L,
    pub clock: C,
}
