//! Two-point hysteresis control for the boiler relay.
//!
//! The band is `[lower, upper]`.  At or above `upper` the relay is opened
//! (heating off); at or below `lower` it is closed (heating on); inside the
//! band nothing is commanded and the relay keeps whatever state it had.
//!
//! An unreadable temperature is treated as "too hot": the heater is never
//! left running blind.

use crate::limits::Limits;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One temperature reading from the feed.
///
/// `average` is carried for diagnostics only; the decision looks at
/// `current` alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSample {
    /// Latest temperature (°C).
    pub current: f64,
    /// Mean of the feed's history window (°C).
    pub average: f64,
    /// False when the feed could not be read this tick.
    pub valid: bool,
}

impl TemperatureSample {
    /// A successfully read sample.
    pub const fn new(current: f64, average: f64) -> Self {
        Self {
            current,
            average,
            valid: true,
        }
    }

    /// Placeholder for a failed read.  The values are NaN so they can never
    /// pass for a real temperature.
    pub const fn unavailable() -> Self {
        Self {
            current: f64::NAN,
            average: f64::NAN,
            valid: false,
        }
    }

    /// Absolute gap between the instantaneous and the averaged reading.
    /// `None` for an invalid sample.
    pub fn divergence(&self) -> Option<f64> {
        self.valid.then(|| (self.current - self.average).abs())
    }
}

/// Power state of the relay as last observed through the device port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayState {
    On,
    Off,
    /// The device could not be read.  Never a target, never "equal" to one.
    Unknown,
}

impl RelayState {
    pub const fn from_power(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    /// `Some(power)` for a concrete state, `None` for `Unknown`.
    pub const fn power(self) -> Option<bool> {
        match self {
            Self::On => Some(true),
            Self::Off => Some(false),
            Self::Unknown => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// What the controller wants the relay to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Request relay On.
    Open,
    /// Request relay Off.
    Close,
    NoAction,
}

impl Action {
    /// Relay state this action asks for, if any.
    pub const fn target(self) -> Option<RelayState> {
        match self {
            Self::Open => Some(RelayState::On),
            Self::Close => Some(RelayState::Off),
            Self::NoAction => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Map a sample onto an action.  Both bounds are inclusive.
pub fn decide(sample: &TemperatureSample, limits: &Limits) -> Action {
    if !sample.valid {
        return Action::Close;
    }

    if sample.current >= limits.upper() {
        Action::Close
    } else if sample.current <= limits.lower() {
        Action::Open
    } else {
        Action::NoAction
    }
}

/// Whether `action` must be sent to a relay currently in `device`.
///
/// `Unknown` never suppresses a command: equality cannot be proven, so the
/// corrective action goes out.
pub fn should_apply(action: Action, device: RelayState) -> bool {
    match action.target() {
        None => false,
        Some(target) => device == RelayState::Unknown || target != device,
    }
}
