//! Control laws.
//!
//! Pure decision code: no I/O, no clocks.  The application service feeds
//! these functions with what the ports returned this tick.

pub mod hysteresis;

pub use hysteresis::{Action, RelayState, TemperatureSample, decide, should_apply};
