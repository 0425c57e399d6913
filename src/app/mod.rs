//! Application core: pure domain orchestration, zero direct I/O.
//!
//! This module contains the control loop for the boiler relay: polling,
//! the hysteresis decision, the apply gate, switch notifications and the
//! periodic limits refresh.  All interaction with the network and the
//! filesystem happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without a real device.

pub mod events;
pub mod ports;
pub mod service;
