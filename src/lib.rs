//! Boiler thermostat library.
//!
//! Two-point hysteresis controller that switches a cloud-connected relay
//! from a web temperature feed.  The pure control core lives in `app`,
//! `control`, `fsm`, `safety`, `scheduler` and `transition`; everything
//! that touches the network or the filesystem sits behind the port traits
//! in [`app::ports`] and is implemented in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod limits;
pub mod safety;
pub mod scheduler;
pub mod transition;

pub use error::{Error, Result};
