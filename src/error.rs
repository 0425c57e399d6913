//! Unified error types for the thermostat controller.
//!
//! A single `Error` enum that every port and adapter converts into, keeping
//! the control loop's failure handling uniform.  Each variant maps to one
//! degraded behaviour of the loop:
//!
//! | Variant     | Steady-state policy                          |
//! |-------------|----------------------------------------------|
//! | `Transport` | log, continue with fail-safe defaults        |
//! | `Protocol`  | log, continue with fail-safe defaults        |
//! | `Config`    | fatal at startup, keep old limits on refresh |
//! | `Notify`    | log only, never touches control state        |

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The temperature feed or device API was unreachable or timed out.
    Transport(String),
    /// A response arrived but its shape was malformed.
    Protocol(String),
    /// The limits or system configuration is missing or unparseable.
    Config(String),
    /// The notification transport failed.
    Notify(String),
}

impl Error {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    /// Short class tag used in log lines and events.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::Config(_) => "config",
            Self::Notify(_) => "notify",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Protocol(msg) => write!(f, "protocol: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Notify(msg) => write!(f, "notify: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
