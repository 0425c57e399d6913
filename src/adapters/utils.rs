//! Shared helpers for the HTTP adapters.
//!
//! The feed, device and webhook adapters all build the same kind of
//! blocking client and classify failures the same way, so that lives here.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Error, Result};

/// Blocking client with a hard per-request timeout.
pub(super) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("boiler-thermostat/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::transport(format!("cannot build HTTP client: {e}")))
}

/// Classify a client error: a body that would not decode is a protocol
/// problem, everything else (connect, timeout, status) is transport.
pub(super) fn classify(context: &str, e: &reqwest::Error) -> Error {
    if e.is_decode() {
        Error::protocol(format!("{context}: malformed response: {e}"))
    } else if e.is_timeout() {
        Error::transport(format!("{context}: timed out"))
    } else {
        Error::transport(format!("{context}: {e}"))
    }
}

/// Join a base URL and an absolute path without doubling the slash.
pub(super) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
