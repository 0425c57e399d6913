//! System configuration parameters
//!
//! Endpoints, credentials and timing for the thermostat.  Read once at
//! startup from a JSON file; every field has a default so a config file
//! only needs the values that differ.  The control band itself is not
//! here: it lives in the limits file and is re-read while running.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Temperature feed ---
    /// Page publishing the bracketed temperature list
    pub feed_url: String,

    // --- Cloud relay ---
    /// Base URL of the device cloud API
    pub device_api_endpoint: String,
    /// Identifier of the relay device
    pub device_id: String,
    /// Bearer token for the device API
    pub device_access_token: String,
    /// Data-point code of the relay switch
    pub device_switch_code: String,

    // --- Notifications ---
    /// Webhook receiving switch alerts; alerts are only logged when unset
    pub notify_webhook_url: Option<String>,

    // --- Limits ---
    /// `key=value` file holding the control band
    pub limits_path: PathBuf,

    // --- Timing ---
    /// Fixed delay between ticks (seconds)
    pub tick_interval_secs: u64,
    /// Timeout applied to every outbound request (seconds)
    pub request_timeout_secs: u64,

    // --- Diagnostics ---
    /// |current - average| above which a reading is flagged as suspect (°C)
    pub divergence_warn_celsius: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            feed_url: String::new(),

            device_api_endpoint: String::new(),
            device_id: String::new(),
            device_access_token: String::new(),
            device_switch_code: "switch_1".to_owned(),

            notify_webhook_url: None,

            limits_path: PathBuf::from("Limits.txt"),

            tick_interval_secs: 59,
            request_timeout_secs: 10,

            divergence_warn_celsius: 5.0,
        }
    }
}

impl SystemConfig {
    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| Error::config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("feed_url", &self.feed_url),
            ("device_api_endpoint", &self.device_api_endpoint),
            ("device_id", &self.device_id),
            ("device_switch_code", &self.device_switch_code),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{name} must be set")));
            }
        }
        if self.tick_interval_secs == 0 {
            return Err(Error::config("tick_interval_secs must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::config("request_timeout_secs must be positive"));
        }
        if !(self.divergence_warn_celsius.is_finite() && self.divergence_warn_celsius > 0.0) {
            return Err(Error::config("divergence_warn_celsius must be positive"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
