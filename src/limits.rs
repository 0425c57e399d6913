//! Temperature band and refresh cadence.
//!
//! Limits live in a plain `key=value` text file so they can be edited on
//! the box while the controller runs:
//!
//! ```text
//! Upper_Limit = 45
//! Lower_Limit = 35
//! Update_Interval_Minutes = 10
//! ```
//!
//! The refresh interval is stored in minutes and converted to control
//! ticks using the configured tick period.

use std::time::Duration;

use crate::error::{Error, Result};

pub const UPPER_KEY: &str = "Upper_Limit";
pub const LOWER_KEY: &str = "Lower_Limit";
pub const INTERVAL_KEY: &str = "Update_Interval_Minutes";

/// Validated control band.  `upper > lower` and `refresh_interval_ticks >= 1`
/// always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    upper: f64,
    lower: f64,
    refresh_interval_ticks: u32,
}

impl Limits {
    pub fn new(upper: f64, lower: f64, refresh_interval_ticks: u32) -> Result<Self> {
        if !upper.is_finite() || !lower.is_finite() {
            return Err(Error::config(format!(
                "limits must be finite (upper={upper}, lower={lower})"
            )));
        }
        if upper <= lower {
            return Err(Error::config(format!(
                "{UPPER_KEY} ({upper}) must be above {LOWER_KEY} ({lower})"
            )));
        }
        if refresh_interval_ticks == 0 {
            return Err(Error::config("refresh interval must be at least one tick"));
        }
        Ok(Self {
            upper,
            lower,
            refresh_interval_ticks,
        })
    }

    pub const fn upper(&self) -> f64 {
        self.upper
    }

    pub const fn lower(&self) -> f64 {
        self.lower
    }

    pub const fn refresh_interval_ticks(&self) -> u32 {
        self.refresh_interval_ticks
    }
}

/// Convert a refresh interval in minutes into whole control ticks
/// (rounded, never below one).
pub fn minutes_to_ticks(minutes: f64, tick_interval: Duration) -> Result<u32> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(Error::config(format!(
            "{INTERVAL_KEY} must be a positive number, got {minutes}"
        )));
    }
    let tick_secs = tick_interval.as_secs_f64();
    if tick_secs <= 0.0 {
        return Err(Error::config("tick interval must be positive"));
    }
    let ticks = (minutes * 60.0 / tick_secs).round();
    if ticks > f64::from(u32::MAX) {
        return Err(Error::config(format!("{INTERVAL_KEY} too large: {minutes}")));
    }
    Ok((ticks as u32).max(1))
}

/// Parse the limits file body.
///
/// Blank lines and `#` comments are skipped, unknown keys are ignored, and
/// a non-empty line without `=` is malformed.  All three known keys are
/// required.
pub fn parse_limits(text: &str, tick_interval: Duration) -> Result<Limits> {
    let mut upper = None;
    let mut lower = None;
    let mut minutes = None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(Error::config(format!(
                "line {}: expected `key=value`, got `{line}`",
                lineno + 1
            )));
        };
        let slot = match key.trim() {
            UPPER_KEY => &mut upper,
            LOWER_KEY => &mut lower,
            INTERVAL_KEY => &mut minutes,
            _ => continue,
        };
        let value = value.trim();
        let parsed: f64 = value.parse().map_err(|_| {
            Error::config(format!(
                "line {}: `{}` is not numeric: `{value}`",
                lineno + 1,
                key.trim()
            ))
        })?;
        *slot = Some(parsed);
    }

    let upper = upper.ok_or_else(|| Error::config(format!("missing {UPPER_KEY}")))?;
    let lower = lower.ok_or_else(|| Error::config(format!("missing {LOWER_KEY}")))?;
    let minutes = minutes.ok_or_else(|| Error::config(format!("missing {INTERVAL_KEY}")))?;

    Limits::new(upper, lower, minutes_to_ticks(minutes, tick_interval)?)
}
