//! Limits file adapter.
//!
//! Reads the `key=value` limits file from disk on every call, so edits made
//! while the controller runs are picked up at the next scheduled refresh.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;

use crate::app::ports::LimitsPort;
use crate::error::{Error, Result};
use crate::limits::{Limits, parse_limits};

/// [`LimitsPort`] backed by a text file.
#[derive(Debug, Clone)]
pub struct LimitsFile {
    path: PathBuf,
    tick_interval: Duration,
}

impl LimitsFile {
    /// `tick_interval` converts the refresh period from minutes to ticks.
    pub fn new(path: impl Into<PathBuf>, tick_interval: Duration) -> Self {
        Self {
            path: path.into(),
            tick_interval,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LimitsPort for LimitsFile {
    fn load_limits(&self) -> Result<Limits> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", self.path.display())))?;
        let limits = parse_limits(&text, self.tick_interval).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {msg}", self.path.display())),
            other => other,
        })?;
        debug!("Read limits from {}: {limits:?}", self.path.display());
        Ok(limits)
    }
}
