//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` in production).  Each record
//! starts with a fixed tag so the output can be grepped per event class.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(limits) => {
                info!(
                    "START | upper={:.1}\u{00b0}C lower={:.1}\u{00b0}C | refresh_every={} ticks",
                    limits.upper(),
                    limits.lower(),
                    limits.refresh_interval_ticks(),
                );
            }
            AppEvent::Tick(t) => {
                info!(
                    "TICK | n={} | T={} avg={} | relay={:?} | action={:?} | \
                     cmd={} | notified={} | reload={} | faults=0b{:08b}",
                    t.tick,
                    fmt_temp(t.sample.valid, t.sample.current),
                    fmt_temp(t.sample.valid, t.sample.average),
                    t.device_state,
                    t.action,
                    match (t.command_issued, t.command_ok) {
                        (false, _) => "none",
                        (true, true) => "ok",
                        (true, false) => "failed",
                    },
                    t.notified,
                    t.reload_attempted,
                    t.fault_flags,
                );
            }
            AppEvent::Switched {
                to,
                message,
                delivered,
            } => {
                info!("SWITCH | to={to:?} | delivered={delivered} | {message}");
            }
            AppEvent::CommandFailed { action, error: e } => {
                warn!("SWITCH | action={action:?} failed | kind={} | {e}", e.kind());
            }
            AppEvent::LimitsReloaded(limits) => {
                info!(
                    "RELOAD | upper={:.1}\u{00b0}C lower={:.1}\u{00b0}C | refresh_every={} ticks",
                    limits.upper(),
                    limits.lower(),
                    limits.refresh_interval_ticks(),
                );
            }
            AppEvent::LimitsReloadFailed(e) => {
                error!("RELOAD | failed, keeping previous limits | {e}");
            }
            AppEvent::FaultDetected(flags) => {
                warn!("FAULT | detected, flags=0b{flags:08b}");
            }
            AppEvent::FaultCleared => {
                info!("FAULT | all cleared");
            }
        }
    }
}

fn fmt_temp(valid: bool, value: f64) -> String {
    if valid {
        format!("{value:.1}\u{00b0}C")
    } else {
        "n/a".to_owned()
    }
}
