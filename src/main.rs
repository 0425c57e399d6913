//! Boiler thermostat: main entry point.
//!
//! Hexagonal architecture around a fixed-interval polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HttpFeed        CloudRelay     WebhookNotifier   LimitsFile   │
//! │  (Readings)      (Device)       (Notifier)        (Limits)     │
//! │  SystemClock     LogEventSink                                  │
//! │  (Clock)         (EventSink)                                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlService (pure logic)                 │    │
//! │  │  Phase FSM · Hysteresis · Supervisor · Refresh         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `thermostat [CONFIG]` (default `thermostat.json`).  Log level
//! follows `RUST_LOG`, `info` when unset.
#![deny(unused_must_use)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{LevelFilter, info};

use thermostat::adapters::cloud::CloudRelay;
use thermostat::adapters::feed::HttpFeed;
use thermostat::adapters::limits_file::LimitsFile;
use thermostat::adapters::log_sink::LogEventSink;
use thermostat::adapters::time::SystemClock;
use thermostat::adapters::webhook::WebhookNotifier;
use thermostat::app::ports::Ports;
use thermostat::app::service::ControlService;
use thermostat::config::SystemConfig;

const DEFAULT_CONFIG: &str = "thermostat.json";

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("╔══════════════════════════════════════╗");
    info!("║  Boiler thermostat v{:<17}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let config = SystemConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    info!("Config loaded from {}", config_path.display());

    // ── 3. Adapters ───────────────────────────────────────────
    let mut ports = Ports {
        readings: HttpFeed::new(&config)?,
        device: CloudRelay::new(&config)?,
        notifier: WebhookNotifier::new(&config)?,
        limits: LimitsFile::new(&config.limits_path, config.tick_interval()),
        clock: SystemClock::new(),
    };
    let mut sink = LogEventSink::new();

    // ── 4. Control service ────────────────────────────────────
    let mut service = ControlService::start(&config, &ports.limits, &mut sink)
        .with_context(|| format!("reading limits from {}", config.limits_path.display()))?;

    // ── 5. Main loop (never returns) ──────────────────────────
    service.run(&mut ports, &mut sink)
}
