//! Mock port adapters for integration tests.
//!
//! Every mock records what the control service asked of it so tests can
//! assert on the full call history without a feed, a relay or a webhook.

use std::cell::Cell;

use chrono::{DateTime, Duration, TimeZone, Utc};

use thermostat::app::events::AppEvent;
use thermostat::app::ports::{
    ClockPort, DevicePort, EventSink, LimitsPort, NotifierPort, Ports, ReadingsPort,
};
use thermostat::control::{RelayState, TemperatureSample};
use thermostat::error::{Error, Result};
use thermostat::limits::Limits;

// ── MockFeed ──────────────────────────────────────────────────

/// Returns whatever sample the test put in it.
pub struct MockFeed {
    pub sample: TemperatureSample,
}

impl MockFeed {
    pub fn reading(current: f64) -> Self {
        Self {
            sample: TemperatureSample::new(current, current),
        }
    }

    pub fn set(&mut self, current: f64) {
        self.sample = TemperatureSample::new(current, current);
    }
}

impl ReadingsPort for MockFeed {
    fn read_temperature(&mut self) -> TemperatureSample {
        self.sample
    }
}

// ── MockDevice ────────────────────────────────────────────────

/// Relay that follows accepted commands, like the real device.
pub struct MockDevice {
    pub state: RelayState,
    /// `read_state` reports `Unknown` while set.
    pub fail_reads: bool,
    /// `set_power` fails with a transport error while set.
    pub fail_commands: bool,
    /// Every `set_power` argument, accepted or not.
    pub calls: Vec<bool>,
}

impl MockDevice {
    pub fn new(state: RelayState) -> Self {
        Self {
            state,
            fail_reads: false,
            fail_commands: false,
            calls: Vec::new(),
        }
    }
}

impl DevicePort for MockDevice {
    fn read_state(&mut self) -> RelayState {
        if self.fail_reads {
            RelayState::Unknown
        } else {
            self.state
        }
    }

    fn set_power(&mut self, on: bool) -> Result<()> {
        self.calls.push(on);
        if self.fail_commands {
            return Err(Error::transport("device API timed out"));
        }
        self.state = RelayState::from_power(on);
        Ok(())
    }
}

// ── MockNotifier ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockNotifier {
    /// Every message handed to the notifier, delivered or not.
    pub messages: Vec<String>,
    pub fail: bool,
}

impl NotifierPort for MockNotifier {
    fn notify(&mut self, message: &str) -> Result<()> {
        self.messages.push(message.to_owned());
        if self.fail {
            Err(Error::notify("webhook answered 500"))
        } else {
            Ok(())
        }
    }
}

// ── MemoryLimits ──────────────────────────────────────────────

/// Limits store; `None` behaves like a missing file.
pub struct MemoryLimits {
    pub limits: Option<Limits>,
}

impl MemoryLimits {
    pub fn new(upper: f64, lower: f64, ticks: u32) -> Self {
        Self {
            limits: Some(band(upper, lower, ticks)),
        }
    }
}

impl LimitsPort for MemoryLimits {
    fn load_limits(&self) -> Result<Limits> {
        self.limits
            .ok_or_else(|| Error::config("cannot read Limits.txt: not found"))
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Clock that only moves when the test says so.
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(epoch()),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.now.set(self.now.get() + Duration::seconds(secs));
    }
}

impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn switch_messages(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Switched { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub type MockPorts = Ports<MockFeed, MockDevice, MockNotifier, MemoryLimits, ManualClock>;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap()
}

pub fn band(upper: f64, lower: f64, ticks: u32) -> Limits {
    Limits::new(upper, lower, ticks).unwrap()
}

pub fn mock_ports(current: f64, device: RelayState) -> MockPorts {
    Ports {
        readings: MockFeed::reading(current),
        device: MockDevice::new(device),
        notifier: MockNotifier::default(),
        limits: MemoryLimits::new(45.0, 35.0, 10),
        clock: ManualClock::new(),
    }
}
