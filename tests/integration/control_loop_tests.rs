//! Integration tests for the ControlService → ports pipeline.
//!
//! Drive whole ticks against the mock adapters and check what reached the
//! relay, the notifier and the event sink.

use thermostat::app::events::AppEvent;
use thermostat::app::service::ControlService;
use thermostat::config::SystemConfig;
use thermostat::control::{Action, RelayState, TemperatureSample};
use thermostat::error::Error;
use thermostat::fsm::Phase;
use thermostat::safety::ReadingFault;

use super::mock_ports::{MemoryLimits, MockPorts, RecordingSink, band, epoch, mock_ports};

fn start(ports: &MockPorts) -> (ControlService, RecordingSink) {
    let mut sink = RecordingSink::new();
    let service = ControlService::start(&SystemConfig::default(), &ports.limits, &mut sink)
        .expect("limits available");
    (service, sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_loads_limits_and_enters_polling() {
    let ports = mock_ports(40.0, RelayState::Off);
    let (service, sink) = start(&ports);

    assert_eq!(*service.limits(), band(45.0, 35.0, 10));
    assert_eq!(service.phase(), Phase::Polling);
    assert_eq!(service.tick_count(), 0);
    assert!(service.last_transition().is_none());
    assert!(matches!(sink.events.as_slice(), [AppEvent::Started(_)]));
}

#[test]
fn start_without_limits_is_fatal() {
    let store = MemoryLimits { limits: None };
    let mut sink = RecordingSink::new();
    let err = ControlService::start(&SystemConfig::default(), &store, &mut sink).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(sink.events.is_empty(), "no Started event on failure");
}

// ── Scenario A: too hot, relay on → switched off ──────────────

#[test]
fn hot_relay_on_switches_off_without_elapsed() {
    let mut ports = mock_ports(50.0, RelayState::On);
    let (mut service, mut sink) = start(&ports);

    let report = service.tick(&mut ports, &mut sink);

    assert_eq!(report.action, Action::Close);
    assert!(report.command_issued && report.command_ok && report.notified);
    assert_eq!(ports.device.calls, vec![false]);
    assert_eq!(ports.notifier.messages, vec!["SWITCHED OFF".to_owned()]);

    let record = service.last_transition().expect("switch recorded");
    assert_eq!(record.from, RelayState::On);
    assert_eq!(record.to, RelayState::Off);
    assert_eq!(record.occurred_at, epoch());
}

// ── Scenario B: cold → on, then hot an hour later → off ───────

#[test]
fn elapsed_time_reported_on_next_switch() {
    let mut ports = mock_ports(30.0, RelayState::Off);
    let (mut service, mut sink) = start(&ports);

    let first = service.tick(&mut ports, &mut sink);
    assert_eq!(first.action, Action::Open);
    assert_eq!(ports.device.calls, vec![true]);
    assert_eq!(ports.notifier.messages, vec!["SWITCHED ON".to_owned()]);

    ports.clock.advance(3661);
    ports.readings.set(50.0);
    let second = service.tick(&mut ports, &mut sink);

    assert_eq!(second.device_state, RelayState::On);
    assert_eq!(second.action, Action::Close);
    assert_eq!(ports.device.calls, vec![true, false]);
    assert_eq!(
        ports.notifier.messages[1],
        "SWITCHED OFF after 1 HOURS 1 MINUTES 1 SECONDS"
    );
    assert_eq!(sink.switch_messages(), ports.notifier.messages);
}

// ── Scenario C: feed unreachable → fail safe ──────────────────

#[test]
fn invalid_sample_closes_relay_regardless_of_limits() {
    let mut ports = mock_ports(0.0, RelayState::On);
    // A band the stale value would sit far below: only the invalid flag matters.
    ports.limits = MemoryLimits::new(90.0, 80.0, 10);
    ports.readings.sample = TemperatureSample::unavailable();
    let (mut service, mut sink) = start(&ports);

    let report = service.tick(&mut ports, &mut sink);

    assert_eq!(report.action, Action::Close);
    assert_eq!(ports.device.calls, vec![false]);
    assert_eq!(
        report.fault_flags,
        ReadingFault::FeedUnavailable.mask(),
        "feed fault raised"
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::FaultDetected(1))), 1);
}

#[test]
fn invalid_sample_with_relay_already_off_sends_nothing() {
    let mut ports = mock_ports(0.0, RelayState::Off);
    ports.readings.sample = TemperatureSample::unavailable();
    let (mut service, mut sink) = start(&ports);

    let report = service.tick(&mut ports, &mut sink);

    assert_eq!(report.action, Action::Close);
    assert!(!report.command_issued);
    assert!(ports.device.calls.is_empty());
}

// ── Gate and idempotence ──────────────────────────────────────

#[test]
fn same_action_twice_issues_one_command() {
    let mut ports = mock_ports(50.0, RelayState::On);
    let (mut service, mut sink) = start(&ports);

    service.tick(&mut ports, &mut sink);
    let second = service.tick(&mut ports, &mut sink);

    assert_eq!(second.action, Action::Close);
    assert!(!second.command_issued);
    assert_eq!(ports.device.calls.len(), 1);
    assert_eq!(ports.notifier.messages.len(), 1);
}

#[test]
fn inside_band_leaves_relay_alone() {
    let mut ports = mock_ports(40.0, RelayState::On);
    let (mut service, mut sink) = start(&ports);

    let report = service.tick(&mut ports, &mut sink);

    assert_eq!(report.action, Action::NoAction);
    assert!(ports.device.calls.is_empty());
    assert!(ports.notifier.messages.is_empty());
    assert!(service.last_transition().is_none());
}

#[test]
fn bounds_are_inclusive() {
    let mut ports = mock_ports(45.0, RelayState::On);
    let (mut service, mut sink) = start(&ports);
    assert_eq!(service.tick(&mut ports, &mut sink).action, Action::Close);

    ports.readings.set(35.0);
    assert_eq!(service.tick(&mut ports, &mut sink).action, Action::Open);
    assert_eq!(ports.device.calls, vec![false, true]);
}

#[test]
fn unknown_relay_is_commanded_and_notified() {
    let mut ports = mock_ports(50.0, RelayState::Off);
    ports.device.fail_reads = true;
    let (mut service, mut sink) = start(&ports);

    let report = service.tick(&mut ports, &mut sink);

    assert_eq!(report.device_state, RelayState::Unknown);
    assert_eq!(ports.device.calls, vec![false]);
    // Leaving Unknown counts as a switch; no prior record, so no elapsed time.
    assert_eq!(ports.notifier.messages, vec!["SWITCHED OFF".to_owned()]);
    assert_eq!(report.fault_flags, ReadingFault::DeviceUnreachable.mask());
}

// ── Degraded ports ────────────────────────────────────────────

#[test]
fn failed_command_is_retried_next_tick() {
    let mut ports = mock_ports(50.0, RelayState::On);
    ports.device.fail_commands = true;
    let (mut service, mut sink) = start(&ports);

    let first = service.tick(&mut ports, &mut sink);
    assert!(first.command_issued);
    assert!(!first.command_ok);
    assert!(ports.notifier.messages.is_empty());
    assert!(service.last_transition().is_none());
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::CommandFailed { action: Action::Close, error: Error::Transport(_) }
        )),
        1
    );

    ports.device.fail_commands = false;
    let second = service.tick(&mut ports, &mut sink);
    assert!(second.command_ok);
    assert_eq!(ports.device.calls, vec![false, false]);
    assert_eq!(ports.notifier.messages, vec!["SWITCHED OFF".to_owned()]);
}

#[test]
fn failed_notification_still_records_transition() {
    let mut ports = mock_ports(30.0, RelayState::Off);
    ports.notifier.fail = true;
    let (mut service, mut sink) = start(&ports);

    let first = service.tick(&mut ports, &mut sink);
    assert!(first.command_ok);
    assert!(!first.notified);
    assert_eq!(
        service.last_transition().map(|r| r.to),
        Some(RelayState::On)
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Switched { delivered: false, .. })),
        1
    );

    ports.notifier.fail = false;
    ports.clock.advance(600);
    ports.readings.set(50.0);
    let second = service.tick(&mut ports, &mut sink);
    assert!(second.notified);
    assert_eq!(
        ports.notifier.messages.last().map(String::as_str),
        Some("SWITCHED OFF after 0 HOURS 10 MINUTES 0 SECONDS")
    );
}

#[test]
fn feed_fault_clears_when_feed_returns() {
    let mut ports = mock_ports(40.0, RelayState::Off);
    ports.readings.sample = TemperatureSample::unavailable();
    let (mut service, mut sink) = start(&ports);

    service.tick(&mut ports, &mut sink);
    assert_ne!(service.fault_flags(), 0);

    ports.readings.set(40.0);
    service.tick(&mut ports, &mut sink);
    assert_eq!(service.fault_flags(), 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::FaultCleared)), 1);
}

// ── Refresh schedule ──────────────────────────────────────────

#[test]
fn limits_refresh_on_tenth_tick() {
    let mut ports = mock_ports(40.0, RelayState::Off);
    let (mut service, mut sink) = start(&ports);

    ports.limits = MemoryLimits::new(50.0, 30.0, 5);
    for n in 1..10 {
        let report = service.tick(&mut ports, &mut sink);
        assert!(!report.reload_attempted, "tick {n}");
        assert_eq!(service.counter(), n);
    }
    assert_eq!(*service.limits(), band(45.0, 35.0, 10));

    let tenth = service.tick(&mut ports, &mut sink);
    assert!(tenth.reload_attempted);
    assert_eq!(tenth.tick, 10);
    assert_eq!(service.counter(), 0);
    assert_eq!(*service.limits(), band(50.0, 30.0, 5));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::LimitsReloaded(_))), 1);

    // New interval takes effect for the next cycle.
    for _ in 0..4 {
        assert!(!service.tick(&mut ports, &mut sink).reload_attempted);
    }
    assert!(service.tick(&mut ports, &mut sink).reload_attempted);
}

#[test]
fn failed_refresh_keeps_limits_and_resets_counter() {
    let mut ports = mock_ports(40.0, RelayState::Off);
    let (mut service, mut sink) = start(&ports);
    ports.limits.limits = None;

    for _ in 0..10 {
        service.tick(&mut ports, &mut sink);
    }

    assert_eq!(*service.limits(), band(45.0, 35.0, 10));
    assert_eq!(service.counter(), 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::LimitsReloadFailed(Error::Config(_)))),
        1
    );
    assert_eq!(service.phase(), Phase::Polling);
}

#[test]
fn every_tick_emits_a_report() {
    let mut ports = mock_ports(40.0, RelayState::Off);
    let (mut service, mut sink) = start(&ports);

    for _ in 0..3 {
        service.tick(&mut ports, &mut sink);
    }

    let ticks: Vec<u64> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Tick(r) => Some(r.tick),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![1, 2, 3]);
    assert_eq!(service.tick_count(), 3);
}
