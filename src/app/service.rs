//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns every piece of state that survives a tick: the
//! limits in force, the refresh counter, the last relay transition, the
//! reading supervisor and the phase machine.  Nothing else mutates them.
//! All I/O flows through the port traits lent in via [`Ports`].
//!
//! ```text
//!  ReadingsPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                   │        ControlService        │
//!   DevicePort ◀──▶ │ decide · gate · notify ·     │ ──▶ NotifierPort
//!                   │ refresh · supervisor         │
//!   LimitsPort ───▶ └──────────────────────────────┘ ◀── ClockPort
//! ```
//!
//! A tick never fails.  Every port failure is turned into a degraded
//! behaviour at its source: unreadable temperature closes the relay, an
//! unreadable relay is commanded anyway, a failed command or notification
//! is retried naturally on the next tick, and a failed refresh keeps the
//! previous limits.

use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::SystemConfig;
use crate::control::{Action, RelayState, TemperatureSample, decide, should_apply};
use crate::error::Result;
use crate::fsm::{Fsm, Phase};
use crate::limits::Limits;
use crate::safety::ReadingSupervisor;
use crate::scheduler::RefreshScheduler;
use crate::transition::{TransitionRecord, notify_if_changed};

use super::events::{AppEvent, TickReport};
use super::ports::{
    ClockPort, DevicePort, EventSink, LimitsPort, NotifierPort, Ports, ReadingsPort,
};

/// Result of the Applying phase.
#[derive(Debug, Clone, Copy, Default)]
struct Applied {
    issued: bool,
    ok: bool,
    notified: bool,
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control service orchestrates all domain logic.
#[derive(Debug)]
pub struct ControlService {
    fsm: Fsm,
    limits: Limits,
    scheduler: RefreshScheduler,
    supervisor: ReadingSupervisor,
    last_transition: Option<TransitionRecord>,
    tick_interval: Duration,
}

impl ControlService {
    // ── Lifecycle ─────────────────────────────────────────────

    /// Load the initial limits and enter the polling phase.
    ///
    /// There is no safe default band, so a limits failure here is fatal
    /// and returned to the caller.
    pub fn start(
        config: &SystemConfig,
        store: &impl LimitsPort,
        sink: &mut impl EventSink,
    ) -> Result<Self> {
        let mut fsm = Fsm::new();

        let limits = store.load_limits().inspect_err(|e| {
            error!("Cannot load initial limits: {e}");
        })?;
        info!(
            "Limits loaded: upper={} lower={} refresh every {} ticks",
            limits.upper(),
            limits.lower(),
            limits.refresh_interval_ticks()
        );

        fsm.transition(Phase::Polling);
        sink.emit(&AppEvent::Started(limits));

        Ok(Self {
            fsm,
            limits,
            scheduler: RefreshScheduler::new(),
            supervisor: ReadingSupervisor::new(config.divergence_warn_celsius),
            last_transition: None,
            tick_interval: config.tick_interval(),
        })
    }

    /// Tick forever, sleeping the fixed tick interval after each one.
    ///
    /// A tick always runs to completion, including its sleep; stopping the
    /// process is the only way out.
    pub fn run<R, D, N, L, C>(
        &mut self,
        ports: &mut Ports<R, D, N, L, C>,
        sink: &mut impl EventSink,
    ) -> !
    where
        R: ReadingsPort,
        D: DevicePort,
        N: NotifierPort,
        L: LimitsPort,
        C: ClockPort,
    {
        info!("Control loop running, one tick every {:?}", self.tick_interval);
        loop {
            self.tick(ports, sink);
            std::thread::sleep(self.tick_interval);
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cycle: poll → decide → apply → (reload).
    pub fn tick<R, D, N, L, C>(
        &mut self,
        ports: &mut Ports<R, D, N, L, C>,
        sink: &mut impl EventSink,
    ) -> TickReport
    where
        R: ReadingsPort,
        D: DevicePort,
        N: NotifierPort,
        L: LimitsPort,
        C: ClockPort,
    {
        // 1. Polling: the two reads are independent.
        let sample = ports.readings.read_temperature();
        let device_state = ports.device.read_state();
        debug!(
            "Polled: current={:.2} average={:.2} valid={} relay={:?}",
            sample.current, sample.average, sample.valid, device_state
        );
        let fault_flags = self.supervise(&sample, device_state, sink);

        // 2. Deciding
        self.fsm.transition(Phase::Deciding);
        let action = decide(&sample, &self.limits);

        // 3. Applying
        self.fsm.transition(Phase::Applying);
        let applied = self.apply(
            action,
            device_state,
            &mut ports.device,
            &mut ports.notifier,
            &ports.clock,
            sink,
        );

        // 4. Reloading, when due
        let reload_attempted = self
            .scheduler
            .advance(self.limits.refresh_interval_ticks());
        if reload_attempted {
            self.fsm.transition(Phase::Reloading);
            self.reload(&ports.limits, sink);
        }

        self.fsm.transition(Phase::Polling);

        let report = TickReport {
            tick: self.fsm.tick_count(),
            sample,
            device_state,
            action,
            command_issued: applied.issued,
            command_ok: applied.ok,
            notified: applied.notified,
            reload_attempted,
            fault_flags,
        };
        sink.emit(&AppEvent::Tick(report));
        report
    }

    // ── Queries ───────────────────────────────────────────────

    /// Limits currently in force.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Ticks counted towards the next limits refresh.
    pub fn counter(&self) -> u32 {
        self.scheduler.counter()
    }

    /// The most recent realized relay switch, if any.
    pub fn last_transition(&self) -> Option<&TransitionRecord> {
        self.last_transition.as_ref()
    }

    /// Current loop phase.
    pub fn phase(&self) -> Phase {
        self.fsm.current()
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.fsm.tick_count()
    }

    /// Current reading fault bitmask (0 = inputs healthy).
    pub fn fault_flags(&self) -> u8 {
        self.supervisor.faults()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    // ── Internal ──────────────────────────────────────────────

    fn supervise(
        &mut self,
        sample: &TemperatureSample,
        device_state: RelayState,
        sink: &mut impl EventSink,
    ) -> u8 {
        let before = self.supervisor.faults();
        let after = self.supervisor.evaluate(sample, device_state);
        if after & !before != 0 {
            sink.emit(&AppEvent::FaultDetected(after));
        } else if before != 0 && after == 0 {
            sink.emit(&AppEvent::FaultCleared);
        }
        after
    }

    /// Send `action` to the relay when the gate allows it, then record and
    /// report the switch.
    fn apply(
        &mut self,
        action: Action,
        device_state: RelayState,
        device: &mut impl DevicePort,
        notifier: &mut impl NotifierPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Applied {
        if !should_apply(action, device_state) {
            return Applied::default();
        }
        let Some(power) = action.target().and_then(RelayState::power) else {
            return Applied::default();
        };

        if let Err(e) = device.set_power(power) {
            warn!("Relay command {action:?} failed, retrying next tick: {e}");
            sink.emit(&AppEvent::CommandFailed { action, error: e });
            return Applied {
                issued: true,
                ..Applied::default()
            };
        }
        info!("Relay commanded {action:?} (was {device_state:?})");

        let mut applied = Applied {
            issued: true,
            ok: true,
            notified: false,
        };
        if let Some(switched) = notify_if_changed(
            device_state,
            action,
            self.last_transition.as_ref(),
            clock.now(),
            notifier,
        ) {
            applied.notified = switched.delivered;
            self.last_transition = Some(switched.record);
            sink.emit(&AppEvent::Switched {
                to: switched.record.to,
                message: switched.message,
                delivered: switched.delivered,
            });
        }
        applied
    }

    /// Re-read the limits.  On failure the limits in force are kept.
    fn reload(&mut self, store: &impl LimitsPort, sink: &mut impl EventSink) {
        match store.load_limits() {
            Ok(limits) => {
                if limits == self.limits {
                    debug!("Limits unchanged after refresh");
                } else {
                    info!(
                        "Limits updated: upper {} -> {}, lower {} -> {}, refresh {} -> {} ticks",
                        self.limits.upper(),
                        limits.upper(),
                        self.limits.lower(),
                        limits.lower(),
                        self.limits.refresh_interval_ticks(),
                        limits.refresh_interval_ticks()
                    );
                }
                self.limits = limits;
                sink.emit(&AppEvent::LimitsReloaded(limits));
            }
            Err(e) => {
                error!(
                    "Limits refresh failed, keeping upper={} lower={}: {e}",
                    self.limits.upper(),
                    self.limits.lower()
                );
                sink.emit(&AppEvent::LimitsReloadFailed(e));
            }
        }
    }
}
