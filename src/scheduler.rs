//! Cooperative scheduler.
//!
//! Multiplexes the four node activities on the one and only thread.  Each
//! call to [`Scheduler::tick`] is one iteration: read the clock once, then
//! run the routines in a fixed order.  Nothing suspends; every routine
//! either completes or fails fast inside its own bounded port calls.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     one iteration                            │
//! │                                                              │
//! │  now = clock.now_ms()                                        │
//! │    │                                                         │
//! │    ├─▶ 1. sensor update     if now - last_sample ≥ SENSOR    │
//! │    ├─▶ 2. credential poll   every iteration (edge-triggered) │
//! │    ├─▶ 3. relay timer       every iteration                  │
//! │    └─▶ 4. telemetry         if now - last_sent ≥ TELEMETRY   │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Relay shutoff latency is bounded by the iteration period alone, since
//! step 3 never waits on steps 1, 2 or 4 being due.

use log::info;

use crate::app::ports::{ActuatorPort, ClockPort, EventSink, Millis, NetworkPort, PeripheralPort};
use crate::app::service::AppService;
use crate::app::state::DeviceState;
use crate::config::NodeConfig;

/// Yield between iterations so the idle task can run.
pub const LOOP_YIELD_MS: u32 = 10;

/// The scheduler engine.  Owns the service, and through it the
/// [`DeviceState`], for the lifetime of the process.
pub struct Scheduler {
    service: AppService,
    sensor_period_ms: Millis,
    telemetry_period_ms: Millis,
}

impl Scheduler {
    /// Build the scheduler around an explicitly provided state.
    pub fn new(config: &NodeConfig, state: DeviceState) -> Self {
        info!(
            "Scheduler: sensors every {}ms, telemetry every {}ms, relay pulse {}ms",
            config.sensor_period_ms, config.telemetry_period_ms, config.relay_pulse_ms
        );
        Self {
            service: AppService::new(config, state),
            sensor_period_ms: config.sensor_period_ms as Millis,
            telemetry_period_ms: config.telemetry_period_ms as Millis,
        }
    }

    /// Run one iteration against the live clock.
    ///
    /// The clock is read once up front; a second read at the end only
    /// feeds the slowest-iteration counter.
    pub fn tick(
        &mut self,
        clock: &impl ClockPort,
        hw: &mut (impl PeripheralPort + ActuatorPort),
        net: &mut impl NetworkPort,
        sink: &mut impl EventSink,
    ) {
        let now = clock.now_ms();
        self.run_iteration(now, hw, net, sink);
        let elapsed = clock.now_ms().saturating_sub(now);
        self.service.metrics_mut().record_iteration(elapsed);
    }

    /// One iteration at a caller-supplied `now`.  The step order is fixed
    /// and no step is ever skipped because another one ran.
    pub fn run_iteration(
        &mut self,
        now: Millis,
        hw: &mut (impl PeripheralPort + ActuatorPort),
        net: &mut impl NetworkPort,
        sink: &mut impl EventSink,
    ) {
        // 1. Periodic sensor sample.
        if self.sensor_due(now) {
            self.service.sample_sensors(hw, sink);
            self.service.state_mut().mark_sensor_sampled(now);
        }

        // 2. Credential poll (no-op without a card in the field).
        self.service.detect_credential(now, hw, sink);

        // 3. Relay shutoff.
        self.service.update_relay_timer(now, hw, sink);

        // 4. Periodic telemetry.
        if self.telemetry_due(now) {
            self.service.push_telemetry(net, sink);
            self.service.state_mut().mark_telemetry_sent(now);
        }
    }

    /// Whether the sensor period has elapsed at `now`.
    pub fn sensor_due(&self, now: Millis) -> bool {
        now.saturating_sub(self.service.state().last_sensor_sample_at()) >= self.sensor_period_ms
    }

    /// Whether the telemetry period has elapsed at `now`.
    pub fn telemetry_due(&self, now: Millis) -> bool {
        now.saturating_sub(self.service.state().last_telemetry_sent_at())
            >= self.telemetry_period_ms
    }

    pub fn service(&self) -> &AppService {
        &self.service
    }

    pub fn state(&self) -> &DeviceState {
        self.service.state()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
