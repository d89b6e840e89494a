//! Application service: the four update routines.
//!
//! [`AppService`] owns the [`DeviceState`] and the runtime counters.  Each
//! routine is a single bounded step: it reads through a port, updates the
//! state, drives outputs, and returns.  Failures are absorbed inside the
//! routine (logged and emitted as events) so the next routine always runs.
//!
//! ```text
//!  PeripheralPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                     │        AppService         │
//!    ActuatorPort ◀── │  sensors · card · relay   │ ──▶ NetworkPort
//!                     │  telemetry                │
//!                     └──────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::{DeviceId, NodeConfig};
use crate::diagnostics::RuntimeMetrics;

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, Millis, NetworkPort, PeripheralPort};
use super::state::DeviceState;
use super::telemetry::{TelemetryRecord, render_uid};

pub struct AppService {
    state: DeviceState,
    device_id: DeviceId,
    relay_pulse_ms: Millis,
    connect_timeout_ms: u32,
    metrics: RuntimeMetrics,
}

impl AppService {
    /// Take ownership of `state`.  Only `device_id`, `relay_pulse_ms`
    /// and `connect_timeout_ms` are read from `config`.
    pub fn new(config: &NodeConfig, state: DeviceState) -> Self {
        Self {
            state,
            device_id: config.device_id.clone(),
            relay_pulse_ms: config.relay_pulse_ms as Millis,
            connect_timeout_ms: config.connect_timeout_ms,
            metrics: RuntimeMetrics::new(),
        }
    }

    // ── Sensor update ─────────────────────────────────────────

    /// Sample motion and temperature.  Buzzer and indicator mirror the
    /// motion level immediately; a failed temperature read keeps the last
    /// good value.
    pub fn sample_sensors(
        &mut self,
        hw: &mut (impl PeripheralPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        let motion = hw.sample_motion();
        self.state.record_motion(motion);
        hw.set_buzzer(motion);
        hw.set_indicator(motion);
        if motion {
            info!("Motion detected!");
        }

        let temperature_ok = match hw.sample_temperature() {
            Ok(celsius) => {
                self.state.record_temperature(celsius);
                info!("Temp: {:.1} \u{00b0}C", celsius);
                true
            }
            Err(e) => {
                warn!("Temperature read failed: {}", e);
                sink.emit(&AppEvent::TemperatureReadFailed(e));
                false
            }
        };
        self.metrics.record_sensor_sample(temperature_ok);

        sink.emit(&AppEvent::SensorsSampled {
            motion,
            temperature_c: self.state.temperature_c(),
        });
    }

    // ── Credential detection ──────────────────────────────────

    /// Edge-triggered: no-op unless the reader reports a new credential.
    /// A detection (re)arms the relay pulse; an outstanding pulse is
    /// prolonged, never restarted.
    pub fn detect_credential(
        &mut self,
        now: Millis,
        hw: &mut (impl PeripheralPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        let Some(uid) = hw.poll_credential() else {
            return;
        };
        if uid.is_empty() {
            debug!("Reader reported an empty UID, ignoring");
            hw.release_credential();
            return;
        }

        let token = render_uid(&uid);
        info!("Card UID: {}", token);
        self.state.record_credential(token.clone());

        let until = now.saturating_add(self.relay_pulse_ms);
        hw.set_relay(true);
        let extended = self.state.arm_relay(until);

        hw.release_credential();
        self.metrics.record_credential();

        sink.emit(&AppEvent::CredentialDetected(token));
        sink.emit(&AppEvent::RelayEngaged { until, extended });
    }

    // ── Relay timer ───────────────────────────────────────────

    /// Release the relay once its deadline has passed.  Side-effect free
    /// while no pulse is pending or the deadline lies in the future.
    pub fn update_relay_timer(
        &mut self,
        now: Millis,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match self.state.relay_deadline() {
            Some(deadline) if now >= deadline => {
                hw.set_relay(false);
                self.state.disarm_relay();
                sink.emit(&AppEvent::RelayReleased { at: now });
            }
            _ => {}
        }
    }

    // ── Telemetry ─────────────────────────────────────────────

    /// One telemetry cycle.  Offline → a single bounded reconnect; still
    /// offline → the cycle is dropped and the pending credential is kept.
    /// Once a send is attempted the pending credential is consumed,
    /// whatever the outcome.
    pub fn push_telemetry(&mut self, net: &mut impl NetworkPort, sink: &mut impl EventSink) {
        if !net.is_connected() {
            info!("Telemetry: network down, reconnecting");
            if !net.connect(self.connect_timeout_ms) {
                warn!("Telemetry: still offline, cycle dropped");
                self.metrics.record_skipped();
                sink.emit(&AppEvent::TelemetrySkipped);
                return;
            }
        }

        let record = self.build_telemetry();
        match net.send(&record) {
            Ok(status) => {
                info!("POST \u{2192} HTTP {}", status);
                self.metrics.record_sent(status);
                sink.emit(&AppEvent::TelemetrySent { status });
            }
            Err(e) => {
                warn!("POST failed: {}", e);
                self.metrics.record_failed();
                sink.emit(&AppEvent::TelemetryFailed(e));
            }
        }

        // At most one report per detection, even when the send failed.
        self.state.clear_credential();
        self.metrics.log_snapshot();
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the current state as a telemetry record.
    pub fn build_telemetry(&self) -> TelemetryRecord {
        TelemetryRecord {
            device: self.device_id.clone(),
            motion: self.state.motion_detected(),
            temp: self.state.temperature_c(),
            uid: self.state.last_credential_id().cloned(),
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    pub fn metrics(&self) -> &RuntimeMetrics {
        &self.metrics
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut RuntimeMetrics {
        &mut self.metrics
    }
}
