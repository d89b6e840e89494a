//! Device state: the live snapshot the scheduler owns.
//!
//! One instance exists per process.  It is created at boot, moved into the
//! [`Scheduler`](crate::scheduler::Scheduler), and only ever mutated through
//! the service routines, so the single-writer rule holds by construction.

use super::ports::Millis;
use super::telemetry::CredentialToken;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    motion_detected: bool,
    /// Sticky: a failed read never clears it.
    temperature_c: Option<f32>,
    /// Pending for at most one telemetry cycle.
    last_credential_id: Option<CredentialToken>,
    /// `Some` while the relay pulse is outstanding.
    relay_deadline: Option<Millis>,
    last_sensor_sample_at: Millis,
    last_telemetry_sent_at: Millis,
}

impl DeviceState {
    /// Boot state: no readings, relay off, both timers at t=0.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn motion_detected(&self) -> bool {
        self.motion_detected
    }

    pub fn temperature_c(&self) -> Option<f32> {
        self.temperature_c
    }

    pub fn last_credential_id(&self) -> Option<&CredentialToken> {
        self.last_credential_id.as_ref()
    }

    pub fn relay_deadline(&self) -> Option<Millis> {
        self.relay_deadline
    }

    /// Logical relay level at `now`.
    pub fn relay_engaged(&self, now: Millis) -> bool {
        self.relay_deadline.is_some_and(|deadline| now < deadline)
    }

    pub fn last_sensor_sample_at(&self) -> Millis {
        self.last_sensor_sample_at
    }

    pub fn last_telemetry_sent_at(&self) -> Millis {
        self.last_telemetry_sent_at
    }

    // ── Mutations (service and scheduler only) ────────────────

    pub(crate) fn record_motion(&mut self, motion: bool) {
        self.motion_detected = motion;
    }

    pub(crate) fn record_temperature(&mut self, celsius: f32) {
        self.temperature_c = Some(celsius);
    }

    pub(crate) fn record_credential(&mut self, token: CredentialToken) {
        self.last_credential_id = Some(token);
    }

    /// Consume the pending credential once it has been offered to the
    /// collector.
    pub(crate) fn clear_credential(&mut self) {
        self.last_credential_id = None;
    }

    /// Returns `true` if a previous deadline was replaced.
    pub(crate) fn arm_relay(&mut self, deadline: Millis) -> bool {
        self.relay_deadline.replace(deadline).is_some()
    }

    pub(crate) fn disarm_relay(&mut self) {
        self.relay_deadline = None;
    }

    pub(crate) fn mark_sensor_sampled(&mut self, now: Millis) {
        self.last_sensor_sample_at = now;
    }

    pub(crate) fn mark_telemetry_sent(&mut self, now: Millis) {
        self.last_telemetry_sent_at = now;
    }
}
