//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (peripherals, actuators, network, clock, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! and the [`Scheduler`](crate::scheduler::Scheduler) consume them via
//! generics, so the domain core never touches hardware directly.
//!
//! Every call through a port is a bounded, synchronous step: an adapter
//! may busy-wait inside its own read window, but it never yields back to
//! the scheduler mid-call.

use crate::error::{CommsError, SensorError};

use super::telemetry::TelemetryRecord;

/// Monotonic milliseconds since boot.
pub type Millis = u64;

/// Longest identifier a reader can report (triple-size ISO 14443 UID).
pub const MAX_UID_LEN: usize = 10;

/// Raw credential identifier as read from the reader (4, 7 or 10 bytes).
pub type CredentialUid = heapless::Vec<u8, MAX_UID_LEN>;

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Current monotonic time.  Never goes backwards.
    fn now_ms(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Peripheral port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to sample the kiosk sensors.
pub trait PeripheralPort {
    /// Current level of the motion input.  Cannot fail.
    fn sample_motion(&mut self) -> bool;

    /// One temperature read in °C, bounded by the sensor's read window.
    fn sample_temperature(&mut self) -> Result<f32, SensorError>;

    /// Identifier of a credential newly presented to the reader, if any.
    /// Returns `None` in constant time when the field is empty.
    fn poll_credential(&mut self) -> Option<CredentialUid>;

    /// Halt the credential just read so the same tap is not reported again.
    fn release_credential(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: fire-and-forget binary outputs.
pub trait ActuatorPort {
    /// Energise (`true`, unlocked) or release the lock/alarm relay.
    fn set_relay(&mut self, on: bool);

    fn set_buzzer(&mut self, on: bool);

    fn set_indicator(&mut self, on: bool);

    /// Drive every output low (boot-time safe state).
    fn all_off(&mut self) {
        self.set_relay(false);
        self.set_buzzer(false);
        self.set_indicator(false);
    }
}

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: domain → collector)
// ───────────────────────────────────────────────────────────────

pub trait NetworkPort {
    fn is_connected(&self) -> bool;

    /// One connect attempt, giving up after `timeout_ms`.
    /// Returns whether the link is up afterwards.
    fn connect(&mut self, timeout_ms: u32) -> bool;

    /// Perform one request/response exchange carrying `record`.
    /// Returns the collector's status code.
    fn send(&mut self, record: &TelemetryRecord) -> Result<u16, CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
