//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They are local
//! diagnostics only: nothing here is transmitted to the collector.

use crate::error::{CommsError, SensorError};

use super::ports::Millis;
use super::telemetry::CredentialToken;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A sensor tick completed.  `temperature_c` is the retained value.
    SensorsSampled {
        motion: bool,
        temperature_c: Option<f32>,
    },

    /// A temperature read failed; the previous value was kept.
    TemperatureReadFailed(SensorError),

    /// A credential was presented to the reader.
    CredentialDetected(CredentialToken),

    /// The relay was energised until `until`.  `extended` is set when an
    /// outstanding pulse was prolonged rather than started.
    RelayEngaged { until: Millis, extended: bool },

    /// The relay pulse elapsed and the relay was released.
    RelayReleased { at: Millis },

    /// The collector answered with `status`.
    TelemetrySent { status: u16 },

    /// The exchange failed; the record is dropped.
    TelemetryFailed(CommsError),

    /// Offline and the reconnect attempt failed; the cycle was skipped.
    TelemetrySkipped,
}
