//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production).  Every line
//! starts with a fixed tag so serial captures can be filtered with grep.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SensorsSampled {
                motion,
                temperature_c,
            } => match temperature_c {
                Some(t) => debug!("MOTION | {} | TEMP {:.1}\u{00b0}C", motion, t),
                None => debug!("MOTION | {} | TEMP n/a", motion),
            },
            AppEvent::TemperatureReadFailed(e) => {
                warn!("TEMP | read failed: {}", e);
            }
            AppEvent::CredentialDetected(token) => {
                info!("CARD | uid={}", token);
            }
            AppEvent::RelayEngaged { until, extended } => {
                info!(
                    "RELAY | on until t={}ms{}",
                    until,
                    if *extended { " (extended)" } else { "" }
                );
            }
            AppEvent::RelayReleased { at } => {
                info!("RELAY | off at t={}ms", at);
            }
            AppEvent::TelemetrySent { status } => {
                info!("TELEM | sent, HTTP {}", status);
            }
            AppEvent::TelemetryFailed(e) => {
                warn!("TELEM | send failed: {}", e);
            }
            AppEvent::TelemetrySkipped => {
                warn!("NET | offline, telemetry cycle skipped");
            }
        }
    }
}
