//! Runtime diagnostics.
//!
//! Counters maintained by the service routines and the scheduler.  They
//! live in RAM only and reset on every boot.  A snapshot is written to the
//! log once per telemetry cycle.

use log::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeMetrics {
    pub iterations: u64,
    /// Longest single scheduler iteration observed.
    pub slowest_iteration_ms: u64,
    pub sensor_samples: u32,
    pub temperature_failures: u32,
    pub credentials_detected: u32,
    pub telemetry_sent: u32,
    pub telemetry_failed: u32,
    /// Cycles dropped because the reconnect attempt failed.
    pub telemetry_skipped: u32,
    /// Status of the most recent completed exchange.
    pub last_status: Option<u16>,
}

impl RuntimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_iteration(&mut self, elapsed_ms: u64) {
        self.iterations = self.iterations.wrapping_add(1);
        if elapsed_ms > self.slowest_iteration_ms {
            self.slowest_iteration_ms = elapsed_ms;
        }
    }

    pub fn record_sensor_sample(&mut self, temperature_ok: bool) {
        self.sensor_samples = self.sensor_samples.wrapping_add(1);
        if !temperature_ok {
            self.temperature_failures = self.temperature_failures.wrapping_add(1);
        }
    }

    pub fn record_credential(&mut self) {
        self.credentials_detected = self.credentials_detected.wrapping_add(1);
    }

    pub fn record_sent(&mut self, status: u16) {
        self.telemetry_sent = self.telemetry_sent.wrapping_add(1);
        self.last_status = Some(status);
    }

    pub fn record_failed(&mut self) {
        self.telemetry_failed = self.telemetry_failed.wrapping_add(1);
    }

    pub fn record_skipped(&mut self) {
        self.telemetry_skipped = self.telemetry_skipped.wrapping_add(1);
    }

    /// Write the counters plus free heap to the debug log.
    pub fn log_snapshot(&self) {
        debug!(
            "DIAG | iter={} slowest={}ms | samples={} temp_fail={} | cards={} | \
             sent={} failed={} skipped={} last={:?} | heap_free={}",
            self.iterations,
            self.slowest_iteration_ms,
            self.sensor_samples,
            self.temperature_failures,
            self.credentials_detected,
            self.telemetry_sent,
            self.telemetry_failed,
            self.telemetry_skipped,
            self.last_status,
            free_heap(),
        );
    }
}

#[cfg(target_os = "espidf")]
fn free_heap() -> u32 {
    unsafe { esp_idf_svc::sys::esp_get_free_heap_size() }
}

/// Host builds have no meaningful heap figure.
#[cfg(not(target_os = "espidf"))]
fn free_heap() -> u32 {
    0
}
