//! Network adapter.
//!
//! Implements [`NetworkPort`] by composing the WiFi station
//! ([`WifiAdapter`]) with the telemetry transport ([`HttpTransport`]).
//! Serialisation of the record happens here, at the edge, so the domain
//! never handles bytes.

use log::debug;

use crate::app::ports::NetworkPort;
use crate::app::telemetry::TelemetryRecord;
use crate::error::CommsError;

use super::http::HttpTransport;
use super::wifi::WifiAdapter;

pub struct NetworkAdapter {
    wifi: WifiAdapter,
    http: HttpTransport,
}

impl NetworkAdapter {
    pub fn new(wifi: WifiAdapter, http: HttpTransport) -> Self {
        Self { wifi, http }
    }

    pub fn wifi(&self) -> &WifiAdapter {
        &self.wifi
    }

    pub fn wifi_mut(&mut self) -> &mut WifiAdapter {
        &mut self.wifi
    }

    pub fn http(&self) -> &HttpTransport {
        &self.http
    }
}

impl NetworkPort for NetworkAdapter {
    fn is_connected(&self) -> bool {
        self.wifi.is_connected()
    }

    fn connect(&mut self, timeout_ms: u32) -> bool {
        self.wifi.connect(timeout_ms).is_ok()
    }

    fn send(&mut self, record: &TelemetryRecord) -> Result<u16, CommsError> {
        if !self.wifi.is_connected() {
            return Err(CommsError::NotConnected);
        }
        let body = record.to_json()?;
        debug!("HTTP: POST {} ({} bytes)", self.http.url(), body.len());
        self.http.post_json(&body)
    }
}
