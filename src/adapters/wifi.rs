//! WiFi station-mode adapter.
//!
//! Owns the credentials and the station driver.  Joining is one bounded
//! attempt: issue the connect, then poll the link every
//! [`CONNECT_POLL_MS`] until it is up or the caller's window closes.
//! There is no background reconnect; the telemetry routine decides when
//! to try again.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use log::{info, warn};

use crate::config::{NodeConfig, is_printable_ascii};
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

/// Link poll interval while a join is in flight.
pub const CONNECT_POLL_MS: u32 = 300;

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn validate_ssid(ssid: &str) -> Result<(), CommsError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(CommsError::NoCredentials);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CommsError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CommsError::NoCredentials);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    attempts: u32,
    #[cfg(target_os = "espidf")]
    wifi: EspWifi<'static>,
    #[cfg(target_os = "espidf")]
    configured: bool,
    /// Simulation: whether the access point answers joins.
    #[cfg(not(target_os = "espidf"))]
    sim_reachable: bool,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(config: &NodeConfig, wifi: EspWifi<'static>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: config.wifi_ssid.clone(),
            password: config.wifi_password.clone(),
            attempts: 0,
            wifi,
            configured: false,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: config.wifi_ssid.clone(),
            password: config.wifi_password.clone(),
            attempts: 0,
            sim_reachable: true,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Join attempts made so far, successful or not.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_connected()
    }

    /// One join attempt bounded by `timeout_ms`.
    pub fn connect(&mut self, timeout_ms: u32) -> Result<(), CommsError> {
        validate_ssid(&self.ssid)?;
        validate_password(&self.password)?;
        if self.is_connected() {
            return Ok(());
        }

        self.attempts = self.attempts.saturating_add(1);
        info!("WiFi: connecting to '{}' (attempt {})", self.ssid, self.attempts);
        self.state = WifiState::Connecting;

        match self.platform_connect(timeout_ms) {
            Ok(()) => {
                self.state = WifiState::Connected;
                info!("WiFi: connected (RSSI={:?})", self.rssi());
                Ok(())
            }
            Err(e) => {
                warn!("WiFi: join failed: {}", e);
                self.state = WifiState::Failed;
                Err(e)
            }
        }
    }

    pub fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
    }

    pub fn rssi(&self) -> Option<i8> {
        if self.state != WifiState::Connected {
            return None;
        }
        self.platform_rssi()
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, timeout_ms: u32) -> Result<(), CommsError> {
        use esp_idf_svc::hal::delay::FreeRtos;

        if !self.configured {
            let auth_method = if self.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            let client = ClientConfiguration {
                ssid: self
                    .ssid
                    .as_str()
                    .try_into()
                    .map_err(|_| CommsError::NoCredentials)?,
                password: self
                    .password
                    .as_str()
                    .try_into()
                    .map_err(|_| CommsError::NoCredentials)?,
                auth_method,
                ..Default::default()
            };
            self.wifi
                .set_configuration(&Configuration::Client(client))
                .map_err(|_| CommsError::ConnectFailed)?;
            self.wifi.start().map_err(|_| CommsError::ConnectFailed)?;
            self.configured = true;
        }

        self.wifi.connect().map_err(|_| CommsError::ConnectFailed)?;

        let mut waited = 0u32;
        while waited < timeout_ms {
            if self.platform_is_connected() {
                return Ok(());
            }
            FreeRtos::delay_ms(CONNECT_POLL_MS);
            waited = waited.saturating_add(CONNECT_POLL_MS);
        }
        if self.platform_is_connected() {
            return Ok(());
        }

        // Abandon the pending join so the next attempt starts clean.
        let _ = self.wifi.disconnect();
        Err(CommsError::ConnectTimedOut)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, _timeout_ms: u32) -> Result<(), CommsError> {
        if self.sim_reachable {
            info!("WiFi(sim): connected to '{}'", self.ssid);
            Ok(())
        } else {
            Err(CommsError::ConnectTimedOut)
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.wifi.disconnect() {
            warn!("WiFi: disconnect failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        info!("WiFi(sim): disconnected");
    }

    /// Associated and holding an IP lease.
    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim_reachable
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        use esp_idf_svc::sys::{ESP_OK, esp_wifi_sta_get_ap_info, wifi_ap_record_t};

        let mut ap_info = wifi_ap_record_t::default();
        // SAFETY: ap_info is a valid out-pointer for the duration of the call.
        let ret = unsafe { esp_wifi_sta_get_ap_info(&mut ap_info) };
        (ret == ESP_OK).then_some(ap_info.rssi)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        Some(-60)
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Make the simulated access point reachable or not.  Going
    /// unreachable drops an established link.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_reachable(&mut self, reachable: bool) {
        self.sim_reachable = reachable;
        if !reachable && self.state == WifiState::Connected {
            self.state = WifiState::Disconnected;
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ssid: &str, password: &str) -> NodeConfig {
        let mut c = NodeConfig::default();
        c.wifi_ssid = ssid.try_into().unwrap();
        c.wifi_password = password.try_into().unwrap();
        c
    }

    #[test]
    fn rejects_missing_ssid() {
        let mut wifi = WifiAdapter::new(&config("", ""));
        assert_eq!(wifi.connect(15_000), Err(CommsError::NoCredentials));
        assert_eq!(wifi.attempts(), 0);
    }

    #[test]
    fn rejects_short_password() {
        let mut wifi = WifiAdapter::new(&config("BranchNet", "short"));
        assert_eq!(wifi.connect(15_000), Err(CommsError::NoCredentials));
    }

    #[test]
    fn open_network_accepts_empty_password() {
        let mut wifi = WifiAdapter::new(&config("LobbyOpen", ""));
        assert!(wifi.connect(15_000).is_ok());
        assert_eq!(wifi.state(), WifiState::Connected);
    }

    #[test]
    fn unreachable_ap_fails_the_attempt() {
        let mut wifi = WifiAdapter::new(&config("BranchNet", "s3cretpass"));
        wifi.sim_set_reachable(false);
        assert_eq!(wifi.connect(15_000), Err(CommsError::ConnectTimedOut));
        assert_eq!(wifi.state(), WifiState::Failed);
        assert!(!wifi.is_connected());
        assert!(wifi.rssi().is_none());
    }

    #[test]
    fn link_loss_is_observed() {
        let mut wifi = WifiAdapter::new(&config("BranchNet", "s3cretpass"));
        wifi.connect(15_000).unwrap();
        assert!(wifi.is_connected());
        wifi.sim_set_reachable(false);
        assert!(!wifi.is_connected());
        wifi.sim_set_reachable(true);
        wifi.connect(15_000).unwrap();
        assert_eq!(wifi.attempts(), 2);
    }

    #[test]
    fn connect_when_up_is_a_no_op() {
        let mut wifi = WifiAdapter::new(&config("BranchNet", "s3cretpass"));
        wifi.connect(15_000).unwrap();
        wifi.connect(15_000).unwrap();
        assert_eq!(wifi.attempts(), 1);
        wifi.disconnect();
        assert_eq!(wifi.state(), WifiState::Disconnected);
    }
}
