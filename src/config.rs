//! Node configuration parameters
//!
//! All tunable parameters for the ATM-Guard node.  Values are baked in at
//! build time from `ATM_*` environment variables (see [`BuildEnv`]) and
//! fall back to the defaults below.  There is no runtime reconfiguration
//! and nothing is persisted across restarts.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Static device identifier reported in every telemetry record.
pub type DeviceId = heapless::String<32>;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Network ---
    /// WiFi SSID (1-32 printable ASCII bytes)
    pub wifi_ssid: heapless::String<32>,
    /// WiFi passphrase (empty for open networks, else 8-64 bytes)
    pub wifi_password: heapless::String<64>,
    /// Telemetry collector endpoint
    pub api_url: heapless::String<128>,
    /// Sent as `X-API-KEY` when non-empty
    pub api_key: heapless::String<64>,

    // --- Identity ---
    /// Device identifier; empty means "derive from the factory MAC"
    pub device_id: DeviceId,

    // --- Timing ---
    /// Sensor sampling period (milliseconds)
    pub sensor_period_ms: u32,
    /// Telemetry transmission period (milliseconds)
    pub telemetry_period_ms: u32,
    /// Relay on-time after a credential tap (milliseconds)
    pub relay_pulse_ms: u32,
    /// Upper bound on one WiFi connect attempt (milliseconds)
    pub connect_timeout_ms: u32,
}

const DEFAULT_API_URL: &str = "http://192.168.1.20:4000/api/telemetry";
const DEFAULT_DEVICE_ID: &str = "atm-node-01";

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),
            api_url: bounded(DEFAULT_API_URL),
            api_key: heapless::String::new(),

            device_id: bounded(DEFAULT_DEVICE_ID),

            // Timing
            sensor_period_ms: 2_000,    // 0.5 Hz
            telemetry_period_ms: 5_000, // every 5 s
            relay_pulse_ms: 3_000,
            connect_timeout_ms: 15_000,
        }
    }
}

/// Raw overrides captured from the build environment.
///
/// Each field is `None` when the corresponding variable was unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildEnv<'a> {
    pub wifi_ssid: Option<&'a str>,
    pub wifi_password: Option<&'a str>,
    pub api_url: Option<&'a str>,
    pub api_key: Option<&'a str>,
    pub device_id: Option<&'a str>,
    pub sensor_period_ms: Option<&'a str>,
    pub telemetry_period_ms: Option<&'a str>,
    pub relay_pulse_ms: Option<&'a str>,
}

impl BuildEnv<'static> {
    /// Overrides compiled into this firmware image.
    pub const fn captured() -> Self {
        Self {
            wifi_ssid: option_env!("ATM_WIFI_SSID"),
            wifi_password: option_env!("ATM_WIFI_PASS"),
            api_url: option_env!("ATM_API_URL"),
            api_key: option_env!("ATM_API_KEY"),
            device_id: option_env!("ATM_DEVICE_ID"),
            sensor_period_ms: option_env!("ATM_SENSOR_PERIOD_MS"),
            telemetry_period_ms: option_env!("ATM_TELEMETRY_PERIOD_MS"),
            relay_pulse_ms: option_env!("ATM_RELAY_PULSE_MS"),
        }
    }
}

impl NodeConfig {
    /// Configuration baked into this image, validated.
    pub fn from_build_env() -> crate::error::Result<Self> {
        let config = Self::from_overrides(&BuildEnv::captured())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides on top of [`NodeConfig::default`].  Does not validate.
    pub fn from_overrides(env: &BuildEnv<'_>) -> Result<Self, ConfigError> {
        let mut c = Self::default();

        if let Some(v) = env.wifi_ssid {
            c.wifi_ssid = try_bounded(v, "wifi_ssid")?;
        }
        if let Some(v) = env.wifi_password {
            c.wifi_password = try_bounded(v, "wifi_password")?;
        }
        if let Some(v) = env.api_url {
            c.api_url = try_bounded(v, "api_url")?;
        }
        if let Some(v) = env.api_key {
            c.api_key = try_bounded(v, "api_key")?;
        }
        if let Some(v) = env.device_id {
            c.device_id = try_bounded(v, "device_id")?;
        }
        if let Some(v) = env.sensor_period_ms {
            c.sensor_period_ms = parse_ms(v, "sensor_period_ms")?;
        }
        if let Some(v) = env.telemetry_period_ms {
            c.telemetry_period_ms = parse_ms(v, "telemetry_period_ms")?;
        }
        if let Some(v) = env.relay_pulse_ms {
            c.relay_pulse_ms = parse_ms(v, "relay_pulse_ms")?;
        }
        Ok(c)
    }

    /// Reject values the scheduler or the network adapters cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("sensor_period_ms"));
        }
        if self.telemetry_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("telemetry_period_ms"));
        }
        if self.relay_pulse_ms == 0 {
            return Err(ConfigError::ValidationFailed("relay_pulse_ms"));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("connect_timeout_ms"));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed("api_url"));
        }
        if !is_printable_ascii(&self.api_key) {
            return Err(ConfigError::ValidationFailed("api_key"));
        }
        if !is_printable_ascii(&self.device_id) {
            return Err(ConfigError::ValidationFailed("device_id"));
        }
        // An empty SSID is allowed: the node then runs offline and only
        // actuates locally.
        if !is_printable_ascii(&self.wifi_ssid) {
            return Err(ConfigError::ValidationFailed("wifi_ssid"));
        }
        let pass_len = self.wifi_password.len();
        if pass_len != 0 && !(8..=64).contains(&pass_len) {
            return Err(ConfigError::ValidationFailed("wifi_password"));
        }
        Ok(())
    }

    /// Whether outgoing requests carry an `X-API-KEY` header.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Returns `true` if every byte of `s` is in the printable ASCII range
/// `0x20..=0x7E` (space through tilde, inclusive).
pub(crate) fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn parse_ms(raw: &str, field: &'static str) -> Result<u32, ConfigError> {
    raw.trim()
        .replace('_', "")
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidNumber(field))
}

fn try_bounded<const N: usize>(
    raw: &str,
    field: &'static str,
) -> Result<heapless::String<N>, ConfigError> {
    let mut s = heapless::String::new();
    s.push_str(raw).map_err(|_| ConfigError::TooLong(field))?;
    Ok(s)
}

/// Compile-time constants only: truncation cannot happen for the defaults.
fn bounded<const N: usize>(raw: &str) -> heapless::String<N> {
    let mut s = heapless::String::new();
    let _ = s.push_str(&raw[..raw.len().min(N)]);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = NodeConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.device_id.as_str(), "atm-node-01");
        assert_eq!(c.sensor_period_ms, 2_000);
        assert_eq!(c.telemetry_period_ms, 5_000);
        assert_eq!(c.relay_pulse_ms, 3_000);
        assert!(!c.has_api_key());
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = NodeConfig::default();
        assert!(
            c.sensor_period_ms < c.telemetry_period_ms,
            "sensors should be sampled more often than telemetry is sent"
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let env = BuildEnv {
            wifi_ssid: Some("KioskNet"),
            wifi_password: Some("hunter2hunter2"),
            api_key: Some("abc123"),
            device_id: Some("atm-node-07"),
            telemetry_period_ms: Some("10_000"),
            ..BuildEnv::default()
        };
        let c = NodeConfig::from_overrides(&env).unwrap();
        assert_eq!(c.wifi_ssid.as_str(), "KioskNet");
        assert_eq!(c.device_id.as_str(), "atm-node-07");
        assert_eq!(c.telemetry_period_ms, 10_000);
        assert_eq!(c.sensor_period_ms, 2_000);
        assert!(c.has_api_key());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn non_numeric_period_is_rejected() {
        let env = BuildEnv {
            relay_pulse_ms: Some("three seconds"),
            ..BuildEnv::default()
        };
        assert_eq!(
            NodeConfig::from_overrides(&env),
            Err(ConfigError::InvalidNumber("relay_pulse_ms"))
        );
    }

    #[test]
    fn oversized_ssid_is_rejected() {
        let long = "x".repeat(40);
        let env = BuildEnv {
            wifi_ssid: Some(&long),
            ..BuildEnv::default()
        };
        assert_eq!(
            NodeConfig::from_overrides(&env),
            Err(ConfigError::TooLong("wifi_ssid"))
        );
    }

    #[test]
    fn zero_periods_fail_validation() {
        let mut c = NodeConfig::default();
        c.telemetry_period_ms = 0;
        assert_eq!(
            c.validate(),
            Err(ConfigError::ValidationFailed("telemetry_period_ms"))
        );

        let mut c = NodeConfig::default();
        c.relay_pulse_ms = 0;
        assert_eq!(c.validate(), Err(ConfigError::ValidationFailed("relay_pulse_ms")));
    }

    #[test]
    fn endpoint_needs_http_scheme() {
        let mut c = NodeConfig::default();
        c.api_url = try_bounded("192.168.1.20:4000/api/telemetry", "api_url").unwrap();
        assert_eq!(c.validate(), Err(ConfigError::ValidationFailed("api_url")));

        c.api_url = try_bounded("https://collector.example/api/telemetry", "api_url").unwrap();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn short_wpa2_password_fails_validation() {
        let mut c = NodeConfig::default();
        c.wifi_ssid = try_bounded("KioskNet", "wifi_ssid").unwrap();
        c.wifi_password = try_bounded("short", "wifi_password").unwrap();
        assert_eq!(c.validate(), Err(ConfigError::ValidationFailed("wifi_password")));
    }

    #[test]
    fn api_key_with_control_chars_fails_validation() {
        let mut c = NodeConfig::default();
        c.api_key = try_bounded("bad\nkey", "api_key").unwrap();
        assert_eq!(c.validate(), Err(ConfigError::ValidationFailed("api_key")));
    }

    #[test]
    fn printable_ascii_rejects_high_bytes() {
        assert!(is_printable_ascii("P@$$w0rd!"));
        assert!(!is_printable_ascii("caf\u{e9}"));
        assert!(is_printable_ascii(""));
    }

    #[test]
    fn serde_roundtrip() {
        let c = NodeConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: NodeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }
}
