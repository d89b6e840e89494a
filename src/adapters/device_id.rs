//! Device identity derived from the ESP32 factory MAC address.
//!
//! Produces a stable, human-readable device ID in the form `ATM-XXYYZZ`
//! (last 3 bytes of the 6-byte MAC in uppercase hex).  Used as the
//! telemetry `device` field when no identifier is configured.

use crate::config::{DeviceId, NodeConfig};

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Format: `ATM-XXYYZZ` (e.g., `ATM-EFCAFE`).
pub fn device_id(mac: &MacAddress) -> DeviceId {
    let mut id = DeviceId::new();
    use core::fmt::Write;
    let _ = write!(id, "ATM-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

/// Fill in `config.device_id` from the MAC when it was left empty.
/// Returns whether the identifier was derived.
pub fn resolve_device_id(config: &mut NodeConfig, mac: &MacAddress) -> bool {
    if !config.device_id.is_empty() {
        return false;
    }
    config.device_id = device_id(mac);
    true
}
