//! Outgoing telemetry record and credential token rendering.
//!
//! Wire shape (one JSON object per request):
//!
//! ```text
//! {"device":"atm-node-01","motion":true,"temp":23.5,"uid":"04 A1 2B 9C"}
//! ```
//!
//! `temp` is omitted until the first good temperature sample; `uid` is
//! omitted unless a credential was detected since the previous send.

use core::fmt::Write;

use serde::Serialize;

use crate::config::DeviceId;
use crate::error::CommsError;

use super::ports::MAX_UID_LEN;

/// Printable form of a credential identifier: `"04 A1 2B 9C"`.
/// Sized for the longest UID (10 octets → 29 chars).
pub type CredentialToken = heapless::String<{ MAX_UID_LEN * 3 }>;

/// Render identifier bytes as uppercase hex octets separated by spaces.
/// Bytes beyond [`MAX_UID_LEN`] are ignored.
pub fn render_uid(bytes: &[u8]) -> CredentialToken {
    let mut token = CredentialToken::new();
    for (i, b) in bytes.iter().take(MAX_UID_LEN).enumerate() {
        if i > 0 {
            let _ = token.push(' ');
        }
        let _ = write!(token, "{:02X}", b);
    }
    token
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub device: DeviceId,
    pub motion: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<CredentialToken>,
}

impl TelemetryRecord {
    /// Encode as the JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>, CommsError> {
        serde_json::to_vec(self).map_err(|_| CommsError::Serialization)
    }
}
