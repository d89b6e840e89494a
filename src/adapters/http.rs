//! HTTP telemetry transport.
//!
//! One exchange per call: open a connection, POST the JSON body, read the
//! status line, drop the connection.  The response body is ignored.
//!
//! Headers sent:
//!
//! | Header           | Value                          |
//! |------------------|--------------------------------|
//! | `Content-Type`   | `application/json`             |
//! | `Content-Length` | body length                    |
//! | `X-API-KEY`      | configured key (omitted if empty) |
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` driven through the
//!   `embedded-svc` client traits; `https://` endpoints use the bundled
//!   CA certificates.
//! - **all other targets**: records bodies and answers with a
//!   configurable status.

use crate::config::NodeConfig;
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use embedded_svc::http::client::Client;
#[cfg(target_os = "espidf")]
use embedded_svc::io::Write;
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

/// Socket timeout.  ESP-IDF applies it to each blocking step separately.
pub const HTTP_TIMEOUT_MS: u32 = 5_000;

/// Blocking steps of one exchange: TCP/TLS connect, body write, response read.
pub const HTTP_PHASES: u32 = 3;

/// Upper bound on one request/response exchange.
pub const HTTP_EXCHANGE_MAX_MS: u32 = HTTP_TIMEOUT_MS * HTTP_PHASES;

pub struct HttpTransport {
    url: heapless::String<128>,
    /// `None` when no key is configured: the header is then omitted.
    api_key: Option<heapless::String<64>>,
    #[cfg(not(target_os = "espidf"))]
    sim_response: Result<u16, CommsError>,
    #[cfg(not(target_os = "espidf"))]
    sim_bodies: Vec<Vec<u8>>,
}

impl HttpTransport {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            url: config.api_url.clone(),
            api_key: config.has_api_key().then(|| config.api_key.clone()),
            #[cfg(not(target_os = "espidf"))]
            sim_response: Ok(200),
            #[cfg(not(target_os = "espidf"))]
            sim_bodies: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Header list for a body of `content_length` bytes.
    pub fn headers<'a>(&'a self, content_length: &'a str) -> heapless::Vec<(&'a str, &'a str), 3> {
        let mut headers = heapless::Vec::new();
        let _ = headers.push(("Content-Type", "application/json"));
        let _ = headers.push(("Content-Length", content_length));
        if let Some(key) = &self.api_key {
            let _ = headers.push(("X-API-KEY", key.as_str()));
        }
        headers
    }

    /// POST `body` and return the response status.
    #[cfg(target_os = "espidf")]
    pub fn post_json(&mut self, body: &[u8]) -> Result<u16, CommsError> {
        let tls = self.url.starts_with("https://");
        let config = Configuration {
            timeout: Some(core::time::Duration::from_millis(HTTP_TIMEOUT_MS as u64)),
            crt_bundle_attach: if tls {
                Some(esp_idf_svc::sys::esp_crt_bundle_attach)
            } else {
                None
            },
            ..Default::default()
        };
        let conn = EspHttpConnection::new(&config).map_err(|e| {
            log::warn!("HTTP: connection setup failed: {}", e);
            CommsError::RequestFailed
        })?;
        let mut client = Client::wrap(conn);

        let content_length = body.len().to_string();
        let headers = self.headers(&content_length);
        let mut request = client
            .post(self.url.as_str(), &headers)
            .map_err(|_| CommsError::RequestFailed)?;
        request.write_all(body).map_err(|_| CommsError::RequestFailed)?;
        request.flush().map_err(|_| CommsError::RequestFailed)?;
        let response = request.submit().map_err(|_| CommsError::RequestFailed)?;
        Ok(response.status())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn post_json(&mut self, body: &[u8]) -> Result<u16, CommsError> {
        self.sim_bodies.push(body.to_vec());
        self.sim_response
    }

    // ── Simulation hooks ──────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_response(&mut self, response: Result<u16, CommsError>) {
        self.sim_response = response;
    }

    /// Bodies posted so far, oldest first.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_bodies(&self) -> &[Vec<u8>] {
        &self.sim_bodies
    }
}
