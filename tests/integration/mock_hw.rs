//! Mock hardware and network adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO registers.

use atmguard::app::events::AppEvent;
use atmguard::app::ports::{ActuatorPort, CredentialUid, EventSink, NetworkPort, PeripheralPort};
use atmguard::app::telemetry::TelemetryRecord;
use atmguard::error::{CommsError, SensorError};
use std::collections::VecDeque;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Relay(bool),
    Buzzer(bool),
    Indicator(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub motion: bool,
    /// Returned by every temperature read; `None` fails the read.
    pub temperature: Option<f32>,
    pub cards: VecDeque<CredentialUid>,
    pub releases: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            motion: false,
            temperature: Some(21.0),
            cards: VecDeque::new(),
            releases: 0,
        }
    }

    /// Queue a card tap picked up by the next credential poll.
    pub fn present(&mut self, uid: &[u8]) {
        self.cards.push_back(CredentialUid::from_slice(uid).unwrap());
    }

    pub fn relay_on(&self) -> bool {
        self.last_level(|c| match c {
            ActuatorCall::Relay(on) => Some(on),
            _ => None,
        })
    }

    pub fn buzzer_on(&self) -> bool {
        self.last_level(|c| match c {
            ActuatorCall::Buzzer(on) => Some(on),
            _ => None,
        })
    }

    pub fn indicator_on(&self) -> bool {
        self.last_level(|c| match c {
            ActuatorCall::Indicator(on) => Some(on),
            _ => None,
        })
    }

    pub fn relay_calls(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                ActuatorCall::Relay(on) => Some(on),
                _ => None,
            })
            .collect()
    }

    fn last_level(&self, pick: impl Fn(ActuatorCall) -> Option<bool>) -> bool {
        self.calls.iter().rev().find_map(|c| pick(*c)).unwrap_or(false)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl PeripheralPort for MockHardware {
    fn sample_motion(&mut self) -> bool {
        self.motion
    }

    fn sample_temperature(&mut self) -> Result<f32, SensorError> {
        self.temperature.ok_or(SensorError::Timeout)
    }

    fn poll_credential(&mut self) -> Option<CredentialUid> {
        self.cards.pop_front()
    }

    fn release_credential(&mut self) {
        self.releases += 1;
    }
}

impl ActuatorPort for MockHardware {
    fn set_relay(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Relay(on));
    }

    fn set_buzzer(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Buzzer(on));
    }

    fn set_indicator(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Indicator(on));
    }
}

// ── MockNetwork ───────────────────────────────────────────────

pub struct MockNetwork {
    pub connected: bool,
    /// Outcome of the next `connect` calls.
    pub connect_succeeds: bool,
    pub response: Result<u16, CommsError>,
    pub connect_attempts: u32,
    pub sent: Vec<TelemetryRecord>,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn online() -> Self {
        Self {
            connected: true,
            connect_succeeds: true,
            response: Ok(200),
            connect_attempts: 0,
            sent: Vec::new(),
        }
    }

    pub fn offline() -> Self {
        Self {
            connected: false,
            connect_succeeds: false,
            ..Self::online()
        }
    }

    /// Credential ids carried by the records sent so far.
    pub fn sent_uids(&self) -> Vec<String> {
        self.sent
            .iter()
            .filter_map(|r| r.uid.as_ref().map(|u| u.as_str().to_owned()))
            .collect()
    }
}

impl NetworkPort for MockNetwork {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self, _timeout_ms: u32) -> bool {
        self.connect_attempts += 1;
        self.connected = self.connect_succeeds;
        self.connected
    }

    fn send(&mut self, record: &TelemetryRecord) -> Result<u16, CommsError> {
        self.sent.push(record.clone());
        self.response
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
