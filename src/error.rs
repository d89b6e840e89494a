//! Unified error types for the ATM-Guard firmware.
//!
//! Every subsystem error converts into the top-level [`Error`].  All
//! variants are `Copy` so they travel through events and diagnostics
//! without allocation.  None of them is fatal inside the scheduler loop:
//! routines log and carry on.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A peripheral could not be read or returned implausible data.
    Sensor(SensorError),
    /// The network link or the telemetry exchange failed.
    Comms(CommsError),
    /// Configuration is invalid.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The device did not answer within its bounded read window.
    Timeout,
    /// A frame arrived but its checksum byte did not match.
    ChecksumMismatch,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "read timed out"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// No WiFi credentials have been configured.
    NoCredentials,
    /// The station did not associate within the connect window.
    ConnectTimedOut,
    /// The WiFi driver rejected the connect request.
    ConnectFailed,
    /// A send was attempted while the link was down.
    NotConnected,
    /// The telemetry record could not be encoded.
    Serialization,
    /// The HTTP exchange failed before a status line was received.
    RequestFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::ConnectTimedOut => write!(f, "WiFi connect timed out"),
            Self::ConnectFailed => write!(f, "WiFi connect failed"),
            Self::NotConnected => write!(f, "network not connected"),
            Self::Serialization => write!(f, "telemetry serialisation failed"),
            Self::RequestFailed => write!(f, "HTTP request failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range or format validation.
    /// The `&'static str` names the field.
    ValidationFailed(&'static str),
    /// A numeric override could not be parsed.
    InvalidNumber(&'static str),
    /// A string override exceeds its fixed capacity.
    TooLong(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(field) => write!(f, "validation failed: {}", field),
            Self::InvalidNumber(field) => write!(f, "not a number: {}", field),
            Self::TooLong(field) => write!(f, "value too long: {}", field),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
