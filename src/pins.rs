//! GPIO / peripheral pin assignments for the ATM-Guard node
//! (ESP32-WROOM-32 devkit).
//!
//! Every raw-GPIO driver references this module rather than hard-coding
//! pin numbers.  The MFRC522 SPI bus (SCK 18, MISO 19, MOSI 23, SS 21) is
//! owned by `esp-idf-hal` and taken as typed peripherals in `main`, so it
//! has no numeric constants here.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// HC-SR501 PIR motion sensor: digital input, HIGH = motion.
pub const PIR_GPIO: i32 = 32;

/// DHT11 temperature/humidity sensor: single-wire, open-drain with
/// external pull-up.
pub const DHT_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// MFRC522 contactless reader (SPI)
// ---------------------------------------------------------------------------

/// Active-low reset; held HIGH while the reader runs.
pub const RFID_RST_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Relay module IN pin (active HIGH = energised = door unlocked).
pub const RELAY_GPIO: i32 = 27;
/// Piezo buzzer (active HIGH).
pub const BUZZER_GPIO: i32 = 26;
/// Indicator LED (active HIGH).
pub const LED_GPIO: i32 = 33;
