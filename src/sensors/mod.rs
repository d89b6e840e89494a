//! Sensor drivers: PIR motion input, DHT11 temperature and the MFRC522
//! credential reader.
//!
//! Each driver exposes one bounded "sample now" call; aggregation into the
//! domain ports happens in [`crate::adapters::hardware`].

pub mod credential;
pub mod motion;
pub mod temperature;
