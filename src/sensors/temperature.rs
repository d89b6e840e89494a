//! DHT11 single-wire temperature sensor.
//!
//! One read is a host start pulse followed by a 40-bit frame:
//!
//! ```text
//!  byte 0      byte 1      byte 2      byte 3          byte 4
//!  RH integer  RH decimal  T integer   T tenths|sign   checksum
//! ```
//!
//! Bits are distinguished by the width of the HIGH phase (~27 µs = 0,
//! ~70 µs = 1).  Every wait on the bus is bounded, so a disconnected
//! sensor fails with [`SensorError::Timeout`] in a few milliseconds
//! rather than hanging the loop.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the open-drain pin configured by `hw_init`; the
//! response and the 40 data bits are timed inside an interrupt-free
//! section, then packed by [`frame_from_widths`].
//! On host/test: decodes a per-instance injected frame.

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Worst-case duration of one read: 18 ms start pulse, response and a
/// frame of all `1` bits, rounded up.
pub const READ_WINDOW_MS: u32 = 25;

/// Frame length in bytes, checksum included.
pub const FRAME_LEN: usize = 5;

/// Plausible operating range.  Anything outside is a framing error that
/// happened to pass the checksum.
pub const MIN_PLAUSIBLE_C: f32 = -20.0;
pub const MAX_PLAUSIBLE_C: f32 = 60.0;

/// Decode a raw frame into °C.
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> Result<f32, SensorError> {
    let sum = frame[..4]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }
    // A bus held low reads back as all zeros with a valid checksum.
    if frame.iter().all(|b| *b == 0) {
        return Err(SensorError::Timeout);
    }
    if frame[0] > 100 {
        return Err(SensorError::OutOfRange);
    }

    let magnitude = frame[2] as f32 + (frame[3] & 0x0F) as f32 * 0.1;
    let celsius = if frame[3] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    if !(MIN_PLAUSIBLE_C..=MAX_PLAUSIBLE_C).contains(&celsius) {
        return Err(SensorError::OutOfRange);
    }
    Ok(celsius)
}

// ── Bus timing (µs) ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
const START_LOW_US: u32 = 18_000;
#[cfg(target_os = "espidf")]
const START_RELEASE_US: u32 = 30;
#[cfg(target_os = "espidf")]
const RESPONSE_TIMEOUT_US: i64 = 100;
#[cfg(target_os = "espidf")]
const BIT_LOW_TIMEOUT_US: i64 = 70;
#[cfg(target_os = "espidf")]
const BIT_HIGH_TIMEOUT_US: i64 = 100;
/// HIGH phases longer than this are a `1` bit.
pub const ONE_THRESHOLD_US: i64 = 40;

/// Data bits per frame.
pub const FRAME_BITS: usize = FRAME_LEN * 8;

/// Pack measured HIGH-phase widths (µs, MSB first) into frame bytes.
pub fn frame_from_widths(widths: &[i64; FRAME_BITS]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    for (bit, width) in widths.iter().enumerate() {
        let byte = &mut frame[bit / 8];
        *byte <<= 1;
        if *width > ONE_THRESHOLD_US {
            *byte |= 1;
        }
    }
    frame
}

pub struct Dht11 {
    gpio: i32,
    #[cfg(not(target_os = "espidf"))]
    sim_frame: Option<[u8; FRAME_LEN]>,
}

impl Dht11 {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            #[cfg(not(target_os = "espidf"))]
            sim_frame: None,
        }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// One bounded read.
    pub fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let frame = self.read_frame()?;
        decode_frame(&frame)
    }

    #[cfg(target_os = "espidf")]
    fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], SensorError> {
        let pin = self.gpio;
        // SAFETY: pin is configured open-drain by hw_init; main-loop only.
        unsafe {
            gpio_set_level(pin, 0);
            esp_rom_delay_us(START_LOW_US);
        }

        // Response and frame take ~5 ms; WiFi ISRs landing inside a bit
        // would stretch its HIGH phase, so capture with interrupts masked.
        let widths = esp_idf_svc::hal::interrupt::free(|| capture_widths(pin))?;
        Ok(frame_from_widths(&widths))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], SensorError> {
        self.sim_frame.ok_or(SensorError::Timeout)
    }

    /// Inject the frame returned by subsequent reads; `None` simulates
    /// an unplugged sensor.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_frame(&mut self, frame: Option<[u8; FRAME_LEN]>) {
        self.sim_frame = frame;
    }

    /// Inject a well-formed frame carrying `celsius` and 50 %RH.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_celsius(&mut self, celsius: f32) {
        self.sim_frame = Some(encode_frame(celsius, 50));
    }
}

/// Release the bus, follow the sensor's response and time the HIGH phase
/// of every data bit.  Runs with interrupts masked; every wait is bounded.
#[cfg(target_os = "espidf")]
fn capture_widths(pin: i32) -> Result<[i64; FRAME_BITS], SensorError> {
    // SAFETY: pin is configured open-drain by hw_init.
    unsafe {
        gpio_set_level(pin, 1);
        esp_rom_delay_us(START_RELEASE_US);
    }

    // Response: sensor pulls low ~80 µs, then high ~80 µs.
    wait_while(pin, true, RESPONSE_TIMEOUT_US)?;
    wait_while(pin, false, RESPONSE_TIMEOUT_US)?;
    wait_while(pin, true, RESPONSE_TIMEOUT_US)?;

    let mut widths = [0i64; FRAME_BITS];
    for width in &mut widths {
        wait_while(pin, false, BIT_LOW_TIMEOUT_US)?;
        *width = wait_while(pin, true, BIT_HIGH_TIMEOUT_US)?;
    }
    Ok(widths)
}

/// Spin while the bus is at `level`; returns the time spent.
#[cfg(target_os = "espidf")]
fn wait_while(pin: i32, level: bool, timeout_us: i64) -> Result<i64, SensorError> {
    // SAFETY: read-only register access and the monotonic timer.
    let start = unsafe { esp_timer_get_time() };
    loop {
        let elapsed = unsafe { esp_timer_get_time() } - start;
        if ((unsafe { gpio_get_level(pin) }) != 0) != level {
            return Ok(elapsed);
        }
        if elapsed > timeout_us {
            return Err(SensorError::Timeout);
        }
    }
}

/// Build the frame a DHT11 would send for `celsius` (tenths truncated).
#[cfg(not(target_os = "espidf"))]
pub fn encode_frame(celsius: f32, humidity: u8) -> [u8; FRAME_LEN] {
    let magnitude = celsius.abs();
    let whole = magnitude as u8;
    let tenths = ((magnitude - whole as f32) * 10.0).round() as u8 & 0x0F;
    let sign = if celsius < 0.0 { 0x80 } else { 0 };
    let mut frame = [humidity, 0, whole, tenths | sign, 0];
    frame[4] = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    frame
}
