//! Active-HIGH binary output (relay module, buzzer, indicator LED).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO via hw_init helpers.
//! On host/test: tracks the level in-memory only.

use crate::drivers::hw_init;

pub struct BinaryOutput {
    gpio: i32,
    label: &'static str,
    on: bool,
}

impl BinaryOutput {
    /// Wrap an output pin already configured by `hw_init`.  The pin is
    /// assumed low until the first `set`.
    pub fn new(gpio: i32, label: &'static str) -> Self {
        Self {
            gpio,
            label,
            on: false,
        }
    }

    /// Drive the pin.  Writes are unconditional so a level disturbed
    /// outside this driver is restored on the next call.
    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.gpio, on);
        if on != self.on {
            log::trace!("{}: {}", self.label, if on { "ON" } else { "OFF" });
        }
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
