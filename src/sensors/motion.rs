//! HC-SR501 passive-infrared motion sensor.
//!
//! The module latches its output HIGH for its own hold time after a
//! detection; this driver only reports the instantaneous level.
//!
//! On host/test the level comes from a per-instance injected value.

use crate::drivers::hw_init;

pub struct PirSensor {
    gpio: i32,
    #[cfg(not(target_os = "espidf"))]
    sim_level: bool,
}

impl PirSensor {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            #[cfg(not(target_os = "espidf"))]
            sim_level: false,
        }
    }

    /// `true` while the sensor reports motion.
    pub fn read(&self) -> bool {
        #[cfg(target_os = "espidf")]
        {
            hw_init::gpio_read(self.gpio)
        }
        #[cfg(not(target_os = "espidf"))]
        {
            let _ = hw_init::gpio_read(self.gpio);
            self.sim_level
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_level(&mut self, motion: bool) {
        self.sim_level = motion;
    }
}
