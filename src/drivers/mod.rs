//! Actuator drivers, hardware initialisation, and the task watchdog.

pub mod hw_init;
pub mod output;
pub mod watchdog;
