//! One-shot GPIO initialization.
//!
//! Configures input, output and open-drain pins using raw ESP-IDF sys
//! calls.  Called once from `main()` before the scheduler loop starts.
//! The SPI bus for the credential reader is owned by `esp-idf-hal` and is
//! set up separately in `main`.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

impl From<HwInitError> for crate::error::Error {
    fn from(_: HwInitError) -> Self {
        Self::Init("GPIO configuration")
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the scheduler loop; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
        init_gpio_open_drain()?;
    }
    info!("hw_init: all GPIO configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [pins::RELAY_GPIO, pins::BUZZER_GPIO, pins::LED_GPIO];

    for &pin in &output_pins {
        unsafe { config_pin(pin, gpio_mode_t_GPIO_MODE_OUTPUT, false)? };
        // Relay module is active HIGH: start de-energised.
        unsafe { gpio_set_level(pin, 0) };
    }

    // Reader reset is active LOW: release it.
    unsafe { config_pin(pins::RFID_RST_GPIO, gpio_mode_t_GPIO_MODE_OUTPUT, false)? };
    unsafe { gpio_set_level(pins::RFID_RST_GPIO, 1) };

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // PIR module drives its output push-pull; no pull resistor.
    unsafe { config_pin(pins::PIR_GPIO, gpio_mode_t_GPIO_MODE_INPUT, false)? };
    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

// ── Open-drain single-wire bus (DHT11) ────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_open_drain() -> Result<(), HwInitError> {
    unsafe { config_pin(pins::DHT_GPIO, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD, true)? };
    // Idle bus is released (pulled HIGH).
    unsafe { gpio_set_level(pins::DHT_GPIO, 1) };
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn config_pin(pin: i32, mode: gpio_mode_t, pull_up: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}
