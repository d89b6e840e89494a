//! ATM-Guard Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        NetworkAdapter       LogEventSink      │
//! │  (Peripheral+Actuator)  (WiFi + HTTP)        (EventSink)       │
//! │  Esp32Clock (ClockPort)                                        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  sensors · credential · relay timer · telemetry        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (cooperative, single thread) · Watchdog             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::spi::config::Config as SpiConfig;
use esp_idf_svc::hal::spi::{SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;

use atmguard::adapters::device_id;
use atmguard::adapters::hardware::HardwareAdapter;
use atmguard::adapters::http::HttpTransport;
use atmguard::adapters::log_sink::LogEventSink;
use atmguard::adapters::network::NetworkAdapter;
use atmguard::adapters::time::Esp32Clock;
use atmguard::adapters::wifi::WifiAdapter;
use atmguard::app::ports::{ActuatorPort, NetworkPort};
use atmguard::app::state::DeviceState;
use atmguard::config::NodeConfig;
use atmguard::drivers::{hw_init, watchdog};
use atmguard::scheduler::{LOOP_YIELD_MS, Scheduler};
use atmguard::sensors::credential::CredentialReader;

/// MFRC522 tolerates up to 10 MHz; 1 MHz is robust on jumper wires.
const RFID_SPI_BAUD_MHZ: u32 = 1;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ATM-Guard v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Outputs to the safe state ──────────────────────────
    hw_init::init_peripherals()?;

    // ── 3. Configuration ──────────────────────────────────────
    let mut config = match NodeConfig::from_build_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Build-time config rejected ({}), using defaults", e);
            NodeConfig::default()
        }
    };
    if device_id::resolve_device_id(&mut config, &device_id::read_mac()) {
        info!("Device ID derived from MAC: {}", config.device_id);
    }
    info!("Device ID: {} | endpoint: {}", config.device_id, config.api_url);

    // ── 4. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let spi = SpiDriver::new(
        peripherals.spi2,
        peripherals.pins.gpio18,
        peripherals.pins.gpio23,
        Some(peripherals.pins.gpio19),
        &SpiDriverConfig::new(),
    )?;
    let spi_dev = SpiDeviceDriver::new(
        spi,
        Some(peripherals.pins.gpio21),
        &SpiConfig::new().baudrate(RFID_SPI_BAUD_MHZ.MHz()),
    )?;
    let reader = CredentialReader::new(spi_dev)?;

    let mut hw = HardwareAdapter::new(reader);
    hw.all_off();

    // ── 5. Network ────────────────────────────────────────────
    let wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs))?;
    let mut net = NetworkAdapter::new(WifiAdapter::new(&config, wifi), HttpTransport::new(&config));
    if !net.connect(config.connect_timeout_ms) {
        warn!("Boot: WiFi join failed, retrying at telemetry time");
    }

    // ── 6. Scheduler loop ─────────────────────────────────────
    let mut scheduler = Scheduler::new(&config, DeviceState::new());
    let clock = Esp32Clock::new();
    let mut sink = LogEventSink::new();
    let wdt = watchdog::Watchdog::new(watchdog::timeout_for(config.connect_timeout_ms));

    info!("Entering scheduler loop");
    loop {
        scheduler.tick(&clock, &mut hw, &mut net, &mut sink);
        wdt.feed();
        FreeRtos::delay_ms(LOOP_YIELD_MS);
    }
}
