//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the sensor drivers and the three binary outputs, exposing them
//! through [`PeripheralPort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, CredentialUid, PeripheralPort};
use crate::drivers::output::BinaryOutput;
use crate::error::SensorError;
use crate::pins;
use crate::sensors::credential::CredentialReader;
use crate::sensors::motion::PirSensor;
use crate::sensors::temperature::Dht11;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    pir: PirSensor,
    dht: Dht11,
    reader: CredentialReader,
    relay: BinaryOutput,
    buzzer: BinaryOutput,
    indicator: BinaryOutput,
}

impl HardwareAdapter {
    /// Wire the drivers to the board pin map.  The reader is built in
    /// `main`, where SPI ownership is established.
    pub fn new(reader: CredentialReader) -> Self {
        Self {
            pir: PirSensor::new(pins::PIR_GPIO),
            dht: Dht11::new(pins::DHT_GPIO),
            reader,
            relay: BinaryOutput::new(pins::RELAY_GPIO, "relay"),
            buzzer: BinaryOutput::new(pins::BUZZER_GPIO, "buzzer"),
            indicator: BinaryOutput::new(pins::LED_GPIO, "indicator"),
        }
    }

    pub fn relay_on(&self) -> bool {
        self.relay.is_on()
    }

    pub fn buzzer_on(&self) -> bool {
        self.buzzer.is_on()
    }

    pub fn indicator_on(&self) -> bool {
        self.indicator.is_on()
    }

    // ── Simulation hooks ──────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn pir_mut(&mut self) -> &mut PirSensor {
        &mut self.pir
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn dht_mut(&mut self) -> &mut Dht11 {
        &mut self.dht
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn reader_mut(&mut self) -> &mut CredentialReader {
        &mut self.reader
    }
}

// ── PeripheralPort implementation ─────────────────────────────

impl PeripheralPort for HardwareAdapter {
    fn sample_motion(&mut self) -> bool {
        self.pir.read()
    }

    fn sample_temperature(&mut self) -> Result<f32, SensorError> {
        self.dht.read_celsius()
    }

    fn poll_credential(&mut self) -> Option<CredentialUid> {
        self.reader.poll()
    }

    fn release_credential(&mut self) {
        self.reader.release();
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_relay(&mut self, on: bool) {
        self.relay.set(on);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer.set(on);
    }

    fn set_indicator(&mut self, on: bool) {
        self.indicator.set(on);
    }
}
