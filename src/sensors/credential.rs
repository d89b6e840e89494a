//! MFRC522 contactless credential reader (ISO 14443A, SPI).
//!
//! A poll is REQA followed by anticollision/select.  REQA only wakes cards
//! in the IDLE state, so a card halted by [`CredentialReader::release`]
//! stays silent until it leaves the field and is presented again.  With
//! no card in the field the poll costs one short SPI exchange.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the reader through the `mfrc522` crate.
//! On host/test: pops identifiers from a per-instance injected queue.

use crate::app::ports::CredentialUid;

#[cfg(target_os = "espidf")]
use mfrc522::comm::blocking::spi::SpiInterface;
#[cfg(target_os = "espidf")]
use mfrc522::{Initialized, Mfrc522};

/// Reader SPI device as wired in `main`.
#[cfg(target_os = "espidf")]
pub type ReaderSpi = esp_idf_svc::hal::spi::SpiDeviceDriver<'static, esp_idf_svc::hal::spi::SpiDriver<'static>>;

#[cfg(not(target_os = "espidf"))]
const SIM_QUEUE_DEPTH: usize = 8;

pub struct CredentialReader {
    #[cfg(target_os = "espidf")]
    reader: Mfrc522<SpiInterface<ReaderSpi>, Initialized>,
    #[cfg(not(target_os = "espidf"))]
    sim_queue: heapless::Deque<CredentialUid, SIM_QUEUE_DEPTH>,
    #[cfg(not(target_os = "espidf"))]
    sim_releases: u32,
}

impl CredentialReader {
    /// Soft-reset the reader and enable its antenna.
    #[cfg(target_os = "espidf")]
    pub fn new(spi: ReaderSpi) -> crate::error::Result<Self> {
        let itf = SpiInterface::new(spi);
        let mut reader = Mfrc522::new(itf).init().map_err(|e| {
            log::error!("MFRC522 init failed: {:?}", e);
            crate::error::Error::Init("MFRC522")
        })?;
        match reader.version() {
            Ok(v) => log::info!("MFRC522: firmware version 0x{:02X}", v),
            Err(e) => log::warn!("MFRC522: version read failed: {:?}", e),
        }
        Ok(Self { reader })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> crate::error::Result<Self> {
        Ok(Self {
            sim_queue: heapless::Deque::new(),
            sim_releases: 0,
        })
    }

    /// Identifier of a newly presented card, if any.
    #[cfg(target_os = "espidf")]
    pub fn poll(&mut self) -> Option<CredentialUid> {
        let atqa = self.reader.new_card_present().ok()?;
        match self.reader.select(&atqa) {
            Ok(uid) => CredentialUid::from_slice(uid.as_bytes()).ok(),
            Err(e) => {
                log::debug!("MFRC522: select failed: {:?}", e);
                None
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn poll(&mut self) -> Option<CredentialUid> {
        self.sim_queue.pop_front()
    }

    /// Halt the selected card and drop reader-side crypto state.
    #[cfg(target_os = "espidf")]
    pub fn release(&mut self) {
        if let Err(e) = self.reader.hlta() {
            log::debug!("MFRC522: HLTA failed: {:?}", e);
        }
        if let Err(e) = self.reader.stop_crypto1() {
            log::debug!("MFRC522: stop_crypto1 failed: {:?}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn release(&mut self) {
        self.sim_releases += 1;
    }

    /// Queue a card tap.  Returns `false` if the queue is full.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_present(&mut self, uid: &[u8]) -> bool {
        match CredentialUid::from_slice(uid) {
            Ok(uid) => self.sim_queue.push_back(uid).is_ok(),
            Err(()) => false,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_releases(&self) -> u32 {
        self.sim_releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_polls_none() {
        let mut reader = CredentialReader::new().unwrap();
        assert!(reader.poll().is_none());
    }

    #[test]
    fn each_tap_is_reported_once() {
        let mut reader = CredentialReader::new().unwrap();
        assert!(reader.sim_present(&[0x04, 0xA1, 0x2B, 0x9C]));
        assert_eq!(reader.poll().unwrap().as_slice(), &[0x04, 0xA1, 0x2B, 0x9C]);
        reader.release();
        assert!(reader.poll().is_none());
        assert_eq!(reader.sim_releases(), 1);
    }

    #[test]
    fn oversized_uid_is_refused() {
        let mut reader = CredentialReader::new().unwrap();
        assert!(!reader.sim_present(&[0u8; 11]));
    }
}
