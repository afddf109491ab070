//! I²S transmitter feeding the class-D amplifier.
//!
//! Standard Philips framing, 16-bit stereo slots. Mono clips are written
//! to both slots. The DMA ring is sized by [`crate::drivers::hw_init`] to
//! hold at least two poll intervals of audio.

use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::i2s::{I2sDriver, I2sTx};
use esp_idf_sys::EspError;
use log::{info, warn};

use crate::drivers::audio::{AudioFormat, FrameWriter};
use crate::error::PlaybackFault;

/// Bytes per frame on the bus: two 16-bit slots.
const FRAME_BYTES: usize = 4;

pub struct I2sWriter {
    driver: I2sDriver<'static, I2sTx>,
    sample_rate: u32,
    /// Silence written on drain: the whole DMA ring plus the descriptor
    /// currently being clocked out.
    drain_frames: usize,
    channels: u16,
    enabled: bool,
    bytes: Vec<u8>,
}

impl I2sWriter {
    /// `sample_rate` must match the rate the driver was configured with.
    pub fn new(driver: I2sDriver<'static, I2sTx>, sample_rate: u32, drain_frames: usize) -> Self {
        Self {
            driver,
            sample_rate,
            drain_frames,
            channels: 2,
            enabled: false,
            bytes: Vec::new(),
        }
    }

    fn write_all(&mut self) -> Result<(), EspError> {
        let mut offset = 0;
        while offset < self.bytes.len() {
            offset += self.driver.write(&self.bytes[offset..], BLOCK)?;
        }
        Ok(())
    }

    fn disable(&mut self) {
        if self.enabled {
            if let Err(e) = self.driver.tx_disable() {
                warn!("i2s: tx_disable failed: {}", e);
            }
            self.enabled = false;
        }
        info!("i2s: idle");
    }
}

impl FrameWriter for I2sWriter {
    fn begin(&mut self, format: AudioFormat) -> Result<(), PlaybackFault> {
        if format.sample_rate != self.sample_rate {
            warn!(
                "i2s: clip is {} Hz, bus runs at {} Hz; pitch will be off",
                format.sample_rate, self.sample_rate
            );
        }
        self.channels = format.channels;
        if !self.enabled {
            self.driver.tx_enable().map_err(|_| PlaybackFault::Device)?;
            self.enabled = true;
        }
        Ok(())
    }

    fn write(&mut self, samples: &[i16]) -> Result<(), PlaybackFault> {
        self.bytes.clear();
        for &s in samples {
            let le = s.to_le_bytes();
            self.bytes.extend_from_slice(&le);
            if self.channels == 1 {
                self.bytes.extend_from_slice(&le);
            }
        }
        self.write_all().map_err(|_| PlaybackFault::Device)
    }

    fn drain(&mut self) {
        if self.enabled {
            // Once a full ring of silence has been accepted, every real
            // sample has left the DMA buffers.
            self.bytes.clear();
            self.bytes.resize(self.drain_frames * FRAME_BYTES, 0);
            if let Err(e) = self.write_all() {
                warn!("i2s: drain failed: {}", e);
            }
        }
        self.disable();
    }

    fn halt(&mut self) {
        self.disable();
    }
}
