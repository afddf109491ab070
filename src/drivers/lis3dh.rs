//! LIS3DH 3-axis accelerometer over I²C, with shake detection.
//!
//! Register-level driver; the bus and delay come in as embedded-hal 1.0
//! traits so the same code runs on `esp_idf_hal::i2c::I2cDriver` and on a
//! fake bus in tests.
//!
//! ## Shake detection
//!
//! [`Lis3dh::detect`] sums `SHAKE_SAMPLES` readings spaced evenly over
//! `SHAKE_WINDOW_MS`, averages each axis, and compares the magnitude of the
//! averaged vector against the threshold. A board at rest reads ≈ 9.8 m/s²
//! (gravity), so the default 10 m/s² threshold trips on a modest jolt.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::info;

use crate::app::ports::ShakeSensor;
use crate::error::SensorError;

/// Default address (SDO/SA0 pulled low).
pub const DEFAULT_ADDRESS: u8 = 0x18;

const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL1: u8 = 0x20;
const REG_CTRL4: u8 = 0x23;
const REG_OUT_X_L: u8 = 0x28;
/// Register auto-increment for multi-byte reads.
const AUTO_INCREMENT: u8 = 0x80;
const WHO_AM_I_EXPECTED: u8 = 0x33;

/// 400 Hz output data rate, X/Y/Z enabled.
const CTRL1_400HZ_XYZ: u8 = 0x77;
/// Block data update + high-resolution mode.
const CTRL4_BDU_HR: u8 = 0x88;

const STANDARD_GRAVITY: f32 = 9.806;

const SHAKE_SAMPLES: u32 = 10;
const SHAKE_WINDOW_MS: u32 = 100;

/// Full-scale range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    G2,
    G4,
    G8,
    G16,
}

impl Range {
    const fn bits(self) -> u8 {
        match self {
            Self::G2 => 0b00,
            Self::G4 => 0b01,
            Self::G8 => 0b10,
            Self::G16 => 0b11,
        }
    }

    /// Raw counts per g for left-justified 16-bit output.
    const fn divider(self) -> f32 {
        match self {
            Self::G2 => 16380.0,
            Self::G4 => 8190.0,
            Self::G8 => 4096.0,
            Self::G16 => 1365.0,
        }
    }
}

/// Acceleration in m/s².
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

pub struct Lis3dh<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    range: Range,
}

impl<I2C: I2c, D: DelayNs> Lis3dh<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            range: Range::G2,
        }
    }

    /// Verify identity and configure 400 Hz high-resolution sampling.
    pub fn init(&mut self, range: Range) -> Result<(), SensorError> {
        let id = self.read_register(REG_WHO_AM_I)?;
        if id != WHO_AM_I_EXPECTED {
            return Err(SensorError::NotDetected);
        }
        self.write_register(REG_CTRL1, CTRL1_400HZ_XYZ)?;
        self.set_range(range)?;
        info!("LIS3DH initialised (addr=0x{:02x}, {:?})", self.address, range);
        Ok(())
    }

    pub fn set_range(&mut self, range: Range) -> Result<(), SensorError> {
        self.write_register(REG_CTRL4, CTRL4_BDU_HR | (range.bits() << 4))?;
        self.range = range;
        Ok(())
    }

    /// One burst read of all three axes.
    pub fn acceleration(&mut self) -> Result<Acceleration, SensorError> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_OUT_X_L | AUTO_INCREMENT], &mut raw)
            .map_err(|_| SensorError::Bus)?;

        let scale = STANDARD_GRAVITY / self.range.divider();
        Ok(Acceleration {
            x: f32::from(i16::from_le_bytes([raw[0], raw[1]])) * scale,
            y: f32::from(i16::from_le_bytes([raw[2], raw[3]])) * scale,
            z: f32::from(i16::from_le_bytes([raw[4], raw[5]])) * scale,
        })
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c, D: DelayNs> ShakeSensor for Lis3dh<I2C, D> {
    fn detect(&mut self, threshold: f32) -> Result<bool, SensorError> {
        let mut sum = Acceleration::default();
        for _ in 0..SHAKE_SAMPLES {
            let a = self.acceleration()?;
            sum.x += a.x;
            sum.y += a.y;
            sum.z += a.z;
            self.delay.delay_ms(SHAKE_WINDOW_MS / SHAKE_SAMPLES);
        }
        let n = SHAKE_SAMPLES as f32;
        let avg = Acceleration {
            x: sum.x / n,
            y: sum.y / n,
            z: sum.z / n,
        };
        Ok(avg.magnitude() > threshold)
    }
}
