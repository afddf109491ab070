//! Unified error types for the prop firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be handed to the event sink without allocation.
//!
//! Nothing here is fatal: the control loop turns every error into an
//! [`AppEvent`](crate::app::events::AppEvent) and carries on with the next
//! tick.

use core::fmt;

use crate::library::SoundCategory;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested category has no playable assets.
    AssetUnavailable(SoundCategory),
    /// A sensor could not be read.
    Sensor(SensorError),
    /// The audio device could not open or play an asset.
    Playback(PlaybackFault),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetUnavailable(c) => write!(f, "no assets in category {c}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Playback(e) => write!(f, "playback: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I²C transaction failed.
    Bus,
    /// GPIO read returned an error.
    Gpio,
    /// Device did not answer with the expected identity.
    NotDetected,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::Gpio => write!(f, "GPIO read failed"),
            Self::NotDetected => write!(f, "device not detected"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Playback faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackFault {
    /// Asset file could not be opened.
    Open,
    /// Asset header or sample data could not be decoded.
    Decode,
    /// Asset is not 16-bit integer PCM.
    UnsupportedFormat { bits: u16 },
    /// Output device rejected a write.
    Device,
    /// A clip is already streaming.
    Busy,
}

impl fmt::Display for PlaybackFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "asset open failed"),
            Self::Decode => write!(f, "asset decode failed"),
            Self::UnsupportedFormat { bits } => {
                write!(f, "unsupported sample format ({bits}-bit)")
            }
            Self::Device => write!(f, "audio device write failed"),
            Self::Busy => write!(f, "audio device busy"),
        }
    }
}

impl From<PlaybackFault> for Error {
    fn from(e: PlaybackFault) -> Self {
        Self::Playback(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
