//! System configuration parameters
//!
//! All tunable parameters for the prop. Values are fixed for the lifetime
//! of the process: defaults, optionally overridden once at boot from a
//! JSON file on the sound partition.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::drivers::led_patterns::SEQUENCE_CAP;
use crate::error::{Error, Result};
use crate::library::AssetFilter;

/// Override file name, looked up under the sound root.
pub const CONFIG_FILE: &str = "prop.json";

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropConfig {
    // --- Timing ---
    /// Control loop sleep quantum (milliseconds)
    pub tick_ms: u32,

    // --- Button ---
    /// Presses shorter than this are "short" (milliseconds)
    pub short_press_ms: u32,
    /// Presses at least this long are "funny-length" (milliseconds)
    pub long_press_ms: u32,
    /// Presses at least this long are "long" (milliseconds)
    pub funny_press_ms: u32,
    /// Consecutive identical raw samples required to accept a level
    pub debounce_samples: u8,

    // --- Motion ---
    /// PIR is only sampled while the cooldown counter exceeds this
    pub motion_cooldown_ticks: u32,
    /// Cooldown counter value at boot
    pub motion_initial_ticks: u32,
    /// Quiet hold after the motion clip (milliseconds)
    pub motion_settle_ms: u32,

    // --- Shake ---
    /// Averaged acceleration magnitude that counts as a shake (m/s²)
    pub shake_threshold: f32,
    /// On/off cycles of the urgent flash after the warning clip
    pub shake_alarm_cycles: u8,

    // --- LED ---
    /// Lower bound of the playback flicker duty
    pub flicker_min: u16,
    /// Upper bound of the playback flicker duty
    pub flicker_max: u16,

    // --- Assets ---
    /// Mount point of the sound partition
    pub sound_root: String,
    /// File extension of playable assets (without the dot)
    pub asset_extension: String,
    /// Names starting with this prefix are filesystem metadata, not audio
    pub metadata_prefix: String,
    /// Fixed clip played on shake, relative to `sound_root`
    pub warning_asset: String,

    // --- Audio ---
    /// Audio the output device can hold queued (milliseconds). One chunk
    /// of `tick_ms` is streamed per poll with one more queued ahead, so
    /// this must cover at least two ticks.
    pub audio_buffer_ms: u32,
    /// I²S sample rate; every asset is expected to share it
    pub audio_sample_rate_hz: u32,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,

            short_press_ms: 500,
            long_press_ms: 4500,
            funny_press_ms: 5400,
            debounce_samples: 2,

            motion_cooldown_ticks: 500,
            motion_initial_ticks: 490,
            motion_settle_ms: 1000,

            shake_threshold: 10.0,
            shake_alarm_cycles: 10,

            flicker_min: 5000,
            flicker_max: 30000,

            sound_root: "/sounds".into(),
            asset_extension: "wav".into(),
            metadata_prefix: "._".into(),
            warning_asset: "putmedown.wav".into(),

            audio_buffer_ms: 300,
            audio_sample_rate_hz: 22_050,
        }
    }
}

impl PropConfig {
    /// Parse and validate a JSON override. Missing fields keep defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            serde_json::from_slice(bytes).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `<root>/prop.json` if present. A missing, unreadable or invalid
    /// file yields the defaults.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => {
                info!("config: no {}, using defaults", path.display());
                return Self::default();
            }
        };
        match Self::from_json(&bytes) {
            Ok(config) => {
                info!("config: loaded {}", path.display());
                config
            }
            Err(e) => {
                warn!("config: {} rejected ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn asset_filter(&self) -> AssetFilter<'_> {
        AssetFilter {
            extension: &self.asset_extension,
            metadata_prefix: &self.metadata_prefix,
        }
    }

    /// Reject values that would break the control loop.
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(Error::Config("tick_ms must be non-zero"));
        }
        if !(self.short_press_ms < self.long_press_ms && self.long_press_ms < self.funny_press_ms)
        {
            return Err(Error::Config("press thresholds must be strictly ascending"));
        }
        if self.debounce_samples == 0 {
            return Err(Error::Config("debounce_samples must be at least 1"));
        }
        if self.flicker_min > self.flicker_max {
            return Err(Error::Config("flicker_min above flicker_max"));
        }
        // Alarm: one lead hold plus an on and an off step per cycle.
        let alarm_steps = 1 + 2 * self.shake_alarm_cycles as usize;
        if self.shake_alarm_cycles == 0 || alarm_steps > SEQUENCE_CAP {
            return Err(Error::Config("shake_alarm_cycles out of range"));
        }
        if !self.shake_threshold.is_finite() || self.shake_threshold <= 0.0 {
            return Err(Error::Config("shake_threshold must be positive"));
        }
        if self.asset_extension.is_empty() {
            return Err(Error::Config("asset_extension must not be empty"));
        }
        if self.audio_sample_rate_hz == 0 {
            return Err(Error::Config("audio_sample_rate_hz must be non-zero"));
        }
        if self.audio_buffer_ms < 2 * self.tick_ms {
            return Err(Error::Config("audio_buffer_ms must cover two ticks"));
        }
        Ok(())
    }
}
