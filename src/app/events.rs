//! Outbound application events.
//!
//! The [`PropService`](super::service::PropService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. The only production
//! consumer is the serial log.

use std::path::PathBuf;

use crate::app::press::PressDurationBucket;
use crate::error::{PlaybackFault, SensorError};
use crate::library::SoundCategory;

/// Which input a sensor fault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Motion,
    Accelerometer,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop is about to run its first tick.
    Started,

    /// Asset discovery result for one category.
    LibraryLoaded { category: SoundCategory, count: usize },

    /// Debounced falling edge on the button.
    PressStarted,

    /// Button released after a tracked press.
    PressCompleted {
        duration_ms: u64,
        bucket: PressDurationBucket,
    },

    /// Rising edge with no press in progress.
    StrayRelease,

    /// Accelerometer reported a shake.
    ShakeDetected,

    /// PIR fired while the cooldown gate was open.
    MotionDetected,

    /// Gate open, no motion this tick.
    MotionArmed { cooldown: u32 },

    /// A clip began playing.
    PlaybackStarted { asset: PathBuf },

    /// A clip played to completion.
    PlaybackFinished { asset: PathBuf, polls: u32 },

    /// Request dropped because the category is empty.
    PlaybackSkipped { category: SoundCategory },

    /// Playback aborted by a device or decode fault.
    PlaybackFailed { fault: PlaybackFault },

    /// A sensor read failed; treated as "no event" for this tick.
    SensorFault { sensor: SensorKind, error: SensorError },
}
