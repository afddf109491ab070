//! Press-length classification.
//!
//! Consumes debounced edges from the button and turns each completed
//! press into a [`PressDurationBucket`]:
//!
//! | Bucket        | Duration                   | Plays                  |
//! |---------------|----------------------------|------------------------|
//! | `Short`       | `< short`                  | random `old/`          |
//! | `Medium`      | `short ≤ d < long`         | random `titan/`        |
//! | `FunnyLength` | `long ≤ d < funny`         | random `funny/`        |
//! | `Long`        | `≥ funny`                  | `old/` name in `test/` |
//!
//! Lower bounds are inclusive. The default thresholds are 0.5 s, 4.5 s
//! and 5.4 s.

use core::time::Duration;

use crate::app::commands::{PlaybackRequest, Reaction};
use crate::config::PropConfig;
use crate::drivers::led_patterns::LedSequence;
use crate::library::SoundCategory;

/// Directory long presses play from (names drawn from the `old` list).
pub const LONG_PRESS_SUBPATH: &str = "test/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressDurationBucket {
    Short,
    Medium,
    FunnyLength,
    Long,
}

impl PressDurationBucket {
    /// The playback a completed press of this length triggers.
    pub fn request(self) -> PlaybackRequest {
        match self {
            Self::Short => PlaybackRequest::random(SoundCategory::Old),
            Self::Medium => PlaybackRequest::random(SoundCategory::Titan),
            Self::FunnyLength => PlaybackRequest::random(SoundCategory::Funny),
            Self::Long => PlaybackRequest::Random {
                category: SoundCategory::Old,
                subpath: Some(LONG_PRESS_SUBPATH),
            },
        }
    }

    /// Request plus LED feedback. Short and medium presses get an
    /// acknowledge flash once the clip ends.
    pub fn reaction(self) -> Reaction {
        let reaction = Reaction::new(self.request());
        match self {
            Self::Short | Self::Medium => reaction.with_follow_up(LedSequence::acknowledge()),
            Self::FunnyLength | Self::Long => reaction,
        }
    }
}

/// Bucket boundaries, strictly ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressThresholds {
    pub short: Duration,
    pub long: Duration,
    pub funny: Duration,
}

impl PressThresholds {
    pub fn from_config(config: &PropConfig) -> Self {
        Self {
            short: Duration::from_millis(u64::from(config.short_press_ms)),
            long: Duration::from_millis(u64::from(config.long_press_ms)),
            funny: Duration::from_millis(u64::from(config.funny_press_ms)),
        }
    }

    /// Total over all durations.
    pub fn classify(&self, duration: Duration) -> PressDurationBucket {
        if duration < self.short {
            PressDurationBucket::Short
        } else if duration < self.long {
            PressDurationBucket::Medium
        } else if duration < self.funny {
            PressDurationBucket::FunnyLength
        } else {
            PressDurationBucket::Long
        }
    }
}

impl Default for PressThresholds {
    fn default() -> Self {
        Self::from_config(&PropConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Pressed { since_ms: u64 },
}

/// A press that has just ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedPress {
    pub duration: Duration,
    pub bucket: PressDurationBucket,
}

pub struct PressClassifier {
    thresholds: PressThresholds,
    state: ButtonState,
}

impl PressClassifier {
    pub fn new(thresholds: PressThresholds) -> Self {
        Self {
            thresholds,
            state: ButtonState::Idle,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Debounced falling edge. A second fall while pressed restarts timing.
    pub fn on_fell(&mut self, now_ms: u64) {
        self.state = ButtonState::Pressed { since_ms: now_ms };
    }

    /// Debounced rising edge. Returns the classified press, or `None` for
    /// a release with no tracked press.
    pub fn on_rose(&mut self, now_ms: u64) -> Option<CompletedPress> {
        let ButtonState::Pressed { since_ms } = self.state else {
            return None;
        };
        self.state = ButtonState::Idle;

        let duration = Duration::from_millis(now_ms.saturating_sub(since_ms));
        Some(CompletedPress {
            duration,
            bucket: self.thresholds.classify(duration),
        })
    }
}
