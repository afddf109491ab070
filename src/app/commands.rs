//! Inbound requests to the playback arbiter.
//!
//! Monitors never touch the audio device. They hand a [`Reaction`] back to
//! the service, which runs the LED lead-in, asks the
//! [`PlaybackArbiter`](super::arbiter::PlaybackArbiter) to play the
//! request, then runs the follow-up.

use crate::drivers::led_patterns::LedSequence;
use crate::library::SoundCategory;

/// What to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackRequest {
    /// Uniform random pick from `category`. With a `subpath`, the chosen
    /// name is looked up under that directory instead of the category's.
    Random {
        category: SoundCategory,
        subpath: Option<&'static str>,
    },

    /// A fixed file relative to the sound root, outside any category.
    Fixed { asset: String },
}

impl PlaybackRequest {
    pub const fn random(category: SoundCategory) -> Self {
        Self::Random {
            category,
            subpath: None,
        }
    }

    /// Category the request draws from, if any.
    pub fn category(&self) -> Option<SoundCategory> {
        match self {
            Self::Random { category, .. } => Some(*category),
            Self::Fixed { .. } => None,
        }
    }
}

/// A monitor's full response to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub request: PlaybackRequest,
    /// Runs before the clip.
    pub lead_in: LedSequence,
    /// Runs after the clip, even if playback faulted.
    pub follow_up: LedSequence,
}

impl Reaction {
    pub fn new(request: PlaybackRequest) -> Self {
        Self {
            request,
            lead_in: LedSequence::empty(),
            follow_up: LedSequence::empty(),
        }
    }

    pub fn with_lead_in(mut self, seq: LedSequence) -> Self {
        self.lead_in = seq;
        self
    }

    pub fn with_follow_up(mut self, seq: LedSequence) -> Self {
        self.follow_up = seq;
        self
    }
}
