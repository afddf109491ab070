//! Playback arbiter: sole owner of the audio output.
//!
//! [`PlaybackArbiter::play`] is blocking: it returns only after the clip
//! has finished (or faulted). Because the control loop is single-threaded
//! and `play` takes `&mut self` plus `&mut` hardware, a second session
//! cannot start while one is running. There is no lock.
//!
//! ## Session timeline
//!
//! ```text
//!  resolve ─▶ pre-roll ─▶ sink.play ─▶ poll/flicker … ─▶ full brightness
//!     │                       │            │
//!     └ empty category:       └ fault ─────┴──▶ sink.stop, full brightness
//!       no-op, no LEDs
//! ```

use core::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::Rng;

use crate::app::commands::PlaybackRequest;
use crate::app::ports::{AudioSink, LedPort, TimePort};
use crate::drivers::led_patterns::{LedSequence, MAIN_FULL};
use crate::error::{Error, Result};
use crate::library::SoundLibrary;

/// One clip occupying the audio output. Only ever created inside
/// [`PlaybackArbiter::play_asset`].
#[derive(Debug)]
struct PlaybackSession {
    asset: PathBuf,
    polls: u32,
}

/// Result of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    pub asset: PathBuf,
    /// Number of "still playing" polls that returned true.
    pub polls: u32,
}

pub struct PlaybackArbiter<R> {
    rng: R,
    root: PathBuf,
    flicker: RangeInclusive<u16>,
    poll_ms: u32,
    completed: u64,
}

impl<R: Rng> PlaybackArbiter<R> {
    pub fn new(rng: R, root: impl Into<PathBuf>, flicker: RangeInclusive<u16>, poll_ms: u32) -> Self {
        Self {
            rng,
            root: root.into(),
            flicker,
            poll_ms,
            completed: 0,
        }
    }

    /// Sessions that ran to completion since boot.
    pub fn completed_sessions(&self) -> u64 {
        self.completed
    }

    /// Pick the concrete file for `request`.
    pub fn resolve(&mut self, request: &PlaybackRequest, library: &SoundLibrary) -> Result<PathBuf> {
        match request {
            PlaybackRequest::Random { category, subpath } => {
                let name = library
                    .choose(*category, &mut self.rng)
                    .ok_or(Error::AssetUnavailable(*category))?;
                let dir = match subpath {
                    Some(sub) => self.root.join(sub),
                    None => self.root.join(category.dir()),
                };
                Ok(dir.join(name))
            }
            PlaybackRequest::Fixed { asset } => Ok(self.root.join(asset)),
        }
    }

    /// Resolve and play `request`, blocking until the clip ends.
    ///
    /// An empty category returns [`Error::AssetUnavailable`] without
    /// touching the LEDs or the audio device.
    pub fn play(
        &mut self,
        request: &PlaybackRequest,
        library: &SoundLibrary,
        hw: &mut (impl AudioSink + LedPort + TimePort),
    ) -> Result<PlaybackReport> {
        let asset = self.resolve(request, library)?;
        self.play_asset(&asset, hw)
    }

    /// Play an already-resolved file, blocking until it ends.
    ///
    /// On any fault the device is stopped and the LED restored before
    /// the error is returned.
    pub fn play_asset(
        &mut self,
        asset: &Path,
        hw: &mut (impl AudioSink + LedPort + TimePort),
    ) -> Result<PlaybackReport> {
        info!("playback: {}", asset.display());
        LedSequence::preroll().run(hw);

        let mut session = PlaybackSession {
            asset: asset.to_path_buf(),
            polls: 0,
        };

        let outcome = self.drive(&mut session, hw);
        hw.set_brightness(MAIN_FULL);

        match outcome {
            Ok(()) => {
                self.completed += 1;
                debug!("playback: {} done after {} polls", session.asset.display(), session.polls);
                Ok(PlaybackReport {
                    asset: session.asset,
                    polls: session.polls,
                })
            }
            Err(fault) => {
                warn!("playback: {} aborted: {}", session.asset.display(), fault);
                hw.stop();
                Err(fault.into())
            }
        }
    }

    fn drive(
        &mut self,
        session: &mut PlaybackSession,
        hw: &mut (impl AudioSink + LedPort + TimePort),
    ) -> core::result::Result<(), crate::error::PlaybackFault> {
        hw.play(&session.asset)?;
        while hw.is_playing()? {
            session.polls += 1;
            hw.set_brightness(self.rng.gen_range(self.flicker.clone()));
            hw.sleep_ms(self.poll_ms);
        }
        Ok(())
    }
}
