//! Application service: the control loop core.
//!
//! [`PropService`] owns the monitors, the press classifier, the cooldown
//! counter and the single playback arbiter. All I/O flows through the
//! port traits, so the whole loop runs against mock hardware in tests.
//!
//! ```text
//!  ShakeSensor ──▶ ┌──────────────────────────┐ ──▶ AudioSink
//!  MotionSensor ─▶ │       PropService         │ ──▶ LedPort
//!  Debounced ────▶ │ shake · motion · press    │ ──▶ EventSink
//!  button          │        arbiter            │
//!                  └──────────────────────────┘
//! ```
//!
//! ## Tick order
//!
//! 1. Shake (preempts everything else this tick).
//! 2. Motion, only while the cooldown gate is open.
//! 3. Button edges; a completed press is handled last.
//! 4. Sleep one quantum, advance the cooldown counter.
//!
//! Every handler blocks. Input that changes while a clip is playing is
//! only seen on a later tick; nothing is queued.

use log::{debug, info, warn};
use rand::Rng;

use crate::config::PropConfig;
use crate::error::{Error, Result};
use crate::library::{SoundCategory, SoundLibrary};

use super::arbiter::PlaybackArbiter;
use super::commands::Reaction;
use super::events::AppEvent;
use super::motion::{CooldownCounter, MotionMonitor};
use super::ports::{EventSink, PropHardware};
use super::press::{PressClassifier, PressThresholds};
use super::shake::ShakeMonitor;

// ───────────────────────────────────────────────────────────────
// PropService
// ───────────────────────────────────────────────────────────────

pub struct PropService<R> {
    library: SoundLibrary,
    shake: ShakeMonitor,
    motion: MotionMonitor,
    press: PressClassifier,
    arbiter: PlaybackArbiter<R>,
    cooldown: CooldownCounter,
    tick_ms: u32,
}

impl<R: Rng> PropService<R> {
    /// Construct the service. Fails only on an invalid configuration.
    pub fn new(config: &PropConfig, library: SoundLibrary, rng: R) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            library,
            shake: ShakeMonitor::new(
                config.shake_threshold,
                config.warning_asset.as_str(),
                config.shake_alarm_cycles,
            ),
            motion: MotionMonitor::new(config.motion_cooldown_ticks, config.motion_settle_ms),
            press: PressClassifier::new(PressThresholds::from_config(config)),
            arbiter: PlaybackArbiter::new(
                rng,
                config.sound_root.as_str(),
                config.flicker_min..=config.flicker_max,
                config.tick_ms,
            ),
            cooldown: CooldownCounter::new(config.motion_initial_ticks),
            tick_ms: config.tick_ms,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Report the asset inventory and announce the loop.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        for category in SoundCategory::ALL {
            let count = self.library.assets(category).len();
            if count == 0 {
                warn!("library: no {} assets, those requests will be skipped", category);
            }
            sink.emit(&AppEvent::LibraryLoaded { category, count });
        }
        sink.emit(&AppEvent::Started);
        info!("PropService started, cooldown={}", self.cooldown.value());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full tick: shake → motion → button → sleep.
    pub fn tick(&mut self, hw: &mut impl PropHardware, sink: &mut impl EventSink) {
        // 1. Shake
        if let Some(reaction) = self.shake.poll(hw, sink) {
            self.handle(&reaction, hw, sink);
        }

        // 2. Motion (gate checked inside the monitor)
        if let Some(reaction) = self.motion.poll(&mut self.cooldown, hw, sink) {
            self.handle(&reaction, hw, sink);
        }

        // 3. Button
        hw.update();
        if hw.fell() {
            debug!("button: pressed");
            self.press.on_fell(hw.now_ms());
            sink.emit(&AppEvent::PressStarted);
        }
        if hw.rose() {
            match self.press.on_rose(hw.now_ms()) {
                Some(press) => {
                    let duration_ms = press.duration.as_millis() as u64;
                    info!("button: released after {} ms -> {:?}", duration_ms, press.bucket);
                    sink.emit(&AppEvent::PressCompleted {
                        duration_ms,
                        bucket: press.bucket,
                    });
                    self.handle(&press.bucket.reaction(), hw, sink);
                }
                None => sink.emit(&AppEvent::StrayRelease),
            }
        }

        // 4. Sleep, then advance the cooldown
        hw.sleep_ms(self.tick_ms);
        self.cooldown.advance();
    }

    /// Run the loop forever.
    pub fn run(&mut self, hw: &mut impl PropHardware, sink: &mut impl EventSink) -> ! {
        loop {
            self.tick(hw, sink);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn cooldown(&self) -> u32 {
        self.cooldown.value()
    }

    pub fn completed_sessions(&self) -> u64 {
        self.arbiter.completed_sessions()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Lead-in LEDs, blocking playback, follow-up LEDs. A request for an
    /// empty category does nothing at all.
    fn handle(&mut self, reaction: &Reaction, hw: &mut impl PropHardware, sink: &mut impl EventSink) {
        let asset = match self.arbiter.resolve(&reaction.request, &self.library) {
            Ok(asset) => asset,
            Err(Error::AssetUnavailable(category)) => {
                debug!("playback: {} empty, skipped", category);
                sink.emit(&AppEvent::PlaybackSkipped { category });
                return;
            }
            Err(e) => {
                warn!("playback: cannot resolve request: {}", e);
                return;
            }
        };

        reaction.lead_in.run(hw);
        sink.emit(&AppEvent::PlaybackStarted {
            asset: asset.clone(),
        });

        match self.arbiter.play_asset(&asset, hw) {
            Ok(report) => sink.emit(&AppEvent::PlaybackFinished {
                asset: report.asset,
                polls: report.polls,
            }),
            Err(Error::Playback(fault)) => sink.emit(&AppEvent::PlaybackFailed { fault }),
            Err(e) => warn!("playback: unexpected error: {}", e),
        }

        reaction.follow_up.run(hw);
    }
}
