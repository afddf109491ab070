//! Mock hardware adapter for integration tests.
//!
//! One value implements every port on a simulated millisecond clock:
//! sleeping advances time instantly, the button pin follows a press
//! schedule through the real debouncer, and every LED and audio call is
//! recorded so tests can assert on the full history.

use std::cell::Cell;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};
use titanprop::app::events::AppEvent;
use titanprop::app::ports::{
    AudioSink, DebounceableInput, EventSink, LedPort, MotionSensor, ShakeSensor, TimePort,
};
use titanprop::drivers::debounce::DebouncedInput;
use titanprop::drivers::led_patterns::AuxMask;
use titanprop::error::{PlaybackFault, SensorError};

// ── Button pin driven by the simulated clock ──────────────────

/// Active-low pin that reads low inside any `[down, up)` window.
pub struct ScheduledPin {
    clock: Rc<Cell<u64>>,
    presses: Vec<(u64, u64)>,
}

impl ErrorType for ScheduledPin {
    type Error = Infallible;
}

impl InputPin for ScheduledPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let now = self.clock.get();
        Ok(!self.presses.iter().any(|&(down, up)| now >= down && now < up))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|h| !h)
    }
}

// ── Call records ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum LedCall {
    Main(u16),
    Aux(AuxMask),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayRecord {
    pub at_ms: u64,
    pub asset: PathBuf,
}

// ── MockProp ──────────────────────────────────────────────────

pub struct MockProp {
    clock: Rc<Cell<u64>>,
    button: DebouncedInput<ScheduledPin>,
    /// PIR reads high inside any `[from, to)` window.
    pub motion: Vec<(u64, u64)>,
    /// One-shot shakes: each fires on the first detect at or after its time.
    pub shakes: Vec<u64>,
    pub shake_fault: bool,
    pub motion_fault: bool,
    /// "Still playing" polls each clip lasts.
    pub clip_polls: u32,
    pub missing_assets: Vec<PathBuf>,
    active: Option<u32>,
    pub plays: Vec<PlayRecord>,
    pub stops: u32,
    pub leds: Vec<LedCall>,
}

#[allow(dead_code)]
impl MockProp {
    pub fn new(presses: &[(u64, u64)]) -> Self {
        let clock = Rc::new(Cell::new(0));
        let pin = ScheduledPin {
            clock: Rc::clone(&clock),
            presses: presses.to_vec(),
        };
        Self {
            clock,
            button: DebouncedInput::new(pin, 2),
            motion: Vec::new(),
            shakes: Vec::new(),
            shake_fault: false,
            motion_fault: false,
            clip_polls: 3,
            missing_assets: Vec::new(),
            active: None,
            plays: Vec::new(),
            stops: 0,
            leds: Vec::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.get()
    }

    pub fn assets_played(&self) -> Vec<&Path> {
        self.plays.iter().map(|p| p.asset.as_path()).collect()
    }

    pub fn aux_calls(&self) -> Vec<AuxMask> {
        self.leds
            .iter()
            .filter_map(|c| match c {
                LedCall::Aux(m) => Some(*m),
                LedCall::Main(_) => None,
            })
            .collect()
    }
}

impl DebounceableInput for MockProp {
    fn update(&mut self) {
        self.button.update();
    }

    fn fell(&self) -> bool {
        self.button.fell()
    }

    fn rose(&self) -> bool {
        self.button.rose()
    }
}

impl MotionSensor for MockProp {
    fn read(&mut self) -> Result<bool, SensorError> {
        if self.motion_fault {
            return Err(SensorError::Gpio);
        }
        let now = self.now();
        Ok(self.motion.iter().any(|&(from, to)| now >= from && now < to))
    }
}

impl ShakeSensor for MockProp {
    fn detect(&mut self, _threshold: f32) -> Result<bool, SensorError> {
        if self.shake_fault {
            return Err(SensorError::Bus);
        }
        let now = self.now();
        match self.shakes.iter().position(|&t| t <= now) {
            Some(i) => {
                self.shakes.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl AudioSink for MockProp {
    fn play(&mut self, asset: &Path) -> Result<(), PlaybackFault> {
        assert!(
            self.active.is_none(),
            "overlapping playback: {} started while a clip was active",
            asset.display()
        );
        if self.missing_assets.iter().any(|m| m == asset) {
            return Err(PlaybackFault::Open);
        }
        self.plays.push(PlayRecord {
            at_ms: self.now(),
            asset: asset.to_path_buf(),
        });
        self.active = Some(self.clip_polls);
        Ok(())
    }

    fn is_playing(&mut self) -> Result<bool, PlaybackFault> {
        match self.active {
            Some(0) | None => {
                self.active = None;
                Ok(false)
            }
            Some(n) => {
                self.active = Some(n - 1);
                Ok(true)
            }
        }
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.active = None;
    }
}

impl LedPort for MockProp {
    fn set_brightness(&mut self, duty: u16) {
        self.leds.push(LedCall::Main(duty));
    }

    fn set_aux(&mut self, mask: AuxMask) {
        self.leds.push(LedCall::Aux(mask));
    }
}

impl TimePort for MockProp {
    fn now_ms(&self) -> u64 {
        self.now()
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.clock.set(self.clock.get() + u64::from(ms));
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
