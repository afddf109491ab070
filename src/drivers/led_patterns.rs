//! LED feedback sequences and their interpreter.
//!
//! Every blocking animation the prop performs is a finite list of
//! [`Step`]s: set one output, then hold for a fixed time. The interpreter
//! ([`LedSequence::run`]) applies each step through the [`LedPort`] and
//! sleeps through the [`TimePort`], so tests drive it with a fake clock.
//!
//! ## Built-in sequences
//!
//! | Sequence      | Steps                                       | Used by          |
//! |---------------|---------------------------------------------|------------------|
//! | `preroll`     | main full/off twice, 100 ms each            | every playback   |
//! | `acknowledge` | aux all on 200 ms, off 200 ms               | short/medium press |
//! | `chase`       | aux 001, 011, 111, 110, 100, 000 @ 100 ms   | motion           |
//! | `shake_alarm` | aux on 200 ms, then N × (on, off) @ 200 ms  | shake            |

use heapless::Vec;

use crate::app::ports::{LedPort, TimePort};

/// Maximum number of steps in a single sequence.
pub const SEQUENCE_CAP: usize = 32;

/// Full brightness on the main (PWM) LED.
pub const MAIN_FULL: u16 = u16::MAX;

/// Bitmask over the three auxiliary LEDs (bit 0 = LED 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuxMask(pub u8);

impl AuxMask {
    pub const NONE: Self = Self(0b000);
    pub const ALL: Self = Self(0b111);

    /// State of LED `index` (0..3).
    pub fn is_on(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }
}

/// A single output change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Main LED duty, 0..=65535.
    Main(u16),
    /// All three auxiliary LEDs at once.
    Aux(AuxMask),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub output: Output,
    pub hold_ms: u32,
}

impl Step {
    pub const fn new(output: Output, hold_ms: u32) -> Self {
        Self { output, hold_ms }
    }
}

/// Fixed-capacity step list. Stack-allocated, no heap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedSequence {
    steps: Vec<Step, SEQUENCE_CAP>,
}

impl LedSequence {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Two main-LED blink cycles before a clip starts.
    pub fn preroll() -> Self {
        Self::from_steps(&[
            Step::new(Output::Main(MAIN_FULL), 100),
            Step::new(Output::Main(0), 100),
            Step::new(Output::Main(MAIN_FULL), 100),
            Step::new(Output::Main(0), 100),
        ])
    }

    /// One all-aux flash after a short or medium press.
    pub fn acknowledge() -> Self {
        Self::from_steps(&[
            Step::new(Output::Aux(AuxMask::ALL), 200),
            Step::new(Output::Aux(AuxMask::NONE), 200),
        ])
    }

    /// Aux LEDs light up one by one, then go out in the same order.
    pub fn chase() -> Self {
        Self::from_steps(&[
            Step::new(Output::Aux(AuxMask(0b001)), 100),
            Step::new(Output::Aux(AuxMask(0b011)), 100),
            Step::new(Output::Aux(AuxMask(0b111)), 100),
            Step::new(Output::Aux(AuxMask(0b110)), 100),
            Step::new(Output::Aux(AuxMask(0b100)), 100),
            Step::new(Output::Aux(AuxMask::NONE), 100),
        ])
    }

    /// Chase followed by a dark hold of `settle_ms`.
    pub fn chase_then_settle(settle_ms: u32) -> Self {
        let mut seq = Self::chase();
        seq.push(Step::new(Output::Aux(AuxMask::NONE), settle_ms));
        seq
    }

    /// All aux LEDs on, no hold. Lights the prop up before the warning clip.
    pub fn alert_on() -> Self {
        Self::from_steps(&[Step::new(Output::Aux(AuxMask::ALL), 0)])
    }

    /// Urgent flash after the shake warning. Truncated to capacity; the
    /// config validator keeps `cycles` within it.
    pub fn shake_alarm(cycles: u8) -> Self {
        let mut seq = Self::from_steps(&[Step::new(Output::Aux(AuxMask::ALL), 200)]);
        for _ in 0..cycles {
            seq.push(Step::new(Output::Aux(AuxMask::ALL), 200));
            seq.push(Step::new(Output::Aux(AuxMask::NONE), 200));
        }
        seq
    }

    fn from_steps(steps: &[Step]) -> Self {
        let mut seq = Self::empty();
        for step in steps {
            seq.push(*step);
        }
        seq
    }

    fn push(&mut self, step: Step) {
        if self.steps.push(step).is_err() {
            log::warn!("led: sequence full, step dropped");
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step in order, blocking for each hold.
    pub fn run(&self, hw: &mut (impl LedPort + TimePort)) {
        for step in &self.steps {
            match step.output {
                Output::Main(duty) => hw.set_brightness(duty),
                Output::Aux(mask) => hw.set_aux(mask),
            }
            if step.hold_ms > 0 {
                hw.sleep_ms(step.hold_ms);
            }
        }
    }
}
