//! Sample-count debounced digital input.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up: the raw pin reads high while
//! released and low while pressed. [`DebouncedInput::update`] is called
//! once per control tick and runs the stable-reading filter.
//!
//! ## Algorithm
//!
//! A raw level that differs from the clean state becomes the candidate.
//! The candidate is accepted once it has been read on `required`
//! consecutive updates; any disagreeing sample in between resets the
//! count. Acceptance sets `fell` or `rose` for exactly that one update.
//!
//! | required | latency at 100 ms/tick |
//! |----------|------------------------|
//! | 1        | none (no filtering)    |
//! | 2        | one tick (default)     |

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::DebounceableInput;

pub struct DebouncedInput<P> {
    pin: P,
    required: u8,
    stable: bool,
    candidate: bool,
    count: u8,
    fell: bool,
    rose: bool,
}

impl<P: InputPin> DebouncedInput<P> {
    /// Seed the clean state from one raw read. A failed read assumes the
    /// idle (high) level.
    pub fn new(mut pin: P, required: u8) -> Self {
        let initial = pin.is_high().unwrap_or(true);
        Self {
            pin,
            required: required.max(1),
            stable: initial,
            candidate: initial,
            count: 0,
            fell: false,
            rose: false,
        }
    }

    /// Current debounced level (`true` = high = released).
    pub fn is_high(&self) -> bool {
        self.stable
    }

    fn sample(&mut self, raw: bool) {
        self.fell = false;
        self.rose = false;

        if raw == self.stable {
            self.candidate = raw;
            self.count = 0;
            return;
        }

        if raw == self.candidate {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate = raw;
            self.count = 1;
        }

        if self.count >= self.required {
            self.stable = raw;
            self.count = 0;
            self.fell = !raw;
            self.rose = raw;
        }
    }
}

impl<P: InputPin> DebounceableInput for DebouncedInput<P> {
    fn update(&mut self) {
        match self.pin.is_high() {
            Ok(raw) => self.sample(raw),
            Err(e) => {
                // Hold the last level; no edge this tick.
                warn!("button: GPIO read failed: {:?}", e);
                self.fell = false;
                self.rose = false;
            }
        }
    }

    fn fell(&self) -> bool {
        self.fell
    }

    fn rose(&self) -> bool {
        self.rose
    }
}
