//! Main eye LED (PWM) and the three auxiliary LEDs (plain GPIO).
//!
//! Brightness is carried through the domain as a 16-bit duty
//! (0 = off, `u16::MAX` = full) and scaled here onto whatever resolution
//! the PWM channel was configured with. On the board that is a LEDC
//! channel; in tests it is a recording fake.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::drivers::led_patterns::AuxMask;

pub const AUX_COUNT: usize = 3;

pub struct PwmLed<P> {
    channel: P,
    duty: u16,
}

impl<P: SetDutyCycle> PwmLed<P> {
    pub fn new(channel: P) -> Self {
        Self { channel, duty: 0 }
    }

    /// Last 16-bit duty written.
    pub fn duty(&self) -> u16 {
        self.duty
    }

    pub fn set(&mut self, duty: u16) {
        let max = u32::from(self.channel.max_duty_cycle());
        let scaled = (u32::from(duty) * max + u32::from(u16::MAX) / 2) / u32::from(u16::MAX);
        // scaled <= max <= u16::MAX
        match self.channel.set_duty_cycle(scaled as u16) {
            Ok(()) => self.duty = duty,
            Err(e) => warn!("led: PWM write failed: {:?}", e),
        }
    }
}

pub struct AuxLeds<O> {
    pins: [O; AUX_COUNT],
    mask: AuxMask,
}

impl<O: OutputPin> AuxLeds<O> {
    pub fn new(pins: [O; AUX_COUNT]) -> Self {
        Self {
            pins,
            mask: AuxMask::NONE,
        }
    }

    pub fn mask(&self) -> AuxMask {
        self.mask
    }

    pub fn set(&mut self, mask: AuxMask) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            let result = if mask.is_on(i) {
                pin.set_high()
            } else {
                pin.set_low()
            };
            if let Err(e) = result {
                warn!("led: aux{} write failed: {:?}", i, e);
            }
        }
        self.mask = mask;
    }
}
