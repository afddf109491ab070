//! Hardware adapter: bridges the peripheral drivers to the domain ports.
//!
//! Owns every driver and exposes them through the port traits, so the
//! control loop borrows a single `&mut HardwareAdapter` per tick. Generic
//! over the embedded-hal pin/PWM types and over the accelerometer and
//! audio sink, which keeps it buildable (and testable) on the host.

use std::path::Path;

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;

use crate::adapters::time::MonotonicClock;
use crate::app::ports::{
    AudioSink, DebounceableInput, LedPort, MotionSensor, ShakeSensor, TimePort,
};
use crate::drivers::debounce::DebouncedInput;
use crate::drivers::led::{AuxLeds, PwmLed};
use crate::drivers::led_patterns::AuxMask;
use crate::drivers::pir::PirSensor;
use crate::error::{PlaybackFault, SensorError};

/// Concrete adapter that combines all hardware behind the port traits.
pub struct HardwareAdapter<Btn, Pir, Acc, Pwm, Aux, Snd> {
    button: DebouncedInput<Btn>,
    pir: PirSensor<Pir>,
    accel: Acc,
    eye: PwmLed<Pwm>,
    aux: AuxLeds<Aux>,
    audio: Snd,
    clock: MonotonicClock,
}

impl<Btn, Pir, Acc, Pwm, Aux, Snd> HardwareAdapter<Btn, Pir, Acc, Pwm, Aux, Snd>
where
    Btn: InputPin,
    Pir: InputPin,
    Acc: ShakeSensor,
    Pwm: SetDutyCycle,
    Aux: OutputPin,
    Snd: AudioSink,
{
    pub fn new(
        button: DebouncedInput<Btn>,
        pir: PirSensor<Pir>,
        accel: Acc,
        eye: PwmLed<Pwm>,
        aux: AuxLeds<Aux>,
        audio: Snd,
        clock: MonotonicClock,
    ) -> Self {
        Self {
            button,
            pir,
            accel,
            eye,
            aux,
            audio,
            clock,
        }
    }

    /// Last duty written to the main LED.
    pub fn eye_duty(&self) -> u16 {
        self.eye.duty()
    }

    pub fn aux_mask(&self) -> AuxMask {
        self.aux.mask()
    }
}

// ── Input ports ───────────────────────────────────────────────

impl<Btn: InputPin, Pir, Acc, Pwm, Aux, Snd> DebounceableInput
    for HardwareAdapter<Btn, Pir, Acc, Pwm, Aux, Snd>
{
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

impl<Btn, Pir: InputPin, Acc, Pwm, Aux, Snd> MotionSensor
    for HardwareAdapter<Btn, Pir, Acc, Pwm, Aux, Snd>
{
    fn read(&mut self) -> Result<bool, SensorError> {
        self.pir.read()
    }
}

impl<Btn, Pir, Acc: ShakeSensor, Pwm, Aux, Snd> ShakeSensor
    for HardwareAdapter<Btn, Pir, Acc, Pwm, Aux, Snd>
{
    fn detect(&mut self, threshold: f32) -> Result<bool, SensorError> {
        self.accel.detect(threshold)
    }
}

// ── Output ports ──────────────────────────────────────────────

impl<Btn, Pir, Acc, Pwm, Aux, Snd: AudioSink> AudioSink
    for HardwareAdapter<Btn, Pir, Acc, Pwm, Aux, Snd>
{
    fn play(&mut self, asset: &Path) -> Result<(), PlaybackFault> {
        self.audio.play(asset)
    }

    fn is_playing(&mut self) -> Result<bool, PlaybackFault> {
        self.audio.is_playing()
    }

    fn stop(&mut self) {
        self.audio.stop();
    }
}

impl<Btn, Pir, Acc, Pwm: SetDutyCycle, Aux: OutputPin, Snd> LedPort
    for HardwareAdapter<Btn, Pir, Acc, Pwm, Aux, Snd>
{
    fn set_brightness(&mut self, duty: u16) {
        self.eye.set(duty);
    }

    fn set_aux(&mut self, mask: AuxMask) {
        self.aux.set(mask);
    }
}

impl<Btn, Pir, Acc, Pwm, Aux, Snd> TimePort for HardwareAdapter<Btn, Pir, Acc, Pwm, Aux, Snd> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.clock.sleep_ms(ms);
    }
}
