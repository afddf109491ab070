//! PIR motion sensor (HC-SR501 style).
//!
//! Digital output, HIGH while motion is reported. The module holds its
//! output high for its own retrigger time; the domain only level-samples
//! it when the motion cooldown allows.

use embedded_hal::digital::InputPin;

use crate::app::ports::MotionSensor;
use crate::error::SensorError;

pub struct PirSensor<P> {
    pin: P,
}

impl<P: InputPin> PirSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> MotionSensor for PirSensor<P> {
    fn read(&mut self) -> Result<bool, SensorError> {
        self.pin.is_high().map_err(|_| SensorError::Gpio)
    }
}
