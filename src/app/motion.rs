//! PIR motion monitor with a tick-count cooldown.
//!
//! The PIR is level-sampled, not edge-detected: while the
//! [`CooldownCounter`] is at or below the gate the sensor is not read at
//! all, so a PIR that stays asserted produces exactly one event per
//! window. The counter lives in the service and is passed in by
//! reference on every poll.

use log::{debug, info, warn};

use crate::app::commands::{PlaybackRequest, Reaction};
use crate::app::events::{AppEvent, SensorKind};
use crate::app::ports::{EventSink, MotionSensor};
use crate::drivers::led_patterns::LedSequence;
use crate::library::SoundCategory;

/// Ticks since the last motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownCounter(u32);

impl CooldownCounter {
    pub fn new(initial: u32) -> Self {
        Self(initial)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Advance by one tick. Saturates instead of wrapping back into the
    /// closed window.
    pub fn advance(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Strictly above `gate`.
    pub fn is_open(self, gate: u32) -> bool {
        self.0 > gate
    }
}

pub struct MotionMonitor {
    gate: u32,
    settle_ms: u32,
}

impl MotionMonitor {
    pub fn new(gate: u32, settle_ms: u32) -> Self {
        Self { gate, settle_ms }
    }

    pub fn is_armed(&self, cooldown: CooldownCounter) -> bool {
        cooldown.is_open(self.gate)
    }

    /// Sample the PIR if the gate is open. On motion, resets `cooldown`
    /// and returns the Titan reaction.
    pub fn poll(
        &mut self,
        cooldown: &mut CooldownCounter,
        sensor: &mut impl MotionSensor,
        sink: &mut impl EventSink,
    ) -> Option<Reaction> {
        if !self.is_armed(*cooldown) {
            return None;
        }

        match sensor.read() {
            Ok(true) => {
                info!("motion: detected at cooldown={}", cooldown.value());
                cooldown.reset();
                sink.emit(&AppEvent::MotionDetected);
                Some(
                    Reaction::new(PlaybackRequest::random(SoundCategory::Titan))
                        .with_lead_in(LedSequence::chase())
                        .with_follow_up(LedSequence::chase_then_settle(self.settle_ms)),
                )
            }
            Ok(false) => {
                debug!("motion: armed, cooldown={}", cooldown.value());
                sink.emit(&AppEvent::MotionArmed {
                    cooldown: cooldown.value(),
                });
                None
            }
            Err(error) => {
                warn!("motion: PIR read failed: {}", error);
                sink.emit(&AppEvent::SensorFault {
                    sensor: SensorKind::Motion,
                    error,
                });
                None
            }
        }
    }
}
