//! Shake monitor.
//!
//! Polled first on every tick. A shake plays the fixed warning clip with
//! all auxiliary LEDs lit, then runs the urgent alarm flash to completion.
//!
//! Unlike motion there is no cooldown: a prop that keeps being shaken
//! keeps warning, one full warning per tick it is detected.

use log::{info, warn};

use crate::app::commands::{PlaybackRequest, Reaction};
use crate::app::events::{AppEvent, SensorKind};
use crate::app::ports::{EventSink, ShakeSensor};
use crate::drivers::led_patterns::LedSequence;

pub struct ShakeMonitor {
    threshold: f32,
    warning_asset: String,
    alarm_cycles: u8,
}

impl ShakeMonitor {
    pub fn new(threshold: f32, warning_asset: impl Into<String>, alarm_cycles: u8) -> Self {
        Self {
            threshold,
            warning_asset: warning_asset.into(),
            alarm_cycles,
        }
    }

    pub fn poll(
        &mut self,
        sensor: &mut impl ShakeSensor,
        sink: &mut impl EventSink,
    ) -> Option<Reaction> {
        match sensor.detect(self.threshold) {
            Ok(true) => {
                info!("shake: detected, put me down!");
                sink.emit(&AppEvent::ShakeDetected);
                Some(
                    Reaction::new(PlaybackRequest::Fixed {
                        asset: self.warning_asset.clone(),
                    })
                    .with_lead_in(LedSequence::alert_on())
                    .with_follow_up(LedSequence::shake_alarm(self.alarm_cycles)),
                )
            }
            Ok(false) => None,
            Err(error) => {
                warn!("shake: accelerometer read failed: {}", error);
                sink.emit(&AppEvent::SensorFault {
                    sensor: SensorKind::Accelerometer,
                    error,
                });
                None
            }
        }
    }
}
