//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! tagged line to the logger (UART / USB-CDC on the board).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | control loop running"),
            AppEvent::LibraryLoaded { category, count } => {
                info!("LIB   | {}: {} assets", category, count);
            }
            AppEvent::PressStarted => debug!("PRESS | down"),
            AppEvent::PressCompleted { duration_ms, bucket } => {
                info!("PRESS | {} ms -> {:?}", duration_ms, bucket);
            }
            AppEvent::StrayRelease => debug!("PRESS | release without press"),
            AppEvent::ShakeDetected => info!("SHAKE | detected"),
            AppEvent::MotionDetected => info!("PIR   | motion"),
            // Emitted every tick while the gate is open.
            AppEvent::MotionArmed { cooldown } => debug!("PIR   | armed ct={}", cooldown),
            AppEvent::PlaybackStarted { asset } => info!("PLAY  | {}", asset.display()),
            AppEvent::PlaybackFinished { asset, polls } => {
                info!("PLAY  | {} done ({} polls)", asset.display(), polls);
            }
            AppEvent::PlaybackSkipped { category } => {
                warn!("PLAY  | skipped, no {} assets", category);
            }
            AppEvent::PlaybackFailed { fault } => warn!("PLAY  | failed: {}", fault),
            AppEvent::SensorFault { sensor, error } => {
                warn!("FAULT | {:?}: {}", sensor, error);
            }
        }
    }
}
