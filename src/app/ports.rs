//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PropService (domain)
//! ```
//!
//! Driven adapters (sensors, audio, LEDs, clock, event sinks) implement
//! these traits. The [`PropService`](super::service::PropService) consumes
//! them via generics, so the domain core never touches hardware directly
//! and every capability can be faked independently in tests.

use std::path::Path;

use crate::drivers::led_patterns::AuxMask;
use crate::error::{PlaybackFault, SensorError};

// ───────────────────────────────────────────────────────────────
// Input ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// A debounced digital input that reports clean edges.
pub trait DebounceableInput {
    /// Sample the raw input once. Call exactly once per tick.
    fn update(&mut self);

    /// Clean signal went high → low on the last `update`.
    fn fell(&self) -> bool;

    /// Clean signal went low → high on the last `update`.
    fn rose(&self) -> bool;
}

/// Passive-infrared presence sensor.
pub trait MotionSensor {
    /// Current level: `true` while motion is reported.
    fn read(&mut self) -> Result<bool, SensorError>;
}

/// Accelerometer with shake detection.
pub trait ShakeSensor {
    /// `true` if the averaged acceleration magnitude exceeds `threshold` (m/s²).
    fn detect(&mut self, threshold: f32) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Output ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The single audio output.
pub trait AudioSink {
    /// Open `asset` and begin playback.
    fn play(&mut self, asset: &Path) -> Result<(), PlaybackFault>;

    /// Whether the current clip is still playing. Streaming sinks push
    /// their next chunk of audio from here.
    fn is_playing(&mut self) -> Result<bool, PlaybackFault>;

    /// Abandon the current clip and release the device.
    fn stop(&mut self);
}

/// Main PWM LED plus the three auxiliary indicator LEDs.
pub trait LedPort {
    /// Main LED duty, 0..=65535.
    fn set_brightness(&mut self, duty: u16);

    /// Set all auxiliary LEDs at once.
    fn set_aux(&mut self, mask: AuxMask);
}

/// Monotonic time and blocking sleep.
pub trait TimePort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block the control loop for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

/// Everything the control loop needs from one hardware value.
///
/// Taking a single `&mut` that satisfies every port avoids juggling
/// several mutable borrows of the same adapter per tick.
pub trait PropHardware:
    DebounceableInput + MotionSensor + ShakeSensor + AudioSink + LedPort + TimePort
{
}

impl<T> PropHardware for T where
    T: DebounceableInput + MotionSensor + ShakeSensor + AudioSink + LedPort + TimePort
{
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
