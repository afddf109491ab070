//! Monotonic clock adapter.
//!
//! Implements [`TimePort`] for the control loop.
//!
//! - **`feature = "espidf"`**: `esp_timer_get_time()` for the time base
//!   and `FreeRtos::delay_ms` for sleeping, so the idle task still runs.
//! - **host**: `std::time::Instant` and `std::thread::sleep`.

use crate::app::ports::TimePort;

pub struct MonotonicClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl TimePort for MonotonicClock {
    /// Milliseconds since boot.
    #[cfg(feature = "espidf")]
    fn now_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads the high-resolution timer; no preconditions.
        (unsafe { esp_idf_sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since construction.
    #[cfg(not(feature = "espidf"))]
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(feature = "espidf")]
    fn sleep_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(feature = "espidf"))]
    fn sleep_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
