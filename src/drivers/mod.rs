//! Peripheral drivers and one-shot hardware initialisation.
//!
//! Everything except `hw_init` and `i2s` is generic over embedded-hal 1.0
//! traits and builds on the host.

pub mod audio;
pub mod debounce;
pub mod led;
pub mod led_patterns;
pub mod lis3dh;
pub mod pir;

#[cfg(feature = "espidf")]
pub mod hw_init;
#[cfg(feature = "espidf")]
pub mod i2s;
