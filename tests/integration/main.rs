//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that drives the full control loop
//! against mock adapters on a simulated clock. All tests run on the host
//! with no real hardware required.

mod audio_pacing;
mod mock_hw;
mod service_tests;
