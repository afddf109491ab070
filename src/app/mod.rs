//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the behaviour of the prop: press classification,
//! motion and shake monitoring, and single-owner playback arbitration.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod arbiter;
pub mod commands;
pub mod events;
pub mod motion;
pub mod ports;
pub mod press;
pub mod service;
pub mod shake;
