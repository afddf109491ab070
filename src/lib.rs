//! TitanProp firmware library.
//!
//! Exposes the pure-logic modules for integration testing. Board-only code
//! (peripheral bring-up, I²S, the ESP timer) is guarded by
//! `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod library;
