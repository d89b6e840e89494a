//! ATM-Guard kiosk monitoring node.
//!
//! Exposes the pure-logic modules for integration testing and host-side
//! simulation.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pins;
pub mod scheduler;

// Hardware-facing layers; real implementations are cfg-gated inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
