//! hostflow-core — host telemetry agent library.
//!
//! Provides:
//! - `collector` — `/proc` counter readers and per-tick batch assembly
//! - `host` — reporting-host address resolution
//! - `model` — counter records and sample batches
//! - `sink` — sFlow v5 encoding, UDP transport, JSON dump
//! - `sampler` — the fixed-interval tick loop

pub mod collector;
pub mod host;
pub mod model;
pub mod sampler;
pub mod sink;

/// Collector address used when none is given.
pub const DEFAULT_COLLECTOR: &str = "localhost:6343";
