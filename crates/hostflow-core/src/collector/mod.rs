//! Host counter collection for Linux.
//!
//! This module reads the `/proc` text sources into typed counter records,
//! with support for mocking for testing on macOS.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    Collector                    │
//! │  ┌────────────────────┐  ┌───────────────────┐  │
//! │  │     CpuReader      │  │   MemoryReader    │  │
//! │  │  - /proc/loadavg   │  │  - /proc/meminfo  │  │
//! │  │  - /proc/uptime    │  └─────────┬─────────┘  │
//! │  │  - /proc/stat      │            │            │
//! │  └─────────┬──────────┘            │            │
//! │            └───────────┬───────────┘            │
//! │                 ┌──────▼──────┐                 │
//! │                 │  FileSystem │ (trait)         │
//! │                 └──────┬──────┘                 │
//! └────────────────────────┼────────────────────────┘
//!                   ┌──────┴──────┐
//!            ┌──────▼──────┐ ┌────▼────────┐
//!            │   RealFs    │ │   MockFs    │
//!            │  (Linux)    │ │  (Testing)  │
//!            └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use hostflow_core::collector::{Collector, MockFs};
//!
//! let fs = MockFs::typical_system();
//! let collector = Collector::new(fs, "/proc");
//! let collection = collector.collect_batch();
//! assert_eq!(collection.batch.len(), 2);
//! ```

#[allow(clippy::module_inception)]
mod collector;
mod error;
pub mod mock;
pub mod procfs;
pub mod traits;

pub use collector::{Collection, Collector, DroppedReader};
pub use error::CollectError;
pub use mock::MockFs;
pub use procfs::{CpuReader, MemoryReader};
pub use traits::{CounterReader, FileSystem, RealFs};
