//! Seams of the collector: counter readers and the filesystem they read.
//!
//! The `FileSystem` trait lets the counter readers work against the real
//! `/proc` filesystem on Linux or against an in-memory tree in tests.

use std::io;
use std::path::Path;

use crate::collector::error::CollectError;
use crate::model::CounterRecord;

/// Produces one counter record from the current state of the host.
///
/// Readers hold no state between calls: reading unchanged sources twice
/// yields identical records. A failed read means the metric is skipped for
/// the current tick.
pub trait CounterReader {
    /// Metric family name used in logs.
    fn name(&self) -> &'static str;

    /// Reads the sources and builds a record.
    fn read(&self) -> Result<CounterRecord, CollectError>;
}

/// Abstraction for filesystem operations.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    ///
    /// # Returns
    /// The file contents as a string, or an I/O error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Real filesystem implementation that delegates to `std::fs`.
///
/// Use this in production to read from the actual `/proc` filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
