//! Main collector that runs every counter reader once per tick.
//!
//! The `Collector` owns the readers in a fixed order (CPU, then memory) and
//! turns one round of reads into a `SampleBatch`.

use std::time::{Duration, Instant};

use crate::collector::error::CollectError;
use crate::collector::procfs::{CpuReader, MemoryReader};
use crate::collector::traits::{CounterReader, FileSystem};
use crate::model::SampleBatch;

/// A reader that produced nothing this tick.
#[derive(Debug)]
pub struct DroppedReader {
    pub reader: &'static str,
    pub error: CollectError,
}

/// Result of one collection round.
#[derive(Debug)]
pub struct Collection {
    /// Records from every reader that succeeded.
    pub batch: SampleBatch,
    /// Readers that failed and were left out of the batch.
    pub dropped: Vec<DroppedReader>,
    /// Wall time spent reading all sources.
    pub elapsed: Duration,
}

/// Runs the counter readers and assembles their successes into a batch.
pub struct Collector {
    readers: Vec<Box<dyn CounterReader>>,
}

impl Collector {
    /// Creates a collector with the CPU and memory readers.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new<F>(fs: F, proc_path: impl Into<String>) -> Self
    where
        F: FileSystem + Clone + 'static,
    {
        let proc_path = proc_path.into();
        Self::from_readers(vec![
            Box::new(CpuReader::new(fs.clone(), &proc_path)),
            Box::new(MemoryReader::new(fs, &proc_path)),
        ])
    }

    /// Creates a collector over an explicit reader list, kept in order.
    pub fn from_readers(readers: Vec<Box<dyn CounterReader>>) -> Self {
        Self { readers }
    }

    /// Names of the configured readers, in collection order.
    pub fn reader_names(&self) -> Vec<&'static str> {
        self.readers.iter().map(|r| r.name()).collect()
    }

    /// Runs every reader once.
    ///
    /// Readers are independent: a failure only removes that reader's record.
    pub fn collect_batch(&self) -> Collection {
        let start = Instant::now();
        let mut batch = SampleBatch::default();
        let mut dropped = Vec::new();

        for reader in &self.readers {
            match reader.read() {
                Ok(record) => batch.records.push(record),
                Err(error) => dropped.push(DroppedReader {
                    reader: reader.name(),
                    error,
                }),
            }
        }

        Collection {
            batch,
            dropped,
            elapsed: start.elapsed(),
        }
    }
}
