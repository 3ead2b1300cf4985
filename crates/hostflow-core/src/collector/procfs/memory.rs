//! Host memory counters from `/proc/meminfo`.

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::parse_meminfo;
use crate::collector::procfs::read_source;
use crate::collector::traits::{CounterReader, FileSystem};
use crate::model::{CounterRecord, MemoryCounters};

const KIB: u64 = 1024;

/// Reads host memory counters.
///
/// Only an unreadable source fails; field-level problems read as zero.
pub struct MemoryReader<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> MemoryReader<F> {
    /// Creates a new memory reader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// Collects memory counters, converted to bytes.
    pub fn collect(&self) -> Result<MemoryCounters, CollectError> {
        let (_, content) = read_source(&self.fs, &self.proc_path, "meminfo")?;
        let info = parse_meminfo(&content);

        Ok(MemoryCounters {
            total: info.mem_total.saturating_mul(KIB),
            free: info.mem_free.saturating_mul(KIB),
            buffers: info.buffers.saturating_mul(KIB),
            cached: info.cached.saturating_mul(KIB),
            swap_total: info.swap_total.saturating_mul(KIB),
            swap_free: info.swap_free.saturating_mul(KIB),
        })
    }
}

impl<F: FileSystem> CounterReader for MemoryReader<F> {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self) -> Result<CounterRecord, CollectError> {
        self.collect().map(CounterRecord::Memory)
    }
}
