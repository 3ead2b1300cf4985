//! Host CPU counters from `/proc/loadavg`, `/proc/uptime` and `/proc/stat`.

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{parse_cpu_times, parse_loadavg, parse_uptime};
use crate::collector::procfs::read_source;
use crate::collector::traits::{CounterReader, FileSystem};
use crate::model::{CounterRecord, CpuCounters};

/// Reads host CPU counters.
///
/// All three sources must be readable and well formed; otherwise no record
/// is produced.
pub struct CpuReader<F: FileSystem> {
    fs: F,
    proc_path: String,
    num_cpus: u32,
}

impl<F: FileSystem> CpuReader<F> {
    /// Creates a new CPU reader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    ///
    /// The logical CPU count is taken from the running environment once, here.
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            num_cpus: num_cpus::get() as u32,
        }
    }

    /// Overrides the logical CPU count reported in records.
    pub fn with_num_cpus(mut self, num_cpus: u32) -> Self {
        self.num_cpus = num_cpus;
        self
    }

    /// Collects CPU counters.
    pub fn collect(&self) -> Result<CpuCounters, CollectError> {
        let (path, content) = read_source(&self.fs, &self.proc_path, "loadavg")?;
        let load = parse_loadavg(&content).map_err(|e| CollectError::parse(path, e))?;

        let (path, content) = read_source(&self.fs, &self.proc_path, "uptime")?;
        let uptime = parse_uptime(&content).map_err(|e| CollectError::parse(path, e))?;

        let (path, content) = read_source(&self.fs, &self.proc_path, "stat")?;
        let times = parse_cpu_times(&content).map_err(|e| CollectError::parse(path, e))?;

        Ok(CpuCounters {
            load1: load.load1,
            load5: load.load5,
            load15: load.load15,
            processes_running: load.running,
            processes_total: load.total,
            num_cpus: self.num_cpus,
            uptime,
            user: times.user,
            nice: times.nice,
            system: times.system,
            idle: times.idle,
            iowait: times.iowait,
            irq: times.irq,
            softirq: times.softirq,
            interrupts: times.interrupts,
            context_switches: times.context_switches,
        })
    }
}

impl<F: FileSystem> CounterReader for CpuReader<F> {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn read(&self) -> Result<CounterRecord, CollectError> {
        self.collect().map(CounterRecord::Cpu)
    }
}
