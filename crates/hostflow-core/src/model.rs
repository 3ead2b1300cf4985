//! Counter records produced by the collectors.
//!
//! A record is a snapshot of one metric family taken during a single tick.
//! Records are built fresh every tick and dropped once the sink has encoded
//! them.

use serde::Serialize;

/// Host CPU counters.
///
/// Sources: `/proc/loadavg`, `/proc/uptime`, `/proc/stat`.
#[derive(Clone, Serialize, Debug, PartialEq, Default)]
pub struct CpuCounters {
    /// 1-minute load average.
    /// Source: `/proc/loadavg` field 1
    pub load1: f32,

    /// 5-minute load average.
    /// Source: `/proc/loadavg` field 2
    pub load5: f32,

    /// 15-minute load average.
    /// Source: `/proc/loadavg` field 3
    pub load15: f32,

    /// Processes currently runnable.
    /// Source: `/proc/loadavg` field 4 (before `/`)
    pub processes_running: u32,

    /// Total scheduling entities.
    /// Source: `/proc/loadavg` field 4 (after `/`)
    pub processes_total: u32,

    /// Logical CPUs available to the agent.
    pub num_cpus: u32,

    /// Seconds since boot, fraction truncated.
    /// Source: `/proc/uptime` field 1
    pub uptime: u64,

    /// Time spent in user mode (clock ticks).
    /// Source: `/proc/stat` cpu column 1
    pub user: u64,

    /// Time spent in user mode with low priority (clock ticks).
    /// Source: `/proc/stat` cpu column 2
    pub nice: u64,

    /// Time spent in kernel mode (clock ticks).
    /// Source: `/proc/stat` cpu column 3
    pub system: u64,

    /// Time spent idle (clock ticks).
    /// Source: `/proc/stat` cpu column 4
    pub idle: u64,

    /// Time waiting for I/O (clock ticks).
    /// Source: `/proc/stat` cpu column 5
    pub iowait: u64,

    /// Time servicing hardware interrupts (clock ticks).
    /// Source: `/proc/stat` cpu column 6
    pub irq: u64,

    /// Time servicing software interrupts (clock ticks).
    /// Source: `/proc/stat` cpu column 7
    pub softirq: u64,

    /// Interrupts serviced since boot.
    /// Source: `/proc/stat` `intr` line
    pub interrupts: u64,

    /// Context switches since boot.
    /// Source: `/proc/stat` `ctxt` line
    pub context_switches: u64,
}

/// Host memory counters, in bytes.
///
/// Source: `/proc/meminfo` (kibibyte values multiplied by 1024).
#[derive(Clone, Serialize, Debug, PartialEq, Eq, Default)]
pub struct MemoryCounters {
    pub total: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// One metric family collected during a tick.
#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CounterRecord {
    Cpu(CpuCounters),
    Memory(MemoryCounters),
}

impl CounterRecord {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CounterRecord::Cpu(_) => "cpu",
            CounterRecord::Memory(_) => "memory",
        }
    }
}

/// Records collected in a single tick, in reader order.
#[derive(Clone, Serialize, Debug, PartialEq, Default)]
pub struct SampleBatch {
    pub records: Vec<CounterRecord>,
}

impl SampleBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
