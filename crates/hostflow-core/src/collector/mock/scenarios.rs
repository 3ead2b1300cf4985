//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` filesystem states
//! for testing various system conditions.

use super::filesystem::MockFs;

const TYPICAL_STAT: &str = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
softirq 200000 0 50000 10 20000 0 0 1000 30000 0 99000
";

const TYPICAL_MEMINFO: &str = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              1024 kB
Writeback:             0 kB
Slab:             512000 kB
SReclaimable:     256000 kB
";

impl MockFs {
    /// Creates a lightly loaded four-core system.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file("/proc/uptime", "12345.67 98765.43\n");
        fs.add_file("/proc/loadavg", "0.15 0.10 0.05 1/150 1234\n");
        fs.add_file("/proc/stat", TYPICAL_STAT);
        fs.add_file("/proc/meminfo", TYPICAL_MEMINFO);

        fs
    }

    /// Creates a system saturated with runnable processes.
    pub fn high_cpu_load() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file("/proc/loadavg", "4.50 3.20 2.10 8/200 5678\n");
        fs.add_file(
            "/proc/stat",
            "\
cpu  90000 1000 8000 5000 200 400 300 0 0 0
cpu0 22500 250 2000 1250 50 100 75 0 0 0
cpu1 22500 250 2000 1250 50 100 75 0 0 0
cpu2 22500 250 2000 1250 50 100 75 0 0 0
cpu3 22500 250 2000 1250 50 100 75 0 0 0
intr 5000000 50 0 0 0 0 0 0 0 1
ctxt 2500000
",
        );

        fs
    }

    /// Creates a system short on memory and actively swapping.
    pub fn memory_pressure() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:          256000 kB
MemAvailable:     512000 kB
Buffers:           32000 kB
Cached:           128000 kB
SwapCached:       256000 kB
SwapTotal:       4096000 kB
SwapFree:        1024000 kB
",
        );

        fs
    }

    /// Creates a system whose CPU sources are present but unparsable,
    /// while memory information stays intact.
    pub fn broken_cpu_sources() -> Self {
        let mut fs = Self::typical_system();

        fs.add_file("/proc/loadavg", "not a load average\n");
        fs.add_file("/proc/stat", "cpu 1 2\n");

        fs
    }
}
