//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parsed data from `/proc/loadavg`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadAvg {
    pub load1: f32,
    pub load5: f32,
    pub load15: f32,
    pub running: u32,
    pub total: u32,
}

/// Parses `/proc/loadavg` content.
///
/// Format: `load1 load5 load15 running/total last_pid`. The trailing pid is
/// not needed and may be absent.
pub fn parse_loadavg(content: &str) -> Result<LoadAvg, ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(ParseError::new(format!(
            "invalid loadavg format: expected 4+ fields, got {}",
            parts.len()
        )));
    }

    let load1 = parts[0]
        .parse()
        .map_err(|_| ParseError::new("invalid load1"))?;
    let load5 = parts[1]
        .parse()
        .map_err(|_| ParseError::new("invalid load5"))?;
    let load15 = parts[2]
        .parse()
        .map_err(|_| ParseError::new("invalid load15"))?;

    let (running, total) = parts[3]
        .split_once('/')
        .ok_or_else(|| ParseError::new("missing running/total pair"))?;
    let running = running
        .parse()
        .map_err(|_| ParseError::new("invalid running process count"))?;
    let total = total
        .parse()
        .map_err(|_| ParseError::new("invalid total process count"))?;

    Ok(LoadAvg {
        load1,
        load5,
        load15,
        running,
        total,
    })
}

/// Parses `/proc/uptime` content into whole seconds since boot.
///
/// Only the integer part of the first field is used; the fractional part is
/// truncated.
pub fn parse_uptime(content: &str) -> Result<u64, ParseError> {
    let first = content
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::new("empty uptime"))?;
    let whole = first.split_once('.').map_or(first, |(int, _)| int);
    whole
        .parse()
        .map_err(|_| ParseError::new(format!("invalid uptime '{}'", first)))
}

/// Aggregate CPU time and kernel activity counters from `/proc/stat`.
///
/// CPU buckets are cumulative clock ticks since boot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    /// Total interrupts serviced, first value of the `intr` line.
    pub interrupts: u64,
    /// Total context switches, the `ctxt` line.
    pub context_switches: u64,
}

/// Number of CPU buckets read from the aggregate `cpu` line.
const CPU_BUCKETS: usize = 7;

/// Parses `/proc/stat` content.
///
/// The aggregate `cpu` line is mandatory and must carry at least seven
/// numeric buckets; per-CPU lines are ignored. `intr` and `ctxt` default to
/// zero when missing.
pub fn parse_cpu_times(content: &str) -> Result<CpuTimes, ParseError> {
    let mut buckets: Option<[u64; CPU_BUCKETS]> = None;
    let mut times = CpuTimes::default();

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let Some(label) = parts.next() else {
            continue;
        };

        match label {
            "cpu" => {
                let mut values = [0u64; CPU_BUCKETS];
                for (idx, slot) in values.iter_mut().enumerate() {
                    let raw = parts.next().ok_or_else(|| {
                        ParseError::new(format!(
                            "not enough cpu fields: expected {}, got {}",
                            CPU_BUCKETS, idx
                        ))
                    })?;
                    *slot = raw
                        .parse()
                        .map_err(|_| ParseError::new(format!("invalid cpu field '{}'", raw)))?;
                }
                buckets = Some(values);
            }
            "intr" => {
                times.interrupts = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
            }
            "ctxt" => {
                times.context_switches = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
            }
            _ => {}
        }
    }

    let [user, nice, system, idle, iowait, irq, softirq] =
        buckets.ok_or_else(|| ParseError::new("missing aggregate cpu line"))?;

    Ok(CpuTimes {
        user,
        nice,
        system,
        idle,
        iowait,
        irq,
        softirq,
        ..times
    })
}

/// Parsed data from `/proc/meminfo`, in kibibytes as reported by the kernel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// Parses `/proc/meminfo` content.
///
/// Never fails: unknown keys are skipped, missing keys stay zero and a value
/// whose leading token is not an integer reads as zero.
pub fn parse_meminfo(content: &str) -> MemInfo {
    let mut info = MemInfo::default();

    let parse_kb = |value: &str| -> u64 {
        value
            .split_whitespace()
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key {
            "MemTotal" => info.mem_total = parse_kb(value),
            "MemFree" => info.mem_free = parse_kb(value),
            "Buffers" => info.buffers = parse_kb(value),
            "Cached" => info.cached = parse_kb(value),
            "SwapTotal" => info.swap_total = parse_kb(value),
            "SwapFree" => info.swap_free = parse_kb(value),
            _ => {}
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loadavg() {
        let content = "0.15 0.10 0.05 1/150 1234\n";
        let load = parse_loadavg(content).unwrap();

        assert_eq!(load.load1, 0.15);
        assert_eq!(load.load5, 0.10);
        assert_eq!(load.load15, 0.05);
        assert_eq!(load.running, 1);
        assert_eq!(load.total, 150);
    }

    #[test]
    fn test_parse_loadavg_without_last_pid() {
        let load = parse_loadavg("2.50 1.75 1.00 3/412").unwrap();
        assert_eq!(load.load1, 2.5);
        assert_eq!(load.running, 3);
        assert_eq!(load.total, 412);
    }

    #[test]
    fn test_parse_loadavg_rejects_bad_pair() {
        assert!(parse_loadavg("0.15 0.10 0.05 1-150 1234").is_err());
        assert!(parse_loadavg("0.15 0.10 0.05 x/150 1234").is_err());
    }

    #[test]
    fn test_parse_loadavg_rejects_garbage() {
        assert!(parse_loadavg("").is_err());
        assert!(parse_loadavg("high medium low 1/2 3").is_err());
    }

    #[test]
    fn test_parse_uptime() {
        assert_eq!(parse_uptime("12345.67 98765.43\n").unwrap(), 12345);
        assert_eq!(parse_uptime("42 7").unwrap(), 42);
    }

    #[test]
    fn test_parse_uptime_rejects_garbage() {
        assert!(parse_uptime("").is_err());
        assert!(parse_uptime("soon 1.0").is_err());
    }

    #[test]
    fn test_parse_cpu_times() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
";
        let times = parse_cpu_times(content).unwrap();

        assert_eq!(times.user, 10000);
        assert_eq!(times.nice, 500);
        assert_eq!(times.system, 3000);
        assert_eq!(times.idle, 80000);
        assert_eq!(times.iowait, 1000);
        assert_eq!(times.irq, 200);
        assert_eq!(times.softirq, 100);
        assert_eq!(times.interrupts, 1000000);
        assert_eq!(times.context_switches, 500000);
    }

    #[test]
    fn test_parse_cpu_times_without_activity_lines() {
        let times = parse_cpu_times("cpu 1 2 3 4 5 6 7\n").unwrap();
        assert_eq!(times.softirq, 7);
        assert_eq!(times.interrupts, 0);
        assert_eq!(times.context_switches, 0);
    }

    #[test]
    fn test_parse_cpu_times_short_line() {
        let err = parse_cpu_times("cpu 1 2 3\n").unwrap_err();
        assert!(err.message.contains("not enough cpu fields"));
    }

    #[test]
    fn test_parse_cpu_times_missing_aggregate() {
        let err = parse_cpu_times("cpu0 1 2 3 4 5 6 7\nctxt 10\n").unwrap_err();
        assert_eq!(err.message, "missing aggregate cpu line");
    }

    #[test]
    fn test_parse_meminfo() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              1024 kB
";
        let info = parse_meminfo(content);

        assert_eq!(info.mem_total, 16384000);
        assert_eq!(info.mem_free, 8192000);
        assert_eq!(info.buffers, 512000);
        assert_eq!(info.cached, 2048000);
        assert_eq!(info.swap_total, 4096000);
        assert_eq!(info.swap_free, 4096000);
    }

    #[test]
    fn test_parse_meminfo_swap_cached_is_not_cached() {
        let info = parse_meminfo("SwapCached:  777 kB\nCached:  5 kB\n");
        assert_eq!(info.cached, 5);
    }

    #[test]
    fn test_parse_meminfo_bad_value_reads_zero() {
        let info = parse_meminfo("MemTotal: lots kB\nMemFree: 10 kB\n");
        assert_eq!(info.mem_total, 0);
        assert_eq!(info.mem_free, 10);
    }

    #[test]
    fn test_parse_meminfo_empty() {
        assert_eq!(parse_meminfo(""), MemInfo::default());
    }
}
