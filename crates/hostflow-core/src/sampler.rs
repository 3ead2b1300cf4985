//! Fixed-interval sampling loop.
//!
//! Every tick runs the collector once and hands the resulting batch to the
//! sink exactly once. Nothing is retried or buffered: a failed tick is logged
//! and the next one starts from scratch.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::collector::Collector;
use crate::host::HostAddress;
use crate::sink::{Delivery, SinkError, TelemetrySink};

/// Time between ticks.
pub const SAMPLE_PERIOD: Duration = Duration::from_secs(5);

/// Tick deadlines spaced exactly one period apart from a start instant.
///
/// Overruns are not skipped: once behind, ticks are due immediately until
/// the schedule has caught up.
#[derive(Debug, Clone)]
pub struct Schedule {
    period: Duration,
    next: Instant,
}

impl Schedule {
    /// First tick is due one period after `start`.
    pub fn starting_at(start: Instant, period: Duration) -> Self {
        Self {
            period,
            next: start + period,
        }
    }

    /// How long to wait from `now` for the next tick; advances the deadline.
    pub fn wait_time(&mut self, now: Instant) -> Duration {
        let due = self.next;
        self.next += self.period;
        due.saturating_duration_since(now)
    }
}

/// What happened during one tick.
#[derive(Debug)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,
    /// Records handed to the sink.
    pub records: usize,
    /// Readers that failed and were left out.
    pub dropped: Vec<&'static str>,
    pub delivery: Result<Delivery, SinkError>,
}

/// Drives the collector and sink on a fixed period.
pub struct Sampler<S: TelemetrySink> {
    collector: Collector,
    sink: S,
    host: HostAddress,
    ticks: u64,
}

impl<S: TelemetrySink> Sampler<S> {
    pub fn new(collector: Collector, sink: S, host: HostAddress) -> Self {
        Self {
            collector,
            sink,
            host,
            ticks: 0,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs one collect-and-submit round.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;

        let collection = self.collector.collect_batch();
        for dropped in &collection.dropped {
            debug!("Tick #{}: skipping {} ({})", self.ticks, dropped.reader, dropped.error);
        }
        debug!(
            "Tick #{}: collected {} records in {:?}",
            self.ticks,
            collection.batch.len(),
            collection.elapsed
        );

        let delivery = self.sink.submit(self.host, &collection.batch);
        match &delivery {
            Ok(d) => match d.sequence {
                Some(seq) => info!(
                    "Sent datagram #{}: {} records, {} bytes",
                    seq,
                    collection.batch.len(),
                    d.bytes
                ),
                None => debug!("Wrote {} records, {} bytes", collection.batch.len(), d.bytes),
            },
            Err(e) => warn!("Tick #{}: batch discarded: {}", self.ticks, e),
        }

        TickReport {
            tick: self.ticks,
            records: collection.batch.len(),
            dropped: collection.dropped.iter().map(|d| d.reader).collect(),
            delivery,
        }
    }

    /// Ticks forever, `period` apart. Returns only if the process is killed.
    pub fn run(mut self, period: Duration) -> ! {
        let mut schedule = Schedule::starting_at(Instant::now(), period);
        info!(
            "Sampling every {:?} as {} ({})",
            period,
            self.host,
            self.collector.reader_names().join(", ")
        );

        loop {
            let wait = schedule.wait_time(Instant::now());
            if wait.is_zero() {
                debug!("Tick overdue, firing immediately");
            }
            thread::sleep(wait);
            self.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MockFs;
    use crate::model::{CounterRecord, SampleBatch};
    use std::io;

    #[derive(Default)]
    struct RecordingSink {
        batches: Vec<(HostAddress, SampleBatch)>,
        fail_next: bool,
    }

    impl TelemetrySink for RecordingSink {
        fn submit(
            &mut self,
            host: HostAddress,
            batch: &SampleBatch,
        ) -> Result<Delivery, SinkError> {
            if std::mem::take(&mut self.fail_next) {
                return Err(io::Error::other("network down").into());
            }
            self.batches.push((host, batch.clone()));
            Ok(Delivery {
                sequence: Some(self.batches.len() as u32),
                bytes: 0,
            })
        }
    }

    fn host() -> HostAddress {
        HostAddress::new("10.0.0.5".parse().unwrap())
    }

    #[test]
    fn test_tick_submits_batch_once() {
        let collector = Collector::new(MockFs::typical_system(), "/proc");
        let mut sampler = Sampler::new(collector, RecordingSink::default(), host());

        let report = sampler.tick();

        assert_eq!(report.tick, 1);
        assert_eq!(report.records, 2);
        assert!(report.dropped.is_empty());
        assert!(report.delivery.is_ok());
        assert_eq!(sampler.sink().batches.len(), 1);
        assert_eq!(sampler.sink().batches[0].0, host());
    }

    #[test]
    fn test_tick_without_cpu() {
        let collector = Collector::new(MockFs::broken_cpu_sources(), "/proc");
        let mut sampler = Sampler::new(collector, RecordingSink::default(), host());

        let report = sampler.tick();

        assert_eq!(report.records, 1);
        assert_eq!(report.dropped, vec!["cpu"]);
        let batch = &sampler.sink().batches[0].1;
        assert_eq!(batch.len(), 1);
        assert!(matches!(batch.records[0], CounterRecord::Memory(_)));
    }

    #[test]
    fn test_empty_batch_is_still_submitted() {
        let collector = Collector::new(MockFs::new(), "/proc");
        let mut sampler = Sampler::new(collector, RecordingSink::default(), host());

        let report = sampler.tick();

        assert_eq!(report.records, 0);
        assert_eq!(report.dropped.len(), 2);
        assert_eq!(sampler.sink().batches.len(), 1);
        assert!(sampler.sink().batches[0].1.is_empty());
    }

    #[test]
    fn test_send_failure_does_not_stop_next_tick() {
        let collector = Collector::new(MockFs::typical_system(), "/proc");
        let sink = RecordingSink {
            fail_next: true,
            ..Default::default()
        };
        let mut sampler = Sampler::new(collector, sink, host());

        let first = sampler.tick();
        let second = sampler.tick();

        assert!(first.delivery.is_err());
        assert!(second.delivery.is_ok());
        assert_eq!(second.tick, 2);
        assert_eq!(sampler.sink().batches.len(), 1);
    }

    #[test]
    fn test_schedule_on_time() {
        let start = Instant::now();
        let period = Duration::from_secs(5);
        let mut schedule = Schedule::starting_at(start, period);

        assert_eq!(schedule.wait_time(start), period);
        assert_eq!(
            schedule.wait_time(start + Duration::from_secs(6)),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn test_schedule_catches_up_after_overrun() {
        let start = Instant::now();
        let period = Duration::from_secs(5);
        let mut schedule = Schedule::starting_at(start, period);

        // Work kept the loop busy for 12s: the 5s and 10s ticks fire
        // back to back, then the 15s tick waits out the remainder.
        let late = start + Duration::from_secs(12);
        assert_eq!(schedule.wait_time(late), Duration::ZERO);
        assert_eq!(schedule.wait_time(late), Duration::ZERO);
        assert_eq!(schedule.wait_time(late), Duration::from_secs(3));
    }
}
