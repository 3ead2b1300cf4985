//! JSON lines sink for inspecting batches without a collector.

use std::io::Write;

use serde::Serialize;

use crate::host::HostAddress;
use crate::model::{CounterRecord, SampleBatch};
use crate::sink::{Delivery, SinkError, TelemetrySink};

#[derive(Serialize)]
struct DumpLine<'a> {
    host: String,
    records: &'a [CounterRecord],
}

/// Writes each batch as a single JSON object per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn submit(&mut self, host: HostAddress, batch: &SampleBatch) -> Result<Delivery, SinkError> {
        let mut line = serde_json::to_vec(&DumpLine {
            host: host.to_string(),
            records: &batch.records,
        })?;
        line.push(b'\n');
        self.out.write_all(&line)?;
        self.out.flush()?;

        Ok(Delivery {
            sequence: None,
            bytes: line.len(),
        })
    }
}
