//! Telemetry sinks: where a tick's batch goes.
//!
//! The production sink encodes each batch as an sFlow v5 datagram and hands
//! it to a UDP transport. Delivery is fire-and-forget: a failed send is
//! reported to the caller and the batch is dropped.

mod dump;
pub mod sflow;
pub mod transport;

use std::io;
use std::time::Instant;

use crate::host::HostAddress;
use crate::model::SampleBatch;

pub use dump::JsonLinesSink;
pub use sflow::{ProtocolParams, SflowEncoder};
pub use transport::{StartupError, Transport, UdpTransport};

/// A batch could not be encoded or sent.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("send failed: {0}")]
    Io(#[from] io::Error),

    #[error("short write: sent {sent} of {len} bytes")]
    ShortWrite { sent: usize, len: usize },

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a sink did with a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Sequence number carried by the datagram, if the sink numbers them.
    pub sequence: Option<u32>,
    /// Bytes handed to the transport.
    pub bytes: usize,
}

/// Accepts one batch per tick together with the reporting host.
pub trait TelemetrySink {
    fn submit(&mut self, host: HostAddress, batch: &SampleBatch) -> Result<Delivery, SinkError>;
}

/// Encodes batches as sFlow datagrams and sends them over `T`.
pub struct SflowSink<T: Transport> {
    transport: T,
    params: ProtocolParams,
    encoder: Option<SflowEncoder>,
    started: Instant,
}

impl<T: Transport> SflowSink<T> {
    pub fn new(transport: T) -> Self {
        Self::with_params(transport, ProtocolParams::default())
    }

    pub fn with_params(transport: T, params: ProtocolParams) -> Self {
        Self {
            transport,
            params,
            encoder: None,
            started: Instant::now(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn uptime_ms(&self) -> u32 {
        // Wraps after ~49.7 days, as the sFlow uptime field does.
        self.started.elapsed().as_millis() as u32
    }
}

impl<T: Transport> TelemetrySink for SflowSink<T> {
    fn submit(&mut self, host: HostAddress, batch: &SampleBatch) -> Result<Delivery, SinkError> {
        let uptime_ms = self.uptime_ms();
        let params = self.params;
        let encoder = self
            .encoder
            .get_or_insert_with(|| SflowEncoder::new(host.ip(), params));
        encoder.set_agent(host.ip());

        let sequence = encoder.next_sequence();
        let datagram = encoder.encode(batch, uptime_ms);
        self.transport.send(&datagram)?;

        Ok(Delivery {
            sequence: Some(sequence),
            bytes: datagram.len(),
        })
    }
}
