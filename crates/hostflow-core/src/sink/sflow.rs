//! sFlow v5 datagram encoder for host counter samples.
//!
//! Layout (all fields big-endian XDR):
//!
//! ```text
//! datagram:  version=5 | addr_type | agent_addr | sub_agent_id | seq | uptime_ms | n_samples
//! sample:    format(0:2) | length | seq | source_id | n_records | records...
//! record:    format(0:2003 | 0:2004) | length | body
//! ```

use std::net::IpAddr;

use crate::model::{CounterRecord, CpuCounters, MemoryCounters, SampleBatch};

pub const SFLOW_VERSION: u32 = 5;

const ADDRESS_TYPE_IPV4: u32 = 1;
const ADDRESS_TYPE_IPV6: u32 = 2;

/// Enterprise 0, format 2: counter sample.
const FORMAT_COUNTER_SAMPLE: u32 = 2;
/// Enterprise 0, format 2003: host_cpu.
const FORMAT_HOST_CPU: u32 = 2003;
/// Enterprise 0, format 2004: host_memory.
const FORMAT_HOST_MEMORY: u32 = 2004;

pub const HOST_CPU_LENGTH: usize = 68;
pub const HOST_MEMORY_LENGTH: usize = 72;

/// Kernel clock ticks per second for `/proc/stat` CPU buckets.
const USER_HZ: u64 = 100;

/// Fixed identifiers placed in every datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolParams {
    pub sub_agent_id: u32,
    /// First datagram sequence number.
    pub initial_sequence: u32,
    /// Counter sample source id, `type << 24 | index`.
    pub source_id: u32,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            sub_agent_id: 23000,
            initial_sequence: 100,
            source_id: 0,
        }
    }
}

/// Stateful encoder: owns the datagram and sample sequence counters.
#[derive(Debug, Clone)]
pub struct SflowEncoder {
    agent: IpAddr,
    params: ProtocolParams,
    datagram_sequence: u32,
    sample_sequence: u32,
}

impl SflowEncoder {
    pub fn new(agent: IpAddr, params: ProtocolParams) -> Self {
        Self {
            agent,
            params,
            datagram_sequence: params.initial_sequence,
            sample_sequence: params.initial_sequence,
        }
    }

    /// Changes the agent address carried by subsequent datagrams. Sequence
    /// counters are kept.
    pub fn set_agent(&mut self, agent: IpAddr) {
        self.agent = agent;
    }

    /// Sequence number the next datagram will carry.
    pub fn next_sequence(&self) -> u32 {
        self.datagram_sequence
    }

    /// Encodes `batch` as a datagram with one counter sample and advances
    /// both sequence counters.
    pub fn encode(&mut self, batch: &SampleBatch, uptime_ms: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + batch.len() * (HOST_MEMORY_LENGTH + 8));

        put_u32(&mut out, SFLOW_VERSION);
        match self.agent {
            IpAddr::V4(ip) => {
                put_u32(&mut out, ADDRESS_TYPE_IPV4);
                out.extend_from_slice(&ip.octets());
            }
            IpAddr::V6(ip) => {
                put_u32(&mut out, ADDRESS_TYPE_IPV6);
                out.extend_from_slice(&ip.octets());
            }
        }
        put_u32(&mut out, self.params.sub_agent_id);
        put_u32(&mut out, self.datagram_sequence);
        put_u32(&mut out, uptime_ms);
        put_u32(&mut out, 1);

        let mut records = Vec::new();
        for record in &batch.records {
            encode_record(&mut records, record);
        }

        put_u32(&mut out, FORMAT_COUNTER_SAMPLE);
        put_u32(&mut out, (12 + records.len()) as u32);
        put_u32(&mut out, self.sample_sequence);
        put_u32(&mut out, self.params.source_id);
        put_u32(&mut out, batch.len() as u32);
        out.extend_from_slice(&records);

        self.datagram_sequence = self.datagram_sequence.wrapping_add(1);
        self.sample_sequence = self.sample_sequence.wrapping_add(1);

        out
    }
}

fn encode_record(out: &mut Vec<u8>, record: &CounterRecord) {
    match record {
        CounterRecord::Cpu(cpu) => {
            put_u32(out, FORMAT_HOST_CPU);
            put_u32(out, HOST_CPU_LENGTH as u32);
            encode_host_cpu(out, cpu);
        }
        CounterRecord::Memory(mem) => {
            put_u32(out, FORMAT_HOST_MEMORY);
            put_u32(out, HOST_MEMORY_LENGTH as u32);
            encode_host_memory(out, mem);
        }
    }
}

fn encode_host_cpu(out: &mut Vec<u8>, cpu: &CpuCounters) {
    put_f32(out, cpu.load1);
    put_f32(out, cpu.load5);
    put_f32(out, cpu.load15);
    put_u32(out, cpu.processes_running);
    put_u32(out, cpu.processes_total);
    put_u32(out, cpu.num_cpus);
    // cpu_speed (MHz) is not collected.
    put_u32(out, 0);
    put_counter(out, cpu.uptime);
    put_counter(out, ticks_to_ms(cpu.user));
    put_counter(out, ticks_to_ms(cpu.nice));
    put_counter(out, ticks_to_ms(cpu.system));
    put_counter(out, ticks_to_ms(cpu.idle));
    put_counter(out, ticks_to_ms(cpu.iowait));
    put_counter(out, ticks_to_ms(cpu.irq));
    put_counter(out, ticks_to_ms(cpu.softirq));
    put_counter(out, cpu.interrupts);
    put_counter(out, cpu.context_switches);
}

fn encode_host_memory(out: &mut Vec<u8>, mem: &MemoryCounters) {
    put_u64(out, mem.total);
    put_u64(out, mem.free);
    // mem_shared
    put_u64(out, 0);
    put_u64(out, mem.buffers);
    put_u64(out, mem.cached);
    put_u64(out, mem.swap_total);
    put_u64(out, mem.swap_free);
    // page_in, page_out, swap_in, swap_out
    for _ in 0..4 {
        put_u32(out, 0);
    }
}

fn ticks_to_ms(ticks: u64) -> u64 {
    ticks.wrapping_mul(1000 / USER_HZ)
}

/// sFlow counters are 32 bits wide and wrap.
fn put_counter(out: &mut Vec<u8>, value: u64) {
    put_u32(out, value as u32);
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_bits().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn word(buf: &[u8], offset: usize) -> u32 {
        u32::from_be_bytes(buf[offset..offset + 4].try_into().unwrap())
    }

    fn dword(buf: &[u8], offset: usize) -> u64 {
        u64::from_be_bytes(buf[offset..offset + 8].try_into().unwrap())
    }

    fn encoder() -> SflowEncoder {
        SflowEncoder::new(
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)),
            ProtocolParams::default(),
        )
    }

    // IPv4 datagram header is 28 bytes, counter sample header 20 bytes.
    const SAMPLE_AT: usize = 28;
    const RECORDS_AT: usize = SAMPLE_AT + 20;

    #[test]
    fn test_header_ipv4() {
        let buf = encoder().encode(&SampleBatch::default(), 1234);

        assert_eq!(word(&buf, 0), 5);
        assert_eq!(word(&buf, 4), ADDRESS_TYPE_IPV4);
        assert_eq!(&buf[8..12], &[10, 0, 0, 5]);
        assert_eq!(word(&buf, 12), 23000);
        assert_eq!(word(&buf, 16), 100);
        assert_eq!(word(&buf, 20), 1234);
        assert_eq!(word(&buf, 24), 1);
    }

    #[test]
    fn test_header_ipv6() {
        let mut enc = SflowEncoder::new("::1".parse().unwrap(), ProtocolParams::default());
        let buf = enc.encode(&SampleBatch::default(), 0);

        assert_eq!(word(&buf, 4), ADDRESS_TYPE_IPV6);
        assert_eq!(buf[23], 1);
        assert_eq!(word(&buf, 24), 23000);
        assert_eq!(buf.len(), 40 + 20);
    }

    #[test]
    fn test_empty_batch_has_empty_sample() {
        let buf = encoder().encode(&SampleBatch::default(), 0);

        assert_eq!(buf.len(), RECORDS_AT);
        assert_eq!(word(&buf, SAMPLE_AT), FORMAT_COUNTER_SAMPLE);
        assert_eq!(word(&buf, SAMPLE_AT + 4), 12);
        assert_eq!(word(&buf, SAMPLE_AT + 8), 100);
        assert_eq!(word(&buf, SAMPLE_AT + 12), 0);
        assert_eq!(word(&buf, SAMPLE_AT + 16), 0);
    }

    #[test]
    fn test_sequences_advance() {
        let mut enc = encoder();
        enc.encode(&SampleBatch::default(), 0);
        let buf = enc.encode(&SampleBatch::default(), 0);

        assert_eq!(word(&buf, 16), 101);
        assert_eq!(word(&buf, SAMPLE_AT + 8), 101);
        assert_eq!(enc.next_sequence(), 102);
    }

    #[test]
    fn test_host_cpu_record() {
        let cpu = CpuCounters {
            load1: 0.15,
            load5: 0.10,
            load15: 0.05,
            processes_running: 1,
            processes_total: 150,
            num_cpus: 4,
            uptime: 12345,
            user: 10000,
            nice: 500,
            system: 3000,
            idle: 80000,
            iowait: 1000,
            irq: 200,
            softirq: 100,
            interrupts: 1000000,
            context_switches: 500000,
        };
        let batch = SampleBatch {
            records: vec![CounterRecord::Cpu(cpu)],
        };

        let buf = encoder().encode(&batch, 0);
        let body = RECORDS_AT + 8;

        assert_eq!(buf.len(), body + HOST_CPU_LENGTH);
        assert_eq!(word(&buf, SAMPLE_AT + 4), (12 + 8 + HOST_CPU_LENGTH) as u32);
        assert_eq!(word(&buf, SAMPLE_AT + 16), 1);
        assert_eq!(word(&buf, RECORDS_AT), 2003);
        assert_eq!(word(&buf, RECORDS_AT + 4), 68);
        assert_eq!(f32::from_bits(word(&buf, body)), 0.15);
        assert_eq!(word(&buf, body + 12), 1);
        assert_eq!(word(&buf, body + 16), 150);
        assert_eq!(word(&buf, body + 20), 4);
        assert_eq!(word(&buf, body + 24), 0);
        assert_eq!(word(&buf, body + 28), 12345);
        assert_eq!(word(&buf, body + 32), 100000);
        assert_eq!(word(&buf, body + 44), 800000);
        assert_eq!(word(&buf, body + 56), 1000);
        assert_eq!(word(&buf, body + 60), 1000000);
        assert_eq!(word(&buf, body + 64), 500000);
    }

    #[test]
    fn test_host_memory_record() {
        let mem = MemoryCounters {
            total: 2048 * 1024,
            free: 1024 * 1024,
            buffers: 1,
            cached: 2,
            swap_total: 3,
            swap_free: 4,
        };
        let batch = SampleBatch {
            records: vec![CounterRecord::Memory(mem)],
        };

        let buf = encoder().encode(&batch, 0);
        let body = RECORDS_AT + 8;

        assert_eq!(buf.len(), body + HOST_MEMORY_LENGTH);
        assert_eq!(word(&buf, RECORDS_AT), 2004);
        assert_eq!(word(&buf, RECORDS_AT + 4), 72);
        assert_eq!(dword(&buf, body), 2048 * 1024);
        assert_eq!(dword(&buf, body + 8), 1024 * 1024);
        assert_eq!(dword(&buf, body + 16), 0);
        assert_eq!(dword(&buf, body + 24), 1);
        assert_eq!(dword(&buf, body + 48), 4);
    }

    #[test]
    fn test_counters_wrap_at_32_bits() {
        let cpu = CpuCounters {
            context_switches: u32::MAX as u64 + 6,
            ..Default::default()
        };
        let batch = SampleBatch {
            records: vec![CounterRecord::Cpu(cpu)],
        };

        let buf = encoder().encode(&batch, 0);

        assert_eq!(word(&buf, RECORDS_AT + 8 + 64), 5);
    }
}
