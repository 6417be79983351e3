use enum_as_inner::EnumAsInner;
use serde::Serialize;

/// the four commands the host sends per layer in micromanagement mode, in issue order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    FetchInput,
    FetchWeights,
    Compute,
    StoreOutput,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::FetchInput,
        Phase::FetchWeights,
        Phase::Compute,
        Phase::StoreOutput,
    ];

    pub fn is_compute(&self) -> bool {
        matches!(self, Phase::Compute)
    }
}

/// one host command of the micromanagement engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MicroTraceEntry {
    /// 1-based layer index
    pub layer: usize,
    pub phase: Phase,
    pub cpu_issue_start: u64,
    /// the command packet has left the bus
    pub cpu_issue_end: u64,
    pub controller_ready: u64,
    pub pim_start: u64,
    pub pim_end: u64,
    pub compute_cycles: u64,
    pub io_cycles: u64,
}

/// one layer of the sequencer engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequencerTraceEntry {
    /// 1-based layer index
    pub layer: usize,
    /// cycles the host was stalled because the fifo was full
    pub host_stall: u64,
    pub cpu_burst_start: u64,
    pub cpu_burst_end: u64,
    pub execute_issue_time: u64,
    pub execute_end: u64,
    pub controller_ready: u64,
    pub pim_start: u64,
    pub fetch1_end: u64,
    pub fetch2_end: u64,
    pub compute_end: u64,
    pub store_end: u64,
    pub pim_end: u64,
    pub compute_cycles: u64,
    pub io_cycles: u64,
    pub micro_overhead: u64,
    pub fifo_occupancy_after_submit: usize,
    pub microprog_bytes: u64,
    pub fifo_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, EnumAsInner)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TraceEntry {
    Micromanagement(MicroTraceEntry),
    Sequencer(SequencerTraceEntry),
}

impl TraceEntry {
    pub fn layer(&self) -> usize {
        match self {
            TraceEntry::Micromanagement(entry) => entry.layer,
            TraceEntry::Sequencer(entry) => entry.layer,
        }
    }

    pub fn pim_start(&self) -> u64 {
        match self {
            TraceEntry::Micromanagement(entry) => entry.pim_start,
            TraceEntry::Sequencer(entry) => entry.pim_start,
        }
    }

    pub fn pim_end(&self) -> u64 {
        match self {
            TraceEntry::Micromanagement(entry) => entry.pim_end,
            TraceEntry::Sequencer(entry) => entry.pim_end,
        }
    }

    /// the cycle the host started issuing this entry
    pub fn host_start(&self) -> u64 {
        match self {
            TraceEntry::Micromanagement(entry) => entry.cpu_issue_start,
            TraceEntry::Sequencer(entry) => entry.cpu_burst_start,
        }
    }
}
