use crate::accelerator::RunReport;
use crate::settings::Settings;
use serde::Serialize;

/// everything one invocation of the binary writes to `output/`
#[derive(Debug, Serialize)]
pub struct PimSimResult {
    pub command: String,
    pub settings: Option<Settings>,
    pub comparison: Option<Comparison>,
    pub rows: Option<Vec<SweepRow>>,
    pub simulation_time: String,
}

impl PimSimResult {
    pub fn new(command: &str) -> Self {
        PimSimResult {
            command: command.to_string(),
            settings: None,
            comparison: None,
            rows: None,
            simulation_time: String::new(),
        }
    }
}

/// both engines on the same configuration and workload
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub micromanagement: RunReport,
    pub sequencer: RunReport,
    /// micromanagement time over sequencer time, `None` if the sequencer took no time
    pub speedup: Option<f64>,
}

/// one point of a sweep, the traces are left out
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub case: String,
    pub macs_per_cycle: f64,
    pub fifo_depth: usize,
    pub bus_width_bits: u64,
    pub mic_total_time: u64,
    pub seq_total_time: u64,
    pub speedup: Option<f64>,
    pub mic_compute_util: f64,
    pub seq_compute_util: f64,
    pub mic_bus_transfers: u64,
    pub seq_bus_transfers: u64,
    pub mic_commands: u64,
    pub seq_commands: u64,
    pub mic_energy_pj: f64,
    pub seq_energy_pj: f64,
    pub mic_macs: u64,
    pub seq_macs: u64,
}
