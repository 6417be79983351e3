use serde::{Deserialize, Serialize};
use thiserror::Error;

/// # Description
/// the raw timing/energy parameters of the system, all units in cycles unless noted
/// * every field has a default, so a settings file only needs the fields it overrides
/// * this is not used by the engines directly, build a [`PimConfig`] from it first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PimParams {
    // packet and bus
    pub cmd_size_bits: u64,
    pub bus_width_bits: u64,

    // controller and cpu overheads
    pub controller_decode_cycles: u64,
    pub cpu_issue_cycles_mic: u64,
    pub cpu_issue_cycles_seq: u64,
    pub controller_write_ack_cycles: u64,

    // pim compute
    pub macs_per_cycle: f64,
    pub pim_base_latency_cycles: u64,

    // sequencer
    pub sequencer_fifo_depth: usize,
    pub sequencer_per_micro_cycles: u64,
    pub sequencer_setup_cpu_cycles: u64,
    pub sequencer_execute_overhead: u64,
    /// number of primitive commands in one microprogram
    pub micro_len: u64,

    // io
    pub fetch_payload_bits: u64,
    pub fetch_cycles: u64,
    pub store_cycles: u64,

    // energy
    pub e_mac_pj: f64,
    pub e_bus_transfer_pj: f64,
    pub e_ctrl_decode_pj: f64,
    pub sequencer_static_mw: f64,
}

impl Default for PimParams {
    fn default() -> Self {
        PimParams {
            cmd_size_bits: 64,
            bus_width_bits: 64,
            controller_decode_cycles: 1,
            cpu_issue_cycles_mic: 1,
            cpu_issue_cycles_seq: 1,
            controller_write_ack_cycles: 0,
            macs_per_cycle: 16.0,
            pim_base_latency_cycles: 400,
            sequencer_fifo_depth: 4,
            sequencer_per_micro_cycles: 1,
            sequencer_setup_cpu_cycles: 0,
            sequencer_execute_overhead: 1,
            micro_len: 4,
            fetch_payload_bits: 64,
            fetch_cycles: 150,
            store_cycles: 150,
            e_mac_pj: 0.1,
            e_bus_transfer_pj: 10.0,
            e_ctrl_decode_pj: 1.0,
            sequencer_static_mw: 1.0,
        }
    }
}

/// the slowest accepted pim, one mac may take at most `u32::MAX` cycles
pub const MIN_MACS_PER_CYCLE: f64 = 1.0 / u32::MAX as f64;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("macs_per_cycle must be a finite positive number, got {0}")]
    InvalidThroughput(f64),
    #[error("macs_per_cycle {0} is below the minimum of {MIN_MACS_PER_CYCLE}")]
    ThroughputTooLow(f64),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("energy coefficient {field} must be finite and non-negative, got {value}")]
    InvalidEnergy { field: &'static str, value: f64 },
}

/// # Description
/// the validated configuration consumed by both engines
/// * the derived constants are computed once in [`PimConfig::new`] and can not be set from outside
/// * to change a base field, get a copy of the params, modify it and build a new config
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PimConfig {
    params: PimParams,
    bus_cycles_per_transfer: u64,
    fetch_bus_transfers: u64,
    burst_transfers: u64,
    microprogram_bytes: u64,
    fifo_bytes: u64,
}

impl PimConfig {
    pub fn new(params: PimParams) -> Result<Self, ConfigError> {
        if !params.macs_per_cycle.is_finite() || params.macs_per_cycle <= 0.0 {
            return Err(ConfigError::InvalidThroughput(params.macs_per_cycle));
        }
        if params.macs_per_cycle < MIN_MACS_PER_CYCLE {
            return Err(ConfigError::ThroughputTooLow(params.macs_per_cycle));
        }
        for (field, value) in [
            ("cmd_size_bits", params.cmd_size_bits),
            ("bus_width_bits", params.bus_width_bits),
            ("sequencer_fifo_depth", params.sequencer_fifo_depth as u64),
            ("micro_len", params.micro_len),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        for (field, value) in [
            ("e_mac_pj", params.e_mac_pj),
            ("e_bus_transfer_pj", params.e_bus_transfer_pj),
            ("e_ctrl_decode_pj", params.e_ctrl_decode_pj),
            ("sequencer_static_mw", params.sequencer_static_mw),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidEnergy { field, value });
            }
        }

        let bus_width = params.bus_width_bits;
        let bus_cycles_per_transfer = params.cmd_size_bits.div_ceil(bus_width);
        let fetch_bus_transfers = params.fetch_payload_bits.div_ceil(bus_width).max(1);
        let program_bits = params.micro_len.saturating_mul(params.cmd_size_bits);
        let burst_transfers = program_bits.div_ceil(bus_width);
        let microprogram_bytes = program_bits / 8;
        let fifo_bytes = (params.sequencer_fifo_depth as u64).saturating_mul(microprogram_bytes);

        Ok(PimConfig {
            params,
            bus_cycles_per_transfer,
            fetch_bus_transfers,
            burst_transfers,
            microprogram_bytes,
            fifo_bytes,
        })
    }

    pub fn params(&self) -> &PimParams {
        &self.params
    }

    /// bus cycles needed to move one command packet
    pub fn bus_cycles_per_transfer(&self) -> u64 {
        self.bus_cycles_per_transfer
    }

    /// bus transfers needed to move one fetch/store payload
    pub fn fetch_bus_transfers(&self) -> u64 {
        self.fetch_bus_transfers
    }

    /// bus transfers needed to write one whole microprogram
    pub fn burst_transfers(&self) -> u64 {
        self.burst_transfers
    }

    pub fn microprogram_bytes(&self) -> u64 {
        self.microprogram_bytes
    }

    pub fn fifo_bytes(&self) -> u64 {
        self.fifo_bytes
    }

    /// # Description
    /// the cycles the pim unit spends on one compute phase
    /// * `base_latency + ceil(mac_ops / macs_per_cycle)`
    /// * saturates at `u64::MAX`, like the clocks
    pub fn compute_cycles(&self, mac_ops: u64) -> u64 {
        // the float to int cast saturates
        let work = (mac_ops as f64 / self.params.macs_per_cycle).ceil() as u64;
        self.params.pim_base_latency_cycles.saturating_add(work)
    }
}

impl Default for PimConfig {
    fn default() -> Self {
        // the default params always pass validation
        match PimConfig::new(PimParams::default()) {
            Ok(config) => config,
            Err(e) => unreachable!("default params are invalid: {}", e),
        }
    }
}
