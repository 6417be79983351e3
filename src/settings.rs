use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::accelerator::{self, PimConfig, PimParams};
use crate::workload::{LayerSettings, Workload, WorkloadError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub pim: PimParams,
    pub workload: Vec<LayerSettings>,
    pub sweep: SweepSettings,
    pub calibrated: CalibratedSettings,
}

/// the grids of the parameter sweep and the sensitivity analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSettings {
    pub macs_list: Vec<f64>,
    pub fifo_list: Vec<usize>,
    pub sensitivity_macs: Vec<f64>,
    pub sensitivity_bus_widths: Vec<u64>,
}

/// # Description
/// the small case that exposes the control overhead
/// * overrides these fields of `pim`, the workload is `tiny_layers` single mac layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibratedSettings {
    pub macs_per_cycle: f64,
    pub sequencer_fifo_depth: usize,
    pub cpu_issue_cycles_mic: u64,
    pub cpu_issue_cycles_seq: u64,
    pub tiny_layers: usize,
}

impl Settings {
    pub fn new(config_path: Vec<String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        for i in config_path {
            builder = builder.add_source(File::with_name(&i));
        }
        builder.build()?.try_deserialize()
    }

    pub fn pim_config(&self) -> Result<PimConfig, accelerator::ConfigError> {
        PimConfig::new(self.pim.clone())
    }

    pub fn workload(&self) -> Result<Workload, WorkloadError> {
        Workload::try_from(self.workload.as_slice())
    }

    /// the params of the calibrated case, `pim` with the calibrated overrides
    pub fn calibrated_params(&self) -> PimParams {
        let CalibratedSettings {
            macs_per_cycle,
            sequencer_fifo_depth,
            cpu_issue_cycles_mic,
            cpu_issue_cycles_seq,
            ..
        } = self.calibrated;
        PimParams {
            macs_per_cycle,
            sequencer_fifo_depth,
            cpu_issue_cycles_mic,
            cpu_issue_cycles_seq,
            ..self.pim.clone()
        }
    }
}
