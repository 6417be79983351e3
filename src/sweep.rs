use itertools::Itertools;
use log::info;
use thiserror::Error;

use crate::accelerator::{
    ConfigError, ControlEngine, Micromanagement, PimConfig, PimParams, Sequencer,
};
use crate::pim_result::{Comparison, SweepRow};
use crate::settings::Settings;
use crate::workload::{ConvLayer, Workload, WorkloadError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SweepError {
    #[error("invalid pim config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid workload: {0}")]
    Workload(#[from] WorkloadError),
}

/// # Description
/// run both engines with the same config and workload
pub fn compare(config: &PimConfig, workload: &Workload) -> Comparison {
    let micromanagement = Micromanagement::new(config).run(workload);
    let sequencer = Sequencer::new(config).run(workload);
    let speedup = if sequencer.total_time > 0 {
        Some(micromanagement.total_time as f64 / sequencer.total_time as f64)
    } else {
        None
    };
    Comparison {
        micromanagement,
        sequencer,
        speedup,
    }
}

fn row(case: &str, config: &PimConfig, comparison: &Comparison) -> SweepRow {
    let params = config.params();
    let Comparison {
        micromanagement: mic,
        sequencer: seq,
        speedup,
    } = comparison;
    SweepRow {
        case: case.to_string(),
        macs_per_cycle: params.macs_per_cycle,
        fifo_depth: params.sequencer_fifo_depth,
        bus_width_bits: params.bus_width_bits,
        mic_total_time: mic.total_time,
        seq_total_time: seq.total_time,
        speedup: *speedup,
        mic_compute_util: mic.compute_utilization,
        seq_compute_util: seq.compute_utilization,
        mic_bus_transfers: mic.bus_transfers,
        seq_bus_transfers: seq.bus_transfers,
        mic_commands: mic.commands_issued,
        seq_commands: seq.commands_issued,
        mic_energy_pj: mic.energy_pj,
        seq_energy_pj: seq.energy_pj,
        mic_macs: mic.macs,
        seq_macs: seq.macs,
    }
}

fn compare_row(case: &str, params: PimParams, workload: &Workload) -> Result<SweepRow, ConfigError> {
    let config = PimConfig::new(params)?;
    let comparison = compare(&config, workload);
    info!(
        "{}: macs/cycle={} fifo={} bus={} mic={} seq={} speedup={:?}",
        case,
        config.params().macs_per_cycle,
        config.params().sequencer_fifo_depth,
        config.params().bus_width_bits,
        comparison.micromanagement.total_time,
        comparison.sequencer.total_time,
        comparison.speedup
    );
    Ok(row(case, &config, &comparison))
}

/// the tiny workload of the calibrated case, single mac layers
pub fn calibrated_workload(layers: usize) -> Workload {
    Workload::repeated(ConvLayer::unit("tiny_layer"), layers)
}

/// # Description
/// the calibrated case: tiny layers where the control overhead dominates
pub fn calibrated_case(settings: &Settings) -> Result<Comparison, ConfigError> {
    let config = PimConfig::new(settings.calibrated_params())?;
    let workload = calibrated_workload(settings.calibrated.tiny_layers);
    Ok(compare(&config, &workload))
}

/// # Description
/// sweep macs/cycle x fifo depth on the settings workload, then append the calibrated case
pub fn run_sweep(settings: &Settings) -> Result<Vec<SweepRow>, SweepError> {
    let workload = settings.workload()?;
    info!("running parameter sweep, {} layers", workload.len());
    let mut rows = settings
        .sweep
        .macs_list
        .iter()
        .cartesian_product(settings.sweep.fifo_list.iter())
        .map(|(&macs_per_cycle, &sequencer_fifo_depth)| {
            let params = PimParams {
                macs_per_cycle,
                sequencer_fifo_depth,
                ..settings.pim.clone()
            };
            compare_row("sweep", params, &workload)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let calibrated = PimConfig::new(settings.calibrated_params())?;
    let comparison = compare(
        &calibrated,
        &calibrated_workload(settings.calibrated.tiny_layers),
    );
    rows.push(row("calibrated", &calibrated, &comparison));
    Ok(rows)
}

/// # Description
/// vary one parameter at a time: macs/cycle, then bus width
pub fn run_sensitivity(settings: &Settings) -> Result<Vec<SweepRow>, SweepError> {
    let workload = settings.workload()?;
    info!("running sensitivity analysis, {} layers", workload.len());
    let macs_rows = settings.sweep.sensitivity_macs.iter().map(|&macs_per_cycle| {
        let params = PimParams {
            macs_per_cycle,
            ..settings.pim.clone()
        };
        compare_row("macs", params, &workload)
    });
    let bus_rows = settings
        .sweep
        .sensitivity_bus_widths
        .iter()
        .map(|&bus_width_bits| {
            let params = PimParams {
                bus_width_bits,
                ..settings.pim.clone()
            };
            compare_row("bus", params, &workload)
        });
    Ok(macs_rows.chain(bus_rows).collect::<Result<_, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_calibrated() {
        let settings = Settings::new(vec!["configs/default.toml".into()]).unwrap();
        let comparison = calibrated_case(&settings).unwrap();
        assert_eq!(comparison.micromanagement.total_time, 7794);
        assert_eq!(comparison.sequencer.total_time, 2581);
        let speedup = comparison.speedup.unwrap();
        assert!(speedup > 3.0 && speedup < 3.05);
    }

    #[test]
    fn test_compare_empty() {
        let comparison = compare(&PimConfig::default(), &Workload::default());
        assert_eq!(comparison.speedup, None);
    }

    #[test]
    fn test_sweep_rows() {
        let settings = Settings::new(vec!["configs/default.toml".into()]).unwrap();
        let rows = run_sweep(&settings).unwrap();
        assert_eq!(rows.len(), 3 * 3 + 1);
        assert_eq!(rows.last().unwrap().case, "calibrated");
        for r in &rows {
            assert_eq!(r.mic_macs, r.seq_macs);
            assert!(r.speedup.unwrap() > 1.0);
        }
        let sens = run_sensitivity(&settings).unwrap();
        assert_eq!(sens.len(), 6 + 5);
    }

    #[test]
    fn test_sweep_rejects_bad_grid() {
        let mut settings = Settings::new(vec!["configs/default.toml".into()]).unwrap();
        settings.sweep.fifo_list = vec![0];
        assert!(matches!(run_sweep(&settings), Err(SweepError::Config(_))));
    }

    #[test]
    fn test_sweep_rejects_overflowing_layer() {
        let mut settings = Settings::new(vec!["configs/default.toml".into()]).unwrap();
        settings.workload[0].in_c = u64::MAX;
        assert!(matches!(
            run_sensitivity(&settings),
            Err(SweepError::Workload(_))
        ));
    }
}
