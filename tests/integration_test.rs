use itertools::Itertools;
use pim_ctrl::{
    accelerator::{
        ControlEngine, Micromanagement, PimConfig, PimParams, RunReport, Sequencer,
        MIN_MACS_PER_CYCLE,
    },
    settings::Settings,
    sweep,
    workload::{ConvLayer, Workload},
};

fn mixed_workload() -> Workload {
    Workload::new(vec![
        ConvLayer::new("conv1", 3, 32, 32, 16, 3).unwrap(),
        ConvLayer::unit("tiny"),
        ConvLayer::new("conv2", 16, 16, 16, 32, 3).unwrap(),
        ConvLayer::new("pointwise", 32, 8, 8, 64, 1).unwrap(),
        ConvLayer::unit("tiny"),
        ConvLayer::new("conv3", 64, 4, 4, 64, 3).unwrap(),
    ])
}

fn config_with(f: impl FnOnce(&mut PimParams)) -> PimConfig {
    let mut params = PimParams::default();
    f(&mut params);
    PimConfig::new(params).unwrap()
}

fn both(config: &PimConfig, workload: &Workload) -> [RunReport; 2] {
    [
        Micromanagement::new(config).run(workload),
        Sequencer::new(config).run(workload),
    ]
}

#[test]
fn test_calibrated_scenario() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Info).unwrap_or(());
    let settings = Settings::new(vec!["configs/default.toml".into()])?;
    let comparison = sweep::calibrated_case(&settings)?;
    let mic = &comparison.micromanagement;
    let seq = &comparison.sequencer;
    let ratio = mic.total_time as f64 / seq.total_time as f64;
    assert!(ratio > 1.0);
    assert!((ratio - 3.02).abs() < 0.05, "ratio {}", ratio);
    assert_eq!(mic.commands_issued, 12);
    assert_eq!(seq.commands_issued, 6);
    Ok(())
}

#[test]
fn test_commands_per_layer() {
    let workload = mixed_workload();
    for micro_len in [1, 4, 16] {
        let config = config_with(|p| p.micro_len = micro_len);
        let [mic, seq] = both(&config, &workload);
        assert_eq!(mic.commands_issued, 4 * workload.len() as u64);
        assert_eq!(seq.commands_issued, 2 * workload.len() as u64);
        assert_eq!(mic.macs, workload.total_macs());
        assert_eq!(seq.macs, workload.total_macs());
    }
}

#[test]
fn test_clocks_monotonic_in_trace() {
    let workload = mixed_workload();
    for fifo in [1, 2, 4] {
        let config = config_with(|p| p.sequencer_fifo_depth = fifo);
        for report in both(&config, &workload) {
            for (a, b) in report.trace.iter().tuple_windows() {
                assert!(a.host_start() <= b.host_start());
                assert!(a.pim_start() <= b.pim_start());
                assert!(a.pim_end() <= b.pim_end());
                assert!(a.layer() <= b.layer());
            }
            for entry in &report.trace {
                assert!(entry.pim_start() <= entry.pim_end());
            }
            assert!(report.total_time >= report.cpu_time);
            assert!(report.total_time >= report.bus_time);
            assert!(report.total_time >= report.pim_time);
        }
    }
}

#[test]
fn test_bus_exclusive() {
    let workload = mixed_workload();
    let config = config_with(|p| {
        p.bus_width_bits = 32;
        p.fetch_payload_bits = 256;
    });
    for report in both(&config, &workload) {
        assert!(!report.bus_log.is_empty());
        for (a, b) in report.bus_log.iter().tuple_windows() {
            assert!(a.finish <= b.start, "{:?} overlaps {:?}", a, b);
        }
        let moved: u64 = report.bus_log.iter().map(|t| t.transfers).sum();
        assert_eq!(moved, report.bus_transfers);
    }
}

#[test]
fn test_fifo_never_over_capacity() {
    let workload = Workload::repeated(ConvLayer::unit("tiny"), 12);
    for fifo in [1, 2, 3, 8] {
        let config = config_with(|p| p.sequencer_fifo_depth = fifo);
        let report = Sequencer::new(&config).run(&workload);
        assert!(report.max_fifo_occupancy <= fifo);
        for entry in report.trace.iter().filter_map(|e| e.as_sequencer()) {
            assert!(entry.fifo_occupancy_after_submit >= 1);
            assert!(entry.fifo_occupancy_after_submit <= fifo);
        }
    }
}

#[test]
fn test_zero_workload() {
    let config = PimConfig::default();
    for report in both(&config, &Workload::default()) {
        assert_eq!(report.total_time, 0);
        assert_eq!(report.commands_issued, 0);
        assert_eq!(report.bus_transfers, 0);
        assert_eq!(report.energy_pj, 0.0);
        assert_eq!(report.compute_utilization, 0.0);
        assert_eq!(report.mat_idle_cycles, 0);
    }
}

#[test]
fn test_more_throughput_never_slower() {
    let workload = mixed_workload();
    let macs = [1.0, 2.0, 3.5, 8.0, 16.0, 64.0, 1024.0];
    let times: Vec<_> = macs
        .iter()
        .map(|&m| {
            let config = config_with(|p| p.macs_per_cycle = m);
            let [mic, seq] = both(&config, &workload);
            (mic.total_time, seq.total_time)
        })
        .collect();
    for (a, b) in times.iter().tuple_windows() {
        assert!(b.0 <= a.0);
        assert!(b.1 <= a.1);
    }
}

#[test]
fn test_deeper_fifo_never_slower() {
    let workload = mixed_workload();
    let times: Vec<_> = (1..=8)
        .map(|fifo| {
            let config = config_with(|p| {
                p.sequencer_fifo_depth = fifo;
                p.macs_per_cycle = 64.0;
            });
            Sequencer::new(&config).run(&workload).total_time
        })
        .collect();
    for (a, b) in times.iter().tuple_windows() {
        assert!(b <= a);
    }
}

#[test]
fn test_utilization_bounds() {
    let workload = mixed_workload();
    for (macs, bus) in [1.0, 16.0, 256.0].iter().cartesian_product([32, 64, 512]) {
        let config = config_with(|p| {
            p.macs_per_cycle = *macs;
            p.bus_width_bits = bus;
        });
        for report in both(&config, &workload) {
            assert!(report.compute_utilization > 0.0);
            assert!(report.compute_utilization <= 1.0);
            assert_eq!(
                report.mat_busy_time,
                report.mat_compute_time + report.mat_io_time + report.mat_control_time
            );
        }
    }
}

#[test]
fn test_engines_are_reentrant() {
    let config = PimConfig::default();
    let workload = mixed_workload();
    let engine = Sequencer::new(&config);
    let first = engine.run(&workload);
    let second = engine.run(&workload);
    assert_eq!(first.total_time, second.total_time);
    assert_eq!(first.trace, second.trace);
}

#[test]
fn test_slowest_pim_saturates_instead_of_overflowing() {
    let config = config_with(|p| p.macs_per_cycle = MIN_MACS_PER_CYCLE);
    let huge = ConvLayer::new("huge", 1 << 16, 1 << 16, 1 << 16, 1 << 15, 1).unwrap();
    let workload = Workload::new(vec![huge.clone(), ConvLayer::unit("tiny"), huge]);
    for report in both(&config, &workload) {
        assert_eq!(report.total_time, u64::MAX);
        assert_eq!(report.mat_compute_time, u64::MAX);
        assert!(report.compute_utilization <= 1.0);
        for (a, b) in report.bus_log.iter().tuple_windows() {
            assert!(a.finish <= b.start);
        }
    }
    let too_slow = PimParams {
        macs_per_cycle: 1e-300,
        ..PimParams::default()
    };
    assert!(PimConfig::new(too_slow).is_err());
}
