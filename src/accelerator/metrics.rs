use serde::Serialize;

use super::{
    config::PimParams,
    engine::ControlMode,
    timeline::{BusTransfer, ResourceTimeline},
    trace::TraceEntry,
};

/// the clock frequency assumed when turning cycles into seconds for the static power term
pub const REFERENCE_CLOCK_GHZ: f64 = 1.0;

/// counters accumulated while an engine runs, the bus transfer count lives in the timeline
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunCounters {
    pub commands: u64,
    pub compute_cycles: u64,
    pub io_cycles: u64,
    /// sequencer micro-instruction overhead
    pub control_cycles: u64,
    pub macs: u64,
}

/// # Description
/// the result of one engine invocation, built once at the end of the run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: ControlMode,
    pub total_time: u64,
    pub cpu_time: u64,
    pub pim_time: u64,
    pub bus_time: u64,
    pub mat_busy_time: u64,
    pub mat_compute_time: u64,
    pub mat_io_time: u64,
    pub mat_control_time: u64,
    pub mat_idle_cycles: u64,
    /// `compute / (compute + io + control)` over the pim busy cycles;
    /// control is the sequencer's per micro-instruction overhead and always 0 for micromanagement,
    /// so the sequencer's figure is lower than `compute / (compute + io)` would give
    pub compute_utilization: f64,
    pub commands_issued: u64,
    pub bus_transfers: u64,
    pub macs: u64,
    pub energy_pj: f64,
    pub max_fifo_occupancy: usize,
    pub trace: Vec<TraceEntry>,
    /// every bus occupation in arbitration order
    #[serde(skip)]
    pub bus_log: Vec<BusTransfer>,
}

impl RunReport {
    pub(crate) fn new(
        mode: ControlMode,
        params: &PimParams,
        timeline: &ResourceTimeline,
        counters: &RunCounters,
        max_fifo_occupancy: usize,
        trace: Vec<TraceEntry>,
    ) -> Self {
        let total_time = timeline.total_time();
        let other = counters.io_cycles.saturating_add(counters.control_cycles);
        let busy = counters.compute_cycles.saturating_add(other);
        RunReport {
            mode,
            total_time,
            cpu_time: timeline.host(),
            pim_time: timeline.pim(),
            bus_time: timeline.bus(),
            mat_busy_time: busy,
            mat_compute_time: counters.compute_cycles,
            mat_io_time: counters.io_cycles,
            mat_control_time: counters.control_cycles,
            mat_idle_cycles: total_time.saturating_sub(busy),
            compute_utilization: compute_utilization(counters.compute_cycles, other),
            commands_issued: counters.commands,
            bus_transfers: timeline.bus_transfers(),
            macs: counters.macs,
            energy_pj: energy_pj(
                params,
                mode,
                counters.macs,
                timeline.bus_transfers(),
                counters.commands,
                total_time,
            ),
            max_fifo_occupancy,
            trace,
            bus_log: timeline.bus_log().to_vec(),
        }
    }
}

/// # Description
/// fraction of the pim busy time spent computing
/// * 0 when the unit was never busy
pub fn compute_utilization(compute_cycles: u64, other_busy_cycles: u64) -> f64 {
    let busy = compute_cycles.saturating_add(other_busy_cycles);
    if busy == 0 {
        0.0
    } else {
        compute_cycles as f64 / busy as f64
    }
}

/// static energy of the sequencer for a run of `cycles`, in pJ
pub fn static_energy_pj(static_mw: f64, cycles: u64) -> f64 {
    let seconds = cycles as f64 / (REFERENCE_CLOCK_GHZ * 1e9);
    static_mw * 1e-3 * seconds * 1e12
}

/// # Description
/// closed form energy estimate in pJ
/// * `macs * e_mac + bus_transfers * e_bus + commands * e_decode`
/// * the sequencer also pays static power for the whole run
pub fn energy_pj(
    params: &PimParams,
    mode: ControlMode,
    macs: u64,
    bus_transfers: u64,
    commands: u64,
    total_time: u64,
) -> f64 {
    let dynamic = macs as f64 * params.e_mac_pj
        + bus_transfers as f64 * params.e_bus_transfer_pj
        + commands as f64 * params.e_ctrl_decode_pj;
    match mode {
        ControlMode::Micromanagement => dynamic,
        ControlMode::Sequencer => dynamic + static_energy_pj(params.sequencer_static_mw, total_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization() {
        assert_eq!(compute_utilization(0, 0), 0.0);
        assert_eq!(compute_utilization(10, 0), 1.0);
        assert_eq!(compute_utilization(1, 3), 0.25);
    }

    #[test]
    fn test_static_energy() {
        // 1 mW for 1000 cycles at 1 GHz is 1 us, 1 nJ
        let e = static_energy_pj(1.0, 1000);
        assert!((e - 1000.0).abs() < 1e-9);
        assert_eq!(static_energy_pj(5.0, 0), 0.0);
    }

    #[test]
    fn test_energy() {
        let params = PimParams::default();
        let mic = energy_pj(&params, ControlMode::Micromanagement, 10, 2, 4, 500);
        assert!((mic - (1.0 + 20.0 + 4.0)).abs() < 1e-9);
        let seq = energy_pj(&params, ControlMode::Sequencer, 10, 2, 4, 500);
        assert!((seq - (25.0 + 500.0)).abs() < 1e-9);
        assert_eq!(energy_pj(&params, ControlMode::Sequencer, 0, 0, 0, 0), 0.0);
    }
}
