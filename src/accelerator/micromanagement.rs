use log::{debug, info};

use super::{
    config::PimConfig,
    engine::{ControlEngine, ControlMode, RunState},
    metrics::RunReport,
    trace::{MicroTraceEntry, Phase, TraceEntry},
};
use crate::workload::{ConvLayer, Workload};

/// # Description
/// the host drives every primitive operation itself
/// * per layer: fetch input, fetch weights, compute, store output
/// * each command costs an issue delay and one bus packet, then the controller decodes it
/// * the host blocks until the pim unit finished the command before issuing the next one
#[derive(Debug)]
pub struct Micromanagement<'a> {
    config: &'a PimConfig,
}

impl<'a> Micromanagement<'a> {
    pub fn new(config: &'a PimConfig) -> Self {
        Micromanagement { config }
    }

    fn run_phase(&self, state: &mut RunState, layer_id: usize, phase: Phase, compute_cycles: u64) {
        let params = self.config.params();
        let bus_cycles = self.config.bus_cycles_per_transfer();
        let timeline = &mut state.timeline;

        let cpu_issue_start = timeline.host();
        let issued = timeline.host_spend(params.cpu_issue_cycles_mic);

        // the command packet itself
        let cpu_issue_end = timeline.acquire_bus(issued, 1, bus_cycles);
        timeline.host_wait_until(cpu_issue_end);
        state.counters.commands += 1;

        let controller_ready = timeline.bus().saturating_add(params.controller_decode_cycles);
        let pim_start = timeline.pim().max(controller_ready);

        let (pim_end, comp_time, io_time) = if phase.is_compute() {
            (pim_start.saturating_add(compute_cycles), compute_cycles, 0)
        } else {
            let fixed = match phase {
                Phase::StoreOutput => params.store_cycles,
                _ => params.fetch_cycles,
            };
            let payload = self.config.fetch_bus_transfers();
            let moved = timeline.acquire_bus(pim_start, payload, bus_cycles);
            let end = moved.saturating_add(fixed);
            (end, 0, end - pim_start)
        };
        timeline.pim_busy_until(pim_end);
        let counters = &mut state.counters;
        counters.compute_cycles = counters.compute_cycles.saturating_add(comp_time);
        counters.io_cycles = counters.io_cycles.saturating_add(io_time);

        // the cpu stalls until the command completes
        timeline.host_wait_until(pim_end);

        debug!(
            "mic layer {} {:?}: issue {}..{} pim {}..{}",
            layer_id, phase, cpu_issue_start, cpu_issue_end, pim_start, pim_end
        );
        state.trace.push(TraceEntry::Micromanagement(MicroTraceEntry {
            layer: layer_id,
            phase,
            cpu_issue_start,
            cpu_issue_end,
            controller_ready,
            pim_start,
            pim_end,
            compute_cycles: comp_time,
            io_cycles: io_time,
        }));
    }

    fn run_layer(&self, state: &mut RunState, layer_id: usize, layer: &ConvLayer) {
        state.counters.macs = state.counters.macs.saturating_add(layer.mac_ops());
        let compute_cycles = self.config.compute_cycles(layer.mac_ops());
        for phase in Phase::ALL {
            self.run_phase(state, layer_id, phase, compute_cycles);
        }
    }
}

impl ControlEngine for Micromanagement<'_> {
    fn mode(&self) -> ControlMode {
        ControlMode::Micromanagement
    }

    fn run(&self, workload: &Workload) -> RunReport {
        let mut state = RunState::new();
        for (idx, layer) in workload.layers().iter().enumerate() {
            self.run_layer(&mut state, idx + 1, layer);
        }
        let RunState {
            timeline,
            counters,
            trace,
        } = state;
        info!(
            "micromanagement: {} layers in {} cycles",
            workload.len(),
            timeline.total_time()
        );
        RunReport::new(
            self.mode(),
            self.config.params(),
            &timeline,
            &counters,
            0,
            trace,
        )
    }
}
