use log::{debug, info};

use super::{
    config::PimConfig,
    engine::{ControlEngine, ControlMode, RunState},
    inflight_queue::InflightQueue,
    metrics::RunReport,
    trace::{SequencerTraceEntry, TraceEntry},
};
use crate::workload::{ConvLayer, Workload};

/// # Description
/// the host writes a microprogram burst and one execute command per layer,
/// the controller then runs fetch, fetch, compute, store by itself
/// * at most `sequencer_fifo_depth` layers can be in flight, the host stalls when the fifo is full
/// * the host does not wait for the layer, so the next burst overlaps the current layer
#[derive(Debug)]
pub struct Sequencer<'a> {
    config: &'a PimConfig,
}

impl<'a> Sequencer<'a> {
    pub fn new(config: &'a PimConfig) -> Self {
        Sequencer { config }
    }

    /// # Description
    /// free the finished fifo entries, and if still full wait for the oldest one
    /// # Return
    /// the cycles the host was stalled
    fn admit(&self, state: &mut RunState, queue: &mut InflightQueue) -> u64 {
        let timeline = &mut state.timeline;
        queue.drain_until(timeline.host());
        if !queue.is_full() {
            return 0;
        }
        let before = timeline.host();
        if let Some(earliest) = queue.earliest() {
            timeline.host_wait_until(earliest);
        }
        queue.drain_until(timeline.host());
        debug!("fifo full, host stalled {} cycles", timeline.host() - before);
        timeline.host() - before
    }

    fn run_layer(
        &self,
        state: &mut RunState,
        queue: &mut InflightQueue,
        layer_id: usize,
        layer: &ConvLayer,
    ) {
        let params = self.config.params();
        let bus_cycles = self.config.bus_cycles_per_transfer();
        let payload = self.config.fetch_bus_transfers();
        state.counters.macs = state.counters.macs.saturating_add(layer.mac_ops());

        let host_stall = self.admit(state, queue);
        let timeline = &mut state.timeline;

        // microprogram burst
        let cpu_burst_start = timeline.host().saturating_add(params.sequencer_setup_cpu_cycles);
        timeline.acquire_bus(cpu_burst_start, self.config.burst_transfers(), bus_cycles);
        let cpu_burst_end = timeline.bus_hold(params.controller_write_ack_cycles);
        timeline.host_wait_until(cpu_burst_end);

        // single execute packet
        let execute_issue_time = timeline.host_spend(params.cpu_issue_cycles_seq);
        let execute_end = timeline.acquire_bus(execute_issue_time, 1, bus_cycles);
        timeline.host_wait_until(execute_end);
        state.counters.commands += 2;

        let controller_ready = timeline.bus().saturating_add(params.sequencer_execute_overhead);
        let pim_start = timeline.pim().max(controller_ready);

        // the hardware sequence, each step waits for the previous one
        let fetch1_end = timeline
            .acquire_bus(pim_start, payload, bus_cycles)
            .saturating_add(params.fetch_cycles);
        let fetch2_end = timeline
            .acquire_bus(fetch1_end, payload, bus_cycles)
            .saturating_add(params.fetch_cycles);
        let compute_cycles = self.config.compute_cycles(layer.mac_ops());
        let compute_end = fetch2_end.saturating_add(compute_cycles);
        let store_end = timeline
            .acquire_bus(compute_end, payload, bus_cycles)
            .saturating_add(params.store_cycles);

        let micro_overhead = params
            .micro_len
            .saturating_mul(params.sequencer_per_micro_cycles);
        let pim_end = timeline.pim_busy_until(store_end.saturating_add(micro_overhead));
        queue.push(pim_end);

        let io_cycles = (fetch2_end - pim_start).saturating_add(store_end - compute_end);
        let counters = &mut state.counters;
        counters.compute_cycles = counters.compute_cycles.saturating_add(compute_cycles);
        counters.io_cycles = counters.io_cycles.saturating_add(io_cycles);
        counters.control_cycles = counters.control_cycles.saturating_add(micro_overhead);

        debug!(
            "seq layer {}: burst {}..{} execute {}..{} pim {}..{} fifo {}",
            layer_id,
            cpu_burst_start,
            cpu_burst_end,
            execute_issue_time,
            execute_end,
            pim_start,
            pim_end,
            queue.len()
        );
        state.trace.push(TraceEntry::Sequencer(SequencerTraceEntry {
            layer: layer_id,
            host_stall,
            cpu_burst_start,
            cpu_burst_end,
            execute_issue_time,
            execute_end,
            controller_ready,
            pim_start,
            fetch1_end,
            fetch2_end,
            compute_end,
            store_end,
            pim_end,
            compute_cycles,
            io_cycles,
            micro_overhead,
            fifo_occupancy_after_submit: queue.len(),
            microprog_bytes: self.config.microprogram_bytes(),
            fifo_bytes: self.config.fifo_bytes(),
        }));
    }
}

impl ControlEngine for Sequencer<'_> {
    fn mode(&self) -> ControlMode {
        ControlMode::Sequencer
    }

    fn run(&self, workload: &Workload) -> RunReport {
        let mut state = RunState::new();
        let mut queue = InflightQueue::new(self.config.params().sequencer_fifo_depth);
        for (idx, layer) in workload.layers().iter().enumerate() {
            self.run_layer(&mut state, &mut queue, idx + 1, layer);
        }
        let RunState {
            timeline,
            counters,
            trace,
        } = state;
        info!(
            "sequencer: {} layers in {} cycles, fifo high water {}/{}",
            workload.len(),
            timeline.total_time(),
            queue.max_occupancy(),
            queue.capacity()
        );
        RunReport::new(
            self.mode(),
            self.config.params(),
            &timeline,
            &counters,
            queue.max_occupancy(),
            trace,
        )
    }
}
