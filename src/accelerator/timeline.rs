use log::debug;
use serde::Serialize;

/// one occupation of the shared bus, `[start, finish)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusTransfer {
    pub start: u64,
    pub finish: u64,
    pub transfers: u64,
}

/// # Description
/// the three virtual clocks of one engine run
/// * `host`: earliest cycle the cpu can issue the next thing
/// * `bus`: earliest cycle the shared bus is free
/// * `pim`: earliest cycle the pim compute unit is free
///
/// every clock only moves forward, either by `max(current, t)` or by `current + duration`,
/// the additions saturate at `u64::MAX`
#[derive(Debug, Default, Clone)]
pub struct ResourceTimeline {
    host: u64,
    bus: u64,
    pim: u64,
    bus_transfers: u64,
    bus_log: Vec<BusTransfer>,
}

impl ResourceTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> u64 {
        self.host
    }
    pub fn bus(&self) -> u64 {
        self.bus
    }
    pub fn pim(&self) -> u64 {
        self.pim
    }
    pub fn bus_transfers(&self) -> u64 {
        self.bus_transfers
    }
    pub fn bus_log(&self) -> &[BusTransfer] {
        &self.bus_log
    }

    /// the run time: the latest of the three clocks
    pub fn total_time(&self) -> u64 {
        self.host.max(self.bus).max(self.pim)
    }

    /// host spends `cycles` doing something by itself
    pub fn host_spend(&mut self, cycles: u64) -> u64 {
        self.host = self.host.saturating_add(cycles);
        self.host
    }

    /// the host waits until `cycle`, never moves backwards
    pub fn host_wait_until(&mut self, cycle: u64) -> u64 {
        self.host = self.host.max(cycle);
        self.host
    }

    /// the bus stays occupied for `cycles` more (e.g. a write acknowledgement)
    pub fn bus_hold(&mut self, cycles: u64) -> u64 {
        self.bus = self.bus.saturating_add(cycles);
        self.bus
    }

    /// the pim unit is busy until `cycle`, never moves backwards
    pub fn pim_busy_until(&mut self, cycle: u64) -> u64 {
        self.pim = self.pim.max(cycle);
        self.pim
    }

    /// # Description
    /// arbitrate the single shared bus
    /// * the requester is ready at `ready`, the bus is free at `self.bus`
    /// * the transfer starts at the later of the two and can not be interleaved
    /// * the bus clock moves to the finish cycle, which is also returned as the requester's completion
    ///
    /// # Example
    /// ```
    /// use pim_ctrl::accelerator::ResourceTimeline;
    /// let mut timeline = ResourceTimeline::new();
    /// assert_eq!(timeline.acquire_bus(10, 2, 1), 12);
    /// // arrives early, has to wait for the bus
    /// assert_eq!(timeline.acquire_bus(5, 1, 1), 13);
    /// assert_eq!(timeline.bus_transfers(), 3);
    /// ```
    pub fn acquire_bus(&mut self, ready: u64, transfers: u64, cycles_per_transfer: u64) -> u64 {
        let start = ready.max(self.bus);
        let finish = start.saturating_add(transfers.saturating_mul(cycles_per_transfer));
        debug!(
            "bus: ready {} start {} finish {} ({} transfers)",
            ready, start, finish, transfers
        );
        self.bus = finish;
        self.bus_transfers = self.bus_transfers.saturating_add(transfers);
        self.bus_log.push(BusTransfer {
            start,
            finish,
            transfers,
        });
        finish
    }
}
