//! # Description
//! - this module is the timing core of the crate
//! - two engines share one resource model: three clocks (host, bus, pim) and one bus arbiter
//! - read micromanagement.rs and sequencer.rs for the two control strategies
//!
//! # Components
//! - config: the validated timing/energy constants
//! - timeline: the three clocks and the bus arbitration
//! - inflight_queue: the bounded fifo of the sequencer
//! - micromanagement and sequencer: the engines, both implement `ControlEngine`
//! - metrics and trace: the run counters, energy model and per operation records
//!

pub(self) mod config;
pub(self) mod engine;
pub(self) mod inflight_queue;
pub(self) mod metrics;
pub(self) mod micromanagement;
pub(self) mod sequencer;
pub(self) mod timeline;
pub(self) mod trace;

pub use config::{ConfigError, PimConfig, PimParams, MIN_MACS_PER_CYCLE};
pub use engine::{ControlEngine, ControlMode};
pub use inflight_queue::InflightQueue;
pub use metrics::{compute_utilization, energy_pj, static_energy_pj, RunReport, REFERENCE_CLOCK_GHZ};
pub use micromanagement::Micromanagement;
pub use sequencer::Sequencer;
pub use timeline::{BusTransfer, ResourceTimeline};
pub use trace::{MicroTraceEntry, Phase, SequencerTraceEntry, TraceEntry};
