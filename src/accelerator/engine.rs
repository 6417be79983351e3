use serde::Serialize;

use super::{
    metrics::{RunCounters, RunReport},
    timeline::ResourceTimeline,
    trace::TraceEntry,
};
use crate::workload::Workload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Micromanagement,
    Sequencer,
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlMode::Micromanagement => write!(f, "micromanagement"),
            ControlMode::Sequencer => write!(f, "sequencer"),
        }
    }
}

/// # Description
/// a control strategy that turns a workload into a timed run
/// * an engine holds no state between runs, every call of `run` starts from cycle 0
pub trait ControlEngine {
    fn mode(&self) -> ControlMode;
    fn run(&self, workload: &Workload) -> RunReport;
}

/// the mutable state of one engine run, owned by the run and dropped into the report at the end
#[derive(Debug, Default)]
pub(crate) struct RunState {
    pub timeline: ResourceTimeline,
    pub counters: RunCounters,
    pub trace: Vec<TraceEntry>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }
}
