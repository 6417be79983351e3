//! the crate pim_ctrl is a cycle level model of two ways to control a processing-in-memory accelerator.
//! there are 5 parts in the crate:
//!
//! - accelerator: the timing core, micromanagement and sequencer engines on a shared bus/host/pim timeline.
//! - workload: the convolution layers, each reduced to a mac count.
//! - settings: the layered toml settings.
//! - sweep: comparisons and parameter sweeps built on the engines.
//! - pim_result: the records written to the output folder.
//!

pub mod accelerator;
pub mod cmd_args;
pub mod pim_result;
pub mod settings;
pub mod sweep;
pub mod workload;

pub use accelerator::{ControlEngine, Micromanagement, PimConfig, RunReport, Sequencer};
pub use pim_result::PimSimResult;
pub use workload::{ConvLayer, Workload, WorkloadError};
