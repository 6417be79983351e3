use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<SimCommand>,
    /// extra config files, merged in order over configs/default.toml
    #[clap(short, long = "config")]
    pub config_names: Vec<String>,
    /// print the shell completion script and exit
    #[clap(long = "generate", arg_enum)]
    pub generator: Option<Shell>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    /// run both engines on the configured workload
    Compare,
    /// macs/cycle x fifo depth grid, plus the calibrated case
    Sweep,
    /// vary macs/cycle and bus width one at a time
    Sensitivity,
    /// the per operation traces of the calibrated case
    Trace,
}

impl SimCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SimCommand::Compare => "compare",
            SimCommand::Sweep => "sweep",
            SimCommand::Sensitivity => "sensitivity",
            SimCommand::Trace => "trace",
        }
    }
}
