use chrono::Local;
use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use log::info;
use pim_ctrl::{
    cmd_args::{Args, SimCommand},
    settings::Settings,
    sweep, PimSimResult,
};
use std::io;
fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Info)?;
    let start_time = std::time::Instant::now();

    let mut config_names = vec![String::from("configs/default.toml")];
    let args = Args::parse();
    if let Some(generator) = args.generator {
        let mut cmd = Args::command();
        eprintln!("Generating completion file for {:?}...", generator);
        print_completions(generator, &mut cmd);
        return Ok(());
    }
    info!("{:?}", args);
    let command = args.command.unwrap_or(SimCommand::Compare);

    // config_names append args
    for arg in args.config_names.into_iter() {
        config_names.push(arg);
    }

    let settings = Settings::new(config_names)?;
    let mut results = PimSimResult::new(command.name());
    results.settings = Some(settings.clone());
    // create the folder for output
    std::fs::create_dir_all("output")?;

    match command {
        SimCommand::Compare => {
            let config = settings.pim_config()?;
            let workload = settings.workload()?;
            let comparison = sweep::compare(&config, &workload);
            info!(
                "micromanagement {} cycles, sequencer {} cycles, speedup {:?}",
                comparison.micromanagement.total_time,
                comparison.sequencer.total_time,
                comparison.speedup
            );
            results.comparison = Some(comparison);
        }
        SimCommand::Sweep => {
            results.rows = Some(sweep::run_sweep(&settings)?);
        }
        SimCommand::Sensitivity => {
            results.rows = Some(sweep::run_sensitivity(&settings)?);
        }
        SimCommand::Trace => {
            let comparison = sweep::calibrated_case(&settings)?;
            info!(
                "calibrated case: micromanagement {} cycles, sequencer {} cycles, speedup {:?}",
                comparison.micromanagement.total_time,
                comparison.sequencer.total_time,
                comparison.speedup
            );
            results.comparison = Some(comparison);
        }
    }

    // record the simulation time
    let simulation_time = start_time.elapsed().as_millis();
    results.simulation_time = format!("{}ms", simulation_time);

    let current_time: String = Local::now().format("%Y-%m-%d-%H-%M-%S%.6f").to_string();
    let output_path = format!("output/{}-{}.json", command.name(), current_time);

    let json = serde_json::to_string_pretty(&results)?;
    println!("{}", json);
    // write json of results to output_path
    std::fs::write(&output_path, json)?;
    info!("results written to {}", output_path);
    Ok(())
}
