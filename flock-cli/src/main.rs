use anyhow::{Context, Result};
use clap::Parser;
use flock_cli::{run, Args};
use flock_shared::SimulationSettings;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    if args.dump_config {
        println!("{}", SimulationSettings::default().to_json_pretty()?);
        return Ok(());
    }

    log::info!("Flock simulation starting...");
    log::info!("Agents: {}, frames: {} x {} ms", args.agents, args.frames, args.frame_ms);

    let report = run(&args).context("Simulation failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
