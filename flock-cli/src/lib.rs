//! Headless driver for the flock engine.
//!
//! Plays the part of the rendering front end: it owns the frame clock, turns
//! user commands into selections and move orders, and reports what would be
//! drawn.

use std::{path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use flock_core::{Flock, TickScheduler, Vector2D};
use flock_shared::{AgentSnapshot, FlockReport, Position, SimulationSettings};
use rand::{rngs::StdRng, SeedableRng};

/// Largest flock the driver will spawn.
pub const MAX_AGENTS: usize = 64;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Headless flock steering simulation", long_about = None)]
pub struct Args {
    /// Simulation settings as JSON (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of agents to spawn
    #[arg(short, long, default_value_t = 2)]
    pub agents: usize,

    /// Seed for agent placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of frames to render
    #[arg(short, long, default_value_t = 120)]
    pub frames: u32,

    /// Real time between frames, in milliseconds
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Move command target as `x,y`; repeat to queue waypoints
    #[arg(short = 'm', long = "move", value_parser = parse_point, allow_hyphen_values = true)]
    pub moves: Vec<Position>,

    /// Queue the first move behind existing targets instead of replacing them
    #[arg(long)]
    pub append: bool,

    /// Selection rectangle as `x1,y1,x2,y2` (selects every agent when omitted)
    #[arg(short, long, value_parser = parse_rect, allow_hyphen_values = true)]
    pub select: Option<(Position, Position)>,

    /// Interpret move and selection coordinates as canvas pixels
    #[arg(long)]
    pub pixels: bool,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1024.0)]
    pub width: f32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 768.0)]
    pub height: f32,

    /// Pause the scheduler when this frame is reached
    #[arg(long)]
    pub pause_at: Option<u32>,

    /// Single ticks to run by hand once paused
    #[arg(long, default_value_t = 0)]
    pub manual_steps: u32,

    /// Print the default settings as JSON and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {} comma separated numbers, got `{}`", N, s));
    }
    let mut numbers = [0.0; N];
    for (slot, part) in numbers.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("`{}` is not a number: {}", part, e))?;
    }
    Ok(numbers)
}

fn parse_point(s: &str) -> Result<Position, String> {
    let [x, y] = parse_numbers::<2>(s)?;
    Ok(Position::new(x, y))
}

fn parse_rect(s: &str) -> Result<(Position, Position), String> {
    let [x1, y1, x2, y2] = parse_numbers::<4>(s)?;
    Ok((Position::new(x1, y1), Position::new(x2, y2)))
}

pub fn load_settings(path: Option<&Path>) -> Result<SimulationSettings> {
    let Some(path) = path else {
        return Ok(SimulationSettings::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings = SimulationSettings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Runs the simulation described by `args` and reports the final state.
pub fn run(args: &Args) -> Result<FlockReport> {
    let settings = load_settings(args.config.as_deref())?;
    let config = settings.step_config()?;
    let viewport = settings.viewport(args.width, args.height);
    let to_world = |p: Position| -> Vector2D {
        if args.pixels {
            viewport.client_to_world(p)
        } else {
            p.into()
        }
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut flock = Flock::<MAX_AGENTS>::scatter(args.agents, &mut rng)
        .with_context(|| format!("Cannot spawn {} agents (max {})", args.agents, MAX_AGENTS))?;
    log::info!("Spawned {} agents", flock.len());

    let selected = match args.select {
        Some((a, b)) => flock.select_from_corners(to_world(a), to_world(b)),
        None => flock.select_from_corners(
            Vector2D::new(f32::MIN, f32::MIN),
            Vector2D::new(f32::MAX, f32::MAX),
        ),
    };
    log::info!("Selected {} agents", selected);

    for (i, target) in args.moves.iter().enumerate() {
        let append = args.append || i > 0;
        flock
            .issue_move_command(to_world(*target), append)
            .context("Failed to issue move command")?;
    }

    let frame = Duration::from_millis(args.frame_ms);
    let mut scheduler = TickScheduler::new();
    for frame_index in 0..args.frames {
        if args.pause_at == Some(frame_index) {
            scheduler.pause();
            for _ in 0..args.manual_steps {
                scheduler.step_once(&mut flock, &config)?;
            }
            log::info!("Paused at frame {} after {} ticks", frame_index, scheduler.ticks());
        }

        let report = scheduler.advance(frame, &mut flock, &config)?;
        log::trace!(
            "frame {}: {} steps, {:?} leftover",
            frame_index,
            report.steps,
            report.leftover
        );
    }

    log::info!(
        "Finished {} frames, {} ticks",
        args.frames,
        scheduler.ticks()
    );

    Ok(FlockReport {
        ticks: scheduler.ticks(),
        frames: args.frames,
        paused: scheduler.is_paused(),
        draw_arrows: settings.draw_arrows,
        agents: flock
            .agents()
            .iter()
            .map(|agent| AgentSnapshot::capture(agent, &settings))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1.5, -2").unwrap(), Position::new(1.5, -2.0));
        assert!(parse_point("1.5").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_parse_rect() {
        let (a, b) = parse_rect("0,0,2,3").unwrap();
        assert_eq!(a, Position::new(0.0, 0.0));
        assert_eq!(b, Position::new(2.0, 3.0));
        assert!(parse_rect("0,0,2").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "flock-cli", "--agents", "3", "--move", "1,2", "-m", "3,4", "--select", "-1,-1,1,1",
        ])
        .unwrap();
        assert_eq!(args.agents, 3);
        assert_eq!(args.moves, vec![Position::new(1.0, 2.0), Position::new(3.0, 4.0)]);
        assert!(args.select.is_some());
        assert_eq!(args.frames, 120);
    }
}
