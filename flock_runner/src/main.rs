use std::{
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use flock_engine::{
    birdwatcher::{Birdwatcher, FlockSample},
    options::SimConfig,
    simulation::Simulation,
};
use tracing::{info, warn};

mod cliargs;
use cliargs::Args;

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_config(&args.config_path)?;
    if args.no_predator {
        config.predator.enabled = false;
    }

    let mut sim = Simulation::new(config, args.seed).context("could not start the simulation")?;
    let mut bird_watcher = Birdwatcher::new(args.sample_rate);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for _ in 0..args.ticks {
        let target = sim.prey_target();
        let report = sim.tick(target);

        if report.removed > 0 {
            info!(
                tick = sim.ticks(),
                removed = report.removed,
                remaining = report.remaining,
                "boids caught"
            );
        }

        if let Some(sample) = bird_watcher.watch(sim.flock()) {
            if args.json {
                write_sample(&mut out, &sample)?;
            } else {
                info!(
                    tick = sample.tick,
                    alive = sample.alive,
                    mean_speed = sample.mean_speed,
                    polarization = sample.polarization,
                    "sample"
                );
            }
        }

        if sim.flock().is_empty() {
            info!(tick = sim.ticks(), "flock wiped out");
            break;
        }
    }

    info!(
        ticks = sim.ticks(),
        caught = sim.caught(),
        remaining = sim.flock().len(),
        "run finished"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

/// A missing file falls back to the defaults, a present but broken one is an error.
fn load_config(path: &Path) -> Result<SimConfig> {
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(SimConfig::default());
    }

    let config = SimConfig::load(path)
        .with_context(|| format!("error in configuration file {}", path.display()))?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

fn write_sample(out: &mut impl Write, sample: &FlockSample) -> Result<()> {
    serde_json::to_writer(&mut *out, sample)?;
    writeln!(out)?;
    Ok(())
}
