use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Headless runner for the boids flocking simulation.
///
/// Loads the flock tuning from a TOML file and advances the simulation tick by
/// tick, the predator hunting the closest boid.
pub struct Args {
    /// Config file, defaults are used when it does not exist
    #[arg(short, long = "config", default_value = "config.toml")]
    pub config_path: PathBuf,

    /// number of ticks to run, the run ends early once every boid is caught
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub ticks: u64,

    /// seed of the simulation's random generator
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// ratio of ticks/samples, e.g. 4 = sample every 4th tick
    #[arg(short = 'r', long, default_value_t = 50)]
    pub sample_rate: u64,

    /// run without a predator regardless of the config file
    #[arg(long)]
    pub no_predator: bool,

    /// print samples to stdout as JSON lines
    #[arg(long)]
    pub json: bool,
}
