use birdwatcher::{Birdwatcher, FlockSample};
use error::SimulationError;
use options::SimConfig;
use simulation::Simulation;

pub mod boid;
pub mod flock;
pub mod predator;
pub mod simulation;

pub mod birdwatcher;
pub mod error;
pub mod math_helpers;
pub mod options;

/// Runs `no_iter` ticks headless, the predator chasing the nearest boid, and
/// returns the samples taken every `sample_rate` ticks.
pub fn flock_base(
    no_iter: u64,
    config: SimConfig,
    seed: u64,
    sample_rate: u64,
) -> Result<Vec<FlockSample>, SimulationError> {
    let mut sim = Simulation::new(config, seed)?;
    let mut bird_watcher = Birdwatcher::new(sample_rate);

    (0..no_iter).for_each(|_| {
        let target = sim.prey_target();
        sim.tick(target);
        bird_watcher.watch(sim.flock());
    });

    Ok(bird_watcher.pop_data())
}

#[cfg(test)]
mod tests {
    use super::flock_base;
    use crate::options::SimConfig;

    #[test]
    fn flock_base_samples_at_rate() {
        let mut config = SimConfig::default();
        config.boids.num_boids = 30;

        let samples = flock_base(40, config, 1, 10).unwrap();

        let ticks: Vec<u64> = samples.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![10, 20, 30, 40]);
        assert!(samples.windows(2).all(|w| w[0].alive >= w[1].alive));
    }
}
