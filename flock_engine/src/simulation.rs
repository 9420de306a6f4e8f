use glam::Vec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::info;

use crate::{
    boid::Boid,
    error::{BoidError, SimulationError},
    flock::{Flock, StepReport},
    options::SimConfig,
    predator::Predator,
};

/// Owns everything a run needs: the flock, the optional predator, the
/// configuration and the seeded generator. Nothing is shared globally, two
/// simulations with the same seed and config evolve identically.
pub struct Simulation {
    flock: Flock,
    predator: Option<Predator>,
    config: SimConfig,
    rng: Xoshiro256PlusPlus,
    seed: u64,
    tick: u64,
    caught: usize,
}

impl Simulation {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut sim = Simulation {
            flock: Flock::new(),
            predator: None,
            config,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            seed,
            tick: 0,
            caught: 0,
        };
        sim.populate()?;

        Ok(sim)
    }

    fn populate(&mut self) -> Result<(), SimulationError> {
        let window = self.config.window();
        let boids = &self.config.boids;

        self.flock = Flock::initialize(
            boids.num_boids,
            &window,
            0.0..=boids.max_speed,
            boids.size,
            &mut self.rng,
        )?;

        self.predator = spawn_predator(&self.config)?;

        self.tick = 0;
        self.caught = 0;

        info!(
            seed = self.seed,
            boids = self.flock.len(),
            predator = self.predator.is_some(),
            "flock initialised"
        );
        Ok(())
    }

    /// Runs one tick: the predator takes a homing step toward `target` (if
    /// there is both a predator and a target), then the flock steps.
    pub fn tick(&mut self, target: Option<Vec2>) -> StepReport {
        if let (Some(predator), Some(target)) = (self.predator.as_mut(), target) {
            predator.update(target);
        }

        let report = self
            .flock
            .step(self.predator.as_ref().map(|p| &p.boid), &self.config);

        self.tick += 1;
        self.caught += report.removed;
        report
    }

    /// Rebuilds the flock and predator from the current configuration. The
    /// generator is not reseeded, so a restart yields a fresh flock.
    pub fn restart(&mut self) -> Result<(), SimulationError> {
        self.populate()
    }

    /// Swaps in a new configuration after validating it.
    ///
    /// Rule factors, speed, boundary and predator settings apply from the next
    /// tick. Enabling the predator places a fresh one in the middle of the
    /// window, disabling it removes it. Flock size and boid size only change
    /// after a [`restart`](Self::restart).
    pub fn set_config(&mut self, config: SimConfig) -> Result<(), SimulationError> {
        config.validate()?;

        if !config.predator.enabled {
            if self.predator.take().is_some() {
                info!("predator removed");
            }
        } else if let Some(predator) = self.predator.as_mut() {
            predator.speed = config.predator.speed;
            predator.tolerance = config.predator.tolerance;
        } else {
            self.predator = spawn_predator(&config)?;
            info!("predator released");
        }
        self.config = config;
        Ok(())
    }

    /// Position of the boid closest to the predator, a natural homing target
    /// when no pointer drives the predator.
    pub fn prey_target(&self) -> Option<Vec2> {
        let predator = self.predator.as_ref()?;
        self.flock.nearest(predator.position()).map(|b| b.position)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn flock_mut(&mut self) -> &mut Flock {
        &mut self.flock
    }

    pub fn predator(&self) -> Option<&Predator> {
        self.predator.as_ref()
    }

    pub fn boids(&self) -> &[Boid] {
        self.flock.boids()
    }

    /// Ticks run since the last (re)start.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Boids caught since the last (re)start.
    pub fn caught(&self) -> usize {
        self.caught
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// A predator in the middle of the window, twice the size of a boid, if the
/// configuration enables one.
fn spawn_predator(config: &SimConfig) -> Result<Option<Predator>, BoidError> {
    if !config.predator.enabled {
        return Ok(None);
    }

    let window = config.window();
    let center = Vec2::new(window.win_w, window.win_h) / 2.;
    let size = config.boids.size.saturating_mul(2);
    Predator::new(center, size, &config.predator).map(Some)
}
