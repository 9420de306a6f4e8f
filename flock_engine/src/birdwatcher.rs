use std::mem;

use glam::Vec2;
use serde::Serialize;

use crate::flock::Flock;

/// Aggregate state of the flock at one tick.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FlockSample {
    pub tick: u64,
    pub alive: usize,
    pub centroid_x: f32,
    pub centroid_y: f32,
    pub mean_speed: f32,
    /// length of the mean unit heading, 0 for a disordered flock, 1 when
    /// everyone flies the same way
    pub polarization: f32,
}

impl FlockSample {
    pub fn from_flock(tick: u64, flock: &Flock) -> Self {
        let boids = flock.boids();
        let centroid = flock.centroid().unwrap_or(Vec2::ZERO);

        let (speed_sum, heading_sum) = boids.iter().fold(
            (0_f32, Vec2::ZERO),
            |(speed_sum, heading_sum), b| {
                let speed = b.velocity.length();
                let heading = if speed > 0. {
                    b.velocity / speed
                } else {
                    Vec2::ZERO
                };
                (speed_sum + speed, heading_sum + heading)
            },
        );

        let (mean_speed, polarization) = if boids.is_empty() {
            (0., 0.)
        } else {
            let n = boids.len() as f32;
            (speed_sum / n, (heading_sum / n).length())
        };

        FlockSample {
            tick,
            alive: boids.len(),
            centroid_x: centroid.x,
            centroid_y: centroid.y,
            mean_speed,
            polarization,
        }
    }
}

// so right now, this is more of a flock statistics accumulator than a birdwatcher
pub struct Birdwatcher {
    samples: Vec<FlockSample>,
    render_ticker: u64,
    sample_rate: u64,
}

impl Birdwatcher {
    /// Samples every `sample_rate`-th watched tick, a rate of 0 counts as 1.
    pub fn new(sample_rate: u64) -> Self {
        Birdwatcher {
            samples: Vec::new(),
            render_ticker: 0,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Triggers data collection, returns the sample if this tick was sampled.
    pub fn watch(&mut self, flock: &Flock) -> Option<FlockSample> {
        if !self.should_sample() {
            return None;
        }

        let sample = FlockSample::from_flock(self.render_ticker, flock);
        self.samples.push(sample);
        Some(sample)
    }

    pub fn samples(&self) -> &[FlockSample] {
        &self.samples
    }

    pub fn restart(&mut self) {
        self.samples.clear();
        self.render_ticker = 0;
    }

    pub fn pop_data(&mut self) -> Vec<FlockSample> {
        mem::take(&mut self.samples)
    }

    fn should_sample(&mut self) -> bool {
        self.render_ticker += 1;

        self.render_ticker % self.sample_rate == 0
    }
}
