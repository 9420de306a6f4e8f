use std::{collections::HashSet, f32::consts::TAU, ops::RangeInclusive, slice};

use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::{
    boid::{Boid, Color},
    error::BoidError,
    options::{SimConfig, WindowSize},
    predator::PREDATOR_ID,
};

/// Outcome of a single [`Flock::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// boids caught by the predator this tick
    pub removed: usize,
    pub remaining: usize,
}

/// An ordered collection of boids, advanced one tick at a time.
///
/// Every boid gets an id that is unique for the lifetime of the flock, ids of
/// removed boids are not handed out again.
#[derive(Debug, Clone, Default)]
pub struct Flock {
    boids: Vec<Boid>,
    next_id: usize,
}

impl Flock {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adopts already built boids, keeping their ids.
    ///
    /// Ids must be unique and may not be the predator's.
    pub fn from_boids(boids: Vec<Boid>) -> Result<Self, BoidError> {
        let mut seen = HashSet::with_capacity(boids.len());
        for boid in &boids {
            if boid.id == PREDATOR_ID {
                return Err(BoidError::ReservedId(boid.id));
            }
            if !seen.insert(boid.id) {
                return Err(BoidError::DuplicateId(boid.id));
            }
        }

        // every id is below PREDATOR_ID == usize::MAX, so this cannot overflow
        let next_id = boids.iter().map(|b| b.id + 1).max().unwrap_or(0);
        Ok(Flock { boids, next_id })
    }

    /// Scatters `count` boids uniformly over the window, each heading in a
    /// random direction with a speed drawn from `speed_range`.
    pub fn initialize<R: Rng + ?Sized>(
        count: usize,
        window: &WindowSize,
        speed_range: RangeInclusive<f32>,
        size: u32,
        rng: &mut R,
    ) -> Result<Self, BoidError> {
        let (min_speed, max_speed) = speed_range.into_inner();
        let finite = min_speed.is_finite() && max_speed.is_finite();
        if !finite || min_speed < 0. || min_speed > max_speed {
            return Err(BoidError::SpeedRange {
                min: min_speed,
                max: max_speed,
            });
        }
        if !(window.win_w > 0. && window.win_h > 0.) {
            return Err(BoidError::Window {
                width: window.win_w,
                height: window.win_h,
            });
        }

        let mut flock = Flock::new();
        for _ in 0..count {
            // x in [0, width), y in [0, height)
            let position = Vec2::new(
                rng.gen_range(0. ..window.win_w),
                rng.gen_range(0. ..window.win_h),
            );
            let heading = rng.gen_range(0. ..TAU);
            let speed = rng.gen_range(min_speed..=max_speed);
            let velocity = Vec2::new(heading.cos(), heading.sin()) * speed;
            let color = Color::rgb(
                rng.gen_range(30..=255),
                rng.gen_range(30..=255),
                rng.gen_range(30..=255),
            );

            flock.insert(position, velocity, color, size)?;
        }

        Ok(flock)
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Advances the flock by one tick.
    ///
    /// All boids see the flock as it was before the tick: new velocities are
    /// computed for everyone first and only then applied. Afterwards boids
    /// within `hit_distance` of the predator are removed.
    pub fn step(&mut self, predator: Option<&Boid>, config: &SimConfig) -> StepReport {
        let flock_rules = config.flock_rules();
        let predator_rules = config.predator_rules();
        let boundary = config.boundary();
        let window = config.window();
        let max_speed = config.boids.max_speed;

        // calculation loop
        let velocities: Vec<Vec2> = self
            .boids
            .iter()
            .map(|boid| {
                let mut next = *boid;
                next.apply_rules(&self.boids, &flock_rules);
                if let Some(predator) = predator {
                    next.apply_rules(slice::from_ref(predator), &predator_rules);
                }
                next.limit_speed(max_speed);
                next.velocity
            })
            .collect();

        // update loop
        for (boid, velocity) in self.boids.iter_mut().zip(velocities) {
            boid.velocity = velocity;
            boid.update_location(&boundary, &window);
        }

        let removed = match predator {
            Some(predator) => self.remove_caught(predator.position, config.predator.hit_distance),
            None => 0,
        };

        trace!(boids = self.boids.len(), removed, "flock stepped");

        StepReport {
            removed,
            remaining: self.boids.len(),
        }
    }

    fn remove_caught(&mut self, position: Vec2, hit_distance: f32) -> usize {
        let before = self.boids.len();

        self.boids.retain(|boid| {
            let caught = boid.position.distance(position) < hit_distance;
            if caught {
                debug!(id = boid.id, x = boid.position.x, y = boid.position.y, "boid caught");
            }
            !caught
        });

        before - self.boids.len()
    }

    /// Adds a boid and returns its id.
    pub fn insert(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        color: Color,
        size: u32,
    ) -> Result<usize, BoidError> {
        let id = self.next_id;
        let next_id = id
            .checked_add(1)
            .filter(|_| id != PREDATOR_ID)
            .ok_or(BoidError::IdsExhausted)?;
        let boid = Boid::new(id, position, velocity, color, size)?;

        self.boids.push(boid);
        self.next_id = next_id;
        Ok(id)
    }

    /// Removes the boid with the given id, keeping the order of the rest.
    pub fn remove(&mut self, id: usize) -> Option<Boid> {
        let index = self.boids.iter().position(|b| b.id == id)?;
        Some(self.boids.remove(index))
    }

    pub fn delete_last(&mut self) -> Option<Boid> {
        self.boids.pop()
    }

    /// The boid closest to `point`.
    pub fn nearest(&self, point: Vec2) -> Option<&Boid> {
        self.boids.iter().min_by(|a, b| {
            a.position
                .distance_squared(point)
                .total_cmp(&b.position.distance_squared(point))
        })
    }

    pub fn centroid(&self) -> Option<Vec2> {
        if self.boids.is_empty() {
            return None;
        }

        let sum = self.boids.iter().fold(Vec2::ZERO, |sum, b| sum + b.position);
        Some(sum / self.boids.len() as f32)
    }
}
