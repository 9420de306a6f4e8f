use glam::Vec2;

use crate::{
    boid::{Boid, Color},
    error::BoidError,
    options::PredatorOptions,
};

/// Identity reserved for the predator, flock ids never reach it.
pub const PREDATOR_ID: usize = usize::MAX;

/// The flock's antagonist. Shares the boid's shape but ignores flocking,
/// it homes in on a target point instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predator {
    pub boid: Boid,
    pub speed: f32,
    pub tolerance: f32,
}

impl Predator {
    pub fn new(position: Vec2, size: u32, options: &PredatorOptions) -> Result<Self, BoidError> {
        Ok(Predator {
            boid: Boid::new(PREDATOR_ID, position, Vec2::ZERO, Color::rgb(0, 0, 255), size)?,
            speed: options.speed,
            tolerance: options.tolerance,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.boid.position
    }

    /// Takes one homing step toward `target`.
    pub fn update(&mut self, target: Vec2) {
        let (new_pos, velocity) = move_to(self.boid.position, target, self.speed, self.tolerance);

        self.boid.velocity = velocity;
        if let Some(position) = new_pos {
            self.boid.position = position;
        }
    }
}

/// Moves from `current` toward `desired` at `speed`.
///
/// Returns the new position, or `None` once within `tolerance` of the target,
/// together with the velocity used (zero when not moving).
pub fn move_to(current: Vec2, desired: Vec2, speed: f32, tolerance: f32) -> (Option<Vec2>, Vec2) {
    let dist = current.distance(desired);

    if dist > tolerance && dist > 0. {
        let velocity = (desired - current).normalize_or_zero() * speed;
        (Some(current + velocity), velocity)
    } else {
        (None, Vec2::ZERO)
    }
}
