use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to construct a [`Boid`](crate::boid::Boid), one of its parts, or a
/// flock of them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoidError {
    #[error("color must have 3 or 4 channels, got {0}")]
    ColorArity(usize),

    #[error("color channel {index} is {value}, expected a value in [0, 255]")]
    ColorChannel { index: usize, value: i32 },

    #[error("size must be positive, got {0}")]
    Size(u32),

    #[error("speed range {min}..={max} is empty or negative")]
    SpeedRange { min: f32, max: f32 },

    #[error("window {width}x{height} has no area to place boids in")]
    Window { width: f32, height: f32 },

    #[error("boid id {0} is used more than once")]
    DuplicateId(usize),

    #[error("boid id {0} is reserved for the predator")]
    ReservedId(usize),

    #[error("no boid ids left to hand out")]
    IdsExhausted,
}

/// Failure to load or validate a [`SimConfig`](crate::options::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure to set up a [`Simulation`](crate::simulation::Simulation).
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Boid(#[from] BoidError),
}
