use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Complete tuning of a run, as read from a sectioned TOML file:
///
/// ```toml
/// [screen]
/// winsize = [800, 600]
/// boundary_type = "bounce"
/// margin = 30
/// turn_factor = 1
///
/// [boids]
/// num_boids = 100
/// size = 10
/// max_speed = 3.0
/// cohesion_factor = 0.005
/// separation = 20
/// avoid_factor = 0.05
/// alignment_factor = 0.01
/// visual_range = 100
/// ```
///
/// `[screen]` and `[boids]` must be complete, `[predator]` may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub screen: ScreenOptions,
    pub boids: BoidOptions,
    #[serde(default)]
    pub predator: PredatorOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenOptions {
    /// width and height of the world, origin in the bottom left corner
    pub winsize: [u32; 2],
    pub boundary_type: BoundaryType,
    /// distance from an edge at which bouncing starts to steer
    pub margin: f32,
    /// velocity nudge applied per tick inside the margin
    pub turn_factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoidOptions {
    pub num_boids: usize,
    pub size: u32,
    pub max_speed: f32,
    pub cohesion_factor: f32,
    pub separation: f32,
    pub avoid_factor: f32,
    pub alignment_factor: f32,
    pub visual_range: f32,
}

/// Predator behaviour. The `*_scale` fields derive the coefficients the flock
/// uses against the predator from its own flocking coefficients; negative
/// scales turn attraction into repulsion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredatorOptions {
    pub enabled: bool,
    pub speed: f32,
    /// the predator stops once it is this close to its target
    pub tolerance: f32,
    /// boids closer than this to the predator are caught
    pub hit_distance: f32,
    pub cohesion_scale: f32,
    pub separation_scale: f32,
    pub avoid_scale: f32,
    pub alignment_scale: f32,
    pub visual_range_scale: f32,
}

impl Default for PredatorOptions {
    fn default() -> Self {
        PredatorOptions {
            enabled: true,
            speed: 5.,
            tolerance: 10.,
            hit_distance: 10.,
            cohesion_scale: -2.,
            separation_scale: 2.,
            avoid_scale: 1.2,
            alignment_scale: -1.5,
            visual_range_scale: 10.,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            screen: ScreenOptions {
                winsize: [800, 600],
                boundary_type: BoundaryType::Bounce,
                margin: 30.,
                turn_factor: 1.,
            },
            boids: BoidOptions {
                num_boids: 100,
                size: 10,
                max_speed: 3.,
                cohesion_factor: 0.005,
                separation: 20.,
                avoid_factor: 0.05,
                alignment_factor: 0.01,
                visual_range: 100.,
            },
            predator: Default::default(),
        }
    }
}

impl SimConfig {
    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&raw)
    }

    /// Parses and validates a config from its TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_screen()?;
        self.validate_boids()?;
        self.validate_predator()?;
        Ok(())
    }

    fn validate_screen(&self) -> Result<(), ConfigError> {
        let [w, h] = self.screen.winsize;
        if w == 0 || h == 0 {
            return Err(ConfigError::invalid(
                "screen.winsize",
                format!("both dimensions must be positive, got [{}, {}]", w, h),
            ));
        }

        non_negative("screen.margin", self.screen.margin)?;
        non_negative("screen.turn_factor", self.screen.turn_factor)?;

        if self.screen.margin * 2. > w.min(h) as f32 {
            return Err(ConfigError::invalid(
                "screen.margin",
                format!(
                    "{} leaves no interior in a {}x{} window",
                    self.screen.margin, w, h
                ),
            ));
        }
        Ok(())
    }

    fn validate_boids(&self) -> Result<(), ConfigError> {
        let boids = &self.boids;
        if boids.size == 0 {
            return Err(ConfigError::invalid("boids.size", "must be positive"));
        }
        positive("boids.max_speed", boids.max_speed)?;
        finite("boids.cohesion_factor", boids.cohesion_factor)?;
        finite("boids.avoid_factor", boids.avoid_factor)?;
        finite("boids.alignment_factor", boids.alignment_factor)?;
        non_negative("boids.separation", boids.separation)?;
        non_negative("boids.visual_range", boids.visual_range)?;
        Ok(())
    }

    fn validate_predator(&self) -> Result<(), ConfigError> {
        let predator = &self.predator;
        positive("predator.speed", predator.speed)?;
        non_negative("predator.tolerance", predator.tolerance)?;
        non_negative("predator.hit_distance", predator.hit_distance)?;
        finite("predator.cohesion_scale", predator.cohesion_scale)?;
        finite("predator.avoid_scale", predator.avoid_scale)?;
        finite("predator.alignment_scale", predator.alignment_scale)?;
        non_negative("predator.separation_scale", predator.separation_scale)?;
        non_negative("predator.visual_range_scale", predator.visual_range_scale)?;
        Ok(())
    }

    pub fn window(&self) -> WindowSize {
        get_window_size(self.screen.winsize[0], self.screen.winsize[1])
    }

    pub fn boundary(&self) -> Boundary {
        match self.screen.boundary_type {
            BoundaryType::Wrap => Boundary::Wrap,
            BoundaryType::Bounce => Boundary::Bounce {
                margin: self.screen.margin,
                turn_factor: self.screen.turn_factor,
            },
        }
    }

    /// Coefficients a boid uses against the rest of the flock.
    pub fn flock_rules(&self) -> RuleFactors {
        RuleFactors {
            cohesion_factor: self.boids.cohesion_factor,
            separation: self.boids.separation,
            avoid_factor: self.boids.avoid_factor,
            alignment_factor: self.boids.alignment_factor,
            visual_range: self.boids.visual_range,
        }
    }

    /// Coefficients a boid uses against the predator.
    pub fn predator_rules(&self) -> RuleFactors {
        let p = &self.predator;
        let flock = self.flock_rules();
        RuleFactors {
            cohesion_factor: flock.cohesion_factor * p.cohesion_scale,
            separation: flock.separation * p.separation_scale,
            avoid_factor: flock.avoid_factor * p.avoid_scale,
            alignment_factor: flock.alignment_factor * p.alignment_scale,
            visual_range: flock.visual_range * p.visual_range_scale,
        }
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} is not finite", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0. {
        return Err(ConfigError::invalid(
            field,
            format!("{} must not be negative", value),
        ));
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0. {
        return Err(ConfigError::invalid(
            field,
            format!("{} must be positive", value),
        ));
    }
    Ok(())
}

/// The coefficients of one pass of cohesion, separation and alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleFactors {
    pub cohesion_factor: f32,
    pub separation: f32,
    pub avoid_factor: f32,
    pub alignment_factor: f32,
    pub visual_range: f32,
}

pub fn get_window_size(init_width: u32, init_height: u32) -> WindowSize {
    WindowSize {
        win_w: init_width as f32,
        win_h: init_height as f32,
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct WindowSize {
    /// width, x spans [0, win_w)
    pub win_w: f32,
    /// height, y spans [0, win_h)
    pub win_h: f32,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryType {
    #[serde(alias = "WRAP", alias = "Wrap")]
    Wrap,
    #[serde(alias = "BOUNCE", alias = "Bounce")]
    Bounce,
}

/// Boundary policy, evaluated fresh every tick.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Boundary {
    /// toroidal world, positions wrap around, velocity is left alone
    Wrap,
    /// velocity is nudged back toward the interior near the edges
    Bounce { margin: f32, turn_factor: f32 },
}
