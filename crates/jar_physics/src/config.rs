//! Arena configuration

use crate::error::{ArenaError, Result};
use crate::material::SurfaceMaterial;
use jar_motion::GravityConfig;
use serde::{Deserialize, Serialize};

/// Arena configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Gravity smoothing and strength
    pub gravity: GravityConfig,

    /// Settling sweep thresholds and period
    pub settling: SettlingConfig,

    /// Physical constants shared by every star
    pub body: BodyConfig,

    /// Jar wall material
    pub boundary: BoundaryConfig,

    /// Random spawn placement
    pub spawn: SpawnConfig,

    /// Fixed timestep for physics simulation
    pub timestep: f32,

    /// Maximum number of substeps per frame
    pub max_substeps: u32,

    /// Solver iterations per step
    pub solver_iterations: usize,

    /// Simulation units per meter; engine gravity is `gravity * pixels_per_meter`
    pub pixels_per_meter: f32,

    /// Seed for spawn and material randomness (entropy when absent)
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            gravity: GravityConfig::default(),
            settling: SettlingConfig::default(),
            body: BodyConfig::default(),
            boundary: BoundaryConfig::default(),
            spawn: SpawnConfig::default(),
            timestep: 1.0 / 60.0,
            max_substeps: 4,
            solver_iterations: 4,
            pixels_per_meter: 150.0,
            seed: None,
        }
    }
}

impl ArenaConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ArenaError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set settling configuration
    pub fn with_settling(mut self, settling: SettlingConfig) -> Self {
        self.settling = settling;
        self
    }

    /// Set gravity configuration
    pub fn with_gravity(mut self, gravity: GravityConfig) -> Self {
        self.gravity = gravity;
        self
    }

    /// Check every invariant the arena relies on
    pub fn validate(&self) -> Result<()> {
        let body = &self.body;
        require(body.radius > 0.0, "body radius must be positive")?;
        require(body.mass > 0.0, "body mass must be positive")?;
        require(
            (0.0..=1.0).contains(&body.restitution_min)
                && (0.0..=1.0).contains(&body.restitution_max)
                && body.restitution_min <= body.restitution_max,
            "restitution range must lie within 0..=1 and be ordered",
        )?;
        require(body.friction >= 0.0, "body friction must not be negative")?;
        require(
            body.linear_damping >= 0.0 && body.angular_damping >= 0.0,
            "damping must not be negative",
        )?;

        require(
            (0.0..=1.0).contains(&self.gravity.smoothing),
            "gravity smoothing must lie within 0..=1",
        )?;
        require(self.gravity.strength.is_finite(), "gravity strength must be finite")?;

        require(self.settling.period > 0.0, "settling period must be positive")?;
        require(
            self.settling.speed_threshold >= 0.0,
            "settling speed threshold must not be negative",
        )?;

        require(self.spawn.margin >= 0.0, "spawn margin must not be negative")?;
        require(
            self.spawn.velocity_x[0] <= self.spawn.velocity_x[1]
                && self.spawn.velocity_y[0] <= self.spawn.velocity_y[1],
            "spawn velocity ranges must be ordered",
        )?;

        require(self.timestep > 0.0, "timestep must be positive")?;
        require(self.max_substeps > 0, "max_substeps must be at least 1")?;
        require(self.solver_iterations > 0, "solver_iterations must be at least 1")?;
        require(self.pixels_per_meter > 0.0, "pixels_per_meter must be positive")?;
        Ok(())
    }
}

fn require(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ArenaError::InvalidConfig(message.to_string()))
    }
}

/// Physical constants for every star
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Circle radius
    pub radius: f32,
    /// Mass
    pub mass: f32,
    /// Surface friction
    pub friction: f32,
    /// Lower bound of the per-star restitution draw
    pub restitution_min: f32,
    /// Upper bound of the per-star restitution draw
    pub restitution_max: f32,
    /// Linear damping (air resistance)
    pub linear_damping: f32,
    /// Angular damping (rotational resistance)
    pub angular_damping: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            mass: 0.1,
            friction: 0.4,
            restitution_min: 0.3,
            restitution_max: 0.6,
            linear_damping: 0.2,
            angular_damping: 0.2,
        }
    }
}

/// Jar wall material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Wall friction
    pub friction: f32,
    /// Wall restitution
    pub restitution: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.4,
        }
    }
}

impl BoundaryConfig {
    /// Wall surface material
    pub fn material(&self) -> SurfaceMaterial {
        SurfaceMaterial::new(self.friction, self.restitution)
    }
}

/// Placement of randomly spawned stars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Inset from the side and top walls
    pub margin: f32,
    /// Range of the initial horizontal velocity
    pub velocity_x: [f32; 2],
    /// Range of the initial vertical velocity
    pub velocity_y: [f32; 2],
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            margin: 25.0,
            velocity_x: [-20.0, 20.0],
            velocity_y: [-30.0, 0.0],
        }
    }
}

/// Settling sweep configuration
///
/// Comparisons are strict: a star exactly at `floor_band` or moving exactly at
/// `speed_threshold` is left alone, and only stars above `rest_y` are snapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlingConfig {
    /// Seconds between sweeps
    pub period: f32,
    /// Stars slower than this are candidates
    pub speed_threshold: f32,
    /// Stars below this height are candidates
    pub floor_band: f32,
    /// Height settled stars are snapped down to
    pub rest_y: f32,
}

impl Default for SettlingConfig {
    fn default() -> Self {
        Self {
            period: 0.1,
            speed_threshold: 20.0,
            floor_band: 50.0,
            rest_y: 25.0,
        }
    }
}

impl SettlingConfig {
    /// Set the floor band
    pub fn with_floor_band(mut self, floor_band: f32) -> Self {
        self.floor_band = floor_band;
        self
    }

    /// Set the rest height
    pub fn with_rest_y(mut self, rest_y: f32) -> Self {
        self.rest_y = rest_y;
        self
    }

    /// Set the sweep period
    pub fn with_period(mut self, period: f32) -> Self {
        self.period = period;
        self
    }
}
