//! Gravity input configuration

use serde::{Deserialize, Serialize};

/// Gravity smoothing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// Exponential blending weight applied to each new sample (0..=1)
    pub smoothing: f32,

    /// Scale applied to the smoothed vector before it reaches the engine
    pub strength: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.15,
            strength: 9.0,
        }
    }
}

impl GravityConfig {
    /// Set smoothing factor
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    /// Set gravity strength
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }
}
