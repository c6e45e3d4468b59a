//! Exponential low-pass filter over mapped gravity samples

use crate::config::GravityConfig;
use glam::Vec2;

/// Blend one sample into the previous output: `previous*(1-α) + sample*α`
#[inline]
pub fn smooth(previous: Vec2, sample: Vec2, alpha: f32) -> Vec2 {
    previous * (1.0 - alpha) + sample * alpha
}

/// Stateful gravity smoother
///
/// Keeps the last blended output as the `previous` value for the next sample.
/// Starts at the zero vector, so an arena without motion input has no gravity.
#[derive(Debug, Clone)]
pub struct GravitySmoother {
    config: GravityConfig,
    current: Vec2,
    samples: u64,
}

impl GravitySmoother {
    /// Create a smoother at rest
    pub fn new(config: GravityConfig) -> Self {
        Self {
            config,
            current: Vec2::ZERO,
            samples: 0,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    /// Feed a mapped sample, returning the new smoothed value (unscaled)
    ///
    /// Non-finite samples are dropped and the previous value is kept.
    pub fn push(&mut self, sample: Vec2) -> Vec2 {
        if !sample.is_finite() {
            log::debug!("Dropping non-finite gravity sample {:?}", sample);
            return self.current;
        }
        self.current = smooth(self.current, sample, self.config.smoothing);
        self.samples += 1;
        self.current
    }

    /// Last smoothed value, in g units
    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Last smoothed value multiplied by the gravity strength
    pub fn scaled(&self) -> Vec2 {
        self.current * self.config.strength
    }

    /// Number of samples blended so far
    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    /// Overwrite the filter state
    pub fn reset_to(&mut self, value: Vec2) {
        self.current = value;
    }
}

impl Default for GravitySmoother {
    fn default() -> Self {
        Self::new(GravityConfig::default())
    }
}
