//! Raw motion samples

use crate::orientation::ScreenOrientation;
use glam::{Vec2, Vec3};

/// A single reading from the motion sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Gravity in g units, device frame
    pub gravity: Vec3,
    /// Screen orientation at the time of the reading
    pub orientation: ScreenOrientation,
    /// Sensor timestamp in seconds
    pub timestamp: f64,
}

impl MotionSample {
    /// Create a new sample
    pub fn new(gravity: Vec3, orientation: ScreenOrientation, timestamp: f64) -> Self {
        Self {
            gravity,
            orientation,
            timestamp,
        }
    }

    /// Upright sample with a zero timestamp
    pub fn upright(gx: f32, gy: f32, gz: f32) -> Self {
        Self::new(Vec3::new(gx, gy, gz), ScreenOrientation::Upright, 0.0)
    }

    /// Set timestamp
    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Gravity re-expressed in simulation space
    pub fn mapped(&self) -> Vec2 {
        self.orientation.map_gravity(self.gravity)
    }
}

/// Event delivered from a motion source into the simulation timeline
#[derive(Debug, Clone, PartialEq)]
pub enum MotionEvent {
    /// A new reading
    Sample(MotionSample),
    /// The sensor stopped producing readings
    Unavailable(String),
}
