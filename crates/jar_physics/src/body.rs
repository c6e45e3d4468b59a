//! Star bodies: descriptors, handles and state snapshots

use crate::config::BodyConfig;
use crate::material::SurfaceMaterial;
use glam::Vec2;
use rapier2d::prelude as rapier;

/// Handle to a star in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) rapier::RigidBodyHandle);

/// Kinematic state the settling sweep reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyMotion {
    /// Center position
    pub position: Vec2,
    /// Linear velocity
    pub velocity: Vec2,
    /// Angular velocity (radians per second)
    pub angular_velocity: f32,
}

impl BodyMotion {
    /// Create a new motion state
    pub fn new(position: Vec2, velocity: Vec2, angular_velocity: f32) -> Self {
        Self {
            position,
            velocity,
            angular_velocity,
        }
    }

    /// Magnitude of the linear velocity
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Description for creating a star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarDesc {
    /// Initial position
    pub position: Vec2,
    /// Initial linear velocity
    pub linear_velocity: Vec2,
    /// Circle radius
    pub radius: f32,
    /// Mass
    pub mass: f32,
    /// Surface material
    pub material: SurfaceMaterial,
    /// Linear damping (air resistance)
    pub linear_damping: f32,
    /// Angular damping (rotational resistance)
    pub angular_damping: f32,
    /// Enable continuous collision detection against the thin walls
    pub ccd_enabled: bool,
}

impl StarDesc {
    /// Describe a star from the shared constants and its own restitution
    pub fn from_config(config: &BodyConfig, restitution: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            linear_velocity: Vec2::ZERO,
            radius: config.radius,
            mass: config.mass,
            material: SurfaceMaterial::new(config.friction, restitution),
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
            ccd_enabled: true,
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Set linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Build a Rapier rigid body builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        rapier::RigidBodyBuilder::dynamic()
            .translation(to_vector(self.position))
            .linvel(to_vector(self.linear_velocity))
            .linear_damping(self.linear_damping)
            .angular_damping(self.angular_damping)
            .ccd_enabled(self.ccd_enabled)
    }

    /// Build the circle collider attached to the body
    pub(crate) fn to_collider_builder(&self) -> rapier::ColliderBuilder {
        self.material
            .apply(rapier::ColliderBuilder::ball(self.radius))
            .mass(self.mass)
    }
}

/// Read-only view of a star for renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    /// Handle of the star
    pub handle: BodyHandle,
    /// Center position
    pub position: Vec2,
    /// Linear velocity
    pub velocity: Vec2,
    /// Angular velocity
    pub angular_velocity: f32,
    /// Rotation angle in radians
    pub rotation: f32,
    /// Circle radius
    pub radius: f32,
    /// Restitution drawn at creation
    pub restitution: f32,
}

#[inline]
pub(crate) fn to_vector(v: Vec2) -> rapier::Vector<f32> {
    rapier::Vector::new(v.x, v.y)
}

#[inline]
pub(crate) fn from_vector(v: &rapier::Vector<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}
