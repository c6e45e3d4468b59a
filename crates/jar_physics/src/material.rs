//! Surface materials for stars and the jar walls

use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Friction and bounciness of a collider surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    /// Friction coefficient (0 = frictionless, 1 = high friction)
    pub friction: f32,
    /// Restitution/bounciness (0 = no bounce, 1 = perfect bounce)
    pub restitution: f32,
    /// How friction is combined between two colliders
    pub friction_combine: CombineRule,
    /// How restitution is combined between two colliders
    pub restitution_combine: CombineRule,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            friction: 0.4,
            restitution: 0.4,
            friction_combine: CombineRule::Average,
            restitution_combine: CombineRule::Average,
        }
    }
}

impl SurfaceMaterial {
    /// Create a new material, clamping both coefficients to `0..=1`
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self::default()
            .with_friction(friction)
            .with_restitution(restitution)
    }

    /// Set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.clamp(0.0, 1.0);
        self
    }

    /// Set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set the restitution combine rule
    pub fn with_restitution_combine(mut self, rule: CombineRule) -> Self {
        self.restitution_combine = rule;
        self
    }

    /// Apply this material to a collider builder
    pub(crate) fn apply(&self, builder: rapier::ColliderBuilder) -> rapier::ColliderBuilder {
        builder
            .friction(self.friction)
            .restitution(self.restitution)
            .friction_combine_rule(self.friction_combine.into())
            .restitution_combine_rule(self.restitution_combine.into())
    }
}

/// Rule for combining material properties at a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombineRule {
    /// Use the average of both values
    #[default]
    Average,
    /// Use the minimum value
    Min,
    /// Use the maximum value
    Max,
    /// Multiply the values
    Multiply,
}

impl From<CombineRule> for rapier::CoefficientCombineRule {
    fn from(rule: CombineRule) -> Self {
        match rule {
            CombineRule::Average => rapier::CoefficientCombineRule::Average,
            CombineRule::Min => rapier::CoefficientCombineRule::Min,
            CombineRule::Max => rapier::CoefficientCombineRule::Max,
            CombineRule::Multiply => rapier::CoefficientCombineRule::Multiply,
        }
    }
}
