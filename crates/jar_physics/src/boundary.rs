//! Jar walls: a closed edge loop around the arena rectangle

use crate::config::BoundaryConfig;
use glam::Vec2;
use rapier2d::prelude as rapier;

/// Arena rectangle, origin at the bottom-left corner, y up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Width in simulation units
    pub width: f32,
    /// Height in simulation units
    pub height: f32,
}

impl Bounds {
    /// Create new bounds
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether the rectangle encloses any area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Whether a point lies inside or on the edge
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Corners of the loop, counter-clockwise from the origin, closed
    pub fn loop_points(&self) -> [Vec2; 5] {
        [
            Vec2::ZERO,
            Vec2::new(self.width, 0.0),
            Vec2::new(self.width, self.height),
            Vec2::new(0.0, self.height),
            Vec2::ZERO,
        ]
    }
}

/// Description of the jar walls for a given size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryDesc {
    /// Enclosed rectangle
    pub bounds: Bounds,
    /// Wall material settings
    pub config: BoundaryConfig,
}

impl BoundaryDesc {
    /// Create a new boundary description
    pub fn new(bounds: Bounds, config: BoundaryConfig) -> Self {
        Self { bounds, config }
    }

    /// Build the fixed body that carries the wall collider
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        rapier::RigidBodyBuilder::fixed()
    }

    /// Build the edge loop collider
    pub(crate) fn to_collider_builder(&self) -> rapier::ColliderBuilder {
        let vertices = self
            .bounds
            .loop_points()
            .iter()
            .map(|p| rapier::Point::new(p.x, p.y))
            .collect();
        self.config
            .material()
            .apply(rapier::ColliderBuilder::polyline(vertices, None))
    }
}
