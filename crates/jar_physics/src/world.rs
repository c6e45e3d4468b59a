//! Physics world - Rapier 2D simulation container

use crate::body::{from_vector, to_vector, BodyHandle, BodyMotion, StarDesc};
use crate::boundary::BoundaryDesc;
use crate::config::ArenaConfig;
use crate::error::{ArenaError, Result};
use glam::Vec2;
use rapier2d::prelude as rapier;
use std::num::NonZeroUsize;

/// Rapier state for one arena
pub struct PhysicsWorld {
    /// Fixed timestep
    timestep: f32,

    /// Maximum number of substeps per frame
    max_substeps: u32,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity in engine units
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    /// Island manager
    islands: rapier::IslandManager,

    /// Broad phase
    broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    ccd_solver: rapier::CCDSolver,

    /// Rigid body set
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: &ArenaConfig) -> Self {
        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.length_unit = config.pixels_per_meter;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            timestep: config.timestep,
            max_substeps: config.max_substeps,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity: rapier::Vector::zeros(),
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            accumulated_time: 0.0,
        }
    }

    /// Set gravity in engine units
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_vector(gravity);
    }

    /// Get gravity in engine units
    pub fn gravity(&self) -> Vec2 {
        from_vector(&self.gravity)
    }

    // ==================== Bodies ====================

    /// Create a star: a dynamic body with one circle collider
    pub fn create_star(&mut self, desc: &StarDesc) -> BodyHandle {
        let handle = self.bodies.insert(desc.to_rapier_builder());
        self.colliders
            .insert_with_parent(desc.to_collider_builder(), handle, &mut self.bodies);
        BodyHandle(handle)
    }

    /// Create the fixed wall body and its edge loop
    pub fn create_boundary(&mut self, desc: &BoundaryDesc) -> BodyHandle {
        let handle = self.bodies.insert(desc.to_rapier_builder());
        self.colliders
            .insert_with_parent(desc.to_collider_builder(), handle, &mut self.bodies);
        BodyHandle(handle)
    }

    /// Remove a body and its colliders
    pub fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true, // Remove attached colliders
        );
    }

    /// Get position, velocity and angular velocity
    pub fn body_motion(&self, handle: BodyHandle) -> Result<BodyMotion> {
        self.bodies
            .get(handle.0)
            .map(|b| BodyMotion::new(from_vector(b.translation()), from_vector(b.linvel()), b.angvel()))
            .ok_or(ArenaError::BodyNotFound(handle))
    }

    /// Overwrite position, velocity and angular velocity
    pub fn set_body_motion(&mut self, handle: BodyHandle, motion: &BodyMotion) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| {
                b.set_translation(to_vector(motion.position), false);
                b.set_linvel(to_vector(motion.velocity), false);
                b.set_angvel(motion.angular_velocity, false);
            })
            .ok_or(ArenaError::BodyNotFound(handle))
    }

    /// Get rotation angle in radians
    pub fn body_rotation(&self, handle: BodyHandle) -> Result<f32> {
        self.bodies
            .get(handle.0)
            .map(|b| b.rotation().angle())
            .ok_or(ArenaError::BodyNotFound(handle))
    }

    // ==================== Simulation ====================

    /// Step the physics simulation with fixed timestep, returning steps taken
    pub fn step(&mut self, delta_time: f32) -> u32 {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return 0;
        }
        self.accumulated_time += delta_time;

        let mut steps = 0;
        while self.accumulated_time >= self.timestep && steps < self.max_substeps {
            self.step_internal();
            self.accumulated_time -= self.timestep;
            steps += 1;
        }

        // Discard the backlog after a stall.
        if steps == self.max_substeps && self.accumulated_time >= self.timestep {
            self.accumulated_time %= self.timestep;
        }

        steps
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    // ==================== Debug ====================

    /// Get number of rigid bodies, walls included
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(&ArenaConfig::default())
    }
}
