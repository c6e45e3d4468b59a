//! Arena - owns the stars, the jar walls and the gravity pipeline
//!
//! Everything runs on one serial timeline: `tick` drains queued motion
//! samples, integrates the world, then runs the settling sweep when its own
//! timer fires.

use crate::body::{BodyHandle, BodySnapshot, StarDesc};
use crate::boundary::{BoundaryDesc, Bounds};
use crate::config::ArenaConfig;
use crate::error::{ArenaError, Result};
use crate::settling::{SettlingMonitor, SweepStats};
use crate::timer::FixedTimer;
use crate::world::PhysicsWorld;
use glam::{Vec2, Vec3};
use jar_motion::{GravitySmoother, MotionEvent, MotionSource, MotionSubscription, ScreenOrientation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Arena lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaState {
    /// Created, not yet started
    Initialized,
    /// Motion input attached (if any) and settling timer active
    Running,
    /// Motion input stopped; no further simulation
    TornDown,
}

/// State of the motion input as seen by the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionStatus {
    /// No source attached
    Inactive,
    /// Samples are flowing
    Active,
    /// Source missing or lost; gravity is held at its last value
    Unavailable(String),
    /// Source stopped by teardown
    Stopped,
}

/// A star owned by the arena
#[derive(Debug, Clone, Copy)]
struct Star {
    handle: BodyHandle,
    radius: f32,
    restitution: f32,
}

/// The simulated jar
pub struct Arena {
    config: ArenaConfig,
    world: PhysicsWorld,
    bounds: Bounds,
    boundary: Option<BodyHandle>,
    stars: Vec<Star>,
    smoother: GravitySmoother,
    settling: SettlingMonitor,
    settle_timer: FixedTimer,
    motion: Option<MotionSubscription>,
    motion_status: MotionStatus,
    state: ArenaState,
    rng: StdRng,
    debug_overlay: bool,
}

impl Arena {
    /// Create an arena of the given size
    pub fn new(config: ArenaConfig, width: f32, height: f32) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut arena = Self {
            world: PhysicsWorld::new(&config),
            bounds: Bounds::default(),
            boundary: None,
            stars: Vec::new(),
            smoother: GravitySmoother::new(config.gravity),
            settling: SettlingMonitor::new(config.settling),
            settle_timer: FixedTimer::new(config.settling.period),
            motion: None,
            motion_status: MotionStatus::Inactive,
            state: ArenaState::Initialized,
            rng,
            debug_overlay: false,
            config,
        };
        arena.resize(width, height);

        log::info!("Created arena {}x{}", width, height);
        Ok(arena)
    }

    /// Get the configuration
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> ArenaState {
        self.state
    }

    /// Current motion input status
    pub fn motion_status(&self) -> &MotionStatus {
        &self.motion_status
    }

    /// Current arena rectangle
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    // ==================== Lifecycle ====================

    /// Start the settling timer and attach an optional motion source
    ///
    /// A missing or failing source is not an error: the arena runs with
    /// gravity held at its last value and reports `MotionStatus::Unavailable`.
    pub fn start(&mut self, source: Option<Box<dyn MotionSource>>) -> Result<()> {
        match self.state {
            ArenaState::TornDown => return Err(ArenaError::TornDown),
            ArenaState::Running => self.detach_motion(),
            ArenaState::Initialized => {}
        }

        if let Some(source) = source {
            self.attach_motion(source);
        }

        self.settle_timer.start();
        self.state = ArenaState::Running;
        Ok(())
    }

    /// Stop motion input and release the subscription. Idempotent.
    pub fn teardown(&mut self) {
        if self.state == ArenaState::TornDown {
            return;
        }

        self.detach_motion();
        self.motion_status = MotionStatus::Stopped;
        self.settle_timer.stop();
        self.state = ArenaState::TornDown;
        log::info!("Tore down arena with {} stars", self.stars.len());
    }

    fn attach_motion(&mut self, source: Box<dyn MotionSource>) {
        match MotionSubscription::start(source) {
            Ok(subscription) => {
                self.motion = Some(subscription);
                self.motion_status = MotionStatus::Active;
            }
            Err(e) => {
                log::warn!("Motion input unavailable, holding gravity: {}", e);
                self.motion_status = MotionStatus::Unavailable(e.to_string());
            }
        }
    }

    fn detach_motion(&mut self) {
        if let Some(mut subscription) = self.motion.take() {
            subscription.cancel();
        }
        self.motion_status = MotionStatus::Inactive;
    }

    // ==================== Layout ====================

    /// Rebuild the jar walls for a new surface size
    ///
    /// Existing stars are left where they are, even if now outside.
    /// Non-finite sizes are ignored and the current walls are kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !width.is_finite() || !height.is_finite() {
            log::warn!("Ignoring non-finite arena size {}x{}", width, height);
            return;
        }

        if let Some(old) = self.boundary.take() {
            self.world.remove_body(old);
        }

        self.bounds = Bounds::new(width, height);
        if self.bounds.is_empty() {
            log::debug!("Arena resized to empty bounds {}x{}, no walls", width, height);
            return;
        }

        let desc = BoundaryDesc::new(self.bounds, self.config.boundary);
        self.boundary = Some(self.world.create_boundary(&desc));
        log::debug!("Arena resized to {}x{}", width, height);
    }

    // ==================== Stars ====================

    /// Spawn a star at `position` with `velocity`
    ///
    /// Out-of-bounds positions are accepted as-is.
    pub fn spawn_at(&mut self, position: Vec2, velocity: Vec2) -> Result<BodyHandle> {
        self.ensure_alive()?;

        let body = &self.config.body;
        let restitution = self
            .rng
            .gen_range(body.restitution_min..=body.restitution_max);
        let desc = StarDesc::from_config(body, restitution)
            .with_position(position)
            .with_linear_velocity(velocity);

        let handle = self.world.create_star(&desc);
        self.stars.push(Star {
            handle,
            radius: desc.radius,
            restitution,
        });
        Ok(handle)
    }

    /// Spawn a star at rest at `position`
    pub fn spawn_at_rest(&mut self, position: Vec2) -> Result<BodyHandle> {
        self.spawn_at(position, Vec2::ZERO)
    }

    /// Spawn a star just under the top wall with a random nudge
    pub fn spawn_random(&mut self) -> Result<BodyHandle> {
        self.ensure_alive()?;

        let spawn = self.config.spawn;
        let (lo, hi) = (spawn.margin, self.bounds.width - spawn.margin);
        let x = if lo <= hi {
            self.rng.gen_range(lo..=hi)
        } else {
            self.bounds.width * 0.5
        };
        let position = Vec2::new(x, self.bounds.height - spawn.margin);
        let velocity = Vec2::new(
            self.rng.gen_range(spawn.velocity_x[0]..=spawn.velocity_x[1]),
            self.rng.gen_range(spawn.velocity_y[0]..=spawn.velocity_y[1]),
        );

        self.spawn_at(position, velocity)
    }

    /// Remove every star, then rain down `count` new ones
    pub fn reset(&mut self, count: usize) -> Result<()> {
        self.ensure_alive()?;

        for star in self.stars.drain(..) {
            self.world.remove_body(star.handle);
        }
        for _ in 0..count {
            self.spawn_random()?;
        }

        log::debug!("Reset arena to {} stars", count);
        Ok(())
    }

    /// Number of live stars
    pub fn body_count(&self) -> usize {
        self.stars.len()
    }

    /// Snapshot of every star, in spawn order
    pub fn bodies(&self) -> Vec<BodySnapshot> {
        self.stars
            .iter()
            .filter_map(|star| self.snapshot(star).ok())
            .collect()
    }

    /// Snapshot of a single star
    pub fn body(&self, handle: BodyHandle) -> Result<BodySnapshot> {
        let star = self
            .stars
            .iter()
            .find(|s| s.handle == handle)
            .ok_or(ArenaError::BodyNotFound(handle))?;
        self.snapshot(star)
    }

    fn snapshot(&self, star: &Star) -> Result<BodySnapshot> {
        let motion = self.world.body_motion(star.handle)?;
        Ok(BodySnapshot {
            handle: star.handle,
            position: motion.position,
            velocity: motion.velocity,
            angular_velocity: motion.angular_velocity,
            rotation: self.world.body_rotation(star.handle)?,
            radius: star.radius,
            restitution: star.restitution,
        })
    }

    // ==================== Gravity ====================

    /// Feed one raw sensor reading through the mapper and smoother
    ///
    /// Returns the new active gravity (smoothed and scaled).
    pub fn on_motion_sample(&mut self, gravity: Vec3, orientation: ScreenOrientation) -> Vec2 {
        self.smoother.push(orientation.map_gravity(gravity));
        self.apply_gravity()
    }

    /// Override gravity directly, bypassing the sensor
    ///
    /// `gravity` is in the same units as `gravity()`; the smoother restarts
    /// from this value.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        let strength = self.config.gravity.strength;
        let unscaled = if strength != 0.0 { gravity / strength } else { Vec2::ZERO };
        self.smoother.reset_to(unscaled);
        self.apply_gravity();
    }

    /// Active gravity: the smoothed sample times the gravity strength
    pub fn gravity(&self) -> Vec2 {
        self.smoother.scaled()
    }

    fn apply_gravity(&mut self) -> Vec2 {
        let gravity = self.smoother.scaled();
        self.world
            .set_gravity(gravity * self.config.pixels_per_meter);
        gravity
    }

    /// Drain queued samples from the attached motion source
    ///
    /// Returns the number of samples applied.
    pub fn pump_motion(&mut self) -> usize {
        let Some(subscription) = self.motion.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        for event in subscription.poll() {
            match event {
                MotionEvent::Sample(sample) => {
                    if matches!(self.motion_status, MotionStatus::Unavailable(_)) {
                        log::info!("Motion input recovered");
                        self.motion_status = MotionStatus::Active;
                    }
                    self.smoother.push(sample.mapped());
                    applied += 1;
                }
                MotionEvent::Unavailable(reason) => {
                    log::warn!("Motion input lost, holding gravity: {}", reason);
                    self.motion_status = MotionStatus::Unavailable(reason);
                }
            }
        }

        if applied > 0 {
            self.apply_gravity();
        }
        applied
    }

    // ==================== Simulation ====================

    /// Advance the arena by one frame
    pub fn tick(&mut self, delta_time: f32) -> Result<()> {
        self.ensure_alive()?;

        self.pump_motion();
        self.world.step(delta_time);

        if self.settle_timer.advance(delta_time) > 0 {
            self.settle_now();
        }
        Ok(())
    }

    /// Run the settling sweep immediately
    pub fn settle_now(&mut self) -> SweepStats {
        let mut motions = Vec::with_capacity(self.stars.len());
        for star in &self.stars {
            match self.world.body_motion(star.handle) {
                Ok(motion) => motions.push((star.handle, motion)),
                Err(e) => log::warn!("Skipping star in settling sweep: {}", e),
            }
        }

        let stats = self.settling.sweep(motions.iter_mut().map(|(_, m)| m));
        if stats.settled() > 0 {
            for (handle, motion) in &motions {
                if let Err(e) = self.world.set_body_motion(*handle, motion) {
                    log::warn!("Failed to write back settled star: {}", e);
                }
            }
        }
        stats
    }

    // ==================== Debug ====================

    /// Toggle the render-only debug overlay flag
    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.debug_overlay = enabled;
    }

    /// Whether the renderer should draw its debug overlay
    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    /// Access the underlying physics world
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.state == ArenaState::TornDown {
            Err(ArenaError::TornDown)
        } else {
            Ok(())
        }
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("state", &self.state)
            .field("bounds", &self.bounds)
            .field("stars", &self.stars.len())
            .field("gravity", &self.gravity())
            .field("motion_status", &self.motion_status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use jar_motion::{MotionSample, MotionSender};

    /// Reports a dropout, then resumes sending
    struct FlakySource {
        sender: Option<MotionSender>,
    }

    impl MotionSource for FlakySource {
        fn is_available(&self) -> bool {
            true
        }

        fn start(&mut self, sender: MotionSender) -> jar_motion::Result<()> {
            sender.report_unavailable("sensor paused");
            sender.send(MotionSample::upright(0.0, -1.0, 0.0));
            self.sender = Some(sender);
            Ok(())
        }

        fn stop(&mut self) {
            self.sender = None;
        }
    }

    fn arena(width: f32, height: f32) -> Arena {
        Arena::new(ArenaConfig::default().with_seed(42), width, height).unwrap()
    }

    #[test]
    fn test_new_arena_has_walls_and_no_stars() {
        let arena = arena(400.0, 800.0);
        assert_eq!(arena.state(), ArenaState::Initialized);
        assert_eq!(arena.body_count(), 0);
        assert_eq!(arena.world().body_count(), 1);
        assert_eq!(arena.gravity(), Vec2::ZERO);
        assert_eq!(arena.motion_status(), &MotionStatus::Inactive);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ArenaConfig::default();
        config.body.mass = 0.0;
        assert!(matches!(
            Arena::new(config, 100.0, 100.0),
            Err(ArenaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_spawn_at() {
        let mut arena = arena(400.0, 800.0);
        let handle = arena
            .spawn_at(Vec2::new(120.0, 300.0), Vec2::new(5.0, -7.0))
            .unwrap();

        assert_eq!(arena.body_count(), 1);
        let star = arena.body(handle).unwrap();
        assert_eq!(star.position, Vec2::new(120.0, 300.0));
        assert_eq!(star.velocity, Vec2::new(5.0, -7.0));
        assert_eq!(star.radius, 20.0);
        assert!((0.3..=0.6).contains(&star.restitution));
    }

    #[test]
    fn test_spawn_outside_bounds_is_accepted() {
        let mut arena = arena(400.0, 800.0);
        let handle = arena.spawn_at_rest(Vec2::new(-50.0, 900.0)).unwrap();
        assert_eq!(arena.body(handle).unwrap().position, Vec2::new(-50.0, 900.0));
    }

    #[test]
    fn test_reset_rains_from_the_top() {
        let mut arena = arena(800.0, 800.0);
        arena.reset(3).unwrap();

        let stars = arena.bodies();
        assert_eq!(stars.len(), 3);
        for star in stars {
            assert_eq!(star.position.y, 775.0);
            assert!((25.0..=775.0).contains(&star.position.x));
            assert!((-20.0..=20.0).contains(&star.velocity.x));
            assert!((-30.0..=0.0).contains(&star.velocity.y));
        }
    }

    #[test]
    fn test_reset_replaces_existing_stars() {
        let mut arena = arena(400.0, 800.0);
        arena.reset(10).unwrap();
        arena.reset(4).unwrap();
        assert_eq!(arena.body_count(), 4);
        assert_eq!(arena.world().body_count(), 5);

        arena.reset(0).unwrap();
        assert_eq!(arena.body_count(), 0);
    }

    #[test]
    fn test_narrow_arena_spawns_in_the_middle() {
        let mut arena = arena(30.0, 800.0);
        let handle = arena.spawn_random().unwrap();
        assert_eq!(arena.body(handle).unwrap().position.x, 15.0);
    }

    #[test]
    fn test_resize_keeps_stars() {
        let mut arena = arena(400.0, 800.0);
        arena.reset(5).unwrap();
        arena.resize(600.0, 900.0);

        assert_eq!(arena.bounds(), Bounds::new(600.0, 900.0));
        assert_eq!(arena.body_count(), 5);
        assert_eq!(arena.world().body_count(), 6);

        arena.resize(0.0, 0.0);
        assert_eq!(arena.world().body_count(), 5);
    }

    #[test]
    fn test_non_finite_resize_is_ignored() {
        let mut arena = arena(400.0, 800.0);
        arena.resize(f32::INFINITY, 800.0);
        arena.resize(400.0, f32::NAN);

        assert_eq!(arena.bounds(), Bounds::new(400.0, 800.0));
        assert_eq!(arena.world().body_count(), 1);

        let handle = arena.spawn_random().unwrap();
        let x = arena.body(handle).unwrap().position.x;
        assert!((25.0..=375.0).contains(&x));
    }

    #[test]
    fn test_nan_sample_does_not_poison_gravity() {
        let mut arena = arena(400.0, 800.0);
        let before = arena.on_motion_sample(Vec3::new(0.0, -1.0, 0.0), ScreenOrientation::Upright);

        let held = arena.on_motion_sample(Vec3::new(f32::NAN, -1.0, 0.0), ScreenOrientation::Upright);
        assert_eq!(held, before);
        assert!(arena.world().gravity().is_finite());

        for _ in 0..100 {
            arena.on_motion_sample(Vec3::new(0.0, -1.0, 0.0), ScreenOrientation::Upright);
        }
        let gravity = arena.gravity();
        assert!(gravity.is_finite());
        assert_relative_eq!(gravity.x, 0.0);
        assert_relative_eq!(gravity.y, -9.0, epsilon = 1e-3);
    }

    #[test]
    fn test_motion_sample_sets_scaled_gravity() {
        let mut arena = arena(400.0, 800.0);
        let gravity = arena.on_motion_sample(Vec3::new(0.0, -1.0, 0.0), ScreenOrientation::Upright);

        assert_relative_eq!(gravity.y, -0.15 * 9.0, epsilon = 1e-5);
        assert_eq!(arena.gravity(), gravity);
        assert_relative_eq!(arena.world().gravity().y, gravity.y * 150.0, epsilon = 1e-3);
    }

    #[test]
    fn test_set_gravity_overrides_smoother() {
        let mut arena = arena(400.0, 800.0);
        arena.set_gravity(Vec2::new(0.0, -9.0));
        assert_relative_eq!(arena.gravity().y, -9.0, epsilon = 1e-5);

        // Smoothing continues from the override.
        let next = arena.on_motion_sample(Vec3::new(0.0, -1.0, 0.0), ScreenOrientation::Upright);
        assert_relative_eq!(next.y, -9.0, epsilon = 1e-4);
    }

    #[test]
    fn test_settle_now_stops_slow_floor_star() {
        let mut arena = arena(400.0, 800.0);
        let slow = arena.spawn_at(Vec2::new(100.0, 40.0), Vec2::new(19.0, 0.0)).unwrap();
        let fast = arena.spawn_at(Vec2::new(200.0, 40.0), Vec2::new(20.0, 0.0)).unwrap();
        let high = arena.spawn_at(Vec2::new(300.0, 400.0), Vec2::new(1.0, 0.0)).unwrap();

        let stats = arena.settle_now();
        assert_eq!(stats.visited, 3);
        assert_eq!(stats.snapped, 1);

        let slow = arena.body(slow).unwrap();
        assert_eq!(slow.velocity, Vec2::ZERO);
        assert_eq!(slow.angular_velocity, 0.0);
        assert_eq!(slow.position.y, 25.0);

        assert_eq!(arena.body(fast).unwrap().velocity, Vec2::new(20.0, 0.0));
        assert_eq!(arena.body(high).unwrap().velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_settling_runs_only_while_running() {
        let mut arena = arena(400.0, 800.0);
        let star = arena.spawn_at(Vec2::new(100.0, 24.0), Vec2::new(5.0, 0.0)).unwrap();

        arena.tick(0.2).unwrap();
        assert_eq!(arena.settling.sweep_count(), 0);

        arena.start(None).unwrap();
        arena.tick(0.2).unwrap();
        assert!(arena.settling.sweep_count() >= 1);
        assert!(arena.body(star).is_ok());
    }

    #[test]
    fn test_sample_after_dropout_reactivates_motion() {
        let mut arena = arena(400.0, 800.0);
        arena
            .start(Some(Box::new(FlakySource { sender: None })))
            .unwrap();

        assert_eq!(arena.pump_motion(), 1);
        assert_eq!(arena.motion_status(), &MotionStatus::Active);
        assert_relative_eq!(arena.gravity().y, -0.15 * 9.0, epsilon = 1e-5);
    }

    #[test]
    fn test_teardown_is_idempotent_and_final() {
        let mut arena = arena(400.0, 800.0);
        arena.start(None).unwrap();
        arena.teardown();
        arena.teardown();

        assert_eq!(arena.state(), ArenaState::TornDown);
        assert_eq!(arena.motion_status(), &MotionStatus::Stopped);
        assert!(matches!(arena.tick(0.016), Err(ArenaError::TornDown)));
        assert!(matches!(arena.reset(1), Err(ArenaError::TornDown)));
        assert!(matches!(arena.start(None), Err(ArenaError::TornDown)));
    }

    #[test]
    fn test_debug_overlay_toggle() {
        let mut arena = arena(400.0, 800.0);
        assert!(!arena.debug_overlay());
        arena.set_debug_overlay(true);
        assert!(arena.debug_overlay());
        assert_eq!(arena.world().body_count(), 1);
    }
}
