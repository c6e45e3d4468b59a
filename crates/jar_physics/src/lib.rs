//! Jar Physics - the Star Jar arena on Rapier 2D
//!
//! A bounded 2D arena of circular "stars" that fall under a tilt-steered
//! gravity, bounce off the jar walls and each other, and settle on the floor.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                        Arena                          │
//! │  ┌───────────────┐ ┌─────────────────┐ ┌────────────┐ │
//! │  │GravitySmoother│ │ SettlingMonitor │ │ FixedTimer │ │
//! │  └───────────────┘ └─────────────────┘ └────────────┘ │
//! │  ┌─────────────────────────────────────────────────┐  │
//! │  │                 PhysicsWorld                    │  │
//! │  │   (Rapier pipeline: integration, contacts)      │  │
//! │  └─────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────┘
//!          ▲                                  ▲
//!          │ MotionSubscription               │ spawn / reset / resize
//!    ┌─────────────┐                   ┌──────────────┐
//!    │MotionSource │                   │ Render/Input │
//!    └─────────────┘                   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use jar_physics::prelude::*;
//! use glam::Vec3;
//!
//! let mut arena = Arena::new(ArenaConfig::default().with_seed(1), 400.0, 800.0).unwrap();
//! arena.start(None).unwrap();
//! arena.reset(3).unwrap();
//!
//! arena.on_motion_sample(Vec3::new(0.0, -1.0, 0.0), ScreenOrientation::Upright);
//! arena.tick(1.0 / 60.0).unwrap();
//!
//! assert_eq!(arena.bodies().len(), 3);
//! ```

pub mod arena;
pub mod body;
pub mod boundary;
pub mod config;
pub mod error;
pub mod material;
pub mod settling;
pub mod timer;
pub mod world;

pub mod prelude {
    //! Common imports for the arena
    pub use crate::arena::{Arena, ArenaState, MotionStatus};
    pub use crate::body::{BodyHandle, BodyMotion, BodySnapshot, StarDesc};
    pub use crate::boundary::{BoundaryDesc, Bounds};
    pub use crate::config::{ArenaConfig, BodyConfig, BoundaryConfig, SettlingConfig, SpawnConfig};
    pub use crate::error::{ArenaError, Result};
    pub use crate::material::{CombineRule, SurfaceMaterial};
    pub use crate::settling::{settle, SettleOutcome, SettlingMonitor, SweepStats};
    pub use crate::timer::FixedTimer;
    pub use crate::world::PhysicsWorld;
    pub use jar_motion::{GravityConfig, MotionSample, MotionSource, ScreenOrientation};
}

pub use prelude::*;
