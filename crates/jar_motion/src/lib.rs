//! Jar Motion - tilt sensor input for the Star Jar arena
//!
//! Turns raw device gravity readings into the 2D gravity vector that drives
//! the arena.
//!
//! # Pipeline
//!
//! ```text
//! MotionSource ──► channel ──► MotionSubscription::poll
//!                                     │
//!                                     ▼
//!                    ScreenOrientation::map_gravity  (device → screen frame)
//!                                     │
//!                                     ▼
//!                          GravitySmoother::push     (low-pass, α)
//!                                     │
//!                                     ▼
//!                          GravitySmoother::scaled   (× strength)
//! ```
//!
//! # Example
//!
//! ```
//! use jar_motion::prelude::*;
//! use glam::Vec3;
//!
//! let mut smoother = GravitySmoother::new(GravityConfig::default());
//! let mapped = map_gravity(Vec3::new(0.0, -1.0, 0.0), ScreenOrientation::Upright);
//! let smoothed = smoother.push(mapped);
//! assert!(smoothed.y < 0.0);
//! ```

pub mod config;
pub mod error;
pub mod orientation;
pub mod sample;
pub mod scripted;
pub mod smoother;
pub mod source;

pub mod prelude {
    //! Common imports for motion input
    pub use crate::config::GravityConfig;
    pub use crate::error::{MotionError, Result};
    pub use crate::orientation::{map_gravity, ScreenOrientation};
    pub use crate::sample::{MotionEvent, MotionSample};
    pub use crate::scripted::ScriptedMotionSource;
    pub use crate::smoother::{smooth, GravitySmoother};
    pub use crate::source::{MotionSender, MotionSource, MotionSubscription};
}

pub use prelude::*;
