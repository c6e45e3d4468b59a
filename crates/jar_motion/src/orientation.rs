//! Device-frame to screen-frame gravity mapping
//!
//! The screen content rotates relative to the device chassis, so a gravity
//! reading has to be re-expressed in the on-screen frame before it can drive
//! the arena. "Down" in the rendered scene then always matches true gravity.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Current rotational presentation of the screen relative to the chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenOrientation {
    /// Portrait, home edge at the bottom
    #[default]
    Upright,
    /// Portrait, flipped
    UpsideDown,
    /// Landscape, the device's physical left edge is down
    RotatedLeft,
    /// Landscape, the device's physical right edge is down
    RotatedRight,
    /// Face up, face down, or not reported; mapped as upright
    Unknown,
}

impl ScreenOrientation {
    /// All orientations, in declaration order
    pub const ALL: [Self; 5] = [
        Self::Upright,
        Self::UpsideDown,
        Self::RotatedLeft,
        Self::RotatedRight,
        Self::Unknown,
    ];

    /// Re-express a device-frame gravity sample in this orientation's screen frame.
    ///
    /// `gx` is right-positive and `gy` up-positive in the device frame. The
    /// output is x right-positive, y up-positive on screen. `gz` is dropped.
    #[inline]
    pub fn map_gravity(self, sample: Vec3) -> Vec2 {
        let (gx, gy) = (sample.x, sample.y);
        match self {
            Self::Upright | Self::Unknown => Vec2::new(gx, gy),
            Self::UpsideDown => Vec2::new(-gx, -gy),
            Self::RotatedLeft => Vec2::new(gy, -gx),
            Self::RotatedRight => Vec2::new(-gy, gx),
        }
    }
}

/// Map a device-frame gravity sample into simulation space
#[inline]
pub fn map_gravity(sample: Vec3, orientation: ScreenOrientation) -> Vec2 {
    orientation.map_gravity(sample)
}
