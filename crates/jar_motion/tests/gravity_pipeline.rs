//! Integration tests for the sensor-to-gravity pipeline
//!
//! Feeds mapped samples through the smoother the way the arena does.

use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use jar_motion::{map_gravity, GravityConfig, GravitySmoother, MotionSample, ScreenOrientation};

#[test]
fn test_upright_downward_samples_build_up_gravity() {
    let mut smoother = GravitySmoother::new(GravityConfig::default().with_smoothing(0.15));

    let mut last_magnitude = 0.0;
    for _ in 0..10 {
        let mapped = map_gravity(Vec3::new(0.0, -1.0, 0.0), ScreenOrientation::Upright);
        let smoothed = smoother.push(mapped);

        assert!(smoothed.y < 0.0);
        let magnitude = smoothed.length();
        assert!(magnitude > last_magnitude);
        assert!(magnitude < 1.0);
        last_magnitude = magnitude;
    }

    // 1 - 0.85^10
    assert_relative_eq!(last_magnitude, 1.0 - 0.85f32.powi(10), epsilon = 1e-5);
}

#[test]
fn test_rotating_the_device_rotates_gravity() {
    let mut smoother = GravitySmoother::new(GravityConfig::default().with_smoothing(1.0));
    let reading = Vec3::new(0.0, -1.0, 0.0);

    let cases = [
        (ScreenOrientation::Upright, Vec2::new(0.0, -1.0)),
        (ScreenOrientation::UpsideDown, Vec2::new(0.0, 1.0)),
        (ScreenOrientation::RotatedLeft, Vec2::new(-1.0, 0.0)),
        (ScreenOrientation::RotatedRight, Vec2::new(1.0, 0.0)),
    ];

    for (orientation, expected) in cases {
        let sample = MotionSample::new(reading, orientation, 0.0);
        let out = smoother.push(sample.mapped());
        assert_relative_eq!(out.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(out.y, expected.y, epsilon = 1e-6);
    }
}

#[test]
fn test_strength_scales_output() {
    let mut smoother = GravitySmoother::new(GravityConfig::default().with_strength(9.0));
    for _ in 0..200 {
        smoother.push(Vec2::new(0.0, -1.0));
    }
    assert_relative_eq!(smoother.scaled().y, -9.0, epsilon = 1e-3);
}
