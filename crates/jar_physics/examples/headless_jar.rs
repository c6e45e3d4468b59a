//! Headless Star Jar run
//!
//! Rains stars into a phone-sized jar, replays a tilt from upright to
//! landscape, and logs where everything ends up.
//!
//! ```text
//! RUST_LOG=debug cargo run -p jar_physics --example headless_jar
//! ```

use glam::{Vec2, Vec3};
use jar_motion::{MotionSample, ScreenOrientation, ScriptedMotionSource};
use jar_physics::prelude::*;
use std::time::Duration;

const WIDTH: f32 = 390.0;
const HEIGHT: f32 = 844.0;
const DT: f32 = 1.0 / 60.0;

fn tilt_script() -> Vec<MotionSample> {
    let steps = 180;
    (0..steps)
        .map(|i| {
            let angle = std::f32::consts::FRAC_PI_2 * i as f32 / steps as f32;
            let gravity = Vec3::new(angle.sin(), -angle.cos(), 0.0);
            MotionSample::new(gravity, ScreenOrientation::Upright, i as f64 * DT as f64)
        })
        .collect()
}

fn main() -> jar_physics::Result<()> {
    env_logger::init();

    let config = ArenaConfig::default().with_seed(2024);
    let mut arena = Arena::new(config, WIDTH, HEIGHT)?;

    let source = ScriptedMotionSource::new(tilt_script()).with_interval(Duration::from_millis(16));
    arena.start(Some(Box::new(source)))?;
    arena.reset(12)?;
    arena.spawn_at(Vec2::new(WIDTH * 0.5, HEIGHT * 0.5), Vec2::new(0.0, 200.0))?;

    for frame in 0..600 {
        arena.tick(DT)?;
        std::thread::sleep(Duration::from_millis(2));

        if frame % 120 == 0 {
            let gravity = arena.gravity();
            log::info!(
                "frame {:>3}: gravity ({:>6.2}, {:>6.2}), motion {:?}",
                frame,
                gravity.x,
                gravity.y,
                arena.motion_status()
            );
        }
    }

    let stars = arena.bodies();
    let bounds = arena.bounds();
    let inside = stars.iter().filter(|s| bounds.contains(s.position)).count();
    println!("{} of {} stars inside the jar", inside, stars.len());

    for (i, star) in stars.iter().enumerate() {
        println!(
            "star {:>2}: pos ({:>6.1}, {:>6.1}) speed {:>6.1} e={:.2}",
            i,
            star.position.x,
            star.position.y,
            star.velocity.length(),
            star.restitution
        );
    }

    arena.teardown();
    Ok(())
}
