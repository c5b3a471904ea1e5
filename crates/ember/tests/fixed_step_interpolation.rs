//! Fixed-step scheduling and pose interpolation driven the way the frame
//! loop drives them.

use ember::interpolation::{Pose2d, PoseHistory, RotationBlend};
use ember::math::Vec2;
use ember::time::FixedTimestep;

/// Advance a body moving at `speed` units/s through `frames` of `frame_dt`,
/// returning the rendered x positions and the simulated x after each frame.
fn simulate(frame_dt: f32, frames: usize, speed: f32) -> Vec<(f32, f32)> {
    let mut fixed = FixedTimestep::new(50);
    let mut history = PoseHistory::new(Pose2d::IDENTITY);
    let mut x = 0.0;
    let mut out = Vec::new();

    for _ in 0..frames {
        fixed.accumulate(frame_dt);
        while fixed.step_due() {
            x += speed * fixed.step_secs();
            history.push(Pose2d::new(Vec2::new(x, 0.0), 0.0));
        }
        let rendered = history.interpolate(fixed.alpha());
        out.push((rendered.position.x, x));
    }
    out
}

#[test]
fn rendered_position_never_runs_ahead_of_the_simulation() {
    for (rendered, simulated) in simulate(1.0 / 144.0, 200, 3.0) {
        assert!(rendered <= simulated + 1e-5, "{rendered} > {simulated}");
    }
}

#[test]
fn rendered_motion_is_monotonic_at_high_frame_rates() {
    let frames = simulate(1.0 / 240.0, 300, 5.0);
    for pair in frames.windows(2) {
        assert!(pair[1].0 >= pair[0].0 - 1e-5);
    }
}

#[test]
fn slow_frames_catch_up_with_several_steps() {
    let mut fixed = FixedTimestep::new(50);
    fixed.accumulate(0.1 + 0.001);
    let mut steps = 0;
    while fixed.step_due() {
        steps += 1;
    }
    assert_eq!(steps, 5);
    assert!(fixed.alpha() < 1.0);
}

#[test]
fn endpoints_and_rotation_blend() {
    let mut history = PoseHistory::new(Pose2d::new(Vec2::ZERO, 350.0));
    history.push(Pose2d::new(Vec2::new(2.0, 0.0), 10.0));

    assert_eq!(history.interpolate(0.0), history.previous());
    assert_eq!(history.interpolate(1.0), history.current());

    let linear = history.interpolate_with(0.5, RotationBlend::Linear);
    assert!((linear.rotation_degrees - 180.0).abs() < 1e-4);
    let short = history.interpolate_with(0.5, RotationBlend::ShortestArc);
    assert!(short.rotation_degrees.rem_euclid(360.0).abs() < 1e-3);
}

#[cfg(feature = "physics2d")]
mod physics {
    use ember::physics2d::{BodyType2d, PhysicsWorld2d};

    use super::*;

    #[test]
    fn physics_poses_interpolate_between_steps() {
        let mut world = PhysicsWorld2d::default();
        let body = world.add_box(Pose2d::IDENTITY, 1.0, 1.0, 1.0, BodyType2d::Dynamic);
        world.set_linear_velocity(body, Vec2::new(5.0, 0.0));

        let mut fixed = FixedTimestep::new(50);
        fixed.accumulate(0.03);
        while fixed.step_due() {
            world.step(fixed.step_secs());
        }

        let history = world.history(body).unwrap();
        let mid = world.interpolated(body, fixed.alpha()).unwrap();
        assert!(mid.position.x > history.previous().position.x);
        assert!(mid.position.x < history.current().position.x);
        // 5 units/s over one 20 ms step.
        assert!((history.current().position.x - 0.1).abs() < 1e-3);
    }
}
