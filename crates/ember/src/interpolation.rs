//! Pose interpolation between fixed simulation steps.
//!
//! Physics advances in whole fixed steps while frames are rendered at
//! whatever rate the display allows. Drawing the raw simulated pose makes
//! motion stutter whenever the two rates drift apart, so every body keeps the
//! last two simulated poses and the renderer draws a blend of them:
//!
//! ```text
//!   tick n-1          tick n            tick n+1
//!      │                 │                 │
//!   previous ────────► current
//!                  ▲
//!          rendered at t = accumulator / step
//! ```
//!
//! The rendered pose therefore lags the simulation by at most one step.

use crate::math::{Vec2, lerp};

/// A 2D position plus a rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Pose2d {
    pub position: Vec2,
    pub rotation_degrees: f32,
}

impl Pose2d {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation_degrees: 0.0,
    };

    pub fn new(position: Vec2, rotation_degrees: f32) -> Self {
        Self {
            position,
            rotation_degrees,
        }
    }

    /// Blend two poses. `t` is not clamped.
    pub fn lerp(self, other: Self, t: f32, blend: RotationBlend) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation_degrees: blend.blend(self.rotation_degrees, other.rotation_degrees, t),
        }
    }
}

/// How rotation angles are blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum RotationBlend {
    /// Plain linear blend of the raw angle values. Crossing the ±180° seam
    /// between two ticks sweeps the long way around.
    #[default]
    Linear,
    /// Blend along the shorter arc between the two angles.
    ShortestArc,
}

impl RotationBlend {
    pub fn blend(self, from: f32, to: f32, t: f32) -> f32 {
        match self {
            RotationBlend::Linear => lerp(from, to, t),
            RotationBlend::ShortestArc => {
                let mut delta = (to - from).rem_euclid(360.0);
                if delta > 180.0 {
                    delta -= 360.0;
                }
                from + delta * t
            }
        }
    }
}

/// The two most recent simulated poses of a body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseHistory {
    previous: Pose2d,
    current: Pose2d,
}

impl PoseHistory {
    /// Start with both slots at `pose`, so the first frames do not blend
    /// from the origin.
    pub fn new(pose: Pose2d) -> Self {
        Self {
            previous: pose,
            current: pose,
        }
    }

    /// Record a freshly simulated pose: current moves to previous.
    pub fn push(&mut self, pose: Pose2d) {
        self.previous = self.current;
        self.current = pose;
    }

    /// Overwrite both slots, e.g. after teleporting a body.
    pub fn reset(&mut self, pose: Pose2d) {
        self.previous = pose;
        self.current = pose;
    }

    pub fn previous(&self) -> Pose2d {
        self.previous
    }

    pub fn current(&self) -> Pose2d {
        self.current
    }

    /// The pose to render at fraction `t` with the default rotation blend.
    pub fn interpolate(&self, t: f32) -> Pose2d {
        self.interpolate_with(t, RotationBlend::default())
    }

    pub fn interpolate_with(&self, t: f32, blend: RotationBlend) -> Pose2d {
        self.previous.lerp(self.current, t, blend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> PoseHistory {
        let mut h = PoseHistory::new(Pose2d::new(Vec2::new(0.0, 0.0), 10.0));
        h.push(Pose2d::new(Vec2::new(4.0, -2.0), 50.0));
        h
    }

    #[test]
    fn endpoints_are_previous_and_current() {
        let h = history();
        assert_eq!(h.interpolate(0.0), h.previous());
        assert_eq!(h.interpolate(1.0), h.current());
    }

    #[test]
    fn midpoint_blends_position_and_rotation() {
        let p = history().interpolate(0.5);
        assert!(p.position.abs_diff_eq(Vec2::new(2.0, -1.0), 1e-6));
        assert!((p.rotation_degrees - 30.0).abs() < 1e-5);
    }

    #[test]
    fn position_is_monotonic_in_t() {
        let h = history();
        let mut last = f32::NEG_INFINITY;
        for i in 0..=10 {
            let x = h.interpolate(i as f32 / 10.0).position.x;
            assert!(x >= last);
            last = x;
        }
    }

    #[test]
    fn push_shifts_current_into_previous() {
        let mut h = history();
        let next = Pose2d::new(Vec2::ONE, 0.0);
        h.push(next);
        assert_eq!(h.previous().position, Vec2::new(4.0, -2.0));
        assert_eq!(h.current(), next);
    }

    #[test]
    fn linear_rotation_takes_the_long_way_across_the_seam() {
        let mut h = PoseHistory::new(Pose2d::new(Vec2::ZERO, 170.0));
        h.push(Pose2d::new(Vec2::ZERO, -170.0));
        assert!((h.interpolate(0.5).rotation_degrees - 0.0).abs() < 1e-4);
        let short = h.interpolate_with(0.5, RotationBlend::ShortestArc);
        assert!((short.rotation_degrees - 180.0).abs() < 1e-4);
    }

    #[test]
    fn t_above_one_extrapolates() {
        let p = history().interpolate(1.5);
        assert!(p.position.abs_diff_eq(Vec2::new(6.0, -3.0), 1e-6));
    }
}
