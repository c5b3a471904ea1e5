//! Rigid bodies on a fixed clock, backed by rapier2d.
//!
//! [`PhysicsWorld2d`] owns a Rapier simulation and advances it one fixed step
//! per [`step`](PhysicsWorld2d::step) call. After every step it records each
//! body's new pose in a two-slot [`PoseHistory`], so rendering can draw the
//! blend [`interpolated`](PhysicsWorld2d::interpolated) at the current
//! fixed-step fraction instead of the raw simulated pose.
//!
//! The [`Physics2d`] plugin inserts the world as a resource and steps it from
//! the fixed-update stage of the frame loop.
//!
//! Angles cross this module's boundary in degrees; Rapier works in radians.

use std::collections::HashMap;

use rapier2d::prelude::*;

use crate::interpolation::{Pose2d, PoseHistory, RotationBlend};
use crate::math::Vec2;

// ── Conversion helpers ──────────────────────────────────────────────────

fn to_rapier(v: Vec2) -> rapier2d::prelude::Vec2 {
    rapier2d::prelude::Vec2::new(v.x, v.y)
}

fn from_rapier(v: rapier2d::prelude::Vec2) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn body_type_to_rapier(bt: BodyType2d) -> RigidBodyType {
    match bt {
        BodyType2d::Dynamic => RigidBodyType::Dynamic,
        BodyType2d::Fixed => RigidBodyType::Fixed,
        BodyType2d::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
        BodyType2d::KinematicVelocityBased => RigidBodyType::KinematicVelocityBased,
    }
}

// ── Types ───────────────────────────────────────────────────────────────

/// How a body responds to forces and contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType2d {
    #[default]
    Dynamic,
    Fixed,
    KinematicPositionBased,
    KinematicVelocityBased,
}

/// Handle to a body (and its collider) in a [`PhysicsWorld2d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

// ── Resource ────────────────────────────────────────────────────────────

/// The 2D physics world.
pub struct PhysicsWorld2d {
    gravity: Vec2,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    poses: HashMap<RigidBodyHandle, PoseHistory>,
    rotation_blend: RotationBlend,
}

impl std::fmt::Debug for PhysicsWorld2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld2d")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish()
    }
}

impl PhysicsWorld2d {
    /// Create a physics world with the given gravity.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            poses: HashMap::new(),
            rotation_blend: RotationBlend::default(),
        }
    }

    /// Select how rotations are blended when interpolating.
    pub fn with_rotation_blend(mut self, blend: RotationBlend) -> Self {
        self.rotation_blend = blend;
        self
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Add a body with a `width` x `height` box collider.
    pub fn add_box(
        &mut self,
        pose: Pose2d,
        width: f32,
        height: f32,
        density: f32,
        body_type: BodyType2d,
    ) -> BodyHandle {
        let collider = ColliderBuilder::cuboid(width * 0.5, height * 0.5).density(density);
        self.insert(pose, body_type, collider)
    }

    /// Add a body with a circle collider.
    pub fn add_circle(
        &mut self,
        pose: Pose2d,
        radius: f32,
        density: f32,
        body_type: BodyType2d,
    ) -> BodyHandle {
        let collider = ColliderBuilder::ball(radius).density(density);
        self.insert(pose, body_type, collider)
    }

    fn insert(
        &mut self,
        pose: Pose2d,
        body_type: BodyType2d,
        collider: ColliderBuilder,
    ) -> BodyHandle {
        let rb = RigidBodyBuilder::new(body_type_to_rapier(body_type))
            .translation(to_rapier(pose.position))
            .rotation(pose.rotation_degrees.to_radians())
            .build();
        let handle = self.bodies.insert(rb);
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);
        self.poses.insert(handle, PoseHistory::new(pose));
        BodyHandle(handle)
    }

    /// Remove a body and its collider. Unknown handles are ignored.
    pub fn remove(&mut self, handle: BodyHandle) {
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.poses.remove(&handle.0);
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(handle.0).map(|b| {
            let v = b.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.set_linvel(to_rapier(velocity), true);
        }
    }

    /// Angular velocity in degrees per second.
    pub fn angular_velocity(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(handle.0).map(|b| b.angvel().to_degrees())
    }

    pub fn set_angular_velocity(&mut self, handle: BodyHandle, degrees_per_sec: f32) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.set_angvel(degrees_per_sec.to_radians(), true);
        }
    }

    /// Teleport a body. Both history slots are reset so the body does not
    /// visibly slide from its old pose.
    pub fn sync_to_world(&mut self, handle: BodyHandle, pose: Pose2d) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.set_position(
                Pose::new(to_rapier(pose.position), pose.rotation_degrees.to_radians()),
                true,
            );
            if let Some(history) = self.poses.get_mut(&handle.0) {
                history.reset(pose);
            }
        }
    }

    /// Advance the simulation by one fixed step of `dt` seconds, then record
    /// every body's new pose.
    pub fn step(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            to_rapier(self.gravity),
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );

        for (handle, body) in self.bodies.iter() {
            let pose = Pose2d::new(
                from_rapier(body.translation()),
                body.rotation().angle().to_degrees(),
            );
            self.poses
                .entry(handle)
                .and_modify(|h| h.push(pose))
                .or_insert_with(|| PoseHistory::new(pose));
        }
    }

    /// The most recently simulated pose.
    pub fn pose(&self, handle: BodyHandle) -> Option<Pose2d> {
        self.poses.get(&handle.0).map(PoseHistory::current)
    }

    pub fn history(&self, handle: BodyHandle) -> Option<&PoseHistory> {
        self.poses.get(&handle.0)
    }

    /// The pose to render at fixed-step fraction `t`.
    pub fn interpolated(&self, handle: BodyHandle, t: f32) -> Option<Pose2d> {
        self.poses
            .get(&handle.0)
            .map(|h| h.interpolate_with(t, self.rotation_blend))
    }
}

impl Default for PhysicsWorld2d {
    /// Zero gravity.
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

// ── Plugin ──────────────────────────────────────────────────────────────

/// Plugin that inserts a zero-gravity [`PhysicsWorld2d`] and steps it once
/// per fixed update.
///
/// # Example
///
/// ```ignore
/// Game::new("My Game")
///     .plugin(Physics2d)
///     .setup(setup)
///     .run();
/// ```
pub struct Physics2d;

impl crate::game::Plugin for Physics2d {
    fn build(&self, game: &mut crate::game::Game) {
        game.insert_resource(PhysicsWorld2d::default());
        game.add_physics_step(physics_step_2d);
    }
}

/// One fixed step of the physics resource.
pub(crate) fn physics_step_2d(ctx: &mut crate::context::Context) {
    let dt = ctx.fixed.step_secs();
    if let Some(world) = ctx.resources.get_resource_mut::<PhysicsWorld2d>() {
        world.step(dt);
    }
}
