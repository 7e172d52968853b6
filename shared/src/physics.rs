//! Rapier-backed physics for the scene: one dynamic player sphere over static colliders.
//!
//! The rest of the crate only talks to the body through read (`kinematic_state`) and write
//! (`set_velocity`, `apply_force` at a world point) operations, never by touching rapier sets directly.

// Re-export Rapier so the client can name handles without depending on `rapier3d` itself.
pub use rapier3d;

use nalgebra::Vector3;
use rapier3d::{na::UnitQuaternion, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        GROUND_FRICTION, GROUND_HEIGHT, GROUND_RESTITUTION, PLAYER_LINEAR_DAMPING, PLAYER_MASS,
        SPAWN_POSITION, SPHERE_RADIUS, WORLD_GRAVITY,
    },
    locomotion::{LocomotionStep, finite_or, is_grounded},
};

/// Schema-agnostic definition of an immutable world collider.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
    pub friction: f32,
    pub restitution: f32,
}

impl WorldStaticDef {
    /// Horizontal ground half-space whose surface sits at `height`.
    pub fn ground(height: f32, friction: f32, restitution: f32) -> Self {
        Self {
            translation: vector![0.0, height, 0.0],
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
            friction,
            restitution,
        }
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space) with normal `rotation * +Y`.
    ///
    /// Any finite "size" is a rendering concern only; collision is unbounded.
    Plane {
        /// Offset along the plane normal.
        offset_along_normal: f32,
    },
}

/// Build a world-positioned Rapier collider from a `WorldStaticDef`.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // n = R * +Y; the plane is `n · x = dist` with `dist = n · t + offset`.
            let n = def.rotation * Vector::y();
            let dist = n.dot(&def.translation) + *offset_along_normal;
            let unit_n = UnitVector::new_normalize(n);

            ColliderBuilder::new(SharedShape::new(HalfSpace::new(unit_n)))
                .translation(unit_n.into_inner() * dist)
        }
    };

    builder
        .friction(def.friction)
        .restitution(def.restitution)
        .build()
}

/// Physics tunables: world gravity, the player body and the ground collider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f32,
    pub spawn_position: [f32; 3],
    pub player_radius: f32,
    pub player_mass: f32,
    pub linear_damping: f32,
    pub ground_height: f32,
    pub ground_friction: f32,
    pub ground_restitution: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: WORLD_GRAVITY,
            spawn_position: SPAWN_POSITION,
            player_radius: SPHERE_RADIUS,
            player_mass: PLAYER_MASS,
            linear_damping: PLAYER_LINEAR_DAMPING,
            ground_height: GROUND_HEIGHT,
            ground_friction: GROUND_FRICTION,
            ground_restitution: GROUND_RESTITUTION,
        }
    }
}

impl PhysicsSettings {
    pub fn normalize(&mut self) {
        self.gravity = finite_or(self.gravity, WORLD_GRAVITY);
        for (v, d) in self.spawn_position.iter_mut().zip(SPAWN_POSITION) {
            *v = finite_or(*v, d);
        }
        self.player_radius = finite_or(self.player_radius, SPHERE_RADIUS).max(0.01);
        self.player_mass = finite_or(self.player_mass, PLAYER_MASS).max(1.0e-3);
        self.linear_damping = finite_or(self.linear_damping, PLAYER_LINEAR_DAMPING).max(0.0);
        self.ground_height = finite_or(self.ground_height, GROUND_HEIGHT);
        self.ground_friction = finite_or(self.ground_friction, GROUND_FRICTION).max(0.0);
        self.ground_restitution =
            finite_or(self.ground_restitution, GROUND_RESTITUTION).clamp(0.0, 1.0);
    }

    pub fn ground_def(&self) -> WorldStaticDef {
        WorldStaticDef::ground(
            self.ground_height,
            self.ground_friction,
            self.ground_restitution,
        )
    }
}

/// Body state as seen by the locomotion step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicState {
    pub position: Vector3<f32>,
    pub vertical_velocity: f32,
    /// Derived from `vertical_velocity` on every read, never stored.
    pub grounded: bool,
}

/// A self-contained Rapier simulation.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: vector![0.0, gravity, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// World with gravity and the ground collider from `settings`.
    pub fn from_settings(settings: &PhysicsSettings) -> Self {
        let mut world = Self::new(settings.gravity);
        world.add_static(&settings.ground_def());
        world
    }

    pub fn add_static(&mut self, def: &WorldStaticDef) -> ColliderHandle {
        self.colliders.insert(collider_from_def(def))
    }

    /// Dynamic sphere with locked rotations, as used for the player.
    pub fn spawn_player_body(&mut self, settings: &PhysicsSettings) -> RigidBodyHandle {
        let [x, y, z] = settings.spawn_position;
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![x, y, z])
            .linear_damping(settings.linear_damping)
            .lock_rotations()
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(settings.player_radius)
            .mass(settings.player_mass)
            .friction(settings.ground_friction)
            .restitution(0.0)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        log::debug!("spawned player body at ({x}, {y}, {z})");
        handle
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vector3<f32>> {
        let t = self.bodies.get(handle)?.translation();
        Some(Vector3::new(t.x, t.y, t.z))
    }

    pub fn velocity(&self, handle: RigidBodyHandle) -> Option<Vector3<f32>> {
        let v = self.bodies.get(handle)?.linvel();
        Some(Vector3::new(v.x, v.y, v.z))
    }

    pub fn kinematic_state(
        &self,
        handle: RigidBodyHandle,
        grounded_threshold: f32,
    ) -> Option<KinematicState> {
        let position = self.position(handle)?;
        let vertical_velocity = self.velocity(handle)?.y;
        Some(KinematicState {
            position,
            vertical_velocity,
            grounded: is_grounded(vertical_velocity, grounded_threshold),
        })
    }

    /// Overwrite the body's linear velocity. Returns `false` for an unknown handle.
    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: Vector3<f32>) -> bool {
        let Some(body) = self.bodies.get_mut(handle) else {
            return false;
        };
        if velocity.iter().all(|v| v.is_finite()) {
            body.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
        }
        true
    }

    /// Apply a force at a world-space point for the next step only.
    pub fn apply_force(
        &mut self,
        handle: RigidBodyHandle,
        force: Vector3<f32>,
        world_point: Vector3<f32>,
    ) -> bool {
        let Some(body) = self.bodies.get_mut(handle) else {
            return false;
        };
        if force.iter().chain(world_point.iter()).all(|v| v.is_finite()) {
            body.add_force_at_point(
                vector![force.x, force.y, force.z],
                point![world_point.x, world_point.y, world_point.z],
                true,
            );
        }
        true
    }

    /// Write one locomotion step through the body: velocity first, then the airborne force
    /// at the body's center.
    pub fn apply_locomotion(&mut self, handle: RigidBodyHandle, step: &LocomotionStep) -> bool {
        let Some(center) = self.position(handle) else {
            return false;
        };
        self.set_velocity(handle, step.linear_velocity());
        if step.continuous_force != Vector3::zeros() {
            self.apply_force(handle, step.continuous_force, center);
        }
        true
    }

    /// Advance the simulation by `dt` seconds. User forces are cleared afterwards.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;

        let hooks = ();
        let events = ();
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &hooks,
            &events,
        );

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_plane_surface_sits_at_height() {
        let def = WorldStaticDef::ground(-2.0, 0.5, 0.0);
        let collider = collider_from_def(&def);
        assert!((collider.translation().y + 2.0).abs() < 1.0e-6);
        assert!(collider.shape().as_halfspace().is_some());
        assert_eq!(collider.friction(), 0.5);
    }

    #[test]
    fn unknown_handle_is_rejected() {
        let mut world = PhysicsWorld::new(-9.8);
        let stale = RigidBodyHandle::invalid();
        assert!(world.position(stale).is_none());
        assert!(!world.set_velocity(stale, Vector3::zeros()));
        assert!(!world.apply_force(stale, Vector3::y(), Vector3::zeros()));
    }

    #[test]
    fn set_velocity_ignores_non_finite() {
        let settings = PhysicsSettings::default();
        let mut world = PhysicsWorld::from_settings(&settings);
        let body = world.spawn_player_body(&settings);

        assert!(world.set_velocity(body, Vector3::new(1.0, 2.0, 3.0)));
        assert!(world.set_velocity(body, Vector3::new(f32::NAN, 0.0, 0.0)));
        assert_eq!(world.velocity(body), Some(Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn falling_body_is_not_grounded() {
        let settings = PhysicsSettings::default();
        let mut world = PhysicsWorld::from_settings(&settings);
        let body = world.spawn_player_body(&settings);

        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        let state = world.kinematic_state(body, 0.1).expect("body exists");
        assert!(state.vertical_velocity < -1.0);
        assert!(!state.grounded);
        assert!(state.position.y < 10.0);
    }

    #[test]
    fn normalize_repairs_settings() {
        let mut settings = PhysicsSettings {
            spawn_position: [f32::NAN, 3.0, f32::INFINITY],
            ground_restitution: 4.0,
            player_mass: 0.0,
            ..Default::default()
        };
        settings.normalize();
        assert_eq!(settings.spawn_position, [0.0, 3.0, 0.0]);
        assert_eq!(settings.ground_restitution, 1.0);
        assert!(settings.player_mass > 0.0);
    }

    #[test]
    fn airborne_force_acts_for_one_step_at_the_center() {
        let settings = PhysicsSettings::default();
        // No world gravity: only the locomotion force moves the body vertically.
        let mut world = PhysicsWorld::new(0.0);
        let body = world.spawn_player_body(&settings);

        let step = LocomotionStep {
            horizontal_velocity: nalgebra::Vector2::zeros(),
            jump_requested: false,
            vertical_velocity: 0.0,
            continuous_force: Vector3::new(0.0, -29.4, 0.0),
            grounded: false,
        };
        assert!(world.apply_locomotion(body, &step));
        world.step(1.0 / 60.0);

        // a = F / m with m = 1, over one 60 Hz step, minus a sliver of damping.
        let vy = world.velocity(body).expect("body").y;
        assert!(vy < -0.47 && vy > -0.5, "vy {vy}");

        // Forces are cleared after the step.
        world.step(1.0 / 60.0);
        let after = world.velocity(body).expect("body").y;
        assert!((after - vy).abs() < 0.01, "after {after}");
        let x = world.position(body).expect("body").x;
        assert!(x.abs() < 1.0e-6);
    }
}
