use nalgebra::{Rotation3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        GRAVITY_FORCE, GROUNDED_THRESHOLD, INITIAL_CAMERA_TILT, JUMP_FORCE, LOOK_SENSITIVITY,
        PITCH_LIMIT, PLAYER_HEIGHT, RUN_SPEED, SPHERE_RADIUS, WALK_SPEED,
    },
    intent::InputIntent,
};

/// Tunables for the locomotion step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_force: f32,
    pub grounded_threshold: f32,
    /// Supplemental downward force while airborne (negative).
    pub gravity_force: f32,
    pub player_height: f32,
    pub sphere_radius: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            jump_force: JUMP_FORCE,
            grounded_threshold: GROUNDED_THRESHOLD,
            gravity_force: GRAVITY_FORCE,
            player_height: PLAYER_HEIGHT,
            sphere_radius: SPHERE_RADIUS,
        }
    }
}

impl LocomotionSettings {
    pub fn normalize(&mut self) {
        self.walk_speed = finite_or(self.walk_speed, WALK_SPEED).max(0.0);
        self.run_speed = finite_or(self.run_speed, RUN_SPEED).max(0.0);
        self.jump_force = finite_or(self.jump_force, JUMP_FORCE).max(0.0);
        self.grounded_threshold = finite_or(self.grounded_threshold, GROUNDED_THRESHOLD).max(0.0);
        // The supplemental force only ever pulls down.
        self.gravity_force = finite_or(self.gravity_force, GRAVITY_FORCE).min(0.0);
        self.sphere_radius = finite_or(self.sphere_radius, SPHERE_RADIUS).max(0.01);
        self.player_height = finite_or(self.player_height, PLAYER_HEIGHT).max(self.sphere_radius);
    }

    /// Vertical offset of the eye above the sphere center.
    pub fn eye_offset(&self) -> f32 {
        self.player_height - self.sphere_radius
    }
}

/// Output of one locomotion tick, to be written back through the physics body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionStep {
    /// Desired planar velocity `(x, z)` in world space.
    pub horizontal_velocity: Vector2<f32>,
    /// Whether a jump impulse fires this tick.
    pub jump_requested: bool,
    /// Vertical velocity to write back: `jump_force` on a jump, otherwise the input unchanged.
    pub vertical_velocity: f32,
    /// Force to apply at the body's center this tick (zero while grounded).
    pub continuous_force: Vector3<f32>,
    /// Ground contact as derived from the input vertical velocity.
    pub grounded: bool,
}

impl LocomotionStep {
    /// Full linear velocity `(x, vy, z)` to hand to the physics body.
    pub fn linear_velocity(&self) -> Vector3<f32> {
        Vector3::new(
            self.horizontal_velocity.x,
            self.vertical_velocity,
            self.horizontal_velocity.y,
        )
    }
}

/// Ground contact inferred from near-zero vertical velocity.
///
/// Non-finite velocities are never grounded.
#[inline]
pub fn is_grounded(vertical_velocity: f32, threshold: f32) -> bool {
    vertical_velocity.is_finite() && vertical_velocity.abs() < threshold
}

/// Camera-relative planar movement direction for `intent`, unit length or zero.
///
/// In view space +X is right and -Z is forward. Opposing flags cancel before normalizing, and a
/// zero vector stays zero.
pub fn move_direction(intent: &InputIntent) -> Vector3<f32> {
    let front = Vector3::new(0.0, 0.0, intent.front_axis());
    let side = Vector3::new(intent.side_axis(), 0.0, 0.0);
    (front - side).try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// One locomotion tick.
///
/// - Builds the camera-relative direction from the intent flags and scales it by walk/run speed.
/// - Rotates it by `camera_yaw` about +Y so "forward" is always the view direction.
/// - Derives grounded from `vertical_velocity`, fires a jump only when grounded, and requests a
///   supplemental downward force while airborne.
pub fn step(
    intent: &InputIntent,
    vertical_velocity: f32,
    camera_yaw: f32,
    settings: &LocomotionSettings,
) -> LocomotionStep {
    let speed = if intent.sprint() {
        settings.run_speed
    } else {
        settings.walk_speed
    };

    let yaw = if camera_yaw.is_finite() { camera_yaw } else { 0.0 };
    let world = Rotation3::from_axis_angle(&Vector3::y_axis(), yaw) * (move_direction(intent) * speed);

    let grounded = is_grounded(vertical_velocity, settings.grounded_threshold);
    let jump_requested = intent.jump() && grounded;

    let vertical_velocity = if jump_requested {
        settings.jump_force
    } else if vertical_velocity.is_finite() {
        vertical_velocity
    } else {
        0.0
    };

    let continuous_force = if grounded {
        Vector3::zeros()
    } else {
        Vector3::new(0.0, settings.gravity_force, 0.0)
    };

    LocomotionStep {
        horizontal_velocity: Vector2::new(world.x, world.z),
        jump_requested,
        vertical_velocity,
        continuous_force,
        grounded,
    }
}

/// Eye position for a body centered at `body_position`.
pub fn eye_position(body_position: Vector3<f32>, settings: &LocomotionSettings) -> Vector3<f32> {
    body_position + Vector3::new(0.0, settings.eye_offset(), 0.0)
}

/// Yaw/pitch of the first-person view, driven by pointer motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for LookAngles {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: INITIAL_CAMERA_TILT,
        }
    }
}

impl LookAngles {
    /// Apply a pointer delta in pixels. Moving right turns right, moving up looks up.
    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.yaw -= dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - dy * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

#[inline]
pub(crate) fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}
