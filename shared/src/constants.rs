use std::f32::consts::FRAC_PI_3;

// ---------------------------------------------------------------------------
// Locomotion
// ---------------------------------------------------------------------------

/// Planar walking speed in scene units per second.
pub const WALK_SPEED: f32 = 15.0;

/// Planar sprinting speed in scene units per second.
pub const RUN_SPEED: f32 = 25.0;

/// Vertical velocity set (not added) when a grounded jump is requested.
pub const JUMP_FORCE: f32 = 25.0;

/// Height of the viewer's eye above the ground contact point.
pub const PLAYER_HEIGHT: f32 = 1.8;

/// Radius of the player's collision sphere.
pub const SPHERE_RADIUS: f32 = 0.3;

/// Eye offset above the sphere center: `PLAYER_HEIGHT - SPHERE_RADIUS`.
pub const EYE_OFFSET: f32 = PLAYER_HEIGHT - SPHERE_RADIUS;

/// Initial camera pitch (radians) applied when the player spawns.
pub const INITIAL_CAMERA_TILT: f32 = 0.15;

/// `|vertical_velocity|` below this counts as standing on the ground.
pub const GROUNDED_THRESHOLD: f32 = 0.1;

/// Extra downward force applied while airborne, on top of world gravity.
///
/// Three times earth gravity gives a heavier fall than the engine's base gravity alone.
pub const GRAVITY_FORCE: f32 = -9.8 * 3.0;

/// Pitch limit for mouse look (radians), just short of straight up/down.
pub const PITCH_LIMIT: f32 = 1.54;

/// Radians of yaw/pitch per pixel of pointer motion.
pub const LOOK_SENSITIVITY: f32 = 0.002;

// ---------------------------------------------------------------------------
// Physics world
// ---------------------------------------------------------------------------

/// Base gravity handed to the physics engine (scene units / s^2).
pub const WORLD_GRAVITY: f32 = -9.8;

/// Fixed spawn point of the player body.
pub const SPAWN_POSITION: [f32; 3] = [0.0, 10.0, 0.0];

pub const PLAYER_MASS: f32 = 1.0;

pub const PLAYER_LINEAR_DAMPING: f32 = 0.1;

/// Height of the ground plane.
pub const GROUND_HEIGHT: f32 = -2.0;

/// Rendered ground size (the collider itself is an infinite half-space).
pub const GROUND_SIZE: f32 = 100.0;

pub const GROUND_FRICTION: f32 = 0.5;

pub const GROUND_RESTITUTION: f32 = 0.0;

// ---------------------------------------------------------------------------
// Wave field
// ---------------------------------------------------------------------------

/// Normal-scale baseline the wave displacement is added to.
pub const WAVE_BASE_SCALE: f32 = 0.4;

/// Time accumulator increment per frame in fixed-step timing.
pub const WAVE_TIME_STEP: f32 = 0.05;

/// Frame rate the fixed step was tuned against; used by delta-scaled timing.
pub const WAVE_REFERENCE_FPS: f32 = 60.0;

/// `(amplitude, temporal frequency, phase)` of the four wave terms.
pub const WAVE_PRIMARY: (f32, f32, f32) = (1.2, 1.0, 0.0);
pub const WAVE_SECONDARY: (f32, f32, f32) = (0.6, 4.5, FRAC_PI_3);
pub const WAVE_TERTIARY: (f32, f32, f32) = (0.4, 7.2, 0.0);
pub const WAVE_QUATERNARY: (f32, f32, f32) = (0.5, 3.8, 0.0);

/// Sum of the four wave amplitudes; the largest possible raw displacement.
pub const WAVE_MAX_SUM: f32 = WAVE_PRIMARY.0 + WAVE_SECONDARY.0 + WAVE_TERTIARY.0 + WAVE_QUATERNARY.0;

/// Distance attenuation: `clamp(1 / (y * ATTENUATION_SCALE), MIN, MAX)`.
pub const ATTENUATION_SCALE: f32 = 0.1;
pub const ATTENUATION_MIN: f32 = 0.2;
pub const ATTENUATION_MAX: f32 = 1.0;

/// Ground emissive/transmission pulse, advanced per frame.
pub const PULSE_TIME_STEP: f32 = 0.01;
pub const PULSE_EMISSIVE_BASE: f32 = 0.2;
pub const PULSE_EMISSIVE_AMPLITUDE: f32 = 0.1;
pub const PULSE_TRANSMISSION_BASE: f32 = 0.9;
pub const PULSE_TRANSMISSION_AMPLITUDE: f32 = 0.1;

// ---------------------------------------------------------------------------
// Camera path
// ---------------------------------------------------------------------------

/// Seconds spent in each camera mode before cycling to the next.
pub const CAMERA_MODE_INTERVAL: f32 = 15.0;

/// Length of the eased transition window opened by each mode switch.
pub const CAMERA_TRANSITION_DURATION: f32 = 2.0;

/// Base per-frame lerp factor toward the mode target.
pub const CAMERA_BASE_SMOOTH_FACTOR: f32 = 0.05;

/// Floor for the eased lerp factor, so a finished transition still tracks its target.
pub const CAMERA_MIN_SMOOTH_FACTOR: f32 = 0.01;

/// Banking (rotation about the view axis) per unit of horizontal target displacement.
pub const CAMERA_TILT_FACTOR: f32 = 0.02;

/// Maximum banking angle (radians).
pub const CAMERA_MAX_TILT: f32 = 0.2;

/// Follow-mode target when no player position has been reported yet.
pub const FOLLOW_FALLBACK_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

/// Initial camera placement before the first frame.
pub const CAMERA_START_POSITION: [f32; 3] = [0.0, 2.0, 5.0];
