pub mod bitmask_flags;
pub mod camera_path;
pub mod constants;
pub mod context;
pub mod intent;
pub mod locomotion;
pub mod physics;
pub mod settings;
pub mod wave;

pub use camera_path::{CameraFrame, CameraMode, CameraPathSettings, CameraRig};
pub use context::SceneContext;
pub use intent::{InputIntent, IntentFlag};
pub use locomotion::{LocomotionSettings, LocomotionStep, LookAngles, eye_position};
pub use physics::{KinematicState, PhysicsSettings, PhysicsWorld, WorldStaticDef};
pub use settings::{SceneSettings, SettingsError};
pub use wave::{GroundUniforms, WaveSettings, WaveTiming};
