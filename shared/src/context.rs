//! Per-mount scene state.
//!
//! Everything the frame routines accumulate between frames lives here: the wave clock, the ground
//! pulse, the cinematic camera rig and the last reported player position. The render-loop driver
//! creates one on mount and drops it on unmount; a remount always starts from a fresh context.

use nalgebra::{Point3, Vector2, Vector3};

use crate::{
    camera_path::{CameraFrame, CameraRig},
    locomotion::{self, LocomotionStep},
    intent::InputIntent,
    settings::SceneSettings,
    wave::{self, GroundPulse, GroundUniforms, WaveClock},
};

pub struct SceneContext {
    settings: SceneSettings,
    wave_clock: WaveClock,
    pulse: GroundPulse,
    camera: CameraRig,
    last_player_position: Option<Point3<f32>>,
    frames: u64,
}

impl SceneContext {
    pub fn mount(mut settings: SceneSettings) -> Self {
        settings.normalize();
        log::debug!("scene context mounted");
        Self {
            camera: CameraRig::new(settings.camera),
            settings,
            wave_clock: WaveClock::default(),
            pulse: GroundPulse::default(),
            last_player_position: None,
            frames: 0,
        }
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn wave_time(&self) -> f32 {
        self.wave_clock.time()
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Last position reported by the player entity, if any was reported since mount.
    pub fn last_player_position(&self) -> Option<Point3<f32>> {
        self.last_player_position
    }

    pub fn report_player_position(&mut self, position: Vector3<f32>) {
        if position.iter().all(|v| v.is_finite()) {
            self.last_player_position = Some(Point3::from(position));
        }
    }

    /// Locomotion for one physics tick; stateless apart from reading settings.
    pub fn locomotion(
        &self,
        intent: &InputIntent,
        vertical_velocity: f32,
        camera_yaw: f32,
    ) -> LocomotionStep {
        locomotion::step(
            intent,
            vertical_velocity,
            camera_yaw,
            &self.settings.locomotion,
        )
    }

    /// Advance the ground animation one frame as seen from `viewer`.
    pub fn ground_frame(&mut self, dt: f32, viewer: Vector3<f32>) -> GroundUniforms {
        self.frames += 1;
        let time = self.wave_clock.tick(dt, &self.settings.wave);
        let scale = wave::sample(time, viewer, self.settings.wave.base_scale);
        let (emissive_intensity, transmission) = self.pulse.tick();
        GroundUniforms {
            normal_scale: Vector2::new(scale, scale),
            emissive_intensity,
            transmission,
        }
    }

    /// Advance the cinematic camera, following the last reported player position.
    ///
    /// Runs every frame while mounted, whichever view is on screen, so the mode cycle never pauses.
    pub fn camera_frame(&mut self, dt: f32) -> CameraFrame {
        self.camera.advance(dt, self.last_player_position)
    }

    /// Hand the cinematic camera the view currently on screen so it eases away from it.
    pub fn seed_camera(&mut self, position: Vector3<f32>, look_at: Vector3<f32>) {
        self.camera.place(Point3::from(position), Point3::from(look_at));
    }
}

impl Drop for SceneContext {
    fn drop(&mut self) {
        log::debug!("scene context torn down after {} frames", self.frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{camera_path::CameraMode, constants::WAVE_TIME_STEP, intent::IntentFlag};

    #[test]
    fn fresh_mount_starts_from_zero() {
        let mut ctx = SceneContext::mount(SceneSettings::default());
        ctx.ground_frame(0.016, Vector3::new(0.0, 1.5, 0.0));
        ctx.ground_frame(0.016, Vector3::new(0.0, 1.5, 0.0));
        assert!((ctx.wave_time() - 2.0 * WAVE_TIME_STEP).abs() < 1.0e-6);
        assert_eq!(ctx.frames(), 2);

        let remounted = SceneContext::mount(SceneSettings::default());
        assert_eq!(remounted.wave_time(), 0.0);
        assert!(remounted.last_player_position().is_none());
    }

    #[test]
    fn ground_uniforms_use_matching_normal_components() {
        let mut ctx = SceneContext::mount(SceneSettings::default());
        let u = ctx.ground_frame(0.016, Vector3::new(4.0, 3.0, -2.0));
        assert_eq!(u.normal_scale.x, u.normal_scale.y);
        assert!(u.emissive_intensity > 0.0);
    }

    #[test]
    fn follow_camera_tracks_reported_player() {
        let mut ctx = SceneContext::mount(SceneSettings::default());
        // Skip to follow mode: orbit (15s) -> dramatic (15s) -> follow.
        ctx.camera_frame(30.5);
        assert_eq!(ctx.camera().mode(), CameraMode::Follow);

        ctx.report_player_position(Vector3::new(40.0, 0.0, 0.0));
        ctx.report_player_position(Vector3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(
            ctx.last_player_position(),
            Some(Point3::new(40.0, 0.0, 0.0))
        );

        let before = ctx.camera().position();
        let frame = ctx.camera_frame(0.016);
        let to_player = Point3::new(40.0, 0.0, 0.0) - before;
        // Moves toward the player's side of the world.
        assert!((frame.position - before).dot(&to_player) > 0.0);
    }

    #[test]
    fn locomotion_uses_mounted_settings() {
        let mut settings = SceneSettings::default();
        settings.locomotion.walk_speed = 3.0;
        let ctx = SceneContext::mount(settings);
        let step = ctx.locomotion(&InputIntent::from_flags(&[IntentFlag::Backward]), 0.0, 0.0);
        assert!((step.horizontal_velocity.y - 3.0).abs() < 1.0e-5);
    }

    #[test]
    fn unnormalized_settings_are_clamped_on_mount() {
        let mut settings = SceneSettings::default();
        settings.camera.mode_interval = 0.0;
        let mut ctx = SceneContext::mount(settings);
        assert!(ctx.settings().camera.mode_interval > 0.0);

        ctx.camera_frame(0.016);
        assert!(ctx.camera().time() > 0.0);
    }

    #[test]
    fn seeded_camera_starts_from_the_given_view() {
        let mut ctx = SceneContext::mount(SceneSettings::default());
        ctx.camera_frame(0.016);
        ctx.seed_camera(Vector3::new(3.0, 1.0, 3.0), Vector3::new(3.0, 1.0, 2.0));
        assert_eq!(ctx.camera().position(), Point3::new(3.0, 1.0, 3.0));
    }
}
