use nalgebra::Vector3;
use shared::{
    InputIntent, IntentFlag, LocomotionStep, PhysicsWorld, SceneContext, SceneSettings,
    camera_path::CameraMode, eye_position, physics::rapier3d::prelude::RigidBodyHandle,
};

const DT: f32 = 1.0 / 60.0;

struct Harness {
    ctx: SceneContext,
    world: PhysicsWorld,
    body: RigidBodyHandle,
}

impl Harness {
    fn mount() -> Self {
        let settings = SceneSettings::default();
        let mut world = PhysicsWorld::from_settings(&settings.physics);
        let body = world.spawn_player_body(&settings.physics);
        Self {
            ctx: SceneContext::mount(settings),
            world,
            body,
        }
    }

    /// One fixed tick: read body → locomotion → write body → simulate → report position.
    fn tick(&mut self, intent: &InputIntent, yaw: f32) -> LocomotionStep {
        let threshold = self.ctx.settings().locomotion.grounded_threshold;
        let state = self
            .world
            .kinematic_state(self.body, threshold)
            .expect("player body exists");

        let step = self.ctx.locomotion(intent, state.vertical_velocity, yaw);
        assert!(self.world.apply_locomotion(self.body, &step));
        self.world.step(DT);

        let position = self.world.position(self.body).expect("player body exists");
        self.ctx.report_player_position(position);
        step
    }

    fn settle(&mut self) {
        let idle = InputIntent::default();
        for _ in 0..240 {
            self.tick(&idle, 0.0);
        }
    }

    fn y(&self) -> f32 {
        self.world.position(self.body).expect("player body exists").y
    }
}

#[test]
fn player_falls_from_spawn_and_rests_on_ground() {
    let mut h = Harness::mount();
    assert!((h.y() - 10.0).abs() < 1.0e-6);

    h.settle();

    // Ground at -2, sphere radius 0.3.
    assert!((h.y() + 1.7).abs() < 0.05, "resting height {}", h.y());

    let state = h.world.kinematic_state(h.body, 0.1).expect("body");
    assert!(state.grounded, "vertical velocity {}", state.vertical_velocity);

    // The eye rides 1.5 above the sphere center.
    let eye = eye_position(state.position, &h.ctx.settings().locomotion);
    assert!((eye.y - (h.y() + 1.5)).abs() < 1.0e-5);
}

#[test]
fn grounded_jump_leaves_the_ground_once() {
    let mut h = Harness::mount();
    h.settle();
    let rest = h.y();

    let jump = InputIntent::from_flags(&[IntentFlag::Jump]);
    let mut jumps = 0;
    // 20 ticks stay on the way up; at the apex vertical velocity passes through zero and a
    // held jump would fire again.
    for _ in 0..20 {
        if h.tick(&jump, 0.0).jump_requested {
            jumps += 1;
        }
    }

    assert_eq!(jumps, 1);
    assert!(h.y() > rest + 2.0, "height after jump {}", h.y());
}

#[test]
fn sprinting_forward_moves_down_negative_z() {
    let mut h = Harness::mount();
    h.settle();
    let start = h.world.position(h.body).expect("body");

    let sprint = InputIntent::from_flags(&[IntentFlag::Forward, IntentFlag::Sprint]);
    for _ in 0..60 {
        let step = h.tick(&sprint, 0.0);
        assert!((step.horizontal_velocity.norm() - 25.0).abs() < 1.0e-3);
    }

    let end = h.world.position(h.body).expect("body");
    let travelled: Vector3<f32> = end - start;
    assert!(travelled.z < -15.0, "travelled {travelled:?}");
    assert!(travelled.x.abs() < 0.5);
}

#[test]
fn follow_camera_targets_the_player() {
    let mut h = Harness::mount();
    h.settle();

    // Orbit and dramatic take 15s each; the third mode tracks the player.
    let idle = InputIntent::default();
    let mut frame = h.ctx.camera_frame(DT);
    while h.ctx.camera().mode() != CameraMode::Follow {
        h.tick(&idle, 0.0);
        frame = h.ctx.camera_frame(DT);
    }

    let player = h.ctx.last_player_position().expect("player reported");
    for _ in 0..600 {
        frame = h.ctx.camera_frame(DT);
    }
    let offset = frame.position - player;
    let planar = (offset.x * offset.x + offset.z * offset.z).sqrt();
    assert!((planar - 10.0).abs() < 0.5, "planar distance {planar}");
    assert!((offset.y - 5.0).abs() < 0.5, "height {}", offset.y);
}

#[test]
fn wave_drives_ground_every_frame() {
    let mut h = Harness::mount();
    let viewer = Vector3::new(0.0, 1.5, 0.0);
    let a = h.ctx.ground_frame(DT, viewer);
    let b = h.ctx.ground_frame(DT, viewer);
    assert_ne!(a.normal_scale, b.normal_scale);
    assert!(a.normal_scale.iter().all(|v| v.is_finite()));
}
