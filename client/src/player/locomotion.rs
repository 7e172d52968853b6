use bevy::prelude::*;
use shared::eye_position;

use super::{Player, PlayerLook};
use crate::{
    camera::{SceneCamera, ViewMode},
    convert,
    input::CurrentIntent,
    physics::{Physics, PhysicsBody},
    scene::ActiveScene,
};

/// Turn the sampled intent into a velocity/force update on the player body.
pub(super) fn drive(
    player: Single<&PhysicsBody, With<Player>>,
    mut physics: ResMut<Physics>,
    scene: Res<ActiveScene>,
    intent: Res<CurrentIntent>,
    look: Res<PlayerLook>,
) {
    let handle = player.0;
    let threshold = scene.settings().locomotion.grounded_threshold;
    let Some(state) = physics.kinematic_state(handle, threshold) else {
        return;
    };

    let step = scene.locomotion(&intent.0, state.vertical_velocity, look.yaw);
    if step.jump_requested {
        debug!("Jump from y={:.2}", state.position.y);
    }
    physics.apply_locomotion(handle, &step);
}

/// Copy the simulated body back onto the entity and, in first person, onto the camera.
pub(super) fn sync(
    mut player: Single<(&PhysicsBody, &mut Transform), With<Player>>,
    mut camera: Single<&mut Transform, (With<SceneCamera>, Without<Player>)>,
    physics: Res<Physics>,
    mut scene: ResMut<ActiveScene>,
    view: Res<ViewMode>,
) {
    let (body, transform) = &mut *player;
    let Some(position) = physics.position(body.0) else {
        return;
    };

    transform.translation = convert::vec3(position);
    scene.report_player_position(position);

    if *view == ViewMode::FirstPerson {
        let eye = eye_position(position, &scene.settings().locomotion);
        camera.translation = convert::vec3(eye);
    }
}
