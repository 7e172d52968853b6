//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (`#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

use crate::{
    convert,
    physics::{Physics, PhysicsBody},
    player::Player,
    scene::{ActiveScene, SceneSet},
};

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(
        Update,
        (draw_camera_target, draw_player_velocity).after(SceneSet::Camera),
    );
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

/// Where the cinematic rig is heading and what it is looking at.
fn draw_camera_target(scene: Option<Res<ActiveScene>>, mut gizmos: Gizmos) {
    let Some(scene) = scene else {
        return;
    };
    let rig = scene.camera();
    let position = convert::point3(rig.position());
    let color = match rig.mode() {
        shared::CameraMode::Orbit => Color::srgb(0.3, 0.8, 1.0),
        shared::CameraMode::Dramatic => Color::srgb(1.0, 0.4, 0.8),
        shared::CameraMode::Follow => Color::srgb(0.4, 1.0, 0.4),
    };
    gizmos.sphere(Isometry3d::from_translation(position), 0.5, color);
    if let Some(player) = scene.last_player_position() {
        gizmos.line(position, convert::point3(player), color.with_alpha(0.4));
    }
}

fn draw_player_velocity(
    player: Single<(&PhysicsBody, &Transform), With<Player>>,
    physics: Option<Res<Physics>>,
    mut gizmos: Gizmos,
) {
    let Some(physics) = physics else {
        return;
    };
    let (body, transform) = *player;
    let Some(velocity) = physics.velocity(body.0) else {
        return;
    };
    let start = transform.translation;
    gizmos.arrow(start, start + convert::vec3(velocity) * 0.1, Color::srgb(1.0, 0.8, 0.2));
}
