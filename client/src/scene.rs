//! Scene lifecycle.
//!
//! The scene mounts on startup and can be remounted with F5. Mounting builds a fresh
//! [`SceneContext`]; unmounting removes it and despawns every [`SceneEntity`], so no
//! per-frame system runs against a torn-down scene.

use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use shared::{SceneContext, settings::rgb_channels};

use crate::{input::InputAction, settings::SceneConfig};

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneState {
    #[default]
    Unmounted,
    Mounted,
}

/// Per-frame ordering inside `Update` while the scene is mounted.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSet {
    /// Pointer look and view toggles.
    Input,
    /// Ground animation.
    Animate,
    /// Final camera placement.
    Camera,
}

/// Frame state of the mounted scene.
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveScene(pub SceneContext);

/// Despawned on unmount.
#[derive(Component, Default)]
pub struct SceneEntity;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<SceneState>();

    app.configure_sets(
        Update,
        (SceneSet::Input, SceneSet::Animate, SceneSet::Camera)
            .chain()
            .run_if(in_state(SceneState::Mounted)),
    );

    app.add_systems(OnEnter(SceneState::Unmounted), request_mount);
    app.add_systems(OnEnter(SceneState::Mounted), (mount_context, add_lights));
    app.add_systems(OnExit(SceneState::Mounted), unmount);
    app.add_systems(
        Update,
        request_remount.run_if(in_state(SceneState::Mounted)),
    );
}

fn request_mount(mut next: ResMut<NextState<SceneState>>) {
    next.set(SceneState::Mounted);
}

fn request_remount(
    actions: Res<ActionState<InputAction>>,
    mut next: ResMut<NextState<SceneState>>,
) {
    if actions.just_pressed(&InputAction::Remount) {
        info!("Remounting scene");
        next.set(SceneState::Unmounted);
    }
}

fn mount_context(mut commands: Commands, config: Res<SceneConfig>) {
    let settings = config.settings;
    let [r, g, b] = rgb_channels(settings.fog.color);
    commands.insert_resource(ClearColor(Color::srgb(r, g, b)));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: settings.lights.ambient_brightness,
        ..default()
    });
    commands.insert_resource(ActiveScene(SceneContext::mount(settings)));
    info!("Scene mounted");
}

fn add_lights(mut commands: Commands, config: Res<SceneConfig>) {
    let lights = config.settings.lights;
    let [x, y, z] = lights.directional_position;
    commands.spawn((
        SceneEntity,
        Name::new("Sun"),
        DirectionalLight {
            illuminance: lights.directional_illuminance,
            shadows_enabled: lights.shadows,
            ..default()
        },
        Transform::from_xyz(x, y, z).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Exponential fog matching the clear color.
pub fn scene_fog(config: &SceneConfig) -> DistanceFog {
    let fog = config.settings.fog;
    let [r, g, b] = rgb_channels(fog.color);
    DistanceFog {
        color: Color::srgb(r, g, b),
        falloff: FogFalloff::Exponential {
            density: fog.density,
        },
        ..default()
    }
}

fn unmount(mut commands: Commands, scene_entities: Query<Entity, With<SceneEntity>>) {
    for entity in &scene_entities {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<ActiveScene>();
    info!("Scene unmounted");
}
