use bevy::prelude::*;
use shared::LookAngles;

use crate::{
    convert,
    physics::{self, Physics, PhysicsBody, PhysicsSet},
    scene::{SceneEntity, SceneSet, SceneState},
    settings::SceneConfig,
};

mod locomotion;
mod look;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(SceneState::Mounted),
        spawn_player.after(physics::create_world),
    );
    app.add_systems(OnExit(SceneState::Mounted), forget_look);

    app.add_systems(
        FixedUpdate,
        (
            locomotion::drive.in_set(PhysicsSet::Drive),
            locomotion::sync.in_set(PhysicsSet::Sync),
        ),
    );
    app.add_systems(Update, look::steer.in_set(SceneSet::Input));
}

#[derive(Component)]
pub struct Player;

/// First-person view angles; also the yaw locomotion moves relative to.
#[derive(Resource, Debug, Default, Clone, Copy, Deref, DerefMut)]
pub struct PlayerLook(pub LookAngles);

fn spawn_player(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut physics: ResMut<Physics>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(PlayerLook::default());
    if config.preview {
        return;
    }

    let settings = &config.settings.physics;
    let handle = physics.spawn_player_body(settings);
    let Some(position) = physics.position(handle) else {
        warn!("Player body missing right after spawn");
        return;
    };

    commands.spawn((
        Player,
        SceneEntity,
        Name::new("Player"),
        PhysicsBody(handle),
        Mesh3d(meshes.add(Sphere::new(settings.player_radius).mesh().uv(32, 18))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.55, 0.85, 1.0),
            emissive: LinearRgba::rgb(0.05, 0.2, 0.3),
            perceptual_roughness: 0.3,
            ..default()
        })),
        Transform::from_translation(convert::vec3(position)),
    ));
}

fn forget_look(mut commands: Commands) {
    commands.remove_resource::<PlayerLook>();
}
