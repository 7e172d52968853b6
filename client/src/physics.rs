use bevy::prelude::*;
use shared::{PhysicsWorld, physics::rapier3d::prelude::RigidBodyHandle};

use crate::{scene::SceneState, settings::SceneConfig};

/// Fixed-step ordering: write forces and velocities, simulate, read back.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicsSet {
    Drive,
    Step,
    Sync,
}

#[derive(Resource, Deref, DerefMut)]
pub struct Physics(pub PhysicsWorld);

/// Physics ticks per second.
const PHYSICS_HZ: f64 = 60.0;

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ));
    app.configure_sets(
        FixedUpdate,
        (PhysicsSet::Drive, PhysicsSet::Step, PhysicsSet::Sync)
            .chain()
            .run_if(in_state(SceneState::Mounted)),
    );

    app.add_systems(OnEnter(SceneState::Mounted), create_world);
    app.add_systems(OnExit(SceneState::Mounted), drop_world);
    app.add_systems(
        FixedUpdate,
        step_world
            .in_set(PhysicsSet::Step)
            .run_if(resource_exists::<Physics>),
    );
}

pub(crate) fn create_world(mut commands: Commands, config: Res<SceneConfig>) {
    let world = PhysicsWorld::from_settings(&config.settings.physics);
    commands.insert_resource(Physics(world));
}

fn step_world(mut physics: ResMut<Physics>, time: Res<Time<Fixed>>) {
    physics.step(time.delta_secs());
}

fn drop_world(mut commands: Commands, physics: Option<Res<Physics>>) {
    if let Some(physics) = physics {
        debug!("Dropping physics world with {} bodies", physics.body_count());
    }
    commands.remove_resource::<Physics>();
}

/// Entity backed by a rigid body in [`Physics`].
#[derive(Component, Debug, Clone, Copy)]
pub struct PhysicsBody(pub RigidBodyHandle);
