use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use shared::{CameraFrame, constants::CAMERA_START_POSITION};

use crate::{
    convert,
    input::InputAction,
    player::PlayerLook,
    scene::{self, ActiveScene, SceneEntity, SceneSet, SceneState},
    settings::SceneConfig,
};

const FIELD_OF_VIEW_DEGREES: f32 = 75.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;

#[derive(Component)]
pub struct SceneCamera;

/// Who drives the camera: the player's eye or the cinematic path.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    FirstPerson,
    Cinematic,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ViewMode>();
    app.add_systems(OnEnter(SceneState::Mounted), add_camera);
    app.add_systems(Update, toggle_view.in_set(SceneSet::Input));
    app.add_systems(
        Update,
        (
            aim_first_person.run_if(resource_equals(ViewMode::FirstPerson)),
            follow_path,
        )
            .in_set(SceneSet::Camera),
    );
}

fn add_camera(mut commands: Commands, config: Res<SceneConfig>, mut view: ResMut<ViewMode>) {
    *view = if config.preview {
        ViewMode::Cinematic
    } else {
        ViewMode::FirstPerson
    };

    let [x, y, z] = CAMERA_START_POSITION;
    commands.spawn((
        SceneCamera,
        SceneEntity,
        Name::new("Camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FIELD_OF_VIEW_DEGREES.to_radians(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
            ..default()
        }),
        Transform::from_xyz(x, y, z),
        scene::scene_fog(&config),
    ));
}

fn toggle_view(
    actions: Res<ActionState<InputAction>>,
    config: Res<SceneConfig>,
    camera: Single<&Transform, With<SceneCamera>>,
    mut scene: ResMut<ActiveScene>,
    mut view: ResMut<ViewMode>,
) {
    if config.preview || !actions.just_pressed(&InputAction::ToggleView) {
        return;
    }
    *view = match *view {
        ViewMode::FirstPerson => {
            // The rig continues from the eye.
            let eye = camera.translation;
            let ahead = eye + camera.forward().as_vec3();
            scene.seed_camera(convert::na_vector(eye), convert::na_vector(ahead));
            ViewMode::Cinematic
        }
        ViewMode::Cinematic => ViewMode::FirstPerson,
    };
    info!("View mode: {:?}", *view);
}

/// Orientation only; the eye position is written in lock-step with the physics tick.
fn aim_first_person(
    mut camera: Single<&mut Transform, With<SceneCamera>>,
    look: Res<PlayerLook>,
) {
    camera.rotation = look_rotation(look.yaw, look.pitch);
}

/// The rig advances every frame; it only owns the camera in cinematic view.
fn follow_path(
    mut camera: Single<&mut Transform, With<SceneCamera>>,
    mut scene: ResMut<ActiveScene>,
    view: Res<ViewMode>,
    time: Res<Time>,
) {
    let frame = scene.camera_frame(time.delta_secs());
    if *view == ViewMode::Cinematic {
        **camera = frame_transform(&frame);
    }
}

fn look_rotation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Place the camera on the path, aim it at the look-at point and roll by the tilt.
fn frame_transform(frame: &CameraFrame) -> Transform {
    let mut transform = Transform::from_translation(convert::point3(frame.position))
        .looking_at(convert::point3(frame.look_at), Vec3::Y);
    transform.rotate_local_z(frame.tilt);
    transform
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use nalgebra::Point3;
    use shared::{CameraMode, SceneContext, SceneSettings};

    fn path_app(view: ViewMode) -> App {
        let mut app = App::new();
        app.insert_resource(Time::<()>::default());
        app.insert_resource(view);
        app.insert_resource(ActiveScene(SceneContext::mount(SceneSettings::default())));
        app.world_mut()
            .spawn((SceneCamera, Transform::from_xyz(1.0, 2.0, 3.0)));
        app.add_systems(Update, follow_path);
        app
    }

    fn run_for(app: &mut App, frames: usize, dt: f32) {
        for _ in 0..frames {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs_f32(dt));
            app.update();
        }
    }

    fn camera_transform(app: &mut App) -> Transform {
        let mut query = app
            .world_mut()
            .query_filtered::<&Transform, With<SceneCamera>>();
        *query.single(app.world()).expect("one scene camera")
    }

    #[test]
    fn rig_keeps_cycling_in_first_person() {
        let mut app = path_app(ViewMode::FirstPerson);
        run_for(&mut app, 40, 0.5);

        let scene = app.world().resource::<ActiveScene>();
        assert!(scene.camera().time() > 19.0);
        assert_eq!(scene.camera().mode(), CameraMode::Dramatic);

        // First person keeps the camera where the player put it.
        assert_eq!(camera_transform(&mut app).translation, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn cinematic_view_takes_the_camera() {
        let mut app = path_app(ViewMode::Cinematic);
        run_for(&mut app, 1, 0.016);
        let position = app.world().resource::<ActiveScene>().camera().position();
        assert_eq!(camera_transform(&mut app).translation, convert::point3(position));
    }

    #[test]
    fn zero_yaw_looks_down_negative_z() {
        let forward = look_rotation(0.0, 0.0) * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(Vec3::NEG_Z, 1.0e-6));

        let up = look_rotation(0.0, 0.5) * Vec3::NEG_Z;
        assert!(up.y > 0.0);
    }

    #[test]
    fn frame_transform_faces_the_look_at_point() {
        let frame = CameraFrame {
            position: Point3::new(20.0, 8.0, 0.0),
            look_at: Point3::new(0.0, 2.0, 0.0),
            tilt: 0.0,
            mode: CameraMode::Orbit,
        };
        let transform = frame_transform(&frame);
        let expected = (Vec3::new(0.0, 2.0, 0.0) - Vec3::new(20.0, 8.0, 0.0)).normalize();
        assert!(transform.forward().as_vec3().abs_diff_eq(expected, 1.0e-5));
    }

    #[test]
    fn tilt_rolls_without_changing_the_view_direction() {
        let base = CameraFrame {
            position: Point3::new(0.0, 5.0, 10.0),
            look_at: Point3::origin(),
            tilt: 0.0,
            mode: CameraMode::Dramatic,
        };
        let tilted = CameraFrame { tilt: 0.15, ..base };
        let a = frame_transform(&base);
        let b = frame_transform(&tilted);
        assert!(a.forward().as_vec3().abs_diff_eq(b.forward().as_vec3(), 1.0e-5));
        assert!(!a.up().as_vec3().abs_diff_eq(b.up().as_vec3(), 1.0e-3));
    }
}
