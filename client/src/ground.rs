//! Aurora ground plane.
//!
//! The wave field drives how rough the surface reads: `StandardMaterial` has no normal-map
//! strength, so the normal scale is mapped onto perceptual roughness. The emissive glow and
//! transmission breathe with the ground pulse.

use bevy::prelude::*;
use shared::{GroundUniforms, constants::GROUND_SIZE, wave::sample_bounds};

use crate::{
    camera::SceneCamera,
    convert,
    scene::{ActiveScene, SceneEntity, SceneSet, SceneState},
    settings::SceneConfig,
};

const GROUND_BASE_COLOR: Color = Color::srgb(0.02, 0.1, 0.18);
const GROUND_GLOW: LinearRgba = LinearRgba::rgb(0.1, 0.9, 0.6);
const ROUGHNESS_RANGE: (f32, f32) = (0.05, 0.45);

#[derive(Component)]
pub struct Ground {
    material: Handle<StandardMaterial>,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(SceneState::Mounted), add_ground);
    app.add_systems(Update, animate_ground.in_set(SceneSet::Animate));
}

fn add_ground(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let material = materials.add(StandardMaterial {
        base_color: GROUND_BASE_COLOR,
        emissive: GROUND_GLOW * 0.2,
        perceptual_roughness: ROUGHNESS_RANGE.0,
        metallic: 0.1,
        specular_transmission: 0.9,
        thickness: 0.5,
        ..default()
    });

    commands.spawn((
        SceneEntity,
        Name::new("Ground"),
        Ground {
            material: material.clone(),
        },
        Transform::from_xyz(0.0, config.settings.physics.ground_height, 0.0),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE).build())),
        MeshMaterial3d(material),
    ));
}

fn animate_ground(
    ground: Single<&Ground>,
    camera: Single<&Transform, With<SceneCamera>>,
    mut scene: ResMut<ActiveScene>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    time: Res<Time>,
) {
    let viewer = convert::na_vector(camera.translation);
    let uniforms = scene.ground_frame(time.delta_secs(), viewer);
    let base_scale = scene.settings().wave.base_scale;

    let Some(material) = materials.get_mut(&ground.material) else {
        return;
    };
    let look = GroundLook::from_uniforms(&uniforms, base_scale);
    material.emissive = look.emissive;
    material.specular_transmission = look.transmission;
    material.perceptual_roughness = look.roughness;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GroundLook {
    emissive: LinearRgba,
    transmission: f32,
    roughness: f32,
}

impl GroundLook {
    fn from_uniforms(uniforms: &GroundUniforms, base_scale: f32) -> Self {
        let (lo, hi) = sample_bounds(base_scale);
        let t = ((uniforms.normal_scale.x - lo) / (hi - lo)).clamp(0.0, 1.0);
        let t = if t.is_finite() { t } else { 0.5 };
        Self {
            emissive: GROUND_GLOW * uniforms.emissive_intensity.max(0.0),
            transmission: uniforms.transmission.clamp(0.0, 1.0),
            roughness: ROUGHNESS_RANGE.0 + (ROUGHNESS_RANGE.1 - ROUGHNESS_RANGE.0) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn uniforms(scale: f32) -> GroundUniforms {
        GroundUniforms {
            normal_scale: Vector2::new(scale, scale),
            emissive_intensity: 0.25,
            transmission: 0.95,
        }
    }

    #[test]
    fn normal_scale_spans_the_roughness_range() {
        let (lo, hi) = sample_bounds(0.4);
        let calm = GroundLook::from_uniforms(&uniforms(lo), 0.4);
        let rough = GroundLook::from_uniforms(&uniforms(hi), 0.4);
        assert!((calm.roughness - ROUGHNESS_RANGE.0).abs() < 1.0e-6);
        assert!((rough.roughness - ROUGHNESS_RANGE.1).abs() < 1.0e-6);
    }

    #[test]
    fn pulse_values_pass_through() {
        let look = GroundLook::from_uniforms(&uniforms(0.4), 0.4);
        assert!((look.transmission - 0.95).abs() < 1.0e-6);
        assert!((look.emissive.green - GROUND_GLOW.green * 0.25).abs() < 1.0e-6);
    }

    #[test]
    fn non_finite_scale_settles_mid_range() {
        let look = GroundLook::from_uniforms(&uniforms(f32::NAN), 0.4);
        assert!(look.roughness.is_finite());
    }
}
