use bevy::prelude::*;
use shared::settings::StarfieldSettings;

use crate::{
    scene::{SceneEntity, SceneState},
    settings::SceneConfig,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(SceneState::Mounted), add_stars);
}

fn add_stars(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let stars = config.settings.stars;
    if stars.count == 0 {
        return;
    }

    let mesh = meshes.add(Sphere::new(stars.size * 0.5).mesh().uv(6, 4));
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::WHITE,
        unlit: true,
        ..default()
    });

    let positions = star_positions(&stars);
    debug!("Spawning {} stars", positions.len());
    commands.spawn_batch(positions.into_iter().map(move |position| {
        (
            SceneEntity,
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(position),
        )
    }));
}

/// Golden-ratio conjugate; spreads distances across the shell without clumping.
const GOLDEN_CONJUGATE: f32 = 0.618_034;

/// Deterministic star layout: a Fibonacci sphere for direction, distance spread through the
/// shell `[radius, radius + depth]`.
pub fn star_positions(settings: &StarfieldSettings) -> Vec<Vec3> {
    let count = settings.count as usize;
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());

    (0..count)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f32;
            let direction = Vec3::new(theta.cos() * ring, y, theta.sin() * ring);

            let spread = (i as f32 * GOLDEN_CONJUGATE).fract();
            direction * (settings.radius + settings.depth * spread)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_sit_inside_the_shell() {
        let settings = StarfieldSettings::default();
        let stars = star_positions(&settings);
        assert_eq!(stars.len(), 5_000);
        for star in &stars {
            let d = star.length();
            assert!(d >= settings.radius - 1.0e-2, "{d}");
            assert!(d <= settings.radius + settings.depth + 1.0e-2, "{d}");
        }
    }

    #[test]
    fn stars_cover_both_hemispheres() {
        let stars = star_positions(&StarfieldSettings::default());
        let above = stars.iter().filter(|s| s.y > 0.0).count();
        assert!((2_400..=2_600).contains(&above), "{above}");
    }

    #[test]
    fn empty_field() {
        let settings = StarfieldSettings {
            count: 0,
            ..default()
        };
        assert!(star_positions(&settings).is_empty());
    }
}
