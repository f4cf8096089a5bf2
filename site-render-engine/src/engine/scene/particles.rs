use bevy::prelude::*;
use constants::scene::{
    BEAN_BROWN, BEAN_DEPTH_OFFSET, BEAN_POINTER_PUSH, BEAN_SPREAD_XY, BEAN_SPREAD_Z,
    POINTER_DAMPING, SPARKLE_SCALE, SPARKLE_SPEED, SPARKLE_TINT,
};

use super::params::{SceneDetail, SceneParams};
use crate::engine::motion::damping::damp_vec3;

#[derive(Component, Debug, Clone, Copy)]
pub struct Bean {
    home: Vec3,
    phase: f32,
    speed: f32,
    push: Vec3,
    last_elapsed: Option<f32>,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Sparkle {
    home: Vec3,
    phase: f32,
}

/// Deterministic value in [0, 1) for a seed, so the scatter is stable
/// between reloads.
pub fn unit_hash(seed: u32) -> f32 {
    let mut x = seed.wrapping_mul(0x9E37_79B9).wrapping_add(0x7F4A_7C15);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;
    (x >> 8) as f32 / (1u32 << 24) as f32
}

fn centered(seed: u32, extent: f32) -> f32 {
    (unit_hash(seed) - 0.5) * extent
}

pub fn spawn_beans(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    detail: &SceneDetail,
) {
    let mesh = meshes.add(
        Capsule3d::new(0.12, 0.1)
            .mesh()
            .rings(detail.bean_rings)
            .longitudes(detail.bean_longitudes),
    );
    let material = materials.add(StandardMaterial {
        base_color: BEAN_BROWN,
        perceptual_roughness: 0.6,
        ..default()
    });

    for index in 0..detail.bean_count as u32 {
        let seed = index * 7;
        let home = Vec3::new(
            centered(seed, BEAN_SPREAD_XY),
            centered(seed + 1, BEAN_SPREAD_XY),
            centered(seed + 2, BEAN_SPREAD_Z) + BEAN_DEPTH_OFFSET,
        );
        let scale = 0.6 + unit_hash(seed + 3) * 0.8;
        commands.spawn((
            Bean {
                home,
                phase: unit_hash(seed + 4) * std::f32::consts::TAU,
                speed: 0.2 + unit_hash(seed + 5) * 0.6,
                push: Vec3::ZERO,
                last_elapsed: None,
            },
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(home)
                .with_scale(Vec3::new(scale, scale * 1.3, scale * 0.8)),
        ));
    }
}

pub fn spawn_sparkles(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    detail: &SceneDetail,
) {
    let mesh = meshes.add(Sphere::new(0.02).mesh().uv(8, 6));
    let material = materials.add(StandardMaterial {
        base_color: SPARKLE_TINT.with_alpha(0.5),
        emissive: SPARKLE_TINT.to_linear() * 2.0,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    for index in 0..detail.sparkle_count as u32 {
        let seed = 10_000 + index * 5;
        let home = Vec3::new(
            centered(seed, SPARKLE_SCALE),
            centered(seed + 1, SPARKLE_SCALE),
            centered(seed + 2, SPARKLE_SCALE),
        );
        commands.spawn((
            Sparkle {
                home,
                phase: unit_hash(seed + 3) * std::f32::consts::TAU,
            },
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(home),
        ));
    }
}

/// Beans bob and tumble in place and are pushed away from the pointer.
pub fn animate_beans(params: Res<SceneParams>, mut beans: Query<(&mut Bean, &mut Transform)>) {
    let t = params.elapsed;
    let push_target = Vec3::new(params.pointer_x, params.pointer_y, 0.0) * BEAN_POINTER_PUSH;
    for (mut bean, mut transform) in &mut beans {
        let dt = bean.last_elapsed.map_or(0.0, |last| (t - last).max(0.0));
        bean.last_elapsed = Some(t);
        bean.push = damp_vec3(bean.push, push_target, POINTER_DAMPING, dt);

        let phase = t * bean.speed + bean.phase;
        let bob = Vec3::new(phase.cos() * 0.1, phase.sin() * 0.3, 0.0);
        transform.translation = bean.home + bob + bean.push;
        transform.rotation = Quat::from_euler(EulerRot::XYZ, phase * 0.5, phase * 0.3, 0.0);
    }
}

/// Sparkles drift slowly and pulse in size.
pub fn animate_sparkles(
    params: Res<SceneParams>,
    mut sparkles: Query<(&Sparkle, &mut Transform)>,
) {
    let t = params.elapsed * SPARKLE_SPEED;
    for (sparkle, mut transform) in &mut sparkles {
        let phase = t + sparkle.phase;
        transform.translation =
            sparkle.home + Vec3::new(phase.sin() * 0.2, (phase * 0.7).cos() * 0.2, 0.0);
        transform.scale = Vec3::splat(0.6 + 0.4 * (phase * 2.0).sin().abs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_in_range() {
        for seed in 0..1000 {
            let value = unit_hash(seed);
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, unit_hash(seed));
        }
        assert_ne!(unit_hash(1), unit_hash(2));
    }
}
