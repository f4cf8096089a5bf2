use std::f32::consts::FRAC_PI_4;

use bevy::prelude::*;
use constants::scene::{
    HANDLE_BLACK, HERO_BASE_YAW, HERO_FLOAT_AMPLITUDE, HERO_FLOAT_SPEED, HERO_POINTER_PITCH,
    HERO_POINTER_YAW, HERO_SWAY_AMPLITUDE, HERO_SWAY_SPEED, LAVENDER, LAVENDER_DARK,
    POINTER_DAMPING,
};

use super::params::{SceneDetail, SceneParams};
use crate::engine::motion::damping::damp;

/// Root of the moka pot group.
#[derive(Component, Debug, Clone, Copy)]
pub struct HeroObject {
    base_translation: Vec3,
    yaw: f32,
    pitch: f32,
    last_elapsed: Option<f32>,
}

/// Low-poly mesh with one normal per face.
fn faceted(builder: impl MeshBuilder) -> Mesh {
    let mut mesh = builder.build();
    mesh.duplicate_vertices();
    mesh.compute_flat_normals();
    mesh
}

pub fn spawn_hero(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    detail: &SceneDetail,
) {
    let segments = detail.segments;
    let lavender = materials.add(StandardMaterial {
        base_color: LAVENDER,
        perceptual_roughness: 0.3,
        metallic: 0.1,
        clearcoat: 0.5,
        ..default()
    });
    let lavender_dark = materials.add(StandardMaterial {
        base_color: LAVENDER_DARK,
        perceptual_roughness: 0.4,
        ..default()
    });
    let black = materials.add(StandardMaterial {
        base_color: HANDLE_BLACK,
        perceptual_roughness: 0.8,
        ..default()
    });

    let base_translation = detail.hero_offset;
    let mut root = commands.spawn((
        HeroObject {
            base_translation,
            yaw: 0.0,
            pitch: 0.0,
            last_elapsed: None,
        },
        Transform::from_translation(base_translation)
            .with_rotation(Quat::from_rotation_y(HERO_BASE_YAW))
            .with_scale(Vec3::splat(detail.hero_scale)),
        Visibility::default(),
    ));

    root.with_children(|pot| {
        // Lower chamber, narrowing towards the waist.
        pot.spawn((
            Mesh3d(meshes.add(faceted(
                ConicalFrustum {
                    radius_top: 0.7,
                    radius_bottom: 0.9,
                    height: 1.4,
                }
                .mesh()
                .resolution(segments),
            ))),
            MeshMaterial3d(lavender.clone()),
            Transform::from_xyz(0.0, -0.8, 0.0),
        ));
        // Waist band.
        pot.spawn((
            Mesh3d(meshes.add(faceted(Cylinder::new(0.71, 0.1).mesh().resolution(segments)))),
            MeshMaterial3d(lavender_dark),
            Transform::from_xyz(0.0, -0.05, 0.0),
        ));
        // Upper chamber.
        pot.spawn((
            Mesh3d(meshes.add(faceted(
                ConicalFrustum {
                    radius_top: 0.9,
                    radius_bottom: 0.7,
                    height: 1.4,
                }
                .mesh()
                .resolution(segments),
            ))),
            MeshMaterial3d(lavender.clone()),
            Transform::from_xyz(0.0, 0.7, 0.0),
        ));
        // Lid and knob.
        pot.spawn((
            Mesh3d(meshes.add(faceted(
                Cone {
                    radius: 0.91,
                    height: 0.4,
                }
                .mesh()
                .resolution(segments),
            ))),
            MeshMaterial3d(lavender.clone()),
            Transform::from_xyz(0.0, 1.5, 0.0),
        ));
        pot.spawn((
            Mesh3d(meshes.add(faceted(
                ConicalFrustum {
                    radius_top: 0.15,
                    radius_bottom: 0.1,
                    height: 0.3,
                }
                .mesh()
                .resolution(segments),
            ))),
            MeshMaterial3d(black.clone()),
            Transform::from_xyz(0.0, 1.75, 0.0),
        ));
        // Spout.
        pot.spawn((
            Mesh3d(meshes.add(faceted(
                Cone {
                    radius: 0.15,
                    height: 0.5,
                }
                .mesh()
                .resolution(segments),
            ))),
            MeshMaterial3d(lavender),
            Transform::from_xyz(0.7, 1.3, 0.0).with_rotation(Quat::from_rotation_z(-FRAC_PI_4)),
        ));
        // Handle.
        pot.spawn((
            Mesh3d(meshes.add(Cuboid::new(0.2, 1.2, 0.15))),
            MeshMaterial3d(black.clone()),
            Transform::from_xyz(-0.9, 0.1, 0.0).with_rotation(Quat::from_rotation_z(0.1)),
        ));
        pot.spawn((
            Mesh3d(meshes.add(Cuboid::new(0.5, 0.15, 0.15))),
            MeshMaterial3d(black),
            Transform::from_xyz(-0.65, 0.65, 0.0),
        ));
    });
}

/// Target tilt for a pointer position: yaw follows x, pitch follows y.
pub fn pointer_tilt(pointer_x: f32, pointer_y: f32) -> (f32, f32) {
    (pointer_x * HERO_POINTER_YAW, -pointer_y * HERO_POINTER_PITCH)
}

/// Idle sway and float, plus a damped tilt towards the pointer.
pub fn animate_hero(params: Res<SceneParams>, mut heroes: Query<(&mut HeroObject, &mut Transform)>) {
    let t = params.elapsed;
    for (mut hero, mut transform) in &mut heroes {
        let dt = hero.last_elapsed.map_or(0.0, |last| (t - last).max(0.0));
        hero.last_elapsed = Some(t);

        let (target_yaw, target_pitch) = pointer_tilt(params.pointer_x, params.pointer_y);
        hero.yaw = damp(hero.yaw, target_yaw, POINTER_DAMPING, dt);
        hero.pitch = damp(hero.pitch, target_pitch, POINTER_DAMPING, dt);

        let sway = (t * HERO_SWAY_SPEED).sin() * HERO_SWAY_AMPLITUDE;
        let float = (t * HERO_FLOAT_SPEED).sin() * HERO_FLOAT_AMPLITUDE;
        transform.rotation =
            Quat::from_euler(EulerRot::YXZ, HERO_BASE_YAW + sway + hero.yaw, hero.pitch, 0.0);
        transform.translation = hero.base_translation + Vec3::Y * float;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilt_never_snaps_to_pointer() {
        let mut app = App::new();
        app.insert_resource(SceneParams::default())
            .add_systems(Update, animate_hero);
        let hero = app
            .world_mut()
            .spawn((
                HeroObject {
                    base_translation: Vec3::ZERO,
                    yaw: 0.0,
                    pitch: 0.0,
                    last_elapsed: None,
                },
                Transform::default(),
            ))
            .id();
        app.update();

        {
            let mut params = app.world_mut().resource_mut::<SceneParams>();
            params.pointer_x = 1.0;
            params.elapsed = 1.0 / 60.0;
        }
        app.update();

        let yaw = app.world().get::<HeroObject>(hero).map(|hero| hero.yaw).unwrap();
        let (target, _) = pointer_tilt(1.0, 0.0);
        assert!(yaw > 0.0 && yaw < target);

        for frame in 2..600 {
            app.world_mut().resource_mut::<SceneParams>().elapsed = frame as f32 / 60.0;
            app.update();
        }
        let yaw = app.world().get::<HeroObject>(hero).map(|hero| hero.yaw).unwrap();
        assert!((yaw - target).abs() < 1e-3);
    }
}
