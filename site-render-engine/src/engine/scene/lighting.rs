use bevy::prelude::*;
use constants::scene::{KEY_LIGHT, RIM_LIGHT};

use super::params::SceneDetail;

const AMBIENT_BRIGHTNESS: f32 = 700.0;
const KEY_INTENSITY: f32 = 2_000_000.0;
const RIM_INTENSITY: f32 = 3_000_000.0;
const FILL_INTENSITY: f32 = 400_000.0;
const SPOT_ANGLE: f32 = 0.5;

/// Studio lighting: a shadow-casting key spot, a tinted rim spot behind the
/// object and a soft fill from below.
pub fn spawn_lighting(commands: &mut Commands, detail: &SceneDetail) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        SpotLight {
            color: KEY_LIGHT,
            intensity: KEY_INTENSITY,
            shadows_enabled: detail.shadows,
            outer_angle: SPOT_ANGLE,
            inner_angle: SPOT_ANGLE * 0.5,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        SpotLight {
            color: RIM_LIGHT,
            intensity: RIM_INTENSITY,
            shadows_enabled: false,
            outer_angle: SPOT_ANGLE,
            inner_angle: 0.0,
            ..default()
        },
        Transform::from_xyz(-8.0, 5.0, -5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PointLight {
            color: Color::WHITE,
            intensity: FILL_INTENSITY,
            ..default()
        },
        Transform::from_xyz(0.0, -2.0, 4.0),
    ));
}
