use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use constants::scene::{CAMERA_FOV_DEGREES, CAMERA_INTRO_DURATION, CAMERA_REST, CAMERA_START};

use crate::engine::motion::easing::Easing;
use crate::engine::motion::tween::Tween;

/// One-shot pull-back of the camera. Once started it always runs to the end.
#[derive(Component, Debug, Clone, Copy)]
pub struct CameraIntro {
    progress: Tween,
    started: bool,
}

impl Default for CameraIntro {
    fn default() -> Self {
        Self {
            progress: Tween::new(0.0, 1.0, CAMERA_INTRO_DURATION, Easing::Power3Out),
            started: false,
        }
    }
}

impl CameraIntro {
    /// Camera position for an eased progress value.
    pub fn position_at(progress: f32) -> Vec3 {
        Vec3::from_array(CAMERA_START).lerp(Vec3::from_array(CAMERA_REST), progress)
    }
}

pub fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::NONE),
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        Transform::from_translation(CameraIntro::position_at(0.0)),
        CameraIntro::default(),
    ));
}

/// Start the pull-back when the page starts running.
pub fn start_camera_intro(mut cameras: Query<&mut CameraIntro>) {
    for mut intro in &mut cameras {
        if !intro.started {
            intro.started = true;
            info!("Camera intro started");
        }
    }
}

pub fn animate_camera_intro(
    time: Res<Time>,
    mut cameras: Query<(&mut CameraIntro, &mut Transform)>,
) {
    for (mut intro, mut transform) in &mut cameras {
        if !intro.started || intro.progress.is_finished() {
            continue;
        }
        let progress = intro.progress.advance(time.delta_secs());
        transform.translation = CameraIntro::position_at(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulls_back_to_rest() {
        assert_eq!(CameraIntro::position_at(0.0), Vec3::new(0.0, 1.0, 12.0));
        assert_eq!(CameraIntro::position_at(1.0), Vec3::new(0.0, 0.0, 7.5));

        let mut intro = CameraIntro {
            started: true,
            ..default()
        };
        for _ in 0..60 {
            intro.progress.advance(1.0 / 60.0);
        }
        assert!(!intro.progress.is_finished());
        // power3-out covers most of the distance in the first second.
        assert!(intro.progress.value() > 0.8);
        for _ in 0..120 {
            intro.progress.advance(1.0 / 60.0);
        }
        assert!(intro.progress.is_finished());
    }
}
