use bevy::prelude::*;
use constants::scene::{constrained, full};

use crate::engine::core::app_state::AppState;
use crate::engine::core::viewport::DeviceTier;
use crate::engine::scroll::input::PointerState;

/// Everything the scene consumes each frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneParams {
    /// Pointer in [-1, 1], +y up. Zero when pointer reaction is off.
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub elapsed: f32,
    pub tier: DeviceTier,
}

/// Geometry and effect budget for a device tier.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SceneDetail {
    pub segments: u32,
    pub bean_rings: u32,
    pub bean_longitudes: u32,
    pub bean_count: usize,
    pub sparkle_count: usize,
    pub shadows: bool,
    pub hero_scale: f32,
    pub hero_offset: Vec3,
}

impl SceneDetail {
    pub fn for_tier(tier: &DeviceTier) -> Self {
        if tier.constrained {
            Self {
                segments: constrained::SEGMENTS,
                bean_rings: constrained::BEAN_RINGS,
                bean_longitudes: constrained::BEAN_LONGITUDES,
                bean_count: constrained::BEAN_COUNT,
                sparkle_count: constrained::SPARKLE_COUNT,
                shadows: constrained::SHADOWS,
                hero_scale: constrained::HERO_SCALE,
                hero_offset: Vec3::from_array(constrained::HERO_OFFSET),
            }
        } else {
            Self {
                segments: full::SEGMENTS,
                bean_rings: full::BEAN_RINGS,
                bean_longitudes: full::BEAN_LONGITUDES,
                bean_count: full::BEAN_COUNT,
                sparkle_count: full::SPARKLE_COUNT,
                shadows: full::SHADOWS,
                hero_scale: full::HERO_SCALE,
                hero_offset: Vec3::from_array(full::HERO_OFFSET),
            }
        }
    }
}

/// Refresh [`SceneParams`]. The pointer only feeds the scene once the page
/// is running and the device can hover.
pub fn update_scene_params(
    time: Res<Time>,
    pointer: Res<PointerState>,
    tier: Res<DeviceTier>,
    state: Res<State<AppState>>,
    mut params: ResMut<SceneParams>,
) {
    let reactive =
        *state.get() == AppState::Running && tier.pointer_reactive() && pointer.present;
    let target = if reactive {
        pointer.normalized
    } else {
        Vec2::ZERO
    };

    params.pointer_x = target.x;
    params.pointer_y = target.y;
    params.elapsed = time.elapsed_secs();
    params.tier = *tier;
}
