//! 3D hero scene composer.
//!
//! The scene reads nothing but [`params::SceneParams`] each frame. Detail
//! (tessellation, shadows, particle counts) is picked once from the device
//! tier when the scene is spawned.

use bevy::prelude::*;

use crate::engine::core::viewport::DeviceTier;
use crate::engine::loading::asset_tracker::AssetPipelineStatus;

/// Camera spawn and its one-shot entry animation.
pub mod camera_intro;

/// Moka pot hero object with idle float and pointer-damped tilt.
pub mod hero_object;

/// Key, rim and fill lights.
pub mod lighting;

/// Per-frame scene inputs and the tier-selected detail budget.
pub mod params;

/// Coffee bean field and sparkles.
pub mod particles;

/// Spawn every scene element and report the scene as ready.
pub fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    tier: Res<DeviceTier>,
    mut status: ResMut<AssetPipelineStatus>,
) {
    let detail = params::SceneDetail::for_tier(&tier);

    camera_intro::spawn_camera(&mut commands);
    lighting::spawn_lighting(&mut commands, &detail);
    hero_object::spawn_hero(&mut commands, &mut meshes, &mut materials, &detail);
    particles::spawn_beans(&mut commands, &mut meshes, &mut materials, &detail);
    particles::spawn_sparkles(&mut commands, &mut meshes, &mut materials, &detail);

    println!(
        "✓ Scene spawned ({} beans, {} sparkles, shadows {})",
        detail.bean_count,
        detail.sparkle_count,
        if detail.shadows { "on" } else { "off" }
    );
    commands.insert_resource(detail);
    status.scene_ready = true;
}
