use std::collections::HashSet;

use bevy::asset::LoadState;
use bevy::prelude::*;

/// What the loading gate observes from the asset pipeline.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct AssetPipelineStatus {
    /// Real progress in [0, 100], never decreasing.
    pub progress: f32,
    /// Every tracked asset has settled and the scene is built.
    pub complete: bool,
    /// Set by the scene composer once the 3D scene is spawned.
    pub scene_ready: bool,
}

/// Handles whose load state counts towards the loading bar.
#[derive(Resource, Default)]
pub struct TrackedAssets {
    handles: Vec<(&'static str, UntypedHandle)>,
}

impl TrackedAssets {
    pub fn track(&mut self, label: &'static str, handle: UntypedHandle) {
        self.handles.push((label, handle));
    }

    pub fn count(&self) -> usize {
        self.handles.len()
    }
}

/// Fraction of stages done, as a percentage. The scene counts as one stage.
pub fn pipeline_progress(settled: usize, tracked: usize, scene_ready: bool) -> f32 {
    let total = tracked + 1;
    let done = settled.min(tracked) + usize::from(scene_ready);
    done as f32 / total as f32 * 100.0
}

/// Recompute [`AssetPipelineStatus`] from the tracked handles.
///
/// Failed loads count as settled so the page continues with fallbacks; they
/// are logged once each.
pub fn track_asset_pipeline(
    asset_server: Res<AssetServer>,
    tracked: Res<TrackedAssets>,
    mut status: ResMut<AssetPipelineStatus>,
    mut reported_failures: Local<HashSet<&'static str>>,
) {
    let mut settled = 0;
    for (label, handle) in &tracked.handles {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => settled += 1,
            Some(LoadState::Failed(error)) => {
                settled += 1;
                if reported_failures.insert(*label) {
                    error!("Failed to load '{}': {}", label, error);
                }
            }
            _ => {}
        }
    }

    let progress = pipeline_progress(settled, tracked.count(), status.scene_ready);
    status.progress = status.progress.max(progress);
    let complete = settled == tracked.count() && status.scene_ready;
    if complete && !status.complete {
        println!("✓ Asset pipeline complete ({} assets)", tracked.count());
    }
    status.complete |= complete;
}
