use bevy::prelude::*;
use constants::loading::CONTENT_MANIFEST_PATH;

use crate::engine::assets::site_content::SiteContentHandle;
use crate::engine::loading::asset_tracker::TrackedAssets;

/// Start loading the site content manifest and track it for the loading bar.
pub fn start_content_load(
    asset_server: Res<AssetServer>,
    mut content: ResMut<SiteContentHandle>,
    mut tracked: ResMut<TrackedAssets>,
) {
    let handle = asset_server.load(CONTENT_MANIFEST_PATH);
    tracked.track(CONTENT_MANIFEST_PATH, handle.clone().untyped());
    content.handle = Some(handle);
    println!("Loading site content from: {}", CONTENT_MANIFEST_PATH);
}
