use bevy::prelude::*;
use bevy::window::PresentMode;

/// Primary window. On the web the engine renders into the page's `#bevy`
/// canvas behind the DOM content and leaves page events alone.
pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            transparent: true,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Site Render Engine".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
