use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Core lifecycle
use crate::engine::core::app_state::{
    AppState, UnmountRequest, handle_unmount_requests, register_frame_consumers,
    remeasure_on_reveal, teardown_engine,
};
use crate::engine::core::viewport::{DeviceTier, Viewport, classify_device, track_viewport};
use crate::engine::core::window_config::create_window_config;
// Content and loading
use crate::engine::assets::site_content::{SiteContent, SiteContentHandle};
use crate::engine::loading::asset_tracker::{
    AssetPipelineStatus, TrackedAssets, track_asset_pipeline,
};
use crate::engine::loading::content_loader::start_content_load;
use crate::engine::loading::progress::{LoadingOrchestrator, LoadingReady, drive_loading};
// DOM bridge
use crate::engine::dom::bridge::{DomWriteQueue, flush_dom_writes};
use crate::engine::dom::listeners::{DomSignalQueue, drain_dom_signals};
// Scroll and narrative
use crate::engine::narrative::NarrativeStatus;
use crate::engine::narrative::focus::PanelEvent;
use crate::engine::regions::tracked_region::{RemeasureRegions, TrackedRegions, measure_regions};
use crate::engine::schedule::frame_scheduler::{FrameClock, FrameScheduler, run_frame_scheduler};
use crate::engine::schedule::{FrameSet, configure_frame_sets};
use crate::engine::scroll::input::{
    PointerState, ScrollInput, ScrollSync, ScrollToRequest, apply_scroll_input,
    apply_scroll_sync, handle_scroll_requests, start_smooth_scroll, sync_scroll_limit,
    tick_smooth_scroll,
};
use crate::engine::scroll::smooth_scroll::SmoothScrollController;
// Scene
use crate::engine::scene::camera_intro::{animate_camera_intro, start_camera_intro};
use crate::engine::scene::hero_object::animate_hero;
use crate::engine::scene::params::{SceneParams, update_scene_params};
use crate::engine::scene::particles::{animate_beans, animate_sparkles};
use crate::engine::scene::spawn_scene;
// Host bridge
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::scroll::input::{collect_native_scroll_input, track_native_pointer};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{
    diagnostics_text_update_system, spawn_diagnostics_overlay,
};

#[cfg(target_arch = "wasm32")]
use crate::engine::dom::listeners::{attach_dom_listeners, detach_dom_listeners};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SiteContent as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SiteContent>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<Viewport>()
        .init_resource::<DeviceTier>()
        .init_resource::<PointerState>()
        .init_resource::<SmoothScrollController>()
        .init_resource::<TrackedRegions>()
        .init_resource::<FrameScheduler>()
        .init_resource::<FrameClock>()
        .init_resource::<DomWriteQueue>()
        .init_resource::<DomSignalQueue>()
        .init_resource::<LoadingOrchestrator>()
        .init_resource::<AssetPipelineStatus>()
        .init_resource::<TrackedAssets>()
        .init_resource::<SiteContentHandle>()
        .init_resource::<SceneParams>()
        .init_resource::<NarrativeStatus>()
        .add_event::<ScrollInput>()
        .add_event::<ScrollSync>()
        .add_event::<ScrollToRequest>()
        .add_event::<PanelEvent>()
        .add_event::<RemeasureRegions>()
        .add_event::<LoadingReady>()
        .add_event::<UnmountRequest>();

    app.add_systems(
        Startup,
        (classify_device, spawn_scene, start_content_load).chain(),
    );

    #[cfg(target_arch = "wasm32")]
    {
        app.add_systems(Startup, attach_dom_listeners)
            .add_systems(OnEnter(AppState::Unmounted), detach_dom_listeners);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_diagnostics_overlay).add_systems(
            Update,
            (collect_native_scroll_input, track_native_pointer)
                .in_set(FrameSet::Input)
                .before(drain_dom_signals),
        );
    }

    // Input phase: raw signals into events.
    app.add_systems(
        Update,
        (drain_dom_signals, handle_unmount_requests).in_set(FrameSet::Input),
    );

    add_frame_pipeline(&mut app);

    // Dispatch phase: loading gate while loading.
    app.add_systems(
        Update,
        (track_asset_pipeline, drive_loading)
            .chain()
            .in_set(FrameSet::Dispatch)
            .run_if(in_state(AppState::Loading)),
    );

    // Scene phase: the 3D scene reads nothing but SceneParams.
    app.add_systems(
        Update,
        (
            update_scene_params,
            (
                animate_hero,
                animate_beans,
                animate_sparkles,
                animate_camera_intro,
            ),
        )
            .chain()
            .in_set(FrameSet::Scene)
            .run_if(not(in_state(AppState::Unmounted))),
    );

    // Flush phase: DOM writes, then host notifications.
    app.add_systems(
        Update,
        (
            flush_dom_writes,
            fps_notification_system.run_if(not(in_state(AppState::Unmounted))),
        )
            .chain()
            .in_set(FrameSet::Flush),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            diagnostics_text_update_system.in_set(FrameSet::Flush),
        );
    }

    app.add_systems(
        OnEnter(AppState::Running),
        (
            remeasure_on_reveal,
            register_frame_consumers,
            start_camera_intro,
        ),
    )
    .add_systems(OnEnter(AppState::Unmounted), teardown_engine);

    app
}

/// Geometry tracking, the scroll tick and frame dispatch, in frame order.
fn add_frame_pipeline(app: &mut App) {
    configure_frame_sets(app);

    app.add_systems(
        Update,
        (track_viewport, measure_regions)
            .chain()
            .in_set(FrameSet::Input),
    );

    // Scroll phase: the offset is final before any consumer runs. Page
    // geometry and native positions are followed in every state so the
    // controller starts from where the page really is.
    app.add_systems(
        Update,
        (
            (sync_scroll_limit, apply_scroll_sync).chain(),
            (apply_scroll_input, handle_scroll_requests, tick_smooth_scroll)
                .chain()
                .run_if(in_state(AppState::Running)),
        )
            .chain()
            .in_set(FrameSet::ScrollTick),
    );

    app.add_systems(
        Update,
        run_frame_scheduler
            .in_set(FrameSet::Dispatch)
            .run_if(in_state(AppState::Running)),
    )
    .add_systems(OnEnter(AppState::Running), start_smooth_scroll);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use bevy::window::WindowResized;
    use constants::layout::{SECTIONS, STORY_REGION};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::engine::regions::progress;
    use crate::engine::schedule::frame_scheduler::{FrameConsumer, FrameContext, FrameOutput};
    use crate::engine::scroll::smooth_scroll::InputSource;
    use crate::rpc::web_rpc::WebRpcInterface;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Seen {
        smoothed_offset: f32,
        story_height: f32,
        story_progress: f32,
    }

    struct Recorder(Arc<Mutex<Vec<Seen>>>);

    impl FrameConsumer for Recorder {
        fn label(&self) -> &'static str {
            "recorder"
        }

        fn on_frame(&mut self, frame: &FrameContext, _output: &mut FrameOutput) {
            let story = frame.regions.get(STORY_REGION);
            let seen = Seen {
                smoothed_offset: frame.scroll.smoothed_offset,
                story_height: story.map_or(0.0, |region| region.height),
                story_progress: story.map_or(0.0, |region| {
                    progress::compute(region, frame.scroll.smoothed_offset, frame.viewport.height)
                }),
            };
            if let Ok(mut log) = self.0.lock() {
                log.push(seen);
            }
        }
    }

    fn pipeline_app() -> (App, Arc<Mutex<Vec<Seen>>>) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
                1.0 / 60.0,
            )))
            .init_state::<AppState>()
            .add_event::<WindowResized>()
            .add_event::<RemeasureRegions>()
            .add_event::<ScrollInput>()
            .add_event::<ScrollSync>()
            .add_event::<ScrollToRequest>()
            .add_event::<PanelEvent>()
            .init_resource::<Viewport>()
            .init_resource::<DeviceTier>()
            .init_resource::<PointerState>()
            .init_resource::<SmoothScrollController>()
            .init_resource::<TrackedRegions>()
            .init_resource::<FrameScheduler>()
            .init_resource::<FrameClock>()
            .init_resource::<DomWriteQueue>()
            .init_resource::<WebRpcInterface>()
            .init_resource::<NarrativeStatus>();
        add_frame_pipeline(&mut app);

        let log = Arc::new(Mutex::new(Vec::new()));
        app.world_mut()
            .resource_mut::<FrameScheduler>()
            .register(Recorder(log.clone()));
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Running);
        app.update();
        (app, log)
    }

    fn last_seen(log: &Arc<Mutex<Vec<Seen>>>) -> Seen {
        *log.lock().unwrap().last().unwrap()
    }

    fn screens() -> f32 {
        SECTIONS.iter().map(|(_, screens)| screens).sum()
    }

    #[test]
    fn consumers_see_this_frames_scroll_tick() {
        let (mut app, log) = pipeline_app();
        for _ in 0..3 {
            app.update();
        }
        let before = last_seen(&log).smoothed_offset;

        app.world_mut().send_event(ScrollInput {
            delta: 400.0,
            source: InputSource::Wheel,
        });
        app.update();

        let ticked = app.world().resource::<SmoothScrollController>().state();
        let seen = last_seen(&log);
        assert!(ticked.smoothed_offset > before);
        assert_eq!(seen.smoothed_offset, ticked.smoothed_offset);
    }

    #[test]
    fn resize_remeasures_regions_limit_and_progress() {
        let (mut app, log) = pipeline_app();
        app.world_mut()
            .resource_mut::<SmoothScrollController>()
            .scroll_to(3000.0, true);
        app.update();

        let viewport = *app.world().resource::<Viewport>();
        let limit = app.world().resource::<SmoothScrollController>().limit();
        assert!((limit - (screens() * viewport.height - viewport.height)).abs() < 0.01);
        let before = last_seen(&log);
        assert_eq!(before.story_height, 3.0 * viewport.height);

        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width: viewport.width,
            height: 900.0,
        });
        app.update();

        let regions = app.world().resource::<TrackedRegions>();
        assert_eq!(regions.get(STORY_REGION).map(|region| region.height), Some(2700.0));
        let resized_limit = app.world().resource::<SmoothScrollController>().limit();
        assert!((resized_limit - (screens() * 900.0 - 900.0)).abs() < 0.01);

        // The same frame's consumers already work against the new geometry.
        let after = last_seen(&log);
        assert_eq!(after.story_height, 2700.0);
        assert_ne!(after.story_progress, before.story_progress);
    }
}
