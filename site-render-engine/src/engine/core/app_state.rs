use bevy::prelude::*;

use crate::engine::assets::site_content::{SiteContent, SiteContentHandle};
use crate::engine::dom::cursor::CursorConsumer;
use crate::engine::narrative::chapters::{ChapterTimings, StoryChapterConsumer};
use crate::engine::narrative::focus::{FocusPanelsConsumer, FocusStyle};
use crate::engine::narrative::hero_parallax::HeroParallaxConsumer;
use crate::engine::narrative::progress_bar::ScrollProgressConsumer;
use crate::engine::regions::tracked_region::RemeasureRegions;
use crate::engine::schedule::frame_scheduler::FrameScheduler;
use crate::engine::scroll::smooth_scroll::SmoothScrollController;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    /// Terminal. Every per-frame callback and listener has been released.
    Unmounted,
}

/// Host or page asked the engine to shut down.
#[derive(Event, Debug, Default)]
pub struct UnmountRequest;

pub fn handle_unmount_requests(
    mut requests: EventReader<UnmountRequest>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if requests.read().count() == 0 || *state.get() == AppState::Unmounted {
        return;
    }
    println!("→ Unmount requested, transitioning to Unmounted state");
    next_state.set(AppState::Unmounted);
}

/// Subscribe every narrative consumer, sized from the loaded content.
pub fn register_frame_consumers(
    mut scheduler: ResMut<FrameScheduler>,
    content_handle: Res<SiteContentHandle>,
    contents: Res<Assets<SiteContent>>,
) {
    let content = content_handle.get(&contents).cloned().unwrap_or_else(|| {
        warn!("Site content unavailable, using default item counts");
        SiteContent::default()
    });
    let counts = content.counts();

    scheduler.register(ScrollProgressConsumer::default());
    scheduler.register(HeroParallaxConsumer::default());
    scheduler.register(FocusPanelsConsumer::new(counts.showcase, FocusStyle::showcase()));
    scheduler.register(StoryChapterConsumer::new(
        content.chapters,
        counts.chapters,
        ChapterTimings::default(),
    ));
    scheduler.register(FocusPanelsConsumer::new(counts.locations, FocusStyle::locations()));
    scheduler.register(CursorConsumer::default());

    println!(
        "→ Running with {} frame consumers ({} chapters, {} products, {} locations)",
        scheduler.len(),
        counts.chapters,
        counts.showcase,
        counts.locations
    );
}

/// The revealed page may lay out differently from the loading screen.
pub fn remeasure_on_reveal(mut requests: EventWriter<RemeasureRegions>) {
    requests.write(RemeasureRegions);
}

/// Stop the scroll tick and release every frame consumer. Visual state
/// already applied stays as it is.
pub fn teardown_engine(
    mut controller: ResMut<SmoothScrollController>,
    mut scheduler: ResMut<FrameScheduler>,
) {
    let scroll_stopped = controller.stop();
    scheduler.shutdown();
    println!(
        "✓ Engine torn down (scroll {}, scheduler released)",
        if scroll_stopped { "stopped" } else { "already stopped" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::viewport::{DeviceTier, Viewport};
    use crate::engine::dom::bridge::DomWriteQueue;
    use crate::engine::narrative::NarrativeStatus;
    use crate::engine::narrative::focus::PanelEvent;
    use crate::engine::regions::tracked_region::TrackedRegions;
    use crate::engine::schedule::frame_scheduler::{
        FrameClock, FrameConsumer, FrameContext, FrameOutput, run_frame_scheduler,
    };
    use crate::engine::scroll::input::{PointerState, start_smooth_scroll};
    use crate::rpc::web_rpc::WebRpcInterface;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingConsumer(Arc<AtomicUsize>);

    impl FrameConsumer for CountingConsumer {
        fn label(&self) -> &'static str {
            "counting"
        }

        fn on_frame(&mut self, _frame: &FrameContext, _output: &mut FrameOutput) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn lifecycle_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
                1.0 / 60.0,
            )))
            .init_state::<AppState>()
            .add_event::<UnmountRequest>()
            .add_event::<PanelEvent>()
            .init_resource::<FrameScheduler>()
            .init_resource::<FrameClock>()
            .init_resource::<SmoothScrollController>()
            .init_resource::<PointerState>()
            .init_resource::<Viewport>()
            .init_resource::<DeviceTier>()
            .init_resource::<TrackedRegions>()
            .init_resource::<DomWriteQueue>()
            .init_resource::<WebRpcInterface>()
            .init_resource::<NarrativeStatus>()
            .add_systems(OnEnter(AppState::Running), start_smooth_scroll)
            .add_systems(OnEnter(AppState::Unmounted), teardown_engine)
            .add_systems(
                Update,
                (
                    handle_unmount_requests,
                    run_frame_scheduler.run_if(in_state(AppState::Running)),
                ),
            );
        app
    }

    #[test]
    fn no_frame_callbacks_after_unmount() {
        let mut app = lifecycle_app();
        let calls = Arc::new(AtomicUsize::new(0));
        app.world_mut()
            .resource_mut::<FrameScheduler>()
            .register(CountingConsumer(calls.clone()));

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Running);
        for _ in 0..5 {
            app.update();
        }
        let before = calls.load(Ordering::SeqCst);
        assert!(before > 0);
        assert!(app.world().resource::<SmoothScrollController>().is_running());

        app.world_mut().send_event(UnmountRequest);
        for _ in 0..30 {
            app.update();
        }

        let after_unmount = calls.load(Ordering::SeqCst);
        // The frame that handled the request may still have dispatched.
        assert!(after_unmount <= before + 1);
        for _ in 0..30 {
            app.update();
        }
        assert_eq!(calls.load(Ordering::SeqCst), after_unmount);
        assert!(app.world().resource::<FrameScheduler>().is_shut_down());
        assert!(!app.world().resource::<SmoothScrollController>().is_running());
    }

    #[test]
    fn unmount_twice_is_harmless() {
        let mut app = lifecycle_app();
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Running);
        app.update();
        app.world_mut().send_event(UnmountRequest);
        app.update();
        app.update();
        app.world_mut().send_event(UnmountRequest);
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Unmounted
        );
    }
}
