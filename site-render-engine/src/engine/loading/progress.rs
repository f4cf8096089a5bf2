use bevy::prelude::*;
use constants::layout::elements;
use constants::loading as tuning;
use constants::rpc::notifications::{LOADING_PROGRESS, LOADING_READY};
use serde::Serialize;
use serde_json::json;

use crate::engine::core::app_state::AppState;
use crate::engine::dom::bridge::{DomWrite, DomWriteQueue};
use crate::engine::loading::asset_tracker::AssetPipelineStatus;
use crate::rpc::web_rpc::WebRpcInterface;

/// Real and displayed loading percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadProgress {
    pub actual: f32,
    pub displayed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingConfig {
    pub tick_interval: f32,
    pub catch_up_step: f32,
    pub catch_up_ratio: f32,
    pub min_increment: f32,
    pub hold_ceiling: f32,
    pub settle_delay: f32,
    pub max_wait: f32,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            tick_interval: tuning::TICK_INTERVAL,
            catch_up_step: tuning::CATCH_UP_STEP,
            catch_up_ratio: tuning::CATCH_UP_RATIO,
            min_increment: tuning::MIN_INCREMENT,
            hold_ceiling: tuning::HOLD_CEILING,
            settle_delay: tuning::SETTLE_DELAY,
            max_wait: tuning::MAX_WAIT,
        }
    }
}

/// Emitted once per mount when the loading gate opens.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingReady {
    /// The max-wait fallback opened the gate before assets finished.
    pub forced: bool,
}

/// Turns observed asset progress into a smooth displayed percentage and a
/// single ready edge.
///
/// Displayed progress moves on a fixed tick. It chases `actual` when behind,
/// otherwise creeps by a small floor so the bar never looks stalled, but it
/// holds below 100 until `actual` has really completed.
#[derive(Resource, Debug, Default)]
pub struct LoadingOrchestrator {
    config: LoadingConfig,
    progress: LoadProgress,
    complete: bool,
    forced: bool,
    accumulator: f32,
    elapsed: f32,
    settle_elapsed: Option<f32>,
    fired: bool,
}

impl LoadingOrchestrator {
    pub fn new(config: LoadingConfig) -> Self {
        Self {
            config,
            ..default()
        }
    }

    pub fn progress(&self) -> LoadProgress {
        self.progress
    }

    pub fn is_ready(&self) -> bool {
        self.fired
    }

    /// Record the asset pipeline's progress. Both values only move forward.
    pub fn observe(&mut self, actual: f32, complete: bool) {
        let actual = if actual.is_nan() {
            0.0
        } else {
            actual.clamp(0.0, 100.0)
        };
        self.progress.actual = self.progress.actual.max(actual);
        if complete && !self.complete {
            self.complete = true;
            self.progress.actual = 100.0;
        }
    }

    /// Advance by `dt` seconds. Returns the ready signal on the single frame
    /// the gate opens.
    pub fn advance(&mut self, dt: f32) -> Option<LoadingReady> {
        if self.fired {
            return None;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;

        if !self.complete && self.elapsed >= self.config.max_wait {
            warn!(
                "Assets still loading after {:.1}s, forcing ready at {:.0}%",
                self.config.max_wait, self.progress.actual
            );
            self.forced = true;
            self.observe(100.0, true);
        }

        self.accumulator += dt;
        let interval = self.config.tick_interval.max(f32::EPSILON);
        while self.accumulator >= interval {
            self.accumulator -= interval;
            self.tick();
        }

        if !self.complete || self.progress.displayed < 100.0 {
            return None;
        }
        let settled = match self.settle_elapsed {
            None => 0.0,
            Some(elapsed) => elapsed + dt,
        };
        self.settle_elapsed = Some(settled);
        if settled < self.config.settle_delay {
            return None;
        }

        self.fired = true;
        Some(LoadingReady {
            forced: self.forced,
        })
    }

    fn tick(&mut self) {
        let LoadProgress { actual, displayed } = self.progress;
        let ceiling = if self.complete {
            100.0
        } else {
            self.config.hold_ceiling.min(100.0)
        };

        let next = if actual > displayed {
            let gap = actual - displayed;
            displayed + (self.config.catch_up_step.max(gap * self.config.catch_up_ratio)).min(gap)
        } else {
            displayed + self.config.min_increment
        };
        self.progress.displayed = next.min(ceiling).max(displayed);
    }
}

/// Feed the orchestrator, mirror it onto the loading screen and leave the
/// loading state once it signals ready.
pub fn drive_loading(
    time: Res<Time>,
    status: Res<AssetPipelineStatus>,
    mut orchestrator: ResMut<LoadingOrchestrator>,
    mut dom_writes: ResMut<DomWriteQueue>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last_notify: Local<Option<f32>>,
    mut ready_events: EventWriter<LoadingReady>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let before = orchestrator.progress().displayed;
    orchestrator.observe(status.progress, status.complete);
    let ready = orchestrator.advance(time.delta_secs());
    let progress = orchestrator.progress();

    if progress.displayed != before || last_notify.is_none() {
        dom_writes.push(DomWrite::Style {
            target: elements::LOADING_BAR.to_string(),
            property: "width",
            value: format!("{:.2}%", progress.displayed),
        });
        dom_writes.push(DomWrite::Text {
            target: elements::LOADING_LABEL.to_string(),
            text: format!("{:.0}%", progress.displayed.floor()),
        });
    }

    let now = time.elapsed_secs();
    if last_notify.is_none_or(|last| now - last >= tuning::NOTIFY_INTERVAL) {
        rpc_interface.send_notification(LOADING_PROGRESS, json!(progress));
        *last_notify = Some(now);
    }

    let Some(ready) = ready else {
        return;
    };
    dom_writes.push(DomWrite::Style {
        target: elements::LOADING_SCREEN.to_string(),
        property: "transform",
        value: "translateY(-100%)".to_string(),
    });
    dom_writes.push(DomWrite::Style {
        target: elements::PAGE_ROOT.to_string(),
        property: "opacity",
        value: "1".to_string(),
    });
    rpc_interface.send_notification(LOADING_READY, json!({ "forced": ready.forced }));
    ready_events.write(ready);

    println!("→ Loading complete, transitioning to Running state");
    next_state.set(AppState::Running);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn displayed_never_decreases_or_exceeds_100() {
        let mut orchestrator = LoadingOrchestrator::default();
        let mut last = 0.0;
        let actuals = [0.0, 10.0, 5.0, 40.0, 40.0, 40.0, 90.0, 100.0];
        for (step, actual) in actuals.iter().cycle().take(600).enumerate() {
            orchestrator.observe(*actual, step > 500);
            orchestrator.advance(FRAME);
            let displayed = orchestrator.progress().displayed;
            assert!(displayed >= last);
            assert!(displayed <= 100.0);
            last = displayed;
        }
    }

    #[test]
    fn creeps_while_actual_stalls_but_holds_below_100() {
        let mut orchestrator = LoadingOrchestrator::default();
        orchestrator.observe(20.0, false);
        for _ in 0..60 {
            orchestrator.advance(FRAME);
        }
        let caught_up = orchestrator.progress().displayed;
        assert!(caught_up > 20.0);

        // Ten more seconds of stalled assets, still short of the max wait.
        for _ in 0..(60 * 10) {
            assert_eq!(orchestrator.advance(FRAME), None);
        }
        assert!(orchestrator.progress().displayed > caught_up);
        assert!(orchestrator.progress().displayed <= tuning::HOLD_CEILING);
        assert!(!orchestrator.is_ready());
    }

    #[test]
    fn ready_fires_once_after_completion_and_settle_delay() {
        let mut orchestrator = LoadingOrchestrator::default();
        orchestrator.observe(100.0, false);
        for _ in 0..120 {
            assert_eq!(orchestrator.advance(FRAME), None);
        }
        assert!(orchestrator.progress().displayed < 100.0);

        orchestrator.observe(100.0, true);
        let mut fired = Vec::new();
        let mut reached_full_at = None;
        for frame in 0..240 {
            if let Some(ready) = orchestrator.advance(FRAME) {
                fired.push((frame, ready));
            }
            if reached_full_at.is_none() && orchestrator.progress().displayed >= 100.0 {
                reached_full_at = Some(frame);
            }
        }

        assert_eq!(fired.len(), 1);
        let (ready_frame, ready) = fired[0];
        assert!(!ready.forced);
        let waited = (ready_frame - reached_full_at.unwrap()) as f32 * FRAME;
        assert!(waited >= tuning::SETTLE_DELAY - 1e-3);
    }

    #[test]
    fn max_wait_forces_ready() {
        let mut orchestrator = LoadingOrchestrator::default();
        orchestrator.observe(30.0, false);
        let mut ready = None;
        for _ in 0..(60 * 15) {
            if let Some(signal) = orchestrator.advance(FRAME) {
                ready = Some(signal);
            }
        }
        assert_eq!(ready, Some(LoadingReady { forced: true }));
    }

    #[test]
    fn gate_moves_app_to_running() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
                FRAME,
            )))
            .init_state::<AppState>()
            .insert_resource(AssetPipelineStatus {
                progress: 100.0,
                complete: true,
                scene_ready: true,
            })
            .init_resource::<LoadingOrchestrator>()
            .init_resource::<DomWriteQueue>()
            .init_resource::<WebRpcInterface>()
            .add_event::<LoadingReady>()
            .add_systems(Update, drive_loading.run_if(in_state(AppState::Loading)));

        for _ in 0..180 {
            app.update();
        }

        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Running
        );
        assert!(app.world().resource::<LoadingOrchestrator>().is_ready());
        let sent = app.world().resource::<WebRpcInterface>().pending_methods();
        assert_eq!(sent.iter().filter(|method| **method == LOADING_READY).count(), 1);
    }
}
