use std::sync::atomic::{AtomicU64, Ordering};

use bevy::prelude::*;
use serde_json::Value;

use crate::engine::core::viewport::{DeviceTier, Viewport};
use crate::engine::dom::bridge::{DomWrite, DomWriteQueue};
use crate::engine::narrative::NarrativeStatus;
use crate::engine::narrative::focus::PanelEvent;
use crate::engine::regions::tracked_region::TrackedRegions;
use crate::engine::scroll::input::PointerState;
use crate::engine::scroll::smooth_scroll::{ScrollState, SmoothScrollController};
use crate::rpc::web_rpc::WebRpcInterface;

static NEXT_CONSUMER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a registered consumer for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsumerHandle(u64);

impl ConsumerHandle {
    fn next() -> Self {
        Self(NEXT_CONSUMER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Everything a consumer may read during one frame.
pub struct FrameContext<'a> {
    /// Monotonic frame counter.
    pub frame: u64,
    /// Seconds since the scheduler started dispatching.
    pub elapsed: f32,
    pub delta: f32,
    pub scroll: ScrollState,
    pub pointer: PointerState,
    pub viewport: Viewport,
    pub tier: DeviceTier,
    pub regions: &'a TrackedRegions,
    /// Panel hover/tap events received since the previous frame.
    pub panel_events: &'a [PanelEvent],
}

/// Per-frame subscriber. Consumers only compute; visual changes leave
/// through [`FrameOutput`].
pub trait FrameConsumer: Send + Sync + 'static {
    fn label(&self) -> &'static str;

    fn on_frame(&mut self, frame: &FrameContext, output: &mut FrameOutput);
}

enum SchedulerCommand {
    Register(ConsumerHandle, Box<dyn FrameConsumer>),
    Unregister(ConsumerHandle),
}

/// Collected side effects of one frame's dispatch.
#[derive(Default)]
pub struct FrameOutput {
    pub writes: Vec<DomWrite>,
    pub notifications: Vec<(&'static str, Value)>,
    deferred: Vec<SchedulerCommand>,
}

impl FrameOutput {
    pub fn style(&mut self, target: impl Into<String>, property: &'static str, value: String) {
        self.writes.push(DomWrite::Style {
            target: target.into(),
            property,
            value,
        });
    }

    pub fn text(&mut self, target: impl Into<String>, text: String) {
        self.writes.push(DomWrite::Text {
            target: target.into(),
            text,
        });
    }

    pub fn notify(&mut self, method: &'static str, params: Value) {
        self.notifications.push((method, params));
    }

    /// Register a consumer from inside a frame. It joins from the next frame.
    pub fn defer_register(&mut self, consumer: impl FrameConsumer) -> ConsumerHandle {
        let handle = ConsumerHandle::next();
        self.deferred
            .push(SchedulerCommand::Register(handle, Box::new(consumer)));
        handle
    }

    /// Unregister a consumer from inside a frame. It still finishes this frame.
    pub fn defer_unregister(&mut self, handle: ConsumerHandle) {
        self.deferred.push(SchedulerCommand::Unregister(handle));
    }
}

/// Ordered list of frame consumers, constructed once per page session and
/// passed to whoever needs to subscribe.
#[derive(Resource, Default)]
pub struct FrameScheduler {
    consumers: Vec<(ConsumerHandle, Box<dyn FrameConsumer>)>,
    pending: Vec<SchedulerCommand>,
    last_frame: Option<u64>,
    shut_down: bool,
}

impl FrameScheduler {
    pub fn register(&mut self, consumer: impl FrameConsumer) -> ConsumerHandle {
        let handle = ConsumerHandle::next();
        self.register_boxed(handle, Box::new(consumer));
        handle
    }

    pub fn unregister(&mut self, handle: ConsumerHandle) -> bool {
        let before = self.consumers.len();
        self.consumers.retain(|(existing, _)| *existing != handle);
        let removed = self.consumers.len() != before;
        if removed {
            debug!("Frame consumer {:?} unregistered", handle);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Drop every consumer and refuse further dispatch. Visual state already
    /// applied is left as it is.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        let count = self.consumers.len();
        self.consumers.clear();
        self.pending.clear();
        self.shut_down = true;
        info!("Frame scheduler shut down, {} consumers released", count);
    }

    /// Invoke every consumer once, in registration order. A second call for
    /// the same frame number is ignored. Returns the number of consumers run.
    pub fn run_frame(&mut self, frame: &FrameContext, output: &mut FrameOutput) -> usize {
        if self.shut_down || self.last_frame == Some(frame.frame) {
            return 0;
        }
        self.last_frame = Some(frame.frame);

        for command in std::mem::take(&mut self.pending) {
            self.apply(command);
        }

        for (_, consumer) in self.consumers.iter_mut() {
            consumer.on_frame(frame, output);
        }

        // Registration changes requested mid-frame wait for the next frame.
        self.pending.append(&mut output.deferred);
        self.consumers.len()
    }

    fn apply(&mut self, command: SchedulerCommand) {
        match command {
            SchedulerCommand::Register(handle, consumer) => self.register_boxed(handle, consumer),
            SchedulerCommand::Unregister(handle) => {
                self.unregister(handle);
            }
        }
    }

    fn register_boxed(&mut self, handle: ConsumerHandle, consumer: Box<dyn FrameConsumer>) {
        if self.shut_down {
            warn!(
                "Frame consumer '{}' registered after shutdown, ignoring",
                consumer.label()
            );
            return;
        }
        debug!("Frame consumer '{}' registered as {:?}", consumer.label(), handle);
        self.consumers.push((handle, consumer));
    }
}

/// Frame counter and dispatch clock, separate from app time so the elapsed
/// value consumers see starts at zero when dispatch begins.
#[derive(Resource, Debug, Default)]
pub struct FrameClock {
    pub frame: u64,
    pub elapsed: f32,
}

/// Dispatch this frame to every registered consumer.
pub fn run_frame_scheduler(
    time: Res<Time>,
    mut clock: ResMut<FrameClock>,
    mut scheduler: ResMut<FrameScheduler>,
    controller: Res<SmoothScrollController>,
    pointer: Res<PointerState>,
    viewport: Res<Viewport>,
    tier: Res<DeviceTier>,
    regions: Res<TrackedRegions>,
    mut panel_events: EventReader<PanelEvent>,
    mut dom_writes: ResMut<DomWriteQueue>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut status: ResMut<NarrativeStatus>,
) {
    clock.frame += 1;
    clock.elapsed += time.delta_secs();

    let panel_events: Vec<PanelEvent> = panel_events.read().copied().collect();
    let frame = FrameContext {
        frame: clock.frame,
        elapsed: clock.elapsed,
        delta: time.delta_secs(),
        scroll: controller.state(),
        pointer: *pointer,
        viewport: *viewport,
        tier: *tier,
        regions: &regions,
        panel_events: &panel_events,
    };

    let mut output = FrameOutput::default();
    scheduler.run_frame(&frame, &mut output);

    dom_writes.extend(output.writes);
    for (method, params) in output.notifications {
        status.record(method, &params);
        rpc_interface.send_notification(method, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    struct Counter {
        label: &'static str,
        calls: Arc<AtomicUsize>,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl FrameConsumer for Counter {
        fn label(&self) -> &'static str {
            self.label
        }

        fn on_frame(&mut self, _frame: &FrameContext, _output: &mut FrameOutput) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut log) = self.log.lock() {
                log.push(self.label);
            }
        }
    }

    /// Registers a second consumer from inside its first frame.
    struct Spawner {
        spawned: bool,
        child_calls: Arc<AtomicUsize>,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl FrameConsumer for Spawner {
        fn label(&self) -> &'static str {
            "spawner"
        }

        fn on_frame(&mut self, _frame: &FrameContext, output: &mut FrameOutput) {
            if !self.spawned {
                self.spawned = true;
                output.defer_register(Counter {
                    label: "child",
                    calls: self.child_calls.clone(),
                    log: self.log.clone(),
                });
            }
        }
    }

    /// Unregisters `target` from inside its first frame.
    struct Remover {
        target: Option<ConsumerHandle>,
    }

    impl FrameConsumer for Remover {
        fn label(&self) -> &'static str {
            "remover"
        }

        fn on_frame(&mut self, _frame: &FrameContext, output: &mut FrameOutput) {
            if let Some(target) = self.target.take() {
                output.defer_unregister(target);
            }
        }
    }

    fn context(frame: u64, regions: &TrackedRegions) -> FrameContext<'_> {
        FrameContext {
            frame,
            elapsed: frame as f32 / 60.0,
            delta: 1.0 / 60.0,
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
            viewport: Viewport::default(),
            tier: DeviceTier::default(),
            regions,
            panel_events: &[],
        }
    }

    fn counter(label: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> (Counter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Counter {
                label,
                calls: calls.clone(),
                log: log.clone(),
            },
            calls,
        )
    }

    #[test]
    fn consumers_run_in_registration_order_once_per_frame() {
        let regions = TrackedRegions::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = FrameScheduler::default();
        let (first, first_calls) = counter("first", &log);
        let (second, _) = counter("second", &log);
        scheduler.register(first);
        scheduler.register(second);

        let mut output = FrameOutput::default();
        assert_eq!(scheduler.run_frame(&context(1, &regions), &mut output), 2);
        assert_eq!(scheduler.run_frame(&context(1, &regions), &mut output), 0);
        scheduler.run_frame(&context(2, &regions), &mut output);

        assert_eq!(first_calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "first", "second"]
        );
    }

    #[test]
    fn unregister_removes_only_that_consumer() {
        let regions = TrackedRegions::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = FrameScheduler::default();
        let (first, first_calls) = counter("first", &log);
        let (second, second_calls) = counter("second", &log);
        let first_handle = scheduler.register(first);
        scheduler.register(second);

        assert!(scheduler.unregister(first_handle));
        assert!(!scheduler.unregister(first_handle));
        scheduler.run_frame(&context(1, &regions), &mut FrameOutput::default());

        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registration_inside_a_frame_is_deferred() {
        let regions = TrackedRegions::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let child_calls = Arc::new(AtomicUsize::new(0));
        let mut scheduler = FrameScheduler::default();
        scheduler.register(Spawner {
            spawned: false,
            child_calls: child_calls.clone(),
            log: log.clone(),
        });

        assert_eq!(scheduler.run_frame(&context(1, &regions), &mut FrameOutput::default()), 1);
        assert_eq!(child_calls.load(Ordering::SeqCst), 0);

        assert_eq!(scheduler.run_frame(&context(2, &regions), &mut FrameOutput::default()), 2);
        assert_eq!(child_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregistration_inside_a_frame_lets_the_target_finish() {
        let regions = TrackedRegions::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = FrameScheduler::default();
        let (target, target_calls) = counter("target", &log);
        let handle = scheduler.register(target);
        scheduler.register(Remover {
            target: Some(handle),
        });

        scheduler.run_frame(&context(1, &regions), &mut FrameOutput::default());
        assert_eq!(target_calls.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.len(), 2);

        scheduler.run_frame(&context(2, &regions), &mut FrameOutput::default());
        assert_eq!(target_calls.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn no_callbacks_after_shutdown() {
        let regions = TrackedRegions::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = FrameScheduler::default();
        let (consumer, calls) = counter("consumer", &log);
        scheduler.register(consumer);

        scheduler.run_frame(&context(1, &regions), &mut FrameOutput::default());
        scheduler.shutdown();
        scheduler.shutdown();
        for frame in 2..20 {
            scheduler.run_frame(&context(frame, &regions), &mut FrameOutput::default());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(scheduler.is_empty());

        let (late, late_calls) = counter("late", &log);
        scheduler.register(late);
        scheduler.run_frame(&context(30, &regions), &mut FrameOutput::default());
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
    }
}
