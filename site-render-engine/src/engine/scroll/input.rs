use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use constants::scroll::PIXELS_PER_LINE;

use crate::engine::core::viewport::{DeviceTier, Viewport};
use crate::engine::regions::tracked_region::TrackedRegions;
use crate::engine::scroll::smooth_scroll::{
    InputSource, SmoothScrollConfig, SmoothScrollController,
};

/// Raw scroll delta in pixels, positive towards the bottom of the page.
#[derive(Event, Debug, Clone, Copy)]
pub struct ScrollInput {
    pub delta: f32,
    pub source: InputSource,
}

/// Scroll position the page reached by itself: keyboard, scrollbar drag or
/// the browser restoring a previous position.
#[derive(Event, Debug, Clone, Copy)]
pub struct ScrollSync {
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    Offset(f32),
    /// Top edge of a tracked region.
    Region(String),
}

/// Request to move the page, e.g. from a navigation button.
#[derive(Event, Debug, Clone)]
pub struct ScrollToRequest {
    pub target: ScrollTarget,
    pub immediate: bool,
}

/// Latest pointer position. Pointer-reactive consumers read this instead of
/// tracking input themselves.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Client position in pixels.
    pub position: Vec2,
    /// Position mapped to [-1, 1] with +y up.
    pub normalized: Vec2,
    /// Whether a pointer has been seen inside the viewport.
    pub present: bool,
    /// Whether the pointer is over an interactive element.
    pub hovering_interactive: bool,
}

impl PointerState {
    pub fn update_position(&mut self, position: Vec2, viewport: &Viewport) {
        self.position = position;
        self.normalized = viewport.normalize(position);
        self.present = true;
    }
}

/// Translate winit wheel and touch events into [`ScrollInput`].
pub fn collect_native_scroll_input(
    mut wheel_events: EventReader<MouseWheel>,
    mut touch_events: EventReader<TouchInput>,
    mut last_touch_y: Local<Option<f32>>,
    mut scroll_input: EventWriter<ScrollInput>,
) {
    for wheel in wheel_events.read() {
        let pixels = match wheel.unit {
            MouseScrollUnit::Line => wheel.y * PIXELS_PER_LINE,
            MouseScrollUnit::Pixel => wheel.y,
        };
        if pixels != 0.0 {
            scroll_input.write(ScrollInput {
                delta: -pixels,
                source: InputSource::Wheel,
            });
        }
    }

    for touch in touch_events.read() {
        match touch.phase {
            TouchPhase::Started => *last_touch_y = Some(touch.position.y),
            TouchPhase::Moved => {
                if let Some(last) = last_touch_y.replace(touch.position.y) {
                    scroll_input.write(ScrollInput {
                        delta: last - touch.position.y,
                        source: InputSource::Touch,
                    });
                }
            }
            TouchPhase::Ended | TouchPhase::Canceled => *last_touch_y = None,
        }
    }
}

pub fn track_native_pointer(
    mut cursor_moved: EventReader<CursorMoved>,
    viewport: Res<Viewport>,
    tier: Res<DeviceTier>,
    mut pointer: ResMut<PointerState>,
) {
    if tier.coarse_pointer {
        cursor_moved.clear();
        return;
    }
    if let Some(cursor) = cursor_moved.read().last() {
        pointer.update_position(cursor.position, &viewport);
    }
}

/// Adopt the latest native scroll position. Runs in every state so the
/// controller already knows where the page is when it starts.
pub fn apply_scroll_sync(
    mut syncs: EventReader<ScrollSync>,
    mut controller: ResMut<SmoothScrollController>,
) {
    let Some(sync) = syncs.read().last() else {
        return;
    };
    if controller.sync_to(sync.offset) {
        debug!("Scroll synced to native position {:.1}px", sync.offset);
    }
}

pub fn apply_scroll_input(
    mut scroll_input: EventReader<ScrollInput>,
    mut controller: ResMut<SmoothScrollController>,
) {
    for input in scroll_input.read() {
        controller.push_delta(input.delta, input.source);
    }
}

pub fn handle_scroll_requests(
    mut requests: EventReader<ScrollToRequest>,
    regions: Res<TrackedRegions>,
    mut controller: ResMut<SmoothScrollController>,
) {
    for request in requests.read() {
        let offset = match &request.target {
            ScrollTarget::Offset(offset) => *offset,
            ScrollTarget::Region(id) => match regions.get(id) {
                Some(region) => region.top_offset,
                None => {
                    warn!("Scroll request for unknown region '{}'", id);
                    continue;
                }
            },
        };
        if !controller.scroll_to(offset, request.immediate) {
            debug!("Scroll request ignored while the controller is stopped");
        }
    }
}

/// Per-frame smooth scroll tick. Runs before any frame consumer so they all
/// see this frame's offset.
pub fn tick_smooth_scroll(time: Res<Time>, mut controller: ResMut<SmoothScrollController>) {
    controller.tick(time.delta_secs());
}

/// Keep the scrollable range in step with the measured page.
pub fn sync_scroll_limit(
    regions: Res<TrackedRegions>,
    viewport: Res<Viewport>,
    mut controller: ResMut<SmoothScrollController>,
) {
    if !regions.is_changed() && !viewport.is_changed() {
        return;
    }
    let limit = (regions.document_height() - viewport.height).max(0.0);
    controller.set_limit(limit);
    debug!("Scroll limit set to {:.1}px", limit);
}

/// Start smoothing from wherever the page currently is, so a restored
/// mid-page position is kept.
pub fn start_smooth_scroll(mut controller: ResMut<SmoothScrollController>) {
    if let Ok(offset) = crate::engine::dom::bridge::current_scroll_offset() {
        controller.sync_to(offset);
    }
    controller.start(SmoothScrollConfig::default());
}
