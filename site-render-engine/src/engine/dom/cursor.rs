use bevy::prelude::*;
use constants::layout::elements;
use constants::transitions::cursor;

use crate::engine::motion::damping::damp;
use crate::engine::motion::easing::Easing;
use crate::engine::motion::tween::Tween;
use crate::engine::schedule::frame_scheduler::{FrameConsumer, FrameContext, FrameOutput};

/// Mirrors the pointer onto the custom cursor dot and trailing ring.
///
/// The dot sits exactly on the pointer, the ring follows with exponential
/// damping, and both grow while an interactive element is hovered. On
/// coarse-pointer devices the cursor is hidden once and never updated.
pub struct CursorConsumer {
    /// `None` until the first pointer position has been seen.
    ring: Option<Vec2>,
    dot_scale: Tween,
    ring_scale: Tween,
    hovering: bool,
    hidden: bool,
}

impl Default for CursorConsumer {
    fn default() -> Self {
        Self {
            ring: None,
            dot_scale: Tween::settled(1.0),
            ring_scale: Tween::settled(1.0),
            hovering: false,
            hidden: false,
        }
    }
}

fn transform(position: Vec2, radius: f32, scale: f32) -> String {
    format!(
        "translate3d({:.1}px, {:.1}px, 0) scale({scale:.3})",
        position.x - radius,
        position.y - radius
    )
}

impl FrameConsumer for CursorConsumer {
    fn label(&self) -> &'static str {
        "cursor"
    }

    fn on_frame(&mut self, frame: &FrameContext, output: &mut FrameOutput) {
        if !frame.tier.pointer_reactive() {
            if !self.hidden {
                self.hidden = true;
                output.style(elements::CURSOR_DOT, "display", "none".to_string());
                output.style(elements::CURSOR_RING, "display", "none".to_string());
            }
            return;
        }
        if !frame.pointer.present {
            return;
        }

        if frame.pointer.hovering_interactive != self.hovering {
            self.hovering = frame.pointer.hovering_interactive;
            let (dot, ring) = if self.hovering {
                (cursor::DOT_HOVER_SCALE, cursor::RING_HOVER_SCALE)
            } else {
                (1.0, 1.0)
            };
            self.dot_scale
                .retarget(dot, cursor::SCALE_DURATION, 0.0, Easing::EaseOut);
            self.ring_scale
                .retarget(ring, cursor::SCALE_DURATION, 0.0, Easing::EaseOut);
        }

        let target = frame.pointer.position;
        let ring = self.ring.unwrap_or(target);
        let ring = Vec2::new(
            damp(ring.x, target.x, cursor::RING_FOLLOW_LAMBDA, frame.delta),
            damp(ring.y, target.y, cursor::RING_FOLLOW_LAMBDA, frame.delta),
        );
        self.ring = Some(ring);

        let dot_scale = self.dot_scale.advance(frame.delta);
        let ring_scale = self.ring_scale.advance(frame.delta);
        output.style(
            elements::CURSOR_DOT,
            "transform",
            transform(target, cursor::DOT_RADIUS, dot_scale),
        );
        output.style(
            elements::CURSOR_RING,
            "transform",
            transform(ring, cursor::RING_RADIUS, ring_scale),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::viewport::{DeviceTier, Viewport};
    use crate::engine::regions::tracked_region::TrackedRegions;
    use crate::engine::scroll::input::PointerState;
    use crate::engine::scroll::smooth_scroll::ScrollState;

    fn frame<'a>(regions: &'a TrackedRegions, pointer: PointerState, tier: DeviceTier) -> FrameContext<'a> {
        FrameContext {
            frame: 1,
            elapsed: 0.0,
            delta: 1.0 / 60.0,
            scroll: ScrollState::default(),
            pointer,
            viewport: Viewport::default(),
            tier,
            regions,
            panel_events: &[],
        }
    }

    #[test]
    fn hidden_once_on_coarse_pointer() {
        let regions = TrackedRegions::default();
        let tier = DeviceTier::classify(400.0, true);
        let mut consumer = CursorConsumer::default();

        let mut output = FrameOutput::default();
        consumer.on_frame(&frame(&regions, PointerState::default(), tier), &mut output);
        assert_eq!(output.writes.len(), 2);

        let mut output = FrameOutput::default();
        consumer.on_frame(&frame(&regions, PointerState::default(), tier), &mut output);
        assert!(output.writes.is_empty());
    }

    #[test]
    fn hover_grows_the_dot() {
        let regions = TrackedRegions::default();
        let pointer = PointerState {
            position: Vec2::new(100.0, 100.0),
            normalized: Vec2::ZERO,
            present: true,
            hovering_interactive: true,
        };
        let mut consumer = CursorConsumer::default();
        for _ in 0..30 {
            consumer.on_frame(
                &frame(&regions, pointer, DeviceTier::default()),
                &mut FrameOutput::default(),
            );
        }
        assert_eq!(consumer.dot_scale.value(), cursor::DOT_HOVER_SCALE);
        assert_eq!(consumer.ring_scale.value(), cursor::RING_HOVER_SCALE);
        assert_eq!(consumer.ring, Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn ring_trails_a_pointer_leaving_the_origin() {
        let regions = TrackedRegions::default();
        let mut pointer = PointerState {
            position: Vec2::ZERO,
            normalized: Vec2::new(-1.0, 1.0),
            present: true,
            hovering_interactive: false,
        };
        let mut consumer = CursorConsumer::default();
        consumer.on_frame(
            &frame(&regions, pointer, DeviceTier::default()),
            &mut FrameOutput::default(),
        );
        assert_eq!(consumer.ring, Some(Vec2::ZERO));

        pointer.position = Vec2::new(200.0, 100.0);
        consumer.on_frame(
            &frame(&regions, pointer, DeviceTier::default()),
            &mut FrameOutput::default(),
        );
        let ring = consumer.ring.unwrap();
        assert!(ring.x > 0.0 && ring.x < 200.0);
        assert!(ring.y > 0.0 && ring.y < 100.0);
    }
}
