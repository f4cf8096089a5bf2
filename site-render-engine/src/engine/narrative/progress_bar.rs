use constants::layout::PAGE_REGION;
use constants::layout::elements;
use constants::scroll::progress_bar;

use crate::engine::motion::spring::Spring;
use crate::engine::regions::progress;
use crate::engine::schedule::frame_scheduler::{FrameConsumer, FrameContext, FrameOutput};

/// Smallest scale change worth writing to the DOM.
const WRITE_EPSILON: f32 = 1e-4;

/// Page-wide scroll progress, spring-smoothed into the top bar's `scaleX`.
pub struct ScrollProgressConsumer {
    spring: Spring,
    written: Option<f32>,
}

impl Default for ScrollProgressConsumer {
    fn default() -> Self {
        Self {
            spring: Spring::new(
                0.0,
                progress_bar::STIFFNESS,
                progress_bar::DAMPING,
                progress_bar::MASS,
                progress_bar::REST_DELTA,
            ),
            written: None,
        }
    }
}

impl FrameConsumer for ScrollProgressConsumer {
    fn label(&self) -> &'static str {
        "scroll_progress"
    }

    fn on_frame(&mut self, frame: &FrameContext, output: &mut FrameOutput) {
        self.spring.target = frame
            .regions
            .get(PAGE_REGION)
            .map(|page| progress::compute(page, frame.scroll.smoothed_offset, frame.viewport.height))
            .unwrap_or(0.0);
        let scale = self.spring.tick(frame.delta).clamp(0.0, 1.0);

        if self
            .written
            .is_some_and(|written| (written - scale).abs() < WRITE_EPSILON)
        {
            return;
        }
        self.written = Some(scale);
        output.style(
            elements::SCROLL_PROGRESS,
            "transform",
            format!("scaleX({scale:.4})"),
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

    #[test]
    fn bar_follows_page_progress_and_then_goes_quiet() {
        let regions = TrackedRegions::new(Vec::new(), 2720.0);
        let mut consumer = ScrollProgressConsumer::default();
        let frame = FrameContext {
            frame: 1,
            elapsed: 0.0,
            delta: 1.0 / 60.0,
            scroll: ScrollState {
                raw_offset: 1000.0,
                smoothed_offset: 1000.0,
                velocity: 0.0,
            },
            pointer: PointerState::default(),
            viewport: Viewport::default(),
            tier: DeviceTier::default(),
            regions: &regions,
            panel_events: &[],
        };

        for _ in 0..300 {
            consumer.on_frame(&frame, &mut FrameOutput::default());
        }
        // (1000 - 0) / (2720 - 720)
        assert!((consumer.spring.current - 0.5).abs() < 1e-3);

        let mut output = FrameOutput::default();
        consumer.on_frame(&frame, &mut output);
        assert!(output.writes.is_empty());
    }
}
