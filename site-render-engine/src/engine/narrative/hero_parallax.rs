use constants::layout::HERO_REGION;
use constants::layout::elements;
use constants::scroll::HERO_PARALLAX_TRAVEL;

use crate::engine::regions::progress::{self, RegionMode};
use crate::engine::schedule::frame_scheduler::{FrameConsumer, FrameContext, FrameOutput};

/// Horizontal offsets of the left and right hero words for a scroll-out
/// progress value.
pub fn word_offsets(progress: f32) -> (f32, f32) {
    let travel = progress.clamp(0.0, 1.0) * HERO_PARALLAX_TRAVEL;
    (-travel, travel)
}

/// Scrubs the hero headline apart while the hero scrolls out of view.
#[derive(Default)]
pub struct HeroParallaxConsumer {
    last_progress: Option<f32>,
}

impl FrameConsumer for HeroParallaxConsumer {
    fn label(&self) -> &'static str {
        "hero_parallax"
    }

    fn on_frame(&mut self, frame: &FrameContext, output: &mut FrameOutput) {
        let progress = frame
            .regions
            .get(HERO_REGION)
            .map(|region| {
                progress::compute_with(
                    RegionMode::ScrollOut,
                    region,
                    frame.scroll.smoothed_offset,
                    frame.viewport.height,
                )
            })
            .unwrap_or(0.0);

        if self.last_progress == Some(progress) {
            return;
        }
        self.last_progress = Some(progress);

        let (left, right) = word_offsets(progress);
        output.style(
            elements::HERO_WORD_LEFT,
            "transform",
            format!("translateX({left:.2}px)"),
        );
        output.style(
            elements::HERO_WORD_RIGHT,
            "transform",
            format!("translateX({right:.2}px)"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_move_apart_symmetrically() {
        assert_eq!(word_offsets(0.0), (0.0, 0.0));
        assert_eq!(word_offsets(0.5), (-50.0, 50.0));
        assert_eq!(word_offsets(2.0), (-100.0, 100.0));
    }
}
