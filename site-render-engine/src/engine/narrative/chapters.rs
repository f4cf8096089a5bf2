use constants::layout::STORY_REGION;
use constants::layout::elements::{self, indexed};
use constants::rpc::notifications::CHAPTER_CHANGED;
use constants::transitions::chapter;
use serde_json::json;

use super::step;
use crate::engine::assets::site_content::ChapterEntry;
use crate::engine::motion::easing::Easing;
use crate::engine::motion::tween::Tween;
use crate::engine::regions::progress;
use crate::engine::schedule::frame_scheduler::{FrameConsumer, FrameContext, FrameOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterChange {
    pub from: usize,
    pub to: usize,
}

/// Discrete chapter selection over a fixed number of chapters.
#[derive(Debug, Clone)]
pub struct ChapterMachine {
    count: usize,
    current: usize,
}

impl ChapterMachine {
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
            current: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Chapter for a progress value: `floor(progress * N)` clamped to the
    /// last chapter, so chapter `i` covers `i/N <= p < (i+1)/N`.
    pub fn select(&self, progress: f32) -> usize {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        ((progress * self.count as f32).floor() as usize).min(self.count - 1)
    }

    /// Move to the chapter selected by `progress`. Staying in the same
    /// chapter reports nothing.
    pub fn update(&mut self, progress: f32) -> Option<ChapterChange> {
        let next = self.select(progress);
        if next == self.current {
            return None;
        }
        let change = ChapterChange {
            from: self.current,
            to: next,
        };
        self.current = next;
        Some(change)
    }
}

/// Durations and offsets of the chapter transitions.
#[derive(Debug, Clone, Copy)]
pub struct ChapterTimings {
    pub image_duration: f32,
    pub image_start_scale: f32,
    pub text_duration: f32,
    pub text_delay: f32,
    pub text_offset_y: f32,
    pub text_blur: f32,
    pub text_exit_duration: f32,
    pub label_duration: f32,
    pub label_delay: f32,
    pub label_offset_x: f32,
    pub dot_active_height: f32,
    pub dot_idle_height: f32,
    pub dot_duration: f32,
}

impl Default for ChapterTimings {
    fn default() -> Self {
        Self {
            image_duration: chapter::IMAGE_DURATION,
            image_start_scale: chapter::IMAGE_START_SCALE,
            text_duration: chapter::TEXT_DURATION,
            text_delay: chapter::TEXT_DELAY,
            text_offset_y: chapter::TEXT_OFFSET_Y,
            text_blur: chapter::TEXT_BLUR,
            text_exit_duration: chapter::TEXT_EXIT_DURATION,
            label_duration: chapter::LABEL_DURATION,
            label_delay: chapter::LABEL_DELAY,
            label_offset_x: chapter::LABEL_OFFSET_X,
            dot_active_height: chapter::DOT_ACTIVE_HEIGHT,
            dot_idle_height: chapter::DOT_IDLE_HEIGHT,
            dot_duration: chapter::DOT_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ChapterImage {
    opacity: Tween,
    scale: Tween,
}

/// In-flight visual state of the story section.
///
/// The background crossfade and the foreground text reveal are separate
/// tweens with their own durations, so the image always settles after the
/// text. Entering a chapter retargets every tween from its on-screen value.
/// The outgoing text exits upwards before the incoming text is swapped in.
#[derive(Debug, Clone)]
struct ChapterVisuals {
    timings: ChapterTimings,
    images: Vec<ChapterImage>,
    text_reveal: Tween,
    label_reveal: Tween,
    /// Chapter whose text replaces the current one once the exit finishes.
    pending_text: Option<usize>,
    dots: Vec<Tween>,
}

impl ChapterVisuals {
    fn new(count: usize, timings: ChapterTimings) -> Self {
        let images = (0..count)
            .map(|index| ChapterImage {
                opacity: Tween::settled(if index == 0 { 1.0 } else { 0.0 }),
                scale: Tween::settled(1.0),
            })
            .collect();
        let dots = (0..count)
            .map(|index| {
                Tween::settled(if index == 0 {
                    timings.dot_active_height
                } else {
                    timings.dot_idle_height
                })
            })
            .collect();
        Self {
            timings,
            images,
            text_reveal: Tween::settled(1.0),
            label_reveal: Tween::settled(1.0),
            pending_text: None,
            dots,
        }
    }

    fn enter(&mut self, chapter: usize) {
        let t = self.timings;
        for (index, image) in self.images.iter_mut().enumerate() {
            if index == chapter {
                if image.opacity.value() <= f32::EPSILON {
                    image.scale = Tween::new(t.image_start_scale, 1.0, t.image_duration, Easing::EaseOut);
                } else {
                    image.scale.retarget(1.0, t.image_duration, 0.0, Easing::EaseOut);
                }
                image.opacity.retarget(1.0, t.image_duration, 0.0, Easing::EaseOut);
            } else {
                image.opacity.retarget(0.0, t.image_duration, 0.0, Easing::EaseOut);
            }
        }

        self.pending_text = Some(chapter);
        self.text_reveal
            .retarget(0.0, t.text_exit_duration, 0.0, Easing::EaseOut);
        self.label_reveal
            .retarget(0.0, t.text_exit_duration, 0.0, Easing::EaseOut);

        for (index, dot) in self.dots.iter_mut().enumerate() {
            let height = if index == chapter {
                t.dot_active_height
            } else {
                t.dot_idle_height
            };
            dot.retarget(height, t.dot_duration, 0.0, Easing::EaseOut);
        }
    }

    /// Advance every tween and queue the resulting styles. Returns the
    /// chapter whose text should be written this frame.
    fn advance(&mut self, dt: f32, force: bool, output: &mut FrameOutput) -> Option<usize> {
        let t = self.timings;
        let exiting = self.pending_text.is_some();
        let direction = if exiting { -1.0 } else { 1.0 };
        for (index, image) in self.images.iter_mut().enumerate() {
            let target = indexed(elements::STORY_IMAGE, index);
            if let Some(opacity) = step(&mut image.opacity, dt, force) {
                output.style(target.clone(), "opacity", format!("{opacity:.3}"));
            }
            if let Some(scale) = step(&mut image.scale, dt, force) {
                output.style(target, "transform", format!("scale({scale:.4})"));
            }
        }

        if let Some(reveal) = step(&mut self.text_reveal, dt, force) {
            let hidden = 1.0 - reveal;
            output.style(elements::STORY_TEXT, "opacity", format!("{reveal:.3}"));
            output.style(
                elements::STORY_TEXT,
                "filter",
                format!("blur({:.2}px)", hidden * t.text_blur),
            );
            output.style(
                elements::STORY_TEXT,
                "transform",
                format!("translateY({:.2}px)", direction * hidden * t.text_offset_y),
            );
        }

        if let Some(reveal) = step(&mut self.label_reveal, dt, force) {
            output.style(elements::STORY_LABEL, "opacity", format!("{reveal:.3}"));
            output.style(
                elements::STORY_LABEL,
                "transform",
                format!("translateX({:.2}px)", (1.0 - reveal) * t.label_offset_x),
            );
        }

        for (index, dot) in self.dots.iter_mut().enumerate() {
            if let Some(height) = step(dot, dt, force) {
                output.style(
                    indexed(elements::STORY_DOT, index),
                    "height",
                    format!("{height:.1}px"),
                );
            }
        }

        if !exiting || !self.text_reveal.is_finished() {
            return None;
        }
        // The remaining reveal delays count from the chapter change.
        self.text_reveal = Tween::new(0.0, 1.0, t.text_duration, Easing::EaseOut)
            .with_delay(t.text_delay - t.text_exit_duration);
        self.label_reveal = Tween::new(0.0, 1.0, t.label_duration, Easing::EaseOut)
            .with_delay(t.label_delay - t.text_exit_duration);
        self.pending_text.take()
    }

    fn is_settled(&self) -> bool {
        self.images
            .iter()
            .all(|image| image.opacity.is_finished() && image.scale.is_finished())
            && self.pending_text.is_none()
            && self.text_reveal.is_finished()
            && self.label_reveal.is_finished()
            && self.dots.iter().all(Tween::is_finished)
    }
}

/// Drives the story section from pinned scroll progress.
pub struct StoryChapterConsumer {
    machine: ChapterMachine,
    visuals: ChapterVisuals,
    content: Vec<ChapterEntry>,
    initialized: bool,
}

impl StoryChapterConsumer {
    pub fn new(content: Vec<ChapterEntry>, fallback_count: usize, timings: ChapterTimings) -> Self {
        let count = if content.is_empty() {
            fallback_count
        } else {
            content.len()
        };
        let machine = ChapterMachine::new(count);
        let visuals = ChapterVisuals::new(machine.count(), timings);
        Self {
            machine,
            visuals,
            content,
            initialized: false,
        }
    }

    pub fn current(&self) -> usize {
        self.machine.current()
    }

    fn write_text(&self, chapter: usize, output: &mut FrameOutput) {
        let Some(entry) = self.content.get(chapter) else {
            return;
        };
        output.text(elements::STORY_TITLE, entry.title.clone());
        output.text(elements::STORY_BODY, entry.text.clone());
        output.text(
            elements::STORY_LABEL,
            format!("{:02} / {}", chapter + 1, entry.subtitle),
        );
    }
}

impl FrameConsumer for StoryChapterConsumer {
    fn label(&self) -> &'static str {
        "story_chapters"
    }

    fn on_frame(&mut self, frame: &FrameContext, output: &mut FrameOutput) {
        let progress = frame
            .regions
            .get(STORY_REGION)
            .map(|region| {
                progress::compute(region, frame.scroll.smoothed_offset, frame.viewport.height)
            })
            .unwrap_or(0.0);

        let force = !self.initialized;
        if force {
            self.write_text(self.machine.current(), output);
            self.initialized = true;
        }

        if let Some(change) = self.machine.update(progress) {
            self.visuals.enter(change.to);
            output.notify(
                CHAPTER_CHANGED,
                json!({
                    "chapter": change.to,
                    "previous": change.from,
                    "progress": progress,
                }),
            );
        }

        if force || !self.visuals.is_settled() {
            if let Some(chapter) = self.visuals.advance(frame.delta, force, output) {
                self.write_text(chapter, output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::default;
    use crate::engine::core::viewport::{DeviceTier, Viewport};
    use crate::engine::dom::bridge::DomWrite;
    use crate::engine::regions::tracked_region::{TrackedRegion, TrackedRegions};
    use crate::engine::scroll::input::PointerState;
    use crate::engine::scroll::smooth_scroll::ScrollState;

    #[test]
    fn selects_chapter_from_progress() {
        let machine = ChapterMachine::new(3);
        assert_eq!(machine.select(0.0), 0);
        assert_eq!(machine.select(0.99), 2);
        assert_eq!(machine.select(0.34), 1);
        assert_eq!(machine.select(1.0), 2);
        assert_eq!(machine.select(-0.5), 0);
        assert_eq!(machine.select(f32::NAN), 0);
    }

    #[test]
    fn reentering_same_chapter_is_a_no_op() {
        let mut machine = ChapterMachine::new(3);
        assert_eq!(machine.update(0.1), None);
        assert_eq!(machine.update(0.5), Some(ChapterChange { from: 0, to: 1 }));
        assert_eq!(machine.update(0.6), None);
        assert_eq!(machine.update(0.2), Some(ChapterChange { from: 1, to: 0 }));
    }

    #[test]
    fn image_outlasts_text() {
        let mut visuals = ChapterVisuals::new(3, ChapterTimings::default());
        visuals.enter(1);
        let mut output = FrameOutput::default();
        // Text settles at 1.0s, image at 1.2s.
        for _ in 0..66 {
            visuals.advance(1.0 / 60.0, false, &mut output);
        }
        assert!(visuals.text_reveal.is_finished());
        assert!(!visuals.images[1].opacity.is_finished());
    }

    #[test]
    fn outgoing_text_exits_before_the_swap() {
        let timings = ChapterTimings::default();
        let mut visuals = ChapterVisuals::new(3, timings);
        let mut output = FrameOutput::default();
        visuals.enter(1);

        let mut swapped_at = None;
        for frame in 1..=30 {
            if let Some(chapter) = visuals.advance(1.0 / 60.0, false, &mut output) {
                assert_eq!(chapter, 1);
                swapped_at = Some(frame);
                break;
            }
            // Leaving text moves up, never down.
            assert!(visuals.text_reveal.target() == 0.0);
        }
        let swapped_at = swapped_at.unwrap() as f32 / 60.0;
        assert!(swapped_at >= timings.text_exit_duration - 1e-3);
        assert!(swapped_at < timings.text_exit_duration + 2.0 / 60.0);
        assert_eq!(visuals.text_reveal.value(), 0.0);
        assert_eq!(visuals.text_reveal.target(), 1.0);
        assert!(timings.text_exit_duration <= timings.text_delay);
        assert!(timings.text_delay + timings.text_duration < timings.image_duration);
    }

    #[test]
    fn new_chapter_text_waits_for_the_exit() {
        let regions = TrackedRegions::new(vec![TrackedRegion::new(STORY_REGION, 0.0, 2400.0)], 5000.0);
        let content: Vec<ChapterEntry> = (0..3)
            .map(|index| ChapterEntry {
                title: format!("Chapter {index}"),
                ..default()
            })
            .collect();
        let mut consumer = StoryChapterConsumer::new(content, 3, ChapterTimings::default());
        let mut frame = FrameContext {
            frame: 1,
            elapsed: 0.0,
            delta: 1.0 / 60.0,
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
            viewport: Viewport {
                width: 1280.0,
                height: 800.0,
            },
            tier: DeviceTier::default(),
            regions: &regions,
            panel_events: &[],
        };
        let title = |output: &FrameOutput| {
            output.writes.iter().find_map(|write| match write {
                DomWrite::Text { target, text } if target == elements::STORY_TITLE => {
                    Some(text.clone())
                }
                _ => None,
            })
        };

        let mut output = FrameOutput::default();
        consumer.on_frame(&frame, &mut output);
        assert_eq!(title(&output).as_deref(), Some("Chapter 0"));

        frame.scroll.smoothed_offset = 800.0;
        let mut written = Vec::new();
        for index in 2..40 {
            frame.frame = index;
            let mut output = FrameOutput::default();
            consumer.on_frame(&frame, &mut output);
            written.push(title(&output));
        }
        assert_eq!(consumer.current(), 1);
        assert_eq!(written[0], None);
        assert!(written.contains(&Some("Chapter 1".to_string())));
    }

    #[test]
    fn superseded_transition_starts_from_current_value() {
        let mut visuals = ChapterVisuals::new(3, ChapterTimings::default());
        let mut output = FrameOutput::default();
        visuals.enter(1);
        for _ in 0..30 {
            visuals.advance(1.0 / 60.0, false, &mut output);
        }
        let mid = visuals.images[1].opacity.value();
        assert!(mid > 0.0 && mid < 1.0);

        visuals.enter(2);
        assert!((visuals.images[1].opacity.value() - mid).abs() < 1e-5);
        assert_eq!(visuals.images[1].opacity.target(), 0.0);
        assert_eq!(visuals.images[2].opacity.target(), 1.0);
    }

    #[test]
    fn consumer_notifies_on_chapter_change() {
        let regions = TrackedRegions::new(vec![TrackedRegion::new(STORY_REGION, 1000.0, 2400.0)], 5000.0);
        let mut consumer = StoryChapterConsumer::new(Vec::new(), 3, ChapterTimings::default());
        let mut frame = FrameContext {
            frame: 1,
            elapsed: 0.0,
            delta: 1.0 / 60.0,
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
            viewport: Viewport {
                width: 1280.0,
                height: 800.0,
            },
            tier: DeviceTier::default(),
            regions: &regions,
            panel_events: &[],
        };

        let mut output = FrameOutput::default();
        consumer.on_frame(&frame, &mut output);
        assert!(output.notifications.is_empty());
        assert!(!output.writes.is_empty());

        // 1000 + 0.5 * (2400 - 800) puts progress at 0.5.
        frame.frame = 2;
        frame.scroll.smoothed_offset = 1800.0;
        let mut output = FrameOutput::default();
        consumer.on_frame(&frame, &mut output);
        assert_eq!(consumer.current(), 1);
        assert_eq!(output.notifications.len(), 1);
        assert_eq!(output.notifications[0].0, CHAPTER_CHANGED);
        assert_eq!(output.notifications[0].1["chapter"], 1);
    }
}
