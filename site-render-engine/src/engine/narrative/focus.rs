use bevy::prelude::*;
use constants::layout::elements::{self, indexed};
use constants::rpc::notifications::FOCUS_CHANGED;
use constants::transitions::{locations, showcase};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::step;
use crate::engine::motion::easing::Easing;
use crate::engine::motion::tween::Tween;
use crate::engine::schedule::frame_scheduler::{FrameConsumer, FrameContext, FrameOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelGroup {
    Showcase,
    Locations,
}

impl PanelGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelGroup::Showcase => "showcase",
            PanelGroup::Locations => "locations",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelEventKind {
    Enter,
    Leave,
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Fine,
    /// Touch and pen input. Never produces a meaningful leave.
    Coarse,
}

/// Hover or tap on one panel of a focus group.
#[derive(Event, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelEvent {
    pub group: PanelGroup,
    pub index: usize,
    pub kind: PanelEventKind,
    #[serde(default)]
    pub pointer: PointerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub from: usize,
    pub to: usize,
}

/// Exactly one active panel among `len` siblings, falling back to a default.
#[derive(Debug, Clone)]
pub struct FocusMachine {
    len: usize,
    default: usize,
    active: usize,
}

impl FocusMachine {
    pub fn new(len: usize, default: usize) -> Self {
        let default = default.min(len.saturating_sub(1));
        Self {
            len,
            default,
            active: default,
        }
    }

    pub fn active(&self) -> Option<usize> {
        (self.len > 0).then_some(self.active)
    }

    pub fn handle(
        &mut self,
        kind: PanelEventKind,
        index: usize,
        pointer: PointerKind,
    ) -> Option<FocusChange> {
        if index >= self.len {
            return None;
        }
        let next = match kind {
            PanelEventKind::Enter | PanelEventKind::Tap => index,
            // Touch keeps the tapped panel until another one is tapped.
            PanelEventKind::Leave if pointer == PointerKind::Coarse => return None,
            PanelEventKind::Leave if index == self.active => self.default,
            PanelEventKind::Leave => return None,
        };
        if next == self.active {
            return None;
        }
        let change = FocusChange {
            from: self.active,
            to: next,
        };
        self.active = next;
        Some(change)
    }
}

/// Look of a focus group's active and suppressed panels.
#[derive(Debug, Clone, Copy)]
pub struct FocusStyle {
    pub group: PanelGroup,
    pub default_index: usize,
    pub easing: Easing,
    pub panel_duration: f32,
    pub active_flex: f32,
    pub idle_flex: f32,
    pub image_duration: f32,
    pub image_active_scale: f32,
    pub image_idle_scale: f32,
    pub detail_duration: f32,
    pub detail_delay: f32,
    pub detail_exit_duration: f32,
    pub detail_offset: f32,
    pub detail_unit: &'static str,
    /// Brightness (showcase) or opacity (locations) of suppressed panels.
    pub idle_level: f32,
}

impl FocusStyle {
    pub fn showcase() -> Self {
        Self {
            group: PanelGroup::Showcase,
            default_index: showcase::DEFAULT_INDEX,
            easing: Easing::EXPO_OUT,
            panel_duration: showcase::PANEL_DURATION,
            active_flex: showcase::ACTIVE_FLEX,
            idle_flex: showcase::IDLE_FLEX,
            image_duration: showcase::IMAGE_DURATION,
            image_active_scale: showcase::IMAGE_ACTIVE_SCALE,
            image_idle_scale: showcase::IMAGE_IDLE_SCALE,
            detail_duration: showcase::DETAIL_DURATION,
            detail_delay: showcase::DETAIL_DELAY,
            detail_exit_duration: showcase::DETAIL_EXIT_DURATION,
            detail_offset: showcase::DETAIL_OFFSET_Y,
            detail_unit: "px",
            idle_level: showcase::IDLE_BRIGHTNESS,
        }
    }

    pub fn locations() -> Self {
        Self {
            group: PanelGroup::Locations,
            default_index: locations::DEFAULT_INDEX,
            easing: Easing::EXPO_OUT,
            panel_duration: locations::PANEL_DURATION,
            active_flex: locations::ACTIVE_FLEX,
            idle_flex: locations::IDLE_FLEX,
            image_duration: locations::IMAGE_DURATION,
            image_active_scale: locations::IMAGE_ACTIVE_SCALE,
            image_idle_scale: locations::IMAGE_IDLE_SCALE,
            detail_duration: locations::DETAIL_DURATION,
            detail_delay: locations::DETAIL_DELAY,
            detail_exit_duration: locations::DETAIL_EXIT_DURATION,
            detail_offset: locations::DETAIL_OFFSET_Y,
            detail_unit: "%",
            idle_level: locations::IDLE_OPACITY,
        }
    }
}

/// Per-panel tweens. Every panel animates independently so a panel losing
/// focus never waits for the one gaining it.
#[derive(Debug, Clone, Copy)]
struct PanelVisual {
    flex: Tween,
    emphasis: Tween,
    image_scale: Tween,
    detail: Tween,
}

impl PanelVisual {
    fn at_rest(style: &FocusStyle, active: bool) -> Self {
        let (flex, emphasis, scale) = if active {
            (style.active_flex, 1.0, style.image_active_scale)
        } else {
            (style.idle_flex, 0.0, style.image_idle_scale)
        };
        Self {
            flex: Tween::settled(flex),
            emphasis: Tween::settled(emphasis),
            image_scale: Tween::settled(scale),
            detail: Tween::settled(emphasis),
        }
    }

    fn set_active(&mut self, style: &FocusStyle, active: bool) {
        let easing = style.easing;
        if active {
            self.flex
                .retarget(style.active_flex, style.panel_duration, 0.0, easing);
            self.emphasis.retarget(1.0, style.panel_duration, 0.0, easing);
            self.image_scale
                .retarget(style.image_active_scale, style.image_duration, 0.0, easing);
            self.detail.retarget(
                1.0,
                style.detail_duration,
                style.detail_delay,
                Easing::EaseOut,
            );
        } else {
            self.flex
                .retarget(style.idle_flex, style.panel_duration, 0.0, easing);
            self.emphasis.retarget(0.0, style.panel_duration, 0.0, easing);
            self.image_scale
                .retarget(style.image_idle_scale, style.image_duration, 0.0, easing);
            self.detail
                .retarget(0.0, style.detail_exit_duration, 0.0, Easing::EaseOut);
        }
    }

    fn is_settled(&self) -> bool {
        self.flex.is_finished()
            && self.emphasis.is_finished()
            && self.image_scale.is_finished()
            && self.detail.is_finished()
    }

    fn advance(
        &mut self,
        style: &FocusStyle,
        index: usize,
        dt: f32,
        force: bool,
        output: &mut FrameOutput,
    ) {
        let (panel, image, detail) = match style.group {
            PanelGroup::Showcase => (
                elements::SHOWCASE_PANEL,
                elements::SHOWCASE_IMAGE,
                elements::SHOWCASE_DETAIL,
            ),
            PanelGroup::Locations => (
                elements::LOCATION_PANEL,
                elements::LOCATION_IMAGE,
                elements::LOCATION_ADDRESS,
            ),
        };

        if let Some(flex) = step(&mut self.flex, dt, force) {
            output.style(indexed(panel, index), "flex-grow", format!("{flex:.3}"));
        }

        if let Some(emphasis) = step(&mut self.emphasis, dt, force) {
            let level = style.idle_level + (1.0 - style.idle_level) * emphasis;
            match style.group {
                PanelGroup::Showcase => output.style(
                    indexed(panel, index),
                    "filter",
                    format!("grayscale({:.3}) brightness({level:.3})", 1.0 - emphasis),
                ),
                PanelGroup::Locations => {
                    output.style(indexed(panel, index), "opacity", format!("{level:.3}"));
                    output.style(
                        indexed(elements::LOCATION_UNDERLINE, index),
                        "width",
                        format!("{:.1}%", emphasis * locations::UNDERLINE_WIDTH),
                    );
                }
            }
        }

        if let Some(scale) = step(&mut self.image_scale, dt, force) {
            output.style(
                indexed(image, index),
                "transform",
                format!("scale({scale:.4})"),
            );
        }

        if let Some(shown) = step(&mut self.detail, dt, force) {
            let target = indexed(detail, index);
            output.style(target.clone(), "opacity", format!("{shown:.3}"));
            output.style(
                target,
                "transform",
                format!(
                    "translateY({:.2}{})",
                    (1.0 - shown) * style.detail_offset,
                    style.detail_unit
                ),
            );
        }
    }
}

/// Drives one focus group from panel hover and tap events.
pub struct FocusPanelsConsumer {
    style: FocusStyle,
    machine: FocusMachine,
    panels: Vec<PanelVisual>,
    initialized: bool,
}

impl FocusPanelsConsumer {
    pub fn new(len: usize, style: FocusStyle) -> Self {
        let machine = FocusMachine::new(len, style.default_index);
        let panels = (0..len)
            .map(|index| PanelVisual::at_rest(&style, machine.active() == Some(index)))
            .collect();
        Self {
            style,
            machine,
            panels,
            initialized: false,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.machine.active()
    }

    fn activate(&mut self, active: usize) {
        for (index, panel) in self.panels.iter_mut().enumerate() {
            panel.set_active(&self.style, index == active);
        }
    }
}

impl FrameConsumer for FocusPanelsConsumer {
    fn label(&self) -> &'static str {
        match self.style.group {
            PanelGroup::Showcase => "showcase_focus",
            PanelGroup::Locations => "locations_focus",
        }
    }

    fn on_frame(&mut self, frame: &FrameContext, output: &mut FrameOutput) {
        let group = self.style.group;
        for event in frame.panel_events.iter().filter(|event| event.group == group) {
            let Some(change) = self.machine.handle(event.kind, event.index, event.pointer) else {
                continue;
            };
            self.activate(change.to);
            output.notify(
                FOCUS_CHANGED,
                json!({
                    "group": group.as_str(),
                    "active": change.to,
                    "previous": change.from,
                }),
            );
        }

        let force = !self.initialized;
        self.initialized = true;
        for (index, panel) in self.panels.iter_mut().enumerate() {
            if force || !panel.is_settled() {
                panel.advance(&self.style, index, frame.delta, force, output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::viewport::{DeviceTier, Viewport};
    use crate::engine::regions::tracked_region::TrackedRegions;
    use crate::engine::scroll::input::PointerState;
    use crate::engine::scroll::smooth_scroll::ScrollState;

    fn event(index: usize, kind: PanelEventKind, pointer: PointerKind) -> PanelEvent {
        PanelEvent {
            group: PanelGroup::Showcase,
            index,
            kind,
            pointer,
        }
    }

    #[test]
    fn starts_on_default_panel() {
        let machine = FocusMachine::new(4, 0);
        assert_eq!(machine.active(), Some(0));
        assert_eq!(FocusMachine::new(0, 0).active(), None);
        assert_eq!(FocusMachine::new(2, 5).active(), Some(1));
    }

    #[test]
    fn enter_and_tap_activate() {
        let mut machine = FocusMachine::new(4, 0);
        assert_eq!(
            machine.handle(PanelEventKind::Enter, 2, PointerKind::Fine),
            Some(FocusChange { from: 0, to: 2 })
        );
        assert_eq!(
            machine.handle(PanelEventKind::Tap, 3, PointerKind::Coarse),
            Some(FocusChange { from: 2, to: 3 })
        );
        assert_eq!(machine.handle(PanelEventKind::Tap, 3, PointerKind::Coarse), None);
        assert_eq!(machine.handle(PanelEventKind::Enter, 9, PointerKind::Fine), None);
    }

    #[test]
    fn fine_leave_reverts_to_default() {
        let mut machine = FocusMachine::new(4, 0);
        machine.handle(PanelEventKind::Enter, 2, PointerKind::Fine);
        // Leaving a panel that is no longer active changes nothing.
        assert_eq!(machine.handle(PanelEventKind::Leave, 1, PointerKind::Fine), None);
        assert_eq!(
            machine.handle(PanelEventKind::Leave, 2, PointerKind::Fine),
            Some(FocusChange { from: 2, to: 0 })
        );
    }

    #[test]
    fn coarse_leave_keeps_panel_active() {
        let mut machine = FocusMachine::new(4, 0);
        machine.handle(PanelEventKind::Tap, 2, PointerKind::Coarse);
        assert_eq!(machine.handle(PanelEventKind::Leave, 2, PointerKind::Coarse), None);
        assert_eq!(machine.active(), Some(2));
    }

    #[test]
    fn switching_mid_transition_settles_on_one_active_panel() {
        let regions = TrackedRegions::default();
        let mut consumer = FocusPanelsConsumer::new(3, FocusStyle::showcase());
        let mut frame = FrameContext {
            frame: 1,
            elapsed: 0.0,
            delta: 1.0 / 60.0,
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
            viewport: Viewport::default(),
            tier: DeviceTier::default(),
            regions: &regions,
            panel_events: &[],
        };

        let to_a = [event(1, PanelEventKind::Enter, PointerKind::Fine)];
        frame.panel_events = &to_a;
        consumer.on_frame(&frame, &mut FrameOutput::default());

        frame.panel_events = &[];
        for _ in 0..10 {
            consumer.on_frame(&frame, &mut FrameOutput::default());
        }

        let to_b = [event(2, PanelEventKind::Enter, PointerKind::Fine)];
        frame.panel_events = &to_b;
        let mut output = FrameOutput::default();
        consumer.on_frame(&frame, &mut output);
        assert_eq!(output.notifications.len(), 1);
        assert_eq!(consumer.panels[1].emphasis.target(), 0.0);
        assert_eq!(consumer.panels[2].emphasis.target(), 1.0);

        frame.panel_events = &[];
        for _ in 0..120 {
            consumer.on_frame(&frame, &mut FrameOutput::default());
        }

        let active: Vec<usize> = consumer
            .panels
            .iter()
            .enumerate()
            .filter(|(_, panel)| panel.emphasis.value() == 1.0)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(active, vec![2]);
        assert!(consumer.panels.iter().all(PanelVisual::is_settled));
        assert_eq!(consumer.active(), Some(2));
    }

    #[test]
    fn ignores_other_groups() {
        let regions = TrackedRegions::default();
        let mut consumer = FocusPanelsConsumer::new(2, FocusStyle::locations());
        let events = [event(1, PanelEventKind::Enter, PointerKind::Fine)];
        let frame = FrameContext {
            frame: 1,
            elapsed: 0.0,
            delta: 1.0 / 60.0,
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
            viewport: Viewport::default(),
            tier: DeviceTier::default(),
            regions: &regions,
            panel_events: &events,
        };
        let mut output = FrameOutput::default();
        consumer.on_frame(&frame, &mut output);
        assert_eq!(consumer.active(), Some(0));
        assert!(output.notifications.is_empty());
    }
}
