use bevy::prelude::*;
use constants::scroll as tuning;
use serde::Serialize;

use crate::engine::motion::damping::damp;

/// Snapshot of the page scroll position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScrollState {
    /// Where input has asked the page to be.
    pub raw_offset: f32,
    /// Where the page is drawn this frame.
    pub smoothed_offset: f32,
    /// Smoothed offset change in px/s over the last tick.
    pub velocity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Wheel,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScrollConfig {
    /// Decay rate (1/s) of the gap between smoothed and raw offset.
    pub damping: f32,
    pub snap_epsilon: f32,
    /// Wrap around at the ends of the page instead of clamping.
    pub infinite: bool,
    pub wheel_multiplier: f32,
    pub touch_multiplier: f32,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            damping: tuning::DAMPING_LAMBDA,
            snap_epsilon: tuning::SNAP_EPSILON,
            infinite: tuning::INFINITE,
            wheel_multiplier: tuning::WHEEL_MULTIPLIER,
            touch_multiplier: tuning::TOUCH_MULTIPLIER,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct SmoothScrollController {
    config: SmoothScrollConfig,
    state: ScrollState,
    /// Maximum scrollable offset (document height minus viewport height).
    limit: f32,
    running: bool,
    /// Offset last handed to the page, used to tell our own writes apart
    /// from keyboard, scrollbar or restored scrolling.
    applied: Option<f32>,
}

impl SmoothScrollController {
    pub fn start(&mut self, config: SmoothScrollConfig) {
        self.config = config;
        if self.running {
            return;
        }
        self.running = true;
        self.state.raw_offset = self.state.smoothed_offset;
        self.state.velocity = 0.0;
        info!(
            "Smooth scroll started (damping {:.1}, infinite {})",
            config.damping, config.infinite
        );
    }

    /// Halt in place. Safe to call any number of times; returns whether the
    /// controller was running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.state.raw_offset = self.state.smoothed_offset;
        self.state.velocity = 0.0;
        info!("Smooth scroll stopped at {:.1}px", self.state.smoothed_offset);
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    /// Update the scrollable range after a resize or reflow.
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        if !self.config.infinite {
            self.state.raw_offset = self.state.raw_offset.clamp(0.0, self.limit);
            self.state.smoothed_offset = self.state.smoothed_offset.clamp(0.0, self.limit);
        }
    }

    /// Adopt a scroll position the page reached on its own. Both offsets jump
    /// there so no damping pulls the page back. Positions within
    /// [`tuning::SYNC_TOLERANCE`] of the last applied offset are echoes of
    /// our own writes and are ignored. Returns whether the state changed.
    pub fn sync_to(&mut self, offset: f32) -> bool {
        if !offset.is_finite() {
            return false;
        }
        if self
            .applied
            .is_some_and(|applied| (applied - offset).abs() <= tuning::SYNC_TOLERANCE)
        {
            return false;
        }
        let offset = self.bound(offset);
        self.state.raw_offset = offset;
        self.state.smoothed_offset = offset;
        self.state.velocity = 0.0;
        self.applied = Some(offset);
        true
    }

    /// Offset the page should be moved to this frame, if it differs from the
    /// last one applied. Nothing is pending while stopped.
    pub fn take_pending_write(&mut self) -> Option<f32> {
        if !self.running {
            return None;
        }
        let offset = self.state.smoothed_offset;
        if self.applied == Some(offset) {
            return None;
        }
        self.applied = Some(offset);
        Some(offset)
    }

    /// Feed a raw input delta in pixels (positive scrolls down the page).
    pub fn push_delta(&mut self, delta: f32, source: InputSource) {
        if !self.running || !delta.is_finite() {
            return;
        }
        let multiplier = match source {
            InputSource::Wheel => self.config.wheel_multiplier,
            InputSource::Touch => self.config.touch_multiplier,
        };
        self.state.raw_offset = self.bound(self.state.raw_offset + delta * multiplier);
    }

    /// Move the target offset. `immediate` skips the damping entirely.
    pub fn scroll_to(&mut self, offset: f32, immediate: bool) -> bool {
        if !self.running || !offset.is_finite() {
            return false;
        }
        let offset = self.bound(offset);
        self.state.raw_offset = offset;
        if immediate {
            self.state.smoothed_offset = offset;
            self.state.velocity = 0.0;
        }
        true
    }

    /// Advance the smoothed offset by `dt` seconds. Returns the new state, or
    /// `None` when the controller is stopped.
    pub fn tick(&mut self, dt: f32) -> Option<ScrollState> {
        if !self.running {
            return None;
        }

        let previous = self.state.smoothed_offset;
        let target = self.state.raw_offset;
        let mut next = damp(previous, target, self.config.damping, dt);
        if (target - next).abs() <= self.config.snap_epsilon {
            next = target;
        }

        self.state.smoothed_offset = next;
        self.state.velocity = if dt > 0.0 { (next - previous) / dt } else { 0.0 };

        if self.config.infinite && self.limit > 0.0 {
            // Shift both offsets together so the gap, and the motion, survive the wrap.
            let laps = (self.state.smoothed_offset / self.limit).floor();
            if laps != 0.0 {
                self.state.smoothed_offset -= laps * self.limit;
                self.state.raw_offset -= laps * self.limit;
            }
        }

        Some(self.state)
    }

    fn bound(&self, offset: f32) -> f32 {
        if self.config.infinite {
            offset
        } else {
            offset.clamp(0.0, self.limit)
        }
    }
}
