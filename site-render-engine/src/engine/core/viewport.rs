use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use constants::scene::CONSTRAINED_WIDTH;

/// Current viewport size in logical pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    /// Map a client position to [-1, 1] on both axes with +y up.
    pub fn normalize(&self, position: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (position.x / self.width) * 2.0 - 1.0,
            -(position.y / self.height) * 2.0 + 1.0,
        )
        .clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }
}

/// Coarse device classification, chosen once at startup.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceTier {
    /// Narrow screen or touch-first device: reduce geometry and shadow cost.
    pub constrained: bool,
    /// No hover-capable pointer: pointer-reactive effects are skipped.
    pub coarse_pointer: bool,
}

impl DeviceTier {
    pub fn classify(viewport_width: f32, coarse_pointer: bool) -> Self {
        Self {
            constrained: coarse_pointer || viewport_width < CONSTRAINED_WIDTH,
            coarse_pointer,
        }
    }

    pub fn pointer_reactive(&self) -> bool {
        !self.coarse_pointer
    }
}

/// Read the primary window once and pick the device tier.
pub fn classify_device(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
    mut commands: Commands,
) {
    if let Ok(window) = windows.single() {
        viewport.width = window.width();
        viewport.height = window.height();
    }

    let coarse_pointer = crate::engine::dom::bridge::prefers_coarse_pointer();
    let tier = DeviceTier::classify(viewport.width, coarse_pointer);
    info!(
        "Device tier: {} (viewport {:.0}x{:.0}, coarse pointer {})",
        if tier.constrained { "constrained" } else { "full" },
        viewport.width,
        viewport.height,
        tier.coarse_pointer
    );
    commands.insert_resource(tier);
}

pub fn track_viewport(mut resized: EventReader<WindowResized>, mut viewport: ResMut<Viewport>) {
    if let Some(event) = resized.read().last() {
        let next = Viewport {
            width: event.width,
            height: event.height,
        };
        if *viewport != next {
            *viewport = next;
            debug!("Viewport resized to {:.0}x{:.0}", next.width, next.height);
        }
    }
}
