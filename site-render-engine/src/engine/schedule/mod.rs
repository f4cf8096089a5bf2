//! Per-frame update scheduling.
//!
//! Frame work is split into ordered phases so that within one frame the
//! smooth scroll offset is always final before any consumer reads it.

use bevy::prelude::*;

/// The scheduler resource, its consumer trait and the dispatch system.
pub mod frame_scheduler;

/// Ordered phases of a displayed frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Drain raw input into events and pointer state.
    Input,
    /// Advance the smooth scroll controller.
    ScrollTick,
    /// Run registered frame consumers against this frame's signals.
    Dispatch,
    /// Apply scene parameters to the 3D scene graph.
    Scene,
    /// Push queued DOM writes and host notifications out.
    Flush,
}

pub fn configure_frame_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::ScrollTick,
            FrameSet::Dispatch,
            FrameSet::Scene,
            FrameSet::Flush,
        )
            .chain(),
    );
}
