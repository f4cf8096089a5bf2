//! Scroll- and pointer-driven narrative state.
//!
//! Each submodule owns a small state machine plus the frame consumer that
//! turns its transitions into DOM writes. State is recomputed from inputs
//! every frame and never persisted across remounts.

use bevy::prelude::*;
use constants::rpc::notifications::{CHAPTER_CHANGED, FOCUS_CHANGED};
use serde::Serialize;
use serde_json::Value;

use crate::engine::motion::tween::Tween;

/// Story section chapters selected from pinned scroll progress.
pub mod chapters;

/// Mutually exclusive focus panels for the showcase and location finder.
pub mod focus;

/// Hero headline words drifting apart as the hero scrolls out.
pub mod hero_parallax;

/// Spring-smoothed page progress bar.
pub mod progress_bar;

/// Advance `tween` and return its value when it is still moving, or when
/// `force` asks for the current value regardless.
pub(crate) fn step(tween: &mut Tween, dt: f32, force: bool) -> Option<f32> {
    if tween.is_finished() && !force {
        return None;
    }
    Some(tween.advance(dt))
}

/// Latest narrative state, mirrored from consumer notifications for the
/// host bridge and the diagnostics overlay.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NarrativeStatus {
    pub chapter: usize,
    pub showcase: Option<usize>,
    pub locations: Option<usize>,
}

impl NarrativeStatus {
    pub fn record(&mut self, method: &str, params: &Value) {
        let index = |key: &str| params.get(key).and_then(Value::as_u64).map(|v| v as usize);
        match method {
            CHAPTER_CHANGED => {
                if let Some(chapter) = index("chapter") {
                    self.chapter = chapter;
                }
            }
            FOCUS_CHANGED => match params.get("group").and_then(Value::as_str) {
                Some("showcase") => self.showcase = index("active"),
                Some("locations") => self.locations = index("active"),
                _ => {}
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_follows_notifications() {
        let mut status = NarrativeStatus::default();
        status.record(CHAPTER_CHANGED, &json!({ "chapter": 2, "previous": 1 }));
        status.record(FOCUS_CHANGED, &json!({ "group": "locations", "active": 1 }));
        status.record("debug_message", &json!({ "chapter": 0 }));
        assert_eq!(status.chapter, 2);
        assert_eq!(status.locations, Some(1));
        assert_eq!(status.showcase, None);
    }
}
