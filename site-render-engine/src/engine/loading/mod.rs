//! Loading gate that sequences first paint.
//!
//! Tracks real asset progress, smooths it into the displayed loading bar and
//! signals ready exactly once before the page starts running.

/// Asset pipeline observation: tracked handles and scene readiness.
///
/// Produces the monotonic `actual` progress and the completion flag.
pub mod asset_tracker;

/// Content manifest load request.
pub mod content_loader;

/// Displayed progress smoothing and the edge-triggered ready signal.
///
/// Also drives the loading screen and the transition to running.
pub mod progress;
