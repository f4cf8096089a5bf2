//! Runtime diagnostics.
//!
//! Pushes frame rate to the host page and, on native builds, keeps a small
//! text overlay with the engine's live state.

/// FPS notifications and the native diagnostics overlay.
///
/// Sends frame rate updates to the host via RPC and mirrors scroll, chapter
/// and loading state into the overlay text.
pub mod fps_tracking;
