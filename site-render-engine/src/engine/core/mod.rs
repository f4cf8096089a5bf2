//! Core application setup and lifecycle.
//!
//! Handles application assembly, window configuration, device
//! classification and the Loading → Running → Unmounted state machine for
//! both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app, registers resources and events, and orders every
/// system into the frame phases.
pub mod app_setup;

/// Application state machine, consumer registration and teardown.
///
/// Running starts the scroll tick and subscribes consumers; unmounting
/// releases them.
pub mod app_state;

/// Viewport size tracking and device tier classification.
pub mod viewport;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
