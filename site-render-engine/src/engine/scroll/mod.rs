//! Smooth scrolling: converts discrete wheel/touch deltas into a
//! continuously damped page offset.
//!
//! The controller owns [`ScrollState`](smooth_scroll::ScrollState) and only
//! mutates it inside its per-frame tick. Input collection is split out so
//! native (winit events) and web (DOM listeners) feed the same queue.

/// Native wheel/touch/pointer collection and the scroll-phase systems.
pub mod input;

/// Smooth scroll controller resource and configuration.
pub mod smooth_scroll;
