//! Shared tuning values for the site presentation engine.
//!
//! Every number that shapes how the page feels lives here so motion,
//! loading and scene detail can be tuned in one place.

/// Smooth scroll damping, sensitivity and snapping.
pub mod scroll;

/// Loading indicator tick rate, floors and fallback timing.
pub mod loading;

/// Durations, delays and curves for chapter and focus transitions.
pub mod transitions;

/// 3D scene placement, lighting and per-tier detail budgets.
pub mod scene;

/// Default page section layout for builds without a DOM.
pub mod layout;

/// Host bridge method and notification names.
pub mod rpc;
