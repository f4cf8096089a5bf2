//! Time-based motion primitives shared by every animated surface.
//!
//! All primitives advance from an explicit frame delta so motion stays
//! frame-rate independent on 60Hz, 120Hz and throttled background tabs.

/// Exponential smoothing towards a moving target.
pub mod damping;

/// Easing curves, including cubic-bezier timing functions.
pub mod easing;

/// Damped mass-spring integrator.
pub mod spring;

/// Retargetable fixed-duration tweens.
pub mod tween;
