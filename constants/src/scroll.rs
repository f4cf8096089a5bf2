/// Exponential decay rate (1/s) for the smoothed offset. Roughly matches a
/// 1.2s settle for a full wheel notch.
pub const DAMPING_LAMBDA: f32 = 7.0;

/// Distance (px) under which the smoothed offset snaps onto the raw offset.
pub const SNAP_EPSILON: f32 = 0.1;

/// Distance (px) between a native scroll position and the last offset the
/// engine applied under which the native position is taken as an echo of
/// that write rather than a user scroll.
pub const SYNC_TOLERANCE: f32 = 1.0;

/// Wheel delta multiplier.
pub const WHEEL_MULTIPLIER: f32 = 1.0;

/// Touch delta multiplier. Touch deltas are small so they are doubled.
pub const TOUCH_MULTIPLIER: f32 = 2.0;

/// Pixels per wheel "line" when the platform reports line units.
pub const PIXELS_PER_LINE: f32 = 40.0;

/// Whether the page wraps around at its ends.
pub const INFINITE: bool = false;

/// Page progress bar spring.
pub mod progress_bar {
    pub const STIFFNESS: f32 = 100.0;
    pub const DAMPING: f32 = 30.0;
    pub const MASS: f32 = 1.0;
    /// Below this distance and speed the spring rests on its target.
    pub const REST_DELTA: f32 = 0.001;
}

/// Hero word parallax travel (px) over the hero's scroll-out.
pub const HERO_PARALLAX_TRAVEL: f32 = 100.0;
