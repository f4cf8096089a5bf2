use bevy::prelude::*;

/// Move `current` towards `target` by exponential decay.
///
/// `lambda` is the decay rate per second. The result depends only on the
/// elapsed time, never on how many frames it was split into, and it never
/// overshoots the target.
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    if dt <= 0.0 || lambda <= 0.0 {
        return current;
    }
    target + (current - target) * (-lambda * dt).exp()
}

/// Interpolation factor equivalent to [`damp`] for lerp/slerp style APIs.
pub fn damp_factor(lambda: f32, dt: f32) -> f32 {
    if dt <= 0.0 || lambda <= 0.0 {
        return 0.0;
    }
    1.0 - (-lambda * dt).exp()
}

pub fn damp_vec3(current: Vec3, target: Vec3, lambda: f32, dt: f32) -> Vec3 {
    current.lerp(target, damp_factor(lambda, dt))
}
