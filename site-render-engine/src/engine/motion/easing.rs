use constants::transitions::EXPO_OUT_BEZIER;

/// Easing curve mapping linear time `t ∈ [0,1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// CSS `ease-out`.
    EaseOut,
    Power3Out,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier([f32; 4]),
}

impl Easing {
    /// Curve used by the focus panels.
    pub const EXPO_OUT: Easing = Easing::CubicBezier(EXPO_OUT_BEZIER);

    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseOut => cubic_bezier([0.0, 0.0, 0.58, 1.0], t),
            Easing::Power3Out => 1.0 - (1.0 - t).powi(4),
            Easing::CubicBezier(points) => cubic_bezier(points, t),
        }
    }
}

fn bezier_component(a1: f32, a2: f32, s: f32) -> f32 {
    // B(s) for control values 0, a1, a2, 1.
    let inv = 1.0 - s;
    3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
}

fn bezier_slope(a1: f32, a2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * a1 + 6.0 * inv * s * (a2 - a1) + 3.0 * s * s * (1.0 - a2)
}

/// Solve the bezier for `x == t` and return its `y`.
fn cubic_bezier([x1, y1, x2, y2]: [f32; 4], t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // Newton first, bisection when the slope flattens out.
    let mut s = t;
    for _ in 0..8 {
        let x = bezier_component(x1, x2, s) - t;
        if x.abs() < 1e-5 {
            return bezier_component(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - x / slope).clamp(0.0, 1.0);
    }

    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    s = t;
    for _ in 0..32 {
        let x = bezier_component(x1, x2, s);
        if (x - t).abs() < 1e-5 {
            break;
        }
        if x < t {
            low = s;
        } else {
            high = s;
        }
        s = (low + high) * 0.5;
    }
    bezier_component(y1, y2, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseOut,
        Easing::Power3Out,
        Easing::EXPO_OUT,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let mut last = 0.0;
            for step in 0..=100 {
                let value = easing.apply(step as f32 / 100.0);
                assert!(value + 1e-4 >= last, "{easing:?} dipped at {step}");
                last = value;
            }
        }
    }

    #[test]
    fn expo_out_front_loads_motion() {
        // Most of the travel happens in the first third.
        assert!(Easing::EXPO_OUT.apply(0.3) > 0.8);
    }

    #[test]
    fn linear_bezier_is_identity() {
        let linear = Easing::CubicBezier([0.25, 0.25, 0.75, 0.75]);
        for step in 0..=10 {
            let t = step as f32 / 10.0;
            assert!((linear.apply(t) - t).abs() < 1e-3);
        }
    }
}
