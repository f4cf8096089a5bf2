/// Longest integration step; larger frame deltas are split so stiff
/// springs stay stable after a stalled frame.
const MAX_STEP: f32 = 1.0 / 120.0;

/// Damped mass-spring following a moving target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub current: f32,
    pub target: f32,
    pub velocity: f32,
    stiffness: f32,
    damping: f32,
    mass: f32,
    rest_delta: f32,
}

impl Spring {
    pub fn new(value: f32, stiffness: f32, damping: f32, mass: f32, rest_delta: f32) -> Self {
        Self {
            current: value,
            target: value,
            velocity: 0.0,
            stiffness: stiffness.max(0.0001),
            damping: damping.max(0.0),
            mass: mass.max(0.0001),
            rest_delta: rest_delta.max(0.0),
        }
    }

    pub fn is_resting(&self) -> bool {
        (self.target - self.current).abs() <= self.rest_delta
            && self.velocity.abs() <= self.rest_delta
    }

    pub fn tick(&mut self, dt: f32) -> f32 {
        if self.is_resting() {
            self.current = self.target;
            self.velocity = 0.0;
            return self.current;
        }

        let mut remaining = dt.max(0.0);
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP);
            let acceleration = (self.stiffness * (self.target - self.current)
                - self.damping * self.velocity)
                / self.mass;
            self.velocity += acceleration * step;
            self.current += self.velocity * step;
            remaining -= step;
        }

        if self.is_resting() {
            self.current = self.target;
            self.velocity = 0.0;
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_to_target() {
        let mut spring = Spring::new(0.0, 100.0, 30.0, 1.0, 0.001);
        spring.target = 1.0;
        for _ in 0..240 {
            spring.tick(1.0 / 60.0);
        }
        assert_eq!(spring.current, 1.0);
        assert!(spring.is_resting());
    }

    #[test]
    fn long_frame_stays_stable() {
        let mut spring = Spring::new(0.0, 100.0, 30.0, 1.0, 0.001);
        spring.target = 1.0;
        let value = spring.tick(0.5);
        assert!(value.is_finite());
        assert!(value > 0.5 && value < 1.5);
    }
}
