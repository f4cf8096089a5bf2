use super::easing::Easing;

/// Fixed-duration interpolation between two values with an optional delay.
///
/// Tweens are retargetable: [`Tween::retarget`] restarts from the value
/// currently on screen, so a superseded transition never jumps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    delay: f32,
    easing: Easing,
    elapsed: f32,
}

impl Tween {
    /// A tween already resting at `value`.
    pub fn settled(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            duration: 0.0,
            delay: 0.0,
            easing: Easing::Linear,
            elapsed: 0.0,
        }
    }

    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            easing,
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        if !self.is_finished() {
            self.elapsed += dt.max(0.0);
        }
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.elapsed <= self.delay {
            return self.from;
        }
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed - self.delay) / self.duration;
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    /// Head towards `to` from the current value. Retargeting to the value
    /// already being approached keeps the running tween untouched.
    pub fn retarget(&mut self, to: f32, duration: f32, delay: f32, easing: Easing) {
        if self.to == to {
            return;
        }
        *self = Tween::new(self.value(), to, duration, easing).with_delay(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_start_value_through_delay() {
        let mut tween = Tween::new(0.0, 1.0, 0.8, Easing::Linear).with_delay(0.2);
        assert_eq!(tween.advance(0.1), 0.0);
        assert_eq!(tween.advance(0.1), 0.0);
        assert!((tween.advance(0.4) - 0.5).abs() < 1e-4);
        assert_eq!(tween.advance(1.0), 1.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut tween = Tween::new(0.0, 10.0, 1.0, Easing::Linear);
        tween.advance(0.5);
        tween.retarget(0.0, 1.0, 0.0, Easing::Linear);
        assert!((tween.value() - 5.0).abs() < 1e-4);
        tween.advance(1.0);
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn retarget_to_same_target_keeps_progress() {
        let mut tween = Tween::new(0.0, 10.0, 1.0, Easing::Linear);
        tween.advance(0.5);
        tween.retarget(10.0, 1.0, 0.0, Easing::Linear);
        assert!((tween.value() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn zero_duration_jumps_after_delay() {
        let mut tween = Tween::new(1.0, 2.0, 0.0, Easing::Linear).with_delay(0.1);
        assert_eq!(tween.value(), 1.0);
        assert_eq!(tween.advance(0.2), 2.0);
    }
}
