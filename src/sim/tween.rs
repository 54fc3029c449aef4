//! Timing primitives: easing curves, one-shot tweens and repeating clocks

/// Easing curves used by animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
}

impl Easing {
    /// Map normalized time (clamped to 0..=1) through the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// A value animated from `from` to `to` over `duration` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn value(&self) -> f32 {
        let k = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * k
    }

    pub fn finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Repeating clock that fires every `interval` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repeat {
    interval: f32,
    elapsed: f32,
}

impl Repeat {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            elapsed: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Restart the loop with a new interval; accumulated time is dropped
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval.max(f32::EPSILON);
        self.elapsed = 0.0;
    }

    /// Advance the clock, returning how many times it fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseInQuad,
            Easing::EaseOutQuad,
            Easing::EaseInOutQuad,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
        assert!((Easing::EaseInOutQuad.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::EaseInQuad.apply(0.5) - 0.25).abs() < 1e-6);
        assert!((Easing::EaseOutQuad.apply(0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_tween_runs_to_target() {
        let mut t = Tween::new(1.0, 0.0, 2.0, Easing::EaseInQuad);
        assert_eq!(t.value(), 1.0);
        t.advance(1.0);
        assert!((t.value() - 0.75).abs() < 1e-6);
        assert!(!t.finished());
        t.advance(5.0);
        assert!(t.finished());
        assert_eq!(t.value(), 0.0);
    }

    #[test]
    fn test_zero_duration_tween_is_done() {
        let t = Tween::new(3.0, 7.0, 0.0, Easing::Linear);
        assert!(t.finished());
        assert_eq!(t.value(), 7.0);
    }

    #[test]
    fn test_repeat_fires_per_interval() {
        let mut clock = Repeat::new(1.0);
        assert_eq!(clock.advance(0.5), 0);
        assert_eq!(clock.advance(0.6), 1);
        assert_eq!(clock.advance(2.0), 2);
    }

    #[test]
    fn test_set_interval_restarts_clock() {
        let mut clock = Repeat::new(3.0);
        clock.advance(2.9);
        clock.set_interval(0.5);
        assert_eq!(clock.interval(), 0.5);
        assert_eq!(clock.advance(0.0), 0);
        assert_eq!(clock.advance(0.4), 0);
        assert_eq!(clock.advance(0.2), 1);
    }
}
