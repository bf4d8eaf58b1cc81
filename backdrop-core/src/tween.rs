/// Time-based scalar interpolation with easing
///
/// Tweens hold no clock of their own; callers sample them with the same
/// time source the frame loop uses, so playback is deterministic.

/// Easing curves, mapping linear progress `0..=1` onto eased progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out
    #[default]
    Power1Out,
    /// Cubic ease-out
    Power2Out,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t).powi(2),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Interpolates one property from `from` to `to` starting at `start`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Start time in seconds on the caller's clock
    pub start: f64,
    /// Length in seconds
    pub duration: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: f64, duration: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// Linear progress at `now`, clamped to `0..=1`
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    /// Property value at `now`
    pub fn sample(&self, now: f64) -> f32 {
        let eased = self.easing.apply(self.progress(now));
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let tween = Tween::new(-20.0, 5.0, 1.0, 2.0, Easing::Power2Out);
        assert_eq!(tween.sample(0.0), -20.0);
        assert_eq!(tween.sample(1.0), -20.0);
        assert_eq!(tween.sample(3.0), 5.0);
        assert_eq!(tween.sample(10.0), 5.0);
        assert!(!tween.is_finished(2.9));
        assert!(tween.is_finished(3.0));
    }

    #[test]
    fn test_ease_out_leads_linear() {
        let linear = Tween::new(0.0, 1.0, 0.0, 1.0, Easing::Linear);
        let quad = Tween { easing: Easing::Power1Out, ..linear };
        let cubic = Tween { easing: Easing::Power2Out, ..linear };

        assert!((linear.sample(0.5) - 0.5).abs() < 1e-6);
        assert!((quad.sample(0.5) - 0.75).abs() < 1e-6);
        assert!((cubic.sample(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let tween = Tween::new(3.0, 7.0, 5.0, 0.0, Easing::Linear);
        assert_eq!(tween.sample(0.0), 7.0);
        assert!(tween.is_finished(0.0));
    }
}
