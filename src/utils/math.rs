//! src/utils/math.rs
//! Scalar helpers for frame-to-frame animation

/// A value that walks back and forth across `[0, 1]` by a fixed step.
///
/// A step that would leave the range lands exactly on the bound and the
/// direction flips, so the value never overshoots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    value: f32,
    step: f32,
}

impl Oscillator {
    pub const DEFAULT_STEP: f32 = 0.05;

    /// `start` is clamped into range and the oscillator initially rises.
    pub fn new(start: f32, step: f32) -> Self {
        Self {
            value: start.clamp(0.0, 1.0),
            step: step.abs(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Signed step applied on the next `advance`.
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn is_rising(&self) -> bool {
        self.step >= 0.0
    }

    /// Moves one step and returns the new value.
    pub fn advance(&mut self) -> f32 {
        let next = self.value + self.step;
        if next >= 1.0 {
            self.value = 1.0;
            self.step = -self.step.abs();
        } else if next <= 0.0 {
            self.value = 0.0;
            self.step = self.step.abs();
        } else {
            self.value = next;
        }
        self.value
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(0.0, Self::DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stays_in_range_over_long_run() {
        let mut osc = Oscillator::default();
        for _ in 0..100_000 {
            let v = osc.advance();
            assert!((0.0..=1.0).contains(&v), "value escaped range: {}", v);
        }
    }

    #[test]
    fn test_reverses_only_at_bounds() {
        let mut osc = Oscillator::new(0.0, 0.07);
        let mut rising = osc.is_rising();
        let mut flips = 0;

        for _ in 0..10_000 {
            let v = osc.advance();
            if osc.is_rising() != rising {
                flips += 1;
                if rising {
                    assert_eq!(v, 1.0);
                } else {
                    assert_eq!(v, 0.0);
                }
                rising = osc.is_rising();
            }
        }

        assert!(flips > 100);
    }

    #[test]
    fn test_default_cycle_hits_both_bounds() {
        let mut osc = Oscillator::default();
        let values: Vec<f32> = (0..60).map(|_| osc.advance()).collect();

        assert!(values.contains(&1.0));
        assert!(values.contains(&0.0));
        assert!((values[0] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_start_is_clamped() {
        assert_eq!(Oscillator::new(3.0, 0.1).value(), 1.0);
        assert_eq!(Oscillator::new(-1.0, 0.1).value(), 0.0);

        let mut osc = Oscillator::new(1.0, 0.25);
        assert_eq!(osc.advance(), 1.0);
        assert!(!osc.is_rising());
        assert_eq!(osc.advance(), 0.75);
    }

    #[test]
    fn test_full_step_bounces_between_bounds() {
        let mut osc = Oscillator::new(0.0, 1.0);
        assert_eq!(osc.advance(), 1.0);
        assert_eq!(osc.advance(), 0.0);
        assert_eq!(osc.advance(), 1.0);
    }
}
