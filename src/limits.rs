//! Closed value ranges used for joint limits and external axis limits.

use std::fmt;

/// Closed interval `[min, max]`. Joint limits are in degrees, linear axis limits in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Creates the interval; bounds given in the wrong order are swapped.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Interval { min: a, max: b }
        } else {
            Interval { min: b, max: a }
        }
    }

    /// Interval used for external axis slots that no axis occupies. Includes nothing.
    pub fn unset() -> Self {
        Interval { min: f64::NAN, max: f64::NAN }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn includes(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if !self.is_set() {
            return value;
        }
        value.clamp(self.min, self.max)
    }

    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    /// How far the value lies outside the interval, 0 if inside.
    pub fn violation(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_includes_bounds() {
        let limits = Interval::new(-95.0, 155.0);
        assert!(limits.includes(-95.0));
        assert!(limits.includes(155.0));
        assert!(!limits.includes(155.01));
    }

    #[test]
    fn test_swapped_bounds() {
        let limits = Interval::new(10.0, -10.0);
        assert_eq!(limits.min, -10.0);
        assert_eq!(limits.clamp(20.0), 10.0);
        assert_eq!(limits.violation(-15.0), 5.0);
    }

    #[test]
    fn test_unset_includes_nothing() {
        let unset = Interval::unset();
        assert!(!unset.is_set());
        assert!(!unset.includes(0.0));
        assert_eq!(unset.clamp(3.0), 3.0);
    }
}
