//! Waiting in the program body.

/// Waits for the given time, seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    duration: f64,
}

impl Timer {
    pub fn new(duration: f64) -> Self {
        Timer { duration }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_valid(&self) -> bool {
        self.duration.is_finite() && self.duration >= 0.0
    }

    pub fn instruction_code(&self) -> String {
        format!("WaitTime {};", self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_time() {
        assert_eq!(Timer::new(2.5).instruction_code(), "WaitTime 2.5;");
        assert_eq!(Timer::new(1.0).instruction_code(), "WaitTime 1;");
        assert_eq!(Timer::new(0.0004).instruction_code(), "WaitTime 0.0004;");
        assert_eq!(Timer::new(12.34567).instruction_code(), "WaitTime 12.34567;");
        assert!(!Timer::new(-1.0).is_valid());
    }
}
