//! Values of the six robot joints, degrees.

use crate::error::{Result, RobotError};
use crate::utils::format_value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RobotJointPosition {
    values: [f64; 6],
}

impl RobotJointPosition {
    pub fn new(values: [f64; 6]) -> Self {
        RobotJointPosition { values }
    }

    /// Joints are filled from the front; missing joints are 0.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() > 6 {
            return Err(RobotError::InvalidLength { expected: 6, found: values.len() });
        }
        let mut position = RobotJointPosition::default();
        position.values[..values.len()].copy_from_slice(values);
        Ok(position)
    }

    pub fn get(&self, index: usize) -> Result<f64> {
        self.values.get(index).copied().ok_or(RobotError::AxisIndexOutOfRange(index))
    }

    pub fn to_array(&self) -> [f64; 6] {
        self.values
    }

    pub fn to_rapid(&self) -> String {
        let values: Vec<String> = self.values.iter().map(|&v| format_value(v)).collect();
        format!("[{}]", values.join(", "))
    }
}

impl fmt::Display for RobotJointPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|&v| format_value(v)).collect();
        write!(f, "Robot Joint Position ({})", values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal() {
        let position = RobotJointPosition::from_slice(&[10.0, -20.126, 30.0]).unwrap();
        assert_eq!(position.to_rapid(), "[10, -20.13, 30, 0, 0, 0]");
        assert_eq!(position.to_string(), "Robot Joint Position (10, -20.13, 30, 0, 0, 0)");
        assert!(RobotJointPosition::from_slice(&[0.0; 8]).is_err());
    }
}
