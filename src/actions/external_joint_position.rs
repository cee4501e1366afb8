//! Values of the six external axes, as used in RAPID `extjoint` data.

use crate::error::{Result, RobotError};
use crate::utils::format_value;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Value of an axis slot that no external axis uses (RAPID `9E9`).
pub const UNCONNECTED: f64 = 9e9;

pub const EXTERNAL_AXES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalJointPosition {
    values: [f64; EXTERNAL_AXES],
}

impl ExternalJointPosition {
    /// All slots unconnected.
    pub fn new() -> Self {
        ExternalJointPosition { values: [UNCONNECTED; EXTERNAL_AXES] }
    }

    /// Slots are filled from the front; missing slots stay unconnected.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() > EXTERNAL_AXES {
            return Err(RobotError::InvalidLength { expected: EXTERNAL_AXES, found: values.len() });
        }
        let mut position = ExternalJointPosition::new();
        position.values[..values.len()].copy_from_slice(values);
        Ok(position)
    }

    pub fn is_connected(value: f64) -> bool {
        value != UNCONNECTED
    }

    pub fn len(&self) -> usize {
        EXTERNAL_AXES
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn to_array(&self) -> [f64; EXTERNAL_AXES] {
        self.values
    }

    pub fn get(&self, index: usize) -> Result<f64> {
        self.values.get(index).copied().ok_or(RobotError::AxisIndexOutOfRange(index))
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let slot = self.values.get_mut(index).ok_or(RobotError::AxisIndexOutOfRange(index))?;
        *slot = value;
        Ok(())
    }

    /// Value by logic axis letter, 'a' to 'f' in either case.
    pub fn axis(&self, letter: char) -> Result<f64> {
        self.get(Self::letter_index(letter)?)
    }

    pub fn set_axis(&mut self, letter: char, value: f64) -> Result<()> {
        self.set(Self::letter_index(letter)?, value)
    }

    fn letter_index(letter: char) -> Result<usize> {
        match letter.to_ascii_lowercase() {
            c @ 'a'..='f' => Ok(c as usize - 'a' as usize),
            _ => Err(RobotError::InvalidAxisLetter(letter)),
        }
    }

    pub fn reset(&mut self) {
        self.values = [UNCONNECTED; EXTERNAL_AXES];
    }

    /// RAPID literal, `[v1, v2, v3, v4, v5, v6]` with `9E9` for unconnected slots.
    pub fn to_rapid(&self) -> String {
        let values: Vec<String> = self.values.iter().map(|&v| format_slot(v)).collect();
        format!("[{}]", values.join(", "))
    }

    /// Applies `op` to every connected slot.
    fn scalar(&self, op: impl Fn(f64) -> f64) -> Self {
        let mut result = *self;
        for value in result.values.iter_mut().filter(|v| Self::is_connected(**v)) {
            *value = op(*value);
        }
        result
    }

    /// Combines the positions slot by slot. Two connected slots are combined, two
    /// unconnected slots stay unconnected, anything else is an error.
    fn combine(&self, other: &Self, op: impl Fn(f64, f64) -> f64) -> Result<Self> {
        let mut result = *self;
        for i in 0..EXTERNAL_AXES {
            let (a, b) = (self.values[i], other.values[i]);
            result.values[i] = match (Self::is_connected(a), Self::is_connected(b)) {
                (true, true) => op(a, b),
                (false, false) => UNCONNECTED,
                _ => return Err(RobotError::UndefinedAxisMismatch { index: i }),
            };
        }
        Ok(result)
    }
}

fn format_slot(value: f64) -> String {
    if ExternalJointPosition::is_connected(value) {
        format_value(value)
    } else {
        "9E9".to_string()
    }
}

impl Default for ExternalJointPosition {
    fn default() -> Self {
        ExternalJointPosition::new()
    }
}

impl From<[f64; EXTERNAL_AXES]> for ExternalJointPosition {
    fn from(values: [f64; EXTERNAL_AXES]) -> Self {
        ExternalJointPosition { values }
    }
}

impl fmt::Display for ExternalJointPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|&v| format_slot(v)).collect();
        write!(f, "External Joint Position ({})", values.join(", "))
    }
}

impl Add<f64> for ExternalJointPosition {
    type Output = ExternalJointPosition;

    fn add(self, value: f64) -> Self::Output {
        self.scalar(|v| v + value)
    }
}

impl Sub<f64> for ExternalJointPosition {
    type Output = ExternalJointPosition;

    fn sub(self, value: f64) -> Self::Output {
        self.scalar(|v| v - value)
    }
}

impl Mul<f64> for ExternalJointPosition {
    type Output = ExternalJointPosition;

    fn mul(self, value: f64) -> Self::Output {
        self.scalar(|v| v * value)
    }
}

impl Div<f64> for ExternalJointPosition {
    type Output = Result<ExternalJointPosition>;

    fn div(self, value: f64) -> Self::Output {
        if value == 0.0 {
            return Err(RobotError::DivideByZero);
        }
        Ok(self.scalar(|v| v / value))
    }
}

impl Add for ExternalJointPosition {
    type Output = Result<ExternalJointPosition>;

    fn add(self, other: Self) -> Self::Output {
        self.combine(&other, |a, b| a + b)
    }
}

impl Sub for ExternalJointPosition {
    type Output = Result<ExternalJointPosition>;

    fn sub(self, other: Self) -> Self::Output {
        self.combine(&other, |a, b| a - b)
    }
}

impl Mul for ExternalJointPosition {
    type Output = Result<ExternalJointPosition>;

    fn mul(self, other: Self) -> Self::Output {
        self.combine(&other, |a, b| a * b)
    }
}

impl Div for ExternalJointPosition {
    type Output = Result<ExternalJointPosition>;

    fn div(self, other: Self) -> Self::Output {
        if other.values.iter().any(|&v| v == 0.0) {
            return Err(RobotError::DivideByZero);
        }
        self.combine(&other, |a, b| a / b)
    }
}
