//! Error handling for robot construction, joint position arithmetic and program files.
//!
//! Only hard errors live here. Joint limit violations and unreachable targets are not errors:
//! they are collected as messages on the kinematics results, and the computation still
//! returns a value.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RobotError>;

/// Unified error for invalid robot definitions, joint position arithmetic,
/// code generation and YAML parsing.
#[derive(Error, Debug)]
pub enum RobotError {
    #[error("Invalid robot: {0}")]
    InvalidRobot(String),

    #[error("{0} external axes are defined. A maximum of 6 external axes can be attached to a robot")]
    TooManyExternalAxes(usize),

    #[error("Only one external linear axis can move the robot")]
    MultipleRobotMovingAxes,

    #[error("External axis number {0} is used more than once")]
    DuplicateAxisNumber(u8),

    #[error("Axis index {0} is out of range, must be 0 to 5")]
    AxisIndexOutOfRange(usize),

    #[error("Axis letter '{0}' is not recognized, must be a to f")]
    InvalidAxisLetter(char),

    #[error("Mismatch between two external joint positions. A defined axis value [on index {index}] \
             is combined with an undefined axis value")]
    UndefinedAxisMismatch { index: usize },

    #[error("Attempted to divide by zero")]
    DivideByZero,

    #[error("Invalid length: expected {expected}, found {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Invalid movement type {0}, must be 0 (MoveAbsJ), 1 (MoveL) or 2 (MoveJ)")]
    InvalidMovementType(i32),

    #[error("Invalid axis configuration {0}, must be 0 to 7")]
    InvalidAxisConfiguration(u8),

    #[error("The external axis '{0}' attached to the work object is not attached to the robot")]
    UnknownExternalAxis(String),

    #[error("Cannot create a frame from colinear points")]
    ColinearPoints,

    #[error("Joint layout is not supported by the closed-form solver: {0}")]
    UnsupportedGeometry(String),

    #[error("Invalid movement: {0}")]
    InvalidMovement(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
