//! Named destinations of movements.

use crate::axis_config::AxisConfig;
use crate::error::Result;
use crate::external_joint_position::ExternalJointPosition;
use crate::kinematic_traits::Pose;

/// Robot target: a pose in work object coordinates, the values of the external axes, and
/// optionally the axis configuration the robot must use to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotTarget {
    name: String,
    pose: Pose,
    axis_config: Option<AxisConfig>,
    external_joint_position: ExternalJointPosition,
}

impl RobotTarget {
    /// Target with automatic axis configuration and all external axes unconnected.
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        RobotTarget {
            name: name.into(),
            pose,
            axis_config: None,
            external_joint_position: ExternalJointPosition::new(),
        }
    }

    /// Pins the axis configuration (`cfx`, 0 to 7).
    pub fn with_axis_config(mut self, cfx: u8) -> Result<Self> {
        self.axis_config = Some(AxisConfig::from_index(cfx)?);
        Ok(self)
    }

    pub fn with_external_joint_position(mut self, position: ExternalJointPosition) -> Self {
        self.external_joint_position = position;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Pinned configuration, None if automatic.
    pub fn axis_config(&self) -> Option<AxisConfig> {
        self.axis_config
    }

    pub fn external_joint_position(&self) -> &ExternalJointPosition {
        &self.external_joint_position
    }

    /// Name of the `robtarget` variable.
    pub fn robtarget_name(&self) -> &str {
        &self.name
    }

    /// Name of the `jointtarget` constant used by absolute joint movements.
    pub fn jointtarget_name(&self) -> String {
        format!("{}_jt", self.name)
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}
