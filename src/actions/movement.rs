//! Robot movements: `MoveAbsJ`, `MoveL` and `MoveJ`, optionally setting a digital output.

use crate::digital_output::DigitalOutput;
use crate::error::{Result, RobotError};
use crate::external_joint_position::ExternalJointPosition;
use crate::frame::WorkObject;
use crate::inverse_kinematics::InverseKinematics;
use crate::kinematic_traits::Pose;
use crate::robot::Robot;
use crate::robot_tool::RobotTool;
use crate::speed_data::SpeedData;
use crate::target::RobotTarget;
use crate::utils::{format_decimal, format_pose, format_value};
use crate::zone_data::ZoneData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementType {
    /// `MoveAbsJ` to a joint target computed by inverse kinematics.
    AbsoluteJoint = 0,
    /// `MoveL` to a robot target.
    Linear = 1,
    /// `MoveJ` to a robot target.
    Joint = 2,
}

impl TryFrom<i32> for MovementType {
    type Error = RobotError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(MovementType::AbsoluteJoint),
            1 => Ok(MovementType::Linear),
            2 => Ok(MovementType::Joint),
            _ => Err(RobotError::InvalidMovementType(value)),
        }
    }
}

impl MovementType {
    fn instruction(&self) -> &'static str {
        match self {
            MovementType::AbsoluteJoint => "MoveAbsJ",
            MovementType::Linear => "MoveL",
            MovementType::Joint => "MoveJ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Movement {
    target: RobotTarget,
    speed: SpeedData,
    zone: ZoneData,
    movement_type: MovementType,

    /// Overrides the tool of the robot for this movement.
    tool: Option<RobotTool>,
    work_object: WorkObject,
    digital_output: Option<DigitalOutput>,
}

impl Movement {
    /// Movement with the robot tool, in `wobj0`, without a digital output.
    pub fn new(target: RobotTarget, speed: SpeedData, zone: ZoneData, movement_type: MovementType) -> Self {
        Movement {
            target,
            speed,
            zone,
            movement_type,
            tool: None,
            work_object: WorkObject::default(),
            digital_output: None,
        }
    }

    pub fn with_tool(mut self, tool: RobotTool) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn with_work_object(mut self, work_object: WorkObject) -> Self {
        self.work_object = work_object;
        self
    }

    /// `MoveLDO` / `MoveJDO` for linear and joint movements, `MoveAbsJ` followed by `SetDO`
    /// for absolute joint movements.
    pub fn with_digital_output(mut self, digital_output: DigitalOutput) -> Self {
        self.digital_output = Some(digital_output);
        self
    }

    pub fn target(&self) -> &RobotTarget {
        &self.target
    }

    pub fn speed(&self) -> &SpeedData {
        &self.speed
    }

    pub fn zone(&self) -> &ZoneData {
        &self.zone
    }

    pub fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    pub fn tool(&self) -> Option<&RobotTool> {
        self.tool.as_ref()
    }

    pub fn work_object(&self) -> &WorkObject {
        &self.work_object
    }

    /// The digital output, if one is set and valid.
    pub fn digital_output(&self) -> Option<&DigitalOutput> {
        self.digital_output.as_ref().filter(|d| d.is_valid())
    }

    pub fn is_linear(&self) -> bool {
        self.movement_type == MovementType::Linear
    }

    pub fn is_valid(&self) -> bool {
        self.target.is_valid() && self.speed.is_valid() && self.zone.is_valid() && self.work_object.is_valid()
    }

    /// Target pose in world coordinates, with the external axis of the work object at 0.
    pub fn global_target_pose(&self) -> Pose {
        self.work_object.global_pose() * self.target.pose()
    }

    /// Target pose in world coordinates, with the work object moved by its external axis to
    /// the value the target gives for that axis (0 when unconnected).
    pub fn posed_global_target_pose(&self, robot: &Robot) -> Result<Pose> {
        let global = self.global_target_pose();
        let axis_name = match self.work_object.external_axis() {
            Some(name) => name,
            None => return Ok(global),
        };
        let axis = robot.external_axis(axis_name)
            .ok_or_else(|| RobotError::UnknownExternalAxis(axis_name.to_string()))?;
        let value = self.target.external_joint_position().get(axis.number_or_err()?)?;
        let value = if ExternalJointPosition::is_connected(value) { value } else { 0.0 };
        let (motion, _) = axis.transformation_at(value);
        Ok(motion * global)
    }

    /// Name of the declared target: the `robtarget` or, for absolute joint movements,
    /// the `jointtarget`.
    pub fn variable_name(&self) -> String {
        match self.movement_type {
            MovementType::AbsoluteJoint => self.target.jointtarget_name(),
            _ => self.target.robtarget_name().to_string(),
        }
    }

    /// Name of the tool used in the instruction.
    pub fn tool_name<'a>(&'a self, robot: &'a Robot) -> &'a str {
        match &self.tool {
            Some(tool) if !tool.name().is_empty() => tool.name(),
            _ => robot.tool().name(),
        }
    }

    /// The robot as it executes this movement, carrying the overriding tool if one is set.
    pub(crate) fn equipped(&self, robot: &Robot) -> Option<Robot> {
        match &self.tool {
            Some(tool) if !tool.name().is_empty() => Some(robot.with_tool(tool.clone())),
            _ => None,
        }
    }

    /// Target declaration together with the inverse kinematics it was computed from.
    pub fn declaration(&self, robot: &Robot) -> Result<(String, InverseKinematics)> {
        let ik = robot.inverse_kinematics(self, None)?;
        let external = ik.external_joint_position.to_rapid();
        let code = match self.movement_type {
            MovementType::AbsoluteJoint => {
                let joints: Vec<String> = ik.internal_axis_values.iter().map(|&v| format_value(v)).collect();
                format!(
                    "CONST jointtarget {} := [[{}], {}];",
                    self.target.jointtarget_name(),
                    joints.join(", "),
                    external
                )
            }
            MovementType::Linear | MovementType::Joint => {
                let pose = format_pose(self.target.pose());
                // Drop the closing bracket of the pose literal to append the remaining fields
                format!(
                    "VAR robtarget {} := {}, [0,0,0,{}], {}];",
                    self.target.robtarget_name(),
                    &pose[..pose.len() - 1],
                    ik.axis_config.cfx(),
                    external
                )
            }
        };
        Ok((code, ik))
    }

    pub fn declaration_code(&self, robot: &Robot) -> Result<String> {
        Ok(self.declaration(robot)?.0)
    }

    pub fn instruction_code(&self, robot: &Robot) -> String {
        let instruction = self.movement_type.instruction();
        let arguments = format!(
            "{}, {}, {}, {}\\WObj:={}",
            self.variable_name(),
            self.speed.name(),
            self.zone.name(),
            self.tool_name(robot),
            self.work_object.name()
        );
        match (self.digital_output(), self.movement_type) {
            (None, _) => format!("{} {};", instruction, arguments),
            // No combined form exists for absolute joint movements
            (Some(output), MovementType::AbsoluteJoint) => {
                format!("{} {}; {}", instruction, arguments, output.instruction_code())
            }
            (Some(output), _) => {
                format!("{}DO {}, {}, {};", instruction, arguments, output.name(), output.value())
            }
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        format!("{} {} at {} mm/s", self.movement_type.instruction(), self.variable_name(),
                format_decimal(self.speed.v_tcp(), 1))
    }
}
