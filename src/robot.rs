//! Kinematic model of a 6 axis robot: joint frames, limits, meshes, tool and external axes.

use crate::error::{Result, RobotError};
use crate::external_axis::ExternalAxis;
use crate::external_joint_position::UNCONNECTED;
use crate::kinematic_traits::{Kinematics, Pose, JOINTS_AT_ZERO};
use crate::kinematics_impl::OPWKinematics;
use crate::limits::Interval;
use crate::mesh::Mesh;
use crate::parameters::opw_kinematics::Parameters;
use crate::robot_tool::RobotTool;
use crate::tool::{Base, Tool};
use nalgebra::{Translation3, UnitQuaternion};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub const MAX_EXTERNAL_AXES: usize = 6;

/// Number of link meshes without the tool: base and six links.
pub const LINK_MESHES: usize = 7;

/// Robot placed in the world, at zero joint values. All poses are world coordinates in mm.
#[derive(Debug, Clone)]
pub struct Robot {
    name: String,

    /// Base, six links, and the tool mesh already moved to the mounting frame.
    meshes: Vec<Mesh>,

    /// Z axis of each frame is the rotation axis of the joint.
    joint_frames: [Pose; 6],

    /// Joint limits, degrees.
    limits: [Interval; 6],
    base: Pose,
    mounting_frame: Pose,
    tool: RobotTool,
    external_axes: Vec<ExternalAxis>,

    /// TCP at zero joint values.
    tool_pose: Pose,
    solver: OPWKinematics,

    /// Flange pose reported by the solver at zero joints, relative to the base.
    flange_at_zero: Pose,
}

impl Robot {
    /// Creates the robot, validating its definition. `meshes` are the 7 link meshes (base
    /// and six links), the tool mesh is added from the tool.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        meshes: Vec<Mesh>,
        joint_frames: Vec<Pose>,
        limits: Vec<Interval>,
        base: Pose,
        mounting_frame: Pose,
        tool: RobotTool,
        external_axes: Vec<ExternalAxis>,
    ) -> Result<Robot> {
        let name = name.into();
        if meshes.len() != LINK_MESHES {
            return Err(RobotError::InvalidRobot(format!(
                "{} link meshes given, {} expected", meshes.len(), LINK_MESHES)));
        }
        let joint_frames: [Pose; 6] = joint_frames.try_into().map_err(|frames: Vec<Pose>| {
            RobotError::InvalidRobot(format!("{} joint frames given, 6 expected", frames.len()))
        })?;
        let limits: [Interval; 6] = limits.try_into().map_err(|limits: Vec<Interval>| {
            RobotError::InvalidRobot(format!("{} joint limits given, 6 expected", limits.len()))
        })?;
        let external_axes = Self::number_external_axes(external_axes)?;

        let local: [Pose; 6] = std::array::from_fn(|i| base.inverse() * joint_frames[i]);
        let parameters = Parameters::from_joint_frames(&local)?;
        debug!("Robot {} solver parameters:\n{}", name, parameters.to_yaml());
        let solver = OPWKinematics::new(parameters);
        let flange_at_zero = solver.forward(&JOINTS_AT_ZERO);

        let mut robot = Robot {
            name,
            meshes,
            joint_frames,
            limits,
            base,
            mounting_frame,
            tool: RobotTool::default(),
            external_axes,
            tool_pose: mounting_frame,
            solver,
            flange_at_zero,
        };
        robot.mount(tool);
        Ok(robot)
    }

    fn number_external_axes(mut axes: Vec<ExternalAxis>) -> Result<Vec<ExternalAxis>> {
        if axes.len() > MAX_EXTERNAL_AXES {
            return Err(RobotError::TooManyExternalAxes(axes.len()));
        }
        if axes.iter().filter(|a| a.moves_robot()).count() > 1 {
            return Err(RobotError::MultipleRobotMovingAxes);
        }
        let mut used = HashSet::new();
        for (i, axis) in axes.iter_mut().enumerate() {
            let number = match axis.axis_number() {
                Some(n) => n,
                None => {
                    axis.set_axis_number(i as u8);
                    i as u8
                }
            };
            if number as usize >= MAX_EXTERNAL_AXES {
                return Err(RobotError::AxisIndexOutOfRange(number as usize));
            }
            if !used.insert(number) {
                return Err(RobotError::DuplicateAxisNumber(number));
            }
        }
        Ok(axes)
    }

    /// Aligns the tool attachment with the mounting frame and derives the tool mesh and TCP.
    fn mount(&mut self, tool: RobotTool) {
        let attach = self.mounting_frame * tool.attachment().inverse();
        self.meshes.truncate(LINK_MESHES);
        self.meshes.push(tool.mesh().transformed(&attach));
        self.tool_pose = attach * tool.tcp();
        self.tool = tool;
    }

    /// Same robot carrying another tool.
    pub fn with_tool(&self, tool: RobotTool) -> Robot {
        let mut robot = self.clone();
        robot.mount(tool);
        robot
    }

    /// Copy of the robot moved as a whole by the pose. External axes stay where they are.
    pub fn transformed(&self, pose: &Pose) -> Robot {
        let mut robot = self.clone();
        robot.base = pose * self.base;
        robot.mounting_frame = pose * self.mounting_frame;
        robot.joint_frames = self.joint_frames.map(|frame| pose * frame);
        robot.tool_pose = pose * self.tool_pose;
        for mesh in robot.meshes.iter_mut() {
            mesh.transform(pose);
        }
        robot
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base, six links and tool.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn joint_frames(&self) -> &[Pose; 6] {
        &self.joint_frames
    }

    pub fn limits(&self) -> &[Interval; 6] {
        &self.limits
    }

    pub fn base(&self) -> &Pose {
        &self.base
    }

    pub fn mounting_frame(&self) -> &Pose {
        &self.mounting_frame
    }

    pub fn tool(&self) -> &RobotTool {
        &self.tool
    }

    /// TCP at zero joint values.
    pub fn tool_pose(&self) -> &Pose {
        &self.tool_pose
    }

    pub fn external_axes(&self) -> &[ExternalAxis] {
        &self.external_axes
    }

    pub fn external_axis(&self, name: &str) -> Option<&ExternalAxis> {
        self.external_axes.iter().find(|a| a.name() == name)
    }

    /// The linear axis carrying the robot, if any.
    pub fn robot_moving_axis(&self) -> Option<&ExternalAxis> {
        self.external_axes.iter().find(|a| a.moves_robot())
    }

    /// Limits of each external axis slot; unset where no axis is attached.
    pub fn external_axis_limits(&self) -> [Interval; 6] {
        let mut limits = [Interval::unset(); 6];
        for axis in &self.external_axes {
            if let Some(n) = axis.axis_number() {
                limits[n as usize] = axis.axis_limits();
            }
        }
        limits
    }

    pub fn parameters(&self) -> &Parameters {
        self.solver.parameters()
    }

    pub(crate) fn solver(&self) -> &OPWKinematics {
        &self.solver
    }

    /// Displacement of the robot by the linear axis carrying it. The value is read from the
    /// slot of that axis; a missing or unconnected value counts as 0.
    pub(crate) fn base_offset(&self, external: &[f64]) -> Pose {
        match self.robot_moving_axis() {
            Some(axis) => {
                let value = axis.axis_number()
                    .and_then(|n| external.get(n as usize).copied())
                    .filter(|&v| v != UNCONNECTED)
                    .unwrap_or(0.0);
                axis.transformation_at(value).0
            }
            None => Pose::from_parts(Translation3::identity(), UnitQuaternion::identity()),
        }
    }

    /// Closed-form solver for the TCP in world coordinates, with the robot displaced by `offset`.
    pub(crate) fn tcp_kinematics(&self, offset: &Pose) -> Tool {
        Tool {
            robot: Arc::new(Base {
                robot: Arc::new(self.solver.clone()),
                base: offset * self.base,
            }),
            tool: self.flange_at_zero.inverse() * self.base.inverse() * self.tool_pose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external_axis::{ExternalLinearAxis, ExternalRotationalAxis};
    use crate::robots::irb2600id_15_185;
    use nalgebra::{Isometry3, Vector3};

    fn track(name: &str) -> ExternalAxis {
        ExternalAxis::Linear(ExternalLinearAxis::new(
            name, Isometry3::identity(), Vector3::x(), Interval::new(0.0, 4000.0)))
    }

    fn positioner(name: &str) -> ExternalAxis {
        ExternalAxis::Rotational(ExternalRotationalAxis::new(
            name, Isometry3::translation(1500.0, 0.0, 0.0), Interval::new(-180.0, 180.0)))
    }

    fn rebuild(robot: &Robot, axes: Vec<ExternalAxis>) -> Result<Robot> {
        Robot::new(robot.name(), robot.meshes()[..LINK_MESHES].to_vec(), robot.joint_frames().to_vec(),
                   robot.limits().to_vec(), *robot.base(), *robot.mounting_frame(),
                   robot.tool().clone(), axes)
    }

    #[test]
    fn test_axes_are_numbered_by_position() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let robot = rebuild(&robot, vec![positioner("p1"), track("t"), positioner("p2")]).unwrap();
        let numbers: Vec<_> = robot.external_axes().iter().map(|a| a.axis_number()).collect();
        assert_eq!(numbers, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(robot.robot_moving_axis().map(|a| a.name()), Some("t"));
        assert!(robot.external_axis_limits()[1].includes(100.0));
        assert!(!robot.external_axis_limits()[3].is_set());
    }

    #[test]
    fn test_invalid_external_axes() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        assert!(matches!(rebuild(&robot, vec![track("a"), track("b")]),
                         Err(RobotError::MultipleRobotMovingAxes)));
        assert!(matches!(rebuild(&robot, (0..7).map(|i| positioner(&format!("p{i}"))).collect()),
                         Err(RobotError::TooManyExternalAxes(7))));
        assert!(matches!(rebuild(&robot, vec![positioner("a").with_axis_number(1), positioner("b")]),
                         Err(RobotError::DuplicateAxisNumber(1))));
        assert!(matches!(rebuild(&robot, vec![positioner("a").with_axis_number(6)]),
                         Err(RobotError::AxisIndexOutOfRange(6))));
    }

    #[test]
    fn test_invalid_joint_layout() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let mut frames = robot.joint_frames().to_vec();
        frames.pop();
        assert!(matches!(Robot::new("r", vec![Mesh::empty(); LINK_MESHES], frames, robot.limits().to_vec(),
                                    Isometry3::identity(), *robot.mounting_frame(), RobotTool::default(), vec![]),
                         Err(RobotError::InvalidRobot(_))));

        // Axis 2 rotated to point along X is not an ortho-parallel arm
        let mut frames = robot.joint_frames().to_vec();
        frames[1] = Isometry3::from_parts(frames[1].translation,
                                          UnitQuaternion::rotation_between(&Vector3::z(), &Vector3::x()).unwrap());
        assert!(matches!(Robot::new("r", vec![Mesh::empty(); LINK_MESHES], frames, robot.limits().to_vec(),
                                    Isometry3::identity(), *robot.mounting_frame(), RobotTool::default(), vec![]),
                         Err(RobotError::UnsupportedGeometry(_))));
    }

    #[test]
    fn test_transformed_does_not_alias() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let moved = robot.transformed(&Isometry3::translation(0.0, 0.0, 500.0));
        assert!((moved.tool_pose().translation.z - robot.tool_pose().translation.z - 500.0).abs() < 1E-9);
        assert_eq!(robot.base().translation.z, 0.0);
    }

    #[test]
    fn test_with_tool_moves_tcp() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let gripper = RobotTool::from_tcp("gripper", Isometry3::translation(0.0, 0.0, 200.0));
        let equipped = robot.with_tool(gripper);
        // Flange Z points along world X at zero joints
        let delta = equipped.tool_pose().translation.vector - robot.tool_pose().translation.vector;
        assert!((delta - Vector3::new(200.0, 0.0, 0.0)).norm() < 1E-9);
        assert_eq!(equipped.meshes().len(), LINK_MESHES + 1);
    }
}
