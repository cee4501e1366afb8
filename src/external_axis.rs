//! External axes: a linear track that can carry the robot, and rotational positioners
//! that carry work objects.

use crate::error::{Result, RobotError};
use crate::kinematic_traits::Pose;
use crate::limits::Interval;
use crate::mesh::Mesh;
use crate::utils::{pose_from_origin_and_normal, rotation_about_frame};
use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisType {
    Linear,
    Rotational,
}

/// Linear axis. Values are mm along the Z axis of `axis_pose`.
#[derive(Debug, Clone)]
pub struct ExternalLinearAxis {
    name: String,
    attachment: Pose,
    axis_pose: Pose,
    limits: Interval,
    axis_number: Option<u8>,
    base_mesh: Mesh,
    link_mesh: Mesh,
    moves_robot: bool,
}

/// Rotational axis. Values are degrees about the Z axis of `axis_pose`.
#[derive(Debug, Clone)]
pub struct ExternalRotationalAxis {
    name: String,
    attachment: Pose,
    axis_pose: Pose,
    limits: Interval,
    axis_number: Option<u8>,
    base_mesh: Mesh,
    link_mesh: Mesh,
}

impl ExternalLinearAxis {
    /// Axis moving along `direction` from the origin of the attachment pose. By default
    /// it moves the robot.
    pub fn new(name: impl Into<String>, attachment: Pose, direction: Vector3<f64>, limits: Interval) -> Self {
        let origin = Point3::from(attachment.translation.vector);
        ExternalLinearAxis {
            name: name.into(),
            attachment,
            axis_pose: pose_from_origin_and_normal(origin, direction),
            limits,
            axis_number: None,
            base_mesh: Mesh::empty(),
            link_mesh: Mesh::empty(),
            moves_robot: true,
        }
    }

    pub fn with_moves_robot(mut self, moves_robot: bool) -> Self {
        self.moves_robot = moves_robot;
        self
    }

    /// Unit direction of travel.
    pub fn direction(&self) -> Vector3<f64> {
        self.axis_pose.rotation * Vector3::z()
    }
}

impl ExternalRotationalAxis {
    /// Axis rotating about the Z axis of the attachment pose.
    pub fn new(name: impl Into<String>, attachment: Pose, limits: Interval) -> Self {
        ExternalRotationalAxis {
            name: name.into(),
            attachment,
            axis_pose: attachment,
            limits,
            axis_number: None,
            base_mesh: Mesh::empty(),
            link_mesh: Mesh::empty(),
        }
    }

    /// Uses a rotation axis different from the Z axis of the attachment pose.
    pub fn with_axis_pose(mut self, axis_pose: Pose) -> Self {
        self.axis_pose = axis_pose;
        self
    }
}

/// External axis attached to a robot: up to 6, numbered 0 to 5 (logic axes A to F).
#[derive(Debug, Clone)]
pub enum ExternalAxis {
    Linear(ExternalLinearAxis),
    Rotational(ExternalRotationalAxis),
}

macro_rules! common {
    ($self:expr, $axis:ident => $body:expr) => {
        match $self {
            ExternalAxis::Linear($axis) => $body,
            ExternalAxis::Rotational($axis) => $body,
        }
    };
}

impl ExternalAxis {
    pub fn name(&self) -> &str {
        common!(self, a => &a.name)
    }

    pub fn axis_type(&self) -> AxisType {
        match self {
            ExternalAxis::Linear(_) => AxisType::Linear,
            ExternalAxis::Rotational(_) => AxisType::Rotational,
        }
    }

    pub fn attachment(&self) -> &Pose {
        common!(self, a => &a.attachment)
    }

    pub fn axis_pose(&self) -> &Pose {
        common!(self, a => &a.axis_pose)
    }

    pub fn axis_limits(&self) -> Interval {
        common!(self, a => a.limits)
    }

    /// Explicit axis number, None until the robot assigns one.
    pub fn axis_number(&self) -> Option<u8> {
        common!(self, a => a.axis_number)
    }

    pub fn with_axis_number(mut self, number: u8) -> Self {
        self.set_axis_number(number);
        self
    }

    pub(crate) fn set_axis_number(&mut self, number: u8) {
        common!(self, a => a.axis_number = Some(number))
    }

    /// Logic axis letter 'A' to 'F', if numbered.
    pub fn axis_logic(&self) -> Option<char> {
        self.axis_number()
            .filter(|&n| n < 6)
            .map(|n| (b'A' + n) as char)
    }

    pub fn with_meshes(mut self, base_mesh: Mesh, link_mesh: Mesh) -> Self {
        common!(&mut self, a => {
            a.base_mesh = base_mesh;
            a.link_mesh = link_mesh;
        });
        self
    }

    /// True only for a linear axis carrying the robot.
    pub fn moves_robot(&self) -> bool {
        match self {
            ExternalAxis::Linear(a) => a.moves_robot,
            ExternalAxis::Rotational(_) => false,
        }
    }

    /// Motion of the axis at the value, with the within-limits flag. The value is not clamped.
    pub fn transformation_at(&self, value: f64) -> (Pose, bool) {
        let motion = match self {
            ExternalAxis::Linear(a) => {
                Pose::from_parts(Translation3::from(a.direction() * value), UnitQuaternion::identity())
            }
            ExternalAxis::Rotational(a) => rotation_about_frame(&a.axis_pose, value.to_radians()),
        };
        (motion, self.axis_limits().includes(value))
    }

    /// Pose of the attachment at the value, with the within-limits flag.
    pub fn position_at(&self, value: f64) -> (Pose, bool) {
        let (motion, in_limits) = self.transformation_at(value);
        (motion * self.attachment(), in_limits)
    }

    /// Pose of the attachment at the value clamped into the limits.
    pub fn position_at_safe(&self, value: f64) -> Pose {
        self.position_at(self.axis_limits().clamp(value)).0
    }

    /// Posed copies of the meshes: the base stays, the moving link follows the axis value.
    pub fn pose_meshes(&self, value: f64) -> Vec<Mesh> {
        let (motion, _) = self.transformation_at(value);
        common!(self, a => vec![a.base_mesh.clone(), a.link_mesh.transformed(&motion)])
    }

    /// End points of the segment the linear axis travels, or the ends of the rotation axis
    /// for a rotational axis (one unit either way of the axis origin).
    pub fn axis_curve(&self) -> (Point3<f64>, Point3<f64>) {
        let origin = Point3::from(self.axis_pose().translation.vector);
        let direction = self.axis_pose().rotation * Vector3::z();
        match self {
            ExternalAxis::Linear(a) => (origin + direction * a.limits.min, origin + direction * a.limits.max),
            ExternalAxis::Rotational(_) => (origin - direction, origin + direction),
        }
    }

    /// Copy of the axis moved as a whole by the pose.
    pub fn transformed(&self, pose: &Pose) -> ExternalAxis {
        let mut copy = self.clone();
        common!(&mut copy, a => {
            a.attachment = pose * a.attachment;
            a.axis_pose = pose * a.axis_pose;
            a.base_mesh.transform(pose);
            a.link_mesh.transform(pose);
        });
        copy
    }

    pub(crate) fn number_or_err(&self) -> Result<usize> {
        self.axis_number()
            .map(|n| n as usize)
            .ok_or_else(|| RobotError::InvalidRobot(format!("external axis {} has no number", self.name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Isometry3;

    fn at(x: f64, y: f64, z: f64) -> Pose {
        Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity())
    }

    #[test]
    fn test_linear_position() {
        let track = ExternalAxis::Linear(ExternalLinearAxis::new(
            "track", at(100.0, 0.0, 0.0), Vector3::x(), Interval::new(0.0, 4000.0)));
        let (pose, in_limits) = track.position_at(500.0);
        assert!(in_limits);
        assert!((pose.translation.vector - Vector3::new(600.0, 0.0, 0.0)).norm() < 1E-9);

        let (_, in_limits) = track.position_at(5000.0);
        assert!(!in_limits);
        let safe = track.position_at_safe(5000.0);
        assert!((safe.translation.x - 4100.0).abs() < 1E-9);
        assert!(track.moves_robot());
        assert_eq!(track.axis_type(), AxisType::Linear);
    }

    #[test]
    fn test_rotational_position() {
        let positioner = ExternalAxis::Rotational(ExternalRotationalAxis::new(
            "table", at(1000.0, 0.0, 0.0), Interval::new(-180.0, 180.0)));
        let (motion, in_limits) = positioner.transformation_at(90.0);
        assert!(in_limits);
        // A point 100 mm along X from the table centre ends up 100 mm along Y
        let moved = motion * Point3::new(1100.0, 0.0, 0.0);
        assert!((moved - Point3::new(1000.0, 100.0, 0.0)).norm() < 1E-9);
        assert!(!positioner.moves_robot());
    }

    #[test]
    fn test_axis_logic_and_meshes() {
        let mesh = Mesh::new(vec![Point3::new(0.0, 0.0, 0.0)], vec![]);
        let axis = ExternalAxis::Linear(ExternalLinearAxis::new(
            "track", at(0.0, 0.0, 0.0), Vector3::y(), Interval::new(0.0, 10.0)))
            .with_axis_number(2)
            .with_meshes(mesh.clone(), mesh.clone());
        assert_eq!(axis.axis_logic(), Some('C'));

        let posed = axis.pose_meshes(5.0);
        assert_eq!(posed[0], mesh);
        assert!((posed[1].vertices[0] - Point3::new(0.0, 5.0, 0.0)).norm() < 1E-9);

        let (start, end) = axis.axis_curve();
        assert!(((end - start).norm() - 10.0).abs() < 1E-9);
    }
}
