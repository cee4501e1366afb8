//! Work objects: the coordinate systems robot targets are expressed in.
//!
//! A work object combines a user frame (typically a fixture or table) with an object frame
//! on top of it. It can be carried by a rotational external axis (a positioner): then the
//! targets expressed in it move together with that axis.

use crate::error::{Result, RobotError};
use crate::kinematic_traits::Pose;
use crate::utils::format_pose;
use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion};

pub const DEFAULT_WORK_OBJECT: &str = "wobj0";

#[derive(Debug, Clone, PartialEq)]
pub struct WorkObject {
    name: String,
    user_frame: Pose,
    object_frame: Pose,

    /// The robot holds the work object (stationary tool setups).
    robot_holds: bool,

    /// Name of the external axis carrying the work object, if any.
    external_axis: Option<String>,
}

impl WorkObject {
    pub fn new(name: impl Into<String>, user_frame: Pose) -> Self {
        WorkObject {
            name: name.into(),
            user_frame,
            object_frame: Isometry3::identity(),
            robot_holds: false,
            external_axis: None,
        }
    }

    /// User frame from three points: the origin, a point on the X axis, and a point in
    /// the XY plane (positive Y side).
    pub fn from_points(name: impl Into<String>, origin: Point3<f64>, x_point: Point3<f64>,
                       xy_point: Point3<f64>) -> Result<Self> {
        let v1 = x_point - origin;
        let v2 = xy_point - origin;
        if v1.cross(&v2).norm() == 0.0 {
            return Err(RobotError::ColinearPoints);
        }

        // Create orthonormal basis
        let x = v1.normalize();
        let z = v1.cross(&v2).normalize();
        let y = z.cross(&x);

        let rotation_matrix = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
        let rotation = UnitQuaternion::from_rotation_matrix(&rotation_matrix);
        Ok(WorkObject::new(name, Isometry3::from_parts(Translation3::from(origin.coords), rotation)))
    }

    pub fn with_object_frame(mut self, object_frame: Pose) -> Self {
        self.object_frame = object_frame;
        self
    }

    pub fn with_robot_holds(mut self, robot_holds: bool) -> Self {
        self.robot_holds = robot_holds;
        self
    }

    /// Attaches the work object to the named external axis of the robot.
    pub fn with_external_axis(mut self, axis_name: impl Into<String>) -> Self {
        self.external_axis = Some(axis_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user_frame(&self) -> &Pose {
        &self.user_frame
    }

    pub fn object_frame(&self) -> &Pose {
        &self.object_frame
    }

    pub fn robot_holds(&self) -> bool {
        self.robot_holds
    }

    pub fn external_axis(&self) -> Option<&str> {
        self.external_axis.as_deref()
    }

    /// Object frame in world coordinates.
    pub fn global_pose(&self) -> Pose {
        self.user_frame * self.object_frame
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_WORK_OBJECT
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// `PERS wobjdata` declaration. Empty for `wobj0`, which the system module declares.
    pub fn declaration_code(&self) -> String {
        if self.is_default() {
            return String::new();
        }
        let (fixed, unit) = match &self.external_axis {
            Some(axis) => ("FALSE", axis.as_str()),
            None => ("TRUE", ""),
        };
        format!(
            "PERS wobjdata {} := [{}, {}, \"{}\", {}, {}];",
            self.name,
            if self.robot_holds { "TRUE" } else { "FALSE" },
            fixed,
            unit,
            format_pose(&self.user_frame),
            format_pose(&self.object_frame)
        )
    }
}

impl Default for WorkObject {
    fn default() -> Self {
        WorkObject::new(DEFAULT_WORK_OBJECT, Isometry3::identity())
    }
}
