//! Decorators placing a solver in the world and extending it to the tool centre point.
//! [`Tool`] and [`Base`] wrap any [`Kinematics`] and implement it themselves, so they
//! nest: the robot solves for the TCP in world coordinates through `Tool { Base { solver } }`.
//! ```
//! use std::sync::Arc;
//! use nalgebra::{Isometry3, Translation3, UnitQuaternion};
//! use rs_rapid_kinematics::kinematic_traits::{Joints, Kinematics, Pose};
//! use rs_rapid_kinematics::kinematics_impl::OPWKinematics;
//! use rs_rapid_kinematics::robot_tool::RobotTool;
//! use rs_rapid_kinematics::robots::irb2600id_15_185;
//!
//! let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
//! let robot_alone = OPWKinematics::new(*robot.parameters());
//!
//! // Track carriage 400 mm along X
//! let robot_with_base = rs_rapid_kinematics::tool::Base {
//!   robot: Arc::new(robot_alone),
//!   base: Isometry3::from_parts(Translation3::new(400.0, 0.0, 0.0), UnitQuaternion::identity()),
//! };
//!
//! // Gripper extends 200 mm along the flange Z axis
//! let robot_complete = rs_rapid_kinematics::tool::Tool {
//!   robot: Arc::new(robot_with_base),
//!   tool: Isometry3::from_parts(Translation3::new(0.0, 0.0, 200.0), UnitQuaternion::identity()),
//! };
//!
//! let joints: Joints = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
//! let tcp_pose: Pose = robot_complete.forward(&joints);
//! let solutions = robot_complete.inverse(&tcp_pose);
//! assert!(!solutions.is_empty());
//! ```

extern crate nalgebra as na;

use std::sync::Arc;
use na::Isometry3;
use crate::kinematic_traits::{Joints, Kinematics, Pose, Solutions};


/// Rigid transformation from the flange of the wrapped solver to the tool centre point.
/// Poses of the decorated solver are TCP poses.
#[derive(Clone)]
pub struct Tool {
    pub robot: Arc<dyn Kinematics>,

    /// Flange to TCP.
    pub tool: Isometry3<f64>,
}

/// Placement of the wrapped solver in the world, including the displacement by a linear
/// axis carrying the robot.
#[derive(Clone)]
pub struct Base {
    pub robot: Arc<dyn Kinematics>,

    /// World to robot base.
    pub base: Isometry3<f64>,
}

impl Kinematics for Tool {
    fn inverse(&self, tcp: &Pose) -> Solutions {
        self.robot.inverse(&(tcp * self.tool.inverse()))
    }

    fn forward(&self, qs: &Joints) -> Pose {
        self.robot.forward(qs) * self.tool
    }
}

impl Kinematics for Base {
    fn inverse(&self, tcp: &Pose) -> Solutions {
        self.robot.inverse(&(self.base.inverse() * tcp))
    }

    fn forward(&self, joints: &Joints) -> Pose {
        self.base * self.robot.forward(joints)
    }
}
