//! Forward kinematics of the robot with its external axes: posed meshes and the TCP.

use crate::external_joint_position::{ExternalJointPosition, EXTERNAL_AXES, UNCONNECTED};
use crate::kinematic_traits::Pose;
use crate::mesh::Mesh;
use crate::robot::Robot;
use crate::utils::rotation_about_frame;
use nalgebra::Isometry3;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ForwardKinematics {
    /// Base, six links and tool. Empty if the meshes were hidden.
    pub posed_meshes: Vec<Mesh>,

    /// Base and moving link of each external axis, in the order the axes are attached.
    pub posed_external_axis_meshes: Vec<Vec<Mesh>>,

    /// Attachment pose of each external axis, clamped into its limits.
    pub external_axis_poses: Vec<Pose>,
    pub tcp: Pose,

    /// Joint values, degrees.
    pub internal_axis_values: [f64; 6],
    pub external_axis_values: [f64; EXTERNAL_AXES],
    pub internal_axis_in_limits: [bool; 6],
    pub external_axis_in_limits: [bool; EXTERNAL_AXES],
    pub error_text: Vec<String>,
}

impl ForwardKinematics {
    /// Compares the values with the joint and external axis limits of the robot, replacing
    /// the in-limit flags and messages.
    pub fn check_limits(&mut self, robot: &Robot) {
        self.error_text.clear();
        for (i, limits) in robot.limits().iter().enumerate() {
            self.internal_axis_in_limits[i] = limits.includes(self.internal_axis_values[i]);
            if !self.internal_axis_in_limits[i] {
                self.error_text.push(format!("Internal axis value {} is not in range.", i));
            }
        }
        let external = ExternalJointPosition::from(self.external_axis_values);
        self.external_axis_in_limits = robot.external_in_limits(&external);
        for (i, in_limits) in self.external_axis_in_limits.iter().enumerate() {
            if !in_limits {
                self.error_text.push(format!("External axis value {} is not in range.", i));
            }
        }
        if !self.error_text.is_empty() {
            warn!("{}: {}", robot.name(), self.error_text.join(" "));
        }
    }

    pub fn in_limits(&self) -> bool {
        self.internal_axis_in_limits.iter().chain(self.external_axis_in_limits.iter()).all(|&ok| ok)
    }
}

impl Robot {
    /// Poses the robot at the joint values (degrees) and external axis values (mm or degrees,
    /// indexed by axis number; missing or unconnected values of attached axes count as 0).
    /// Limits are checked, but the pose is computed anyway.
    pub fn forward_kinematics(&self, internal: &[f64; 6], external: &[f64], hide_mesh: bool) -> ForwardKinematics {
        let mut given = [UNCONNECTED; EXTERNAL_AXES];
        for (slot, value) in given.iter_mut().zip(external.iter()) {
            *slot = *value;
        }
        let external_axis_values = self.resolve_external(&ExternalJointPosition::from(given)).to_array();

        let base_change = self.base_offset(&external_axis_values);

        // Each joint rotates about its frame as already moved by the joints before it
        let mut composed: Pose = Isometry3::identity();
        let mut chain: Vec<Pose> = Vec::with_capacity(6);
        for (frame, value) in self.joint_frames().iter().zip(internal.iter()) {
            let moved_frame = composed * frame;
            composed = rotation_about_frame(&moved_frame, value.to_radians()) * composed;
            chain.push(base_change * composed);
        }
        let tcp = base_change * composed * self.tool_pose();

        let posed_meshes = if hide_mesh {
            Vec::new()
        } else {
            let meshes = self.meshes();
            let mut posed = Vec::with_capacity(meshes.len());
            posed.push(meshes[0].transformed(&base_change));
            for (mesh, pose) in meshes[1..].iter().zip(chain.iter()) {
                posed.push(mesh.transformed(pose));
            }
            // The tool mesh follows the last link
            if let (Some(tool_mesh), Some(last)) = (meshes.get(7), chain.last()) {
                posed.push(tool_mesh.transformed(last));
            }
            posed
        };

        let value_of = |number: Option<u8>| number.map_or(0.0, |n| external_axis_values[n as usize]);
        let external_axis_poses = self.external_axes().iter()
            .map(|axis| axis.position_at_safe(value_of(axis.axis_number())))
            .collect();
        let posed_external_axis_meshes = if hide_mesh {
            Vec::new()
        } else {
            self.external_axes().iter()
                .map(|axis| axis.pose_meshes(axis.axis_limits().clamp(value_of(axis.axis_number()))))
                .collect()
        };

        let mut result = ForwardKinematics {
            posed_meshes,
            posed_external_axis_meshes,
            external_axis_poses,
            tcp,
            internal_axis_values: *internal,
            external_axis_values,
            internal_axis_in_limits: [true; 6],
            external_axis_in_limits: [true; EXTERNAL_AXES],
            error_text: Vec::new(),
        };
        result.check_limits(self);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external_axis::{ExternalAxis, ExternalLinearAxis};
    use crate::kinematic_traits::Kinematics;
    use crate::limits::Interval;
    use crate::robot_tool::RobotTool;
    use crate::robots::irb2600id_15_185;
    use crate::utils::{assert_pose_eq, to_radians};
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_zero_joints_give_tool_pose() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let fk = robot.forward_kinematics(&[0.0; 6], &[], false);
        assert_pose_eq(&fk.tcp, robot.tool_pose(), 1E-9, 1E-9);
        assert_eq!(fk.posed_meshes.len(), 8);
        assert!(fk.error_text.is_empty());
    }

    #[test]
    fn test_joint_1_turns_tcp() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let fk = robot.forward_kinematics(&[90.0, 0.0, 0.0, 0.0, 0.0, 0.0], &[], true);
        let expected = robot.tool_pose().translation.vector;
        assert!((fk.tcp.translation.vector - Vector3::new(-expected.y, expected.x, expected.z)).norm() < 1E-9);
        assert!(fk.posed_meshes.is_empty());
    }

    #[test]
    fn test_matches_closed_form_solver() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let joints = [15.0, -20.0, 30.0, 45.0, -60.0, 75.0];
        let fk = robot.forward_kinematics(&joints, &[], true);
        let solver = robot.tcp_kinematics(&Isometry3::identity());
        assert_pose_eq(&fk.tcp, &solver.forward(&to_radians(&joints)), 1E-6, 1E-6);
    }

    #[test]
    fn test_track_moves_robot() {
        let track = ExternalAxis::Linear(ExternalLinearAxis::new(
            "track", Isometry3::identity(), Vector3::y(), Interval::new(0.0, 3000.0))
            .with_moves_robot(true));
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![track]).unwrap();
        let fk = robot.forward_kinematics(&[0.0; 6], &[1000.0], false);
        let delta = fk.tcp.translation.vector - robot.tool_pose().translation.vector;
        assert!((delta - Vector3::new(0.0, 1000.0, 0.0)).norm() < 1E-9);
        assert!(fk.in_limits());
        assert_eq!(fk.external_axis_poses.len(), 1);
        assert!((Point3::from(fk.external_axis_poses[0].translation.vector) - Point3::new(0.0, 1000.0, 0.0)).norm() < 1E-9);
    }

    #[test]
    fn test_limits_are_reported() {
        let track = ExternalAxis::Linear(ExternalLinearAxis::new(
            "track", Isometry3::identity(), Vector3::x(), Interval::new(0.0, 3000.0)));
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![track]).unwrap();
        let fk = robot.forward_kinematics(&[0.0, 160.0, 0.0, 0.0, 0.0, 0.0], &[4000.0], true);
        assert_eq!(fk.internal_axis_in_limits, [true, false, true, true, true, true]);
        assert!(!fk.external_axis_in_limits[0]);
        assert_eq!(fk.error_text, vec![
            "Internal axis value 1 is not in range.".to_string(),
            "External axis value 0 is not in range.".to_string(),
        ]);
        // The pose is still computed at the requested value
        assert!((fk.tcp.translation.x - robot.tool_pose().translation.x).abs() > 1.0);
    }
}
