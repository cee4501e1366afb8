//! End effector mounted on the robot flange.

use crate::kinematic_traits::Pose;
use crate::mesh::Mesh;
use crate::utils::{format_decimal, format_quaternion_component, format_value};
use nalgebra::{Isometry3, Vector3};

pub const DEFAULT_TOOL_NAME: &str = "tool0";

/// Tool with its attachment pose (the pose that gets aligned with the robot mounting
/// frame) and its TCP pose, both in the coordinates the tool was modelled in.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotTool {
    name: String,
    mesh: Mesh,
    attachment: Pose,
    tcp: Pose,
    mass: f64,
    center_of_gravity: Vector3<f64>,
}

impl RobotTool {
    pub fn new(name: impl Into<String>, mesh: Mesh, attachment: Pose, tcp: Pose) -> Self {
        RobotTool {
            name: name.into(),
            mesh,
            attachment,
            tcp,
            mass: 0.001,
            center_of_gravity: Vector3::new(0.0, 0.0, 0.001),
        }
    }

    /// Tool without geometry whose TCP is `tcp` relative to the flange.
    pub fn from_tcp(name: impl Into<String>, tcp: Pose) -> Self {
        RobotTool::new(name, Mesh::empty(), Isometry3::identity(), tcp)
    }

    /// Load data for the tooldata declaration: mass (kg) and centre of gravity (mm, flange frame).
    pub fn with_load(mut self, mass: f64, center_of_gravity: Vector3<f64>) -> Self {
        self.mass = mass;
        self.center_of_gravity = center_of_gravity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn attachment(&self) -> &Pose {
        &self.attachment
    }

    pub fn tcp(&self) -> &Pose {
        &self.tcp
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn center_of_gravity(&self) -> &Vector3<f64> {
        &self.center_of_gravity
    }

    /// TCP relative to the attachment pose, which is the `tframe` of the RAPID tooldata.
    pub fn tool_frame(&self) -> Pose {
        self.attachment.inverse() * self.tcp
    }

    /// `PERS tooldata` declaration for the system module.
    pub fn declaration(&self) -> String {
        let frame = self.tool_frame();
        let t = frame.translation.vector;
        let q = frame.rotation;
        let cog = self.center_of_gravity;
        format!(
            " PERS tooldata {} := [TRUE, [[{}, {}, {}], [{}, {}, {}, {}]],\n\t\t\t\t\t\t[{}, [{}, {}, {}],[1, 0, 0, 0], 0, 0, 0]];",
            self.name,
            format_value(t.x), format_value(t.y), format_value(t.z),
            format_quaternion_component(q.w), format_quaternion_component(q.i),
            format_quaternion_component(q.j), format_quaternion_component(q.k),
            format_decimal(self.mass, 4),
            format_decimal(cog.x, 4), format_decimal(cog.y, 4), format_decimal(cog.z, 4),
        )
    }
}

impl Default for RobotTool {
    fn default() -> Self {
        RobotTool::from_tcp(DEFAULT_TOOL_NAME, Isometry3::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion};

    #[test]
    fn test_declaration() {
        let tool = RobotTool::new(
            "gripper",
            Mesh::empty(),
            Isometry3::from_parts(Translation3::new(10.0, 0.0, 0.0), UnitQuaternion::identity()),
            Isometry3::from_parts(Translation3::new(10.0, 0.0, 150.5), UnitQuaternion::identity()),
        );
        assert_eq!(
            tool.declaration(),
            " PERS tooldata gripper := [TRUE, [[0, 0, 150.5], [1, 0, 0, 0]],\n\t\t\t\t\t\t[0.001, [0, 0, 0.001],[1, 0, 0, 0], 0, 0, 0]];"
        );
    }

    #[test]
    fn test_default_is_tool0() {
        assert_eq!(RobotTool::default().name(), "tool0");
        assert_eq!(RobotTool::default().tool_frame(), Isometry3::identity());
    }
}
