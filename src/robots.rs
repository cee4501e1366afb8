//! Hardcoded robot definitions. Meshes are not embedded, the links carry empty meshes.

use crate::error::Result;
use crate::external_axis::ExternalAxis;
use crate::kinematic_traits::Pose;
use crate::limits::Interval;
use crate::mesh::Mesh;
use crate::robot::{Robot, LINK_MESHES};
use crate::robot_tool::RobotTool;
use crate::utils::pose_from_origin_and_normal;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;

fn joint(x: f64, y: f64, z: f64, normal: Vector3<f64>) -> Pose {
    pose_from_origin_and_normal(Point3::new(x, y, z), normal)
}

/// ABB tool0 orientation at zero joints: Z forward along world X, X pointing down.
fn flange(x: f64, y: f64, z: f64) -> Pose {
    Isometry3::from_parts(Translation3::new(x, y, z),
                          UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2))
}

/// Builds the robot at the world origin and moves it to its position. A linear axis that
/// carries the robot overrides the position with its attachment pose.
fn place(
    name: &str,
    joint_frames: Vec<Pose>,
    limits: Vec<Interval>,
    mounting_frame: Pose,
    position: Pose,
    tool: RobotTool,
    external_axes: Vec<ExternalAxis>,
) -> Result<Robot> {
    let position = external_axes.iter()
        .find(|axis| axis.moves_robot())
        .map(|axis| *axis.attachment())
        .unwrap_or(position);
    let robot = Robot::new(name, vec![Mesh::empty(); LINK_MESHES], joint_frames, limits,
                           Isometry3::identity(), mounting_frame, tool, external_axes)?;
    Ok(robot.transformed(&position))
}

/// ABB IRB 2600ID-15/1.85
pub fn irb2600id_15_185(position: Pose, tool: RobotTool, external_axes: Vec<ExternalAxis>) -> Result<Robot> {
    let frames = vec![
        joint(0.0, 0.0, 0.0, Vector3::z()),
        joint(150.0, 0.0, 445.0, Vector3::y()),
        joint(150.0, 0.0, 445.0 + 900.0, Vector3::y()),
        joint(393.0, 0.0, 445.0 + 900.0 + 150.0, Vector3::x()),
        joint(150.0 + 786.0, 0.0, 445.0 + 900.0 + 150.0, Vector3::y()),
        joint(150.0 + 786.0 + 135.0, 0.0, 445.0 + 900.0 + 150.0, Vector3::x()),
    ];
    let limits = vec![
        Interval::new(-180.0, 180.0),
        Interval::new(-95.0, 155.0),
        Interval::new(-180.0, 75.0),
        Interval::new(-175.0, 175.0),
        Interval::new(-120.0, 120.0),
        Interval::new(-400.0, 400.0),
    ];
    let mounting_frame = flange(150.0 + 786.0 + 135.0, 0.0, 445.0 + 900.0 + 150.0);
    place("IRB2600ID-15/1.85", frames, limits, mounting_frame, position, tool, external_axes)
}

/// ABB IRB 2400/10
pub fn irb2400_10(position: Pose, tool: RobotTool, external_axes: Vec<ExternalAxis>) -> Result<Robot> {
    let frames = vec![
        joint(0.0, 0.0, 0.0, Vector3::z()),
        joint(100.0, 0.0, 615.0, Vector3::y()),
        joint(100.0, 0.0, 615.0 + 705.0, Vector3::y()),
        joint(400.0, 0.0, 615.0 + 705.0 + 135.0, Vector3::x()),
        joint(100.0 + 755.0, 0.0, 615.0 + 705.0 + 135.0, Vector3::y()),
        joint(100.0 + 755.0 + 85.0, 0.0, 615.0 + 705.0 + 135.0, Vector3::x()),
    ];
    let limits = vec![
        Interval::new(-180.0, 180.0),
        Interval::new(-100.0, 110.0),
        Interval::new(-60.0, 65.0),
        Interval::new(-200.0, 200.0),
        Interval::new(-120.0, 120.0),
        Interval::new(-400.0, 400.0),
    ];
    let mounting_frame = flange(100.0 + 755.0 + 85.0, 0.0, 615.0 + 705.0 + 135.0);
    place("IRB2400/10", frames, limits, mounting_frame, position, tool, external_axes)
}

/// Preset by the identifier used in cell files.
pub fn by_name(name: &str, position: Pose, tool: RobotTool, external_axes: Vec<ExternalAxis>) -> Option<Result<Robot>> {
    match name {
        "irb2600id_15_185" => Some(irb2600id_15_185(position, tool, external_axes)),
        "irb2400_10" => Some(irb2400_10(position, tool, external_axes)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_irb2600_parameters() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let p = robot.parameters();
        assert!((p.a1 - 150.0).abs() < 1E-9);
        assert!((p.a2 + 150.0).abs() < 1E-9);
        assert!(p.b.abs() < 1E-9);
        assert!((p.c1 - 445.0).abs() < 1E-9);
        assert!((p.c2 - 900.0).abs() < 1E-9);
        assert!((p.c3 - 786.0).abs() < 1E-9);
        assert!((p.c4 - 135.0).abs() < 1E-9);
        assert!((p.offsets[2] + PI / 2.0).abs() < 1E-9);
        assert_eq!(p.sign_corrections, [1; 6]);
    }

    #[test]
    fn test_irb2400_parameters() {
        let robot = irb2400_10(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let p = robot.parameters();
        assert!((p.a1 - 100.0).abs() < 1E-9);
        assert!((p.a2 + 135.0).abs() < 1E-9);
        assert!((p.c2 - 705.0).abs() < 1E-9);
        assert!((p.c3 - 755.0).abs() < 1E-9);
        assert!((p.c4 - 85.0).abs() < 1E-9);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(by_name("kuka", Isometry3::identity(), RobotTool::default(), vec![]).is_none());
    }
}
