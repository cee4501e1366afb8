//! Helper functions: number formatting for RAPID literals, pose construction and printing.

use crate::kinematic_traits::{Joints, Pose};
use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// Line terminator used when the generated modules are joined into text.
#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";

/// Checks the solution for validity. This is only internally needed as all returned
/// solutions are already checked.
pub(crate) mod opw_kinematics {
    use crate::kinematic_traits::Joints;

    /// Checks if all elements in the array are finite
    pub fn is_valid(qs: &Joints) -> bool {
        qs.iter().all(|&q| q.is_finite())
    }
}

/// Formats the number with at most `digits` decimals, dropping trailing zeros
/// (the "0.##" pattern of RAPID data). Negative zero is printed as 0.
pub fn format_decimal(value: f64, digits: usize) -> String {
    let mut text = format!("{:.*}", digits, value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Position or joint value, two decimals.
pub fn format_value(value: f64) -> String {
    format_decimal(value, 2)
}

/// Quaternion component, six decimals.
pub fn format_quaternion_component(value: f64) -> String {
    format_decimal(value, 6)
}

/// RAPID pose literal `[[x, y, z], [q1, q2, q3, q4]]`. The quaternion is written
/// scalar first, as RAPID expects.
pub fn format_pose(pose: &Pose) -> String {
    let t = pose.translation.vector;
    let q = pose.rotation;
    format!(
        "[[{}, {}, {}], [{}, {}, {}, {}]]",
        format_value(t.x),
        format_value(t.y),
        format_value(t.z),
        format_quaternion_component(q.w),
        format_quaternion_component(q.i),
        format_quaternion_component(q.j),
        format_quaternion_component(q.k)
    )
}

/// Builds a pose at the given origin whose local Z axis is the given normal.
/// The X axis is chosen arbitrarily (shortest rotation from world Z).
pub fn pose_from_origin_and_normal(origin: Point3<f64>, normal: Vector3<f64>) -> Pose {
    let rotation = UnitQuaternion::rotation_between(&Vector3::z(), &normal)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI));
    Isometry3::from_parts(Translation3::from(origin.coords), rotation)
}

/// Rigid motion rotating by `angle` radians about the Z axis of the frame, anchored at
/// the frame origin.
pub fn rotation_about_frame(frame: &Pose, angle: f64) -> Pose {
    let origin = frame.translation.vector;
    let axis = Unit::new_normalize(frame.rotation * Vector3::z());
    Translation3::from(origin)
        * UnitQuaternion::from_axis_angle(&axis, angle)
        * Translation3::from(-origin)
}

/// Normalizes the angle (radians) into (-PI, PI].
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Convert joints in degrees to radians
pub fn to_radians(degrees: &[f64; 6]) -> Joints {
    std::array::from_fn(|i| degrees[i].to_radians())
}

/// Convert joints in radians to degrees
pub fn to_degrees(radians: &Joints) -> [f64; 6] {
    std::array::from_fn(|i| radians[i].to_degrees())
}

/// formatting for YAML output
pub(crate) fn deg(x: &f64) -> String {
    if *x == 0.0 {
        return "0".to_string();
    }
    format!("deg({:.4})", x.to_degrees())
}

/// Print joint values, in degrees.
#[allow(dead_code)]
pub fn dump_joints(joints: &[f64; 6]) {
    let mut row_str = String::new();
    for joint_idx in 0..6 {
        row_str.push_str(&format!("{:5.2} ", joints[joint_idx]));
    }
    println!("[{}]", row_str.trim_end());
}

#[allow(dead_code)]
pub fn dump_pose(isometry: &Isometry3<f64>) {
    let translation = isometry.translation.vector;
    let rotation: UnitQuaternion<f64> = isometry.rotation;
    println!(
        "x: {:.5}, y: {:.5}, z: {:.5},  quat: {:.5},{:.5},{:.5},{:.5}",
        translation.x, translation.y, translation.z, rotation.w, rotation.i, rotation.j, rotation.k
    );
}

pub fn assert_pose_eq(ta: &Isometry3<f64>, tb: &Isometry3<f64>,
                      distance_tolerance: f64, angular_tolerance: f64) -> bool {
    fn bad(ta: &Isometry3<f64>, tb: &Isometry3<f64>) {
        dump_pose(ta);
        dump_pose(tb);
    }

    let translation_distance = (ta.translation.vector - tb.translation.vector).norm();
    let angular_distance = ta.rotation.angle_to(&tb.rotation);

    if translation_distance.abs() > distance_tolerance {
        bad(ta, tb);
        panic!("Poses have too different translations");
    }

    if angular_distance.abs() > angular_tolerance {
        bad(ta, tb);
        panic!("Poses have too different angles");
    }
    true
}
