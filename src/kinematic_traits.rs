extern crate nalgebra as na;

use na::Isometry3;

/// Pose is used for joint frames, the robot TCP, tools and work objects. It contains both
/// Cartesian position (mm) and rotation quaternion.
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion, Vector3};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(1000.0, 0.0, 0.0);
/// // The quaternion should be normalized to represent a valid rotation.
/// let rotation = UnitQuaternion::from_quaternion(na::Quaternion::new(1.0, 0.0, 0.0, 1.0).normalize());
/// let transform = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Joint values of the closed-form solver, in radians.
pub type Joints = [f64; 6];

pub const JOINTS_AT_ZERO: Joints = [0.0; 6];

/// Up to 8 candidate solutions, each defining the rotations of the 6 joints.
/// Candidates the solver cannot reach are not included.
pub type Solutions = Vec<Joints>;

pub trait Kinematics {
    /// All reachable joint candidates (radians, normalized to (-PI, PI]) for the pose.
    fn inverse(&self, pose: &Pose) -> Solutions;

    fn forward(&self, qs: &Joints) -> Pose;
}
