//! Defines the OPW parameter data structure and its extraction from robot joint frames

pub mod opw_kinematics {
    use crate::error::{Result, RobotError};
    use crate::kinematic_traits::Pose;
    use crate::utils::deg;
    use nalgebra::Vector3;

    /// Directions closer than this (sine of the angle) are treated as parallel.
    const DIRECTION_TOLERANCE: f64 = 1E-6;

    /// Distances below this (mm) are treated as zero.
    const LENGTH_TOLERANCE: f64 = 1E-3;

    /// Parameters for the kinematic model of the robot (ortho-parallel basis with a
    /// spherical wrist). Lengths are in mm, offsets in radians.
    #[derive(Debug, Clone, Copy)]
    pub struct Parameters {
        /// The length of the first link of the robot (distance between joint 1 and joint 2).
        pub a1: f64,

        /// The offset of the wrist centre perpendicular to the forearm.
        pub a2: f64,

        /// The offset in the y-direction between joint 1 and joint 2.
        /// This can be 0 for robots without a lateral offset that is very common.
        pub b: f64,

        /// The vertical distance from the base (joint 1) to joint 2 along the z-axis.
        pub c1: f64,

        /// The distance between joints 2 and 3 (lower arm).
        pub c2: f64,

        /// The distance from joint 3 to the wrist centre along the forearm.
        pub c3: f64,

        /// The distance from the wrist centre to the flange (joint 6 origin).
        pub c4: f64,

        /// Offsets applied to each joint angle to adjust the reference zero position.
        pub offsets: [f64; 6],

        /// Specifies the direction of positive rotation from the zero angle for each joint.
        /// A value of `-1` reverses the default rotation direction for that joint.
        pub sign_corrections: [i8; 6],
    }

    impl Parameters {
        pub fn new() -> Self {
            Parameters {
                a1: 0.0,
                a2: 0.0,
                b: 0.0,
                c1: 0.0,
                c2: 0.0,
                c3: 0.0,
                c4: 0.0,
                offsets: [0.0; 6],
                sign_corrections: [1; 6],
            }
        }

        /// Derives the parameters from the six joint frames, given relative to the robot base
        /// at zero joint values (the Z axis of each frame is the rotation axis of the joint).
        ///
        /// Joint 1 must rotate about the vertical base axis, joints 2, 3 and 5 about axes
        /// parallel to the base Y axis, and the axes of joints 4 and 6 must lie in the arm
        /// plane and intersect the axis of joint 5 (spherical wrist).
        pub fn from_joint_frames(frames: &[Pose; 6]) -> Result<Self> {
            let axis = |i: usize| frames[i].rotation * Vector3::z();
            let origin = |i: usize| frames[i].translation.vector;
            let mut p = Parameters::new();

            p.sign_corrections[0] = parallel_sign(&axis(0), &Vector3::z(), 1)?;
            let o1 = origin(0);
            if o1.x.abs() > LENGTH_TOLERANCE || o1.y.abs() > LENGTH_TOLERANCE {
                return Err(RobotError::UnsupportedGeometry(
                    "axis 1 does not pass through the base origin".into(),
                ));
            }
            p.sign_corrections[1] = parallel_sign(&axis(1), &Vector3::y(), 2)?;
            p.sign_corrections[2] = parallel_sign(&axis(2), &Vector3::y(), 3)?;
            p.sign_corrections[4] = parallel_sign(&axis(4), &Vector3::y(), 5)?;

            let o2 = origin(1);
            let o3 = origin(2);
            let wrist = origin(4);

            p.a1 = o2.x;
            p.c1 = o2.z;
            p.b = wrist.y;

            let (dx, dz) = (o3.x - o2.x, o3.z - o2.z);
            p.c2 = dx.hypot(dz);
            if p.c2 < LENGTH_TOLERANCE {
                return Err(RobotError::UnsupportedGeometry(
                    "axes 2 and 3 coincide".into(),
                ));
            }
            let phi2 = dx.atan2(dz);
            p.offsets[1] = -phi2;

            // Forearm direction, pointing from axis 3 towards the wrist.
            let z4 = axis(3);
            if z4.y.abs() > DIRECTION_TOLERANCE {
                return Err(RobotError::UnsupportedGeometry(
                    "axis 4 is not in the arm plane".into(),
                ));
            }
            let to_wrist = wrist - o3;
            let forearm = if z4.dot(&to_wrist) >= 0.0 { z4 } else { -z4 };
            p.sign_corrections[3] = if z4.dot(&forearm) > 0.0 { 1 } else { -1 };

            if distance_to_line(&wrist, &origin(3), &z4) > LENGTH_TOLERANCE {
                return Err(RobotError::UnsupportedGeometry(
                    "axes 4 and 5 do not intersect".into(),
                ));
            }

            let phi0 = forearm.x.atan2(forearm.z);
            p.offsets[2] = -(phi0 - phi2);
            p.a2 = to_wrist.x * phi0.cos() - to_wrist.z * phi0.sin();
            p.c3 = to_wrist.x * phi0.sin() + to_wrist.z * phi0.cos();

            let z6 = axis(5);
            if z6.cross(&forearm).norm() > DIRECTION_TOLERANCE {
                return Err(RobotError::UnsupportedGeometry(
                    "axis 6 is not parallel to axis 4 at zero".into(),
                ));
            }
            if distance_to_line(&wrist, &origin(5), &z6) > LENGTH_TOLERANCE {
                return Err(RobotError::UnsupportedGeometry(
                    "axis 6 does not pass through the wrist centre".into(),
                ));
            }
            p.sign_corrections[5] = if z6.dot(&forearm) > 0.0 { 1 } else { -1 };
            p.c4 = (origin(5) - wrist).dot(&forearm);

            Ok(p)
        }

        /// Convert to string yaml representation (quick viewing, etc).
        pub fn to_yaml(&self) -> String {
            format!(
                "opw_kinematics_geometric_parameters:\n  \
              a1: {}\n  \
              a2: {}\n  \
              b: {}\n  \
              c1: {}\n  \
              c2: {}\n  \
              c3: {}\n  \
              c4: {}\n\
            opw_kinematics_joint_offsets: [{}]\n\
            opw_kinematics_joint_sign_corrections: [{}]\n",
                self.a1,
                self.a2,
                self.b,
                self.c1,
                self.c2,
                self.c3,
                self.c4,
                self.offsets.iter().map(|x| deg(x))
                    .collect::<Vec<_>>().join(","),
                self.sign_corrections.iter().map(|x| x.to_string())
                    .collect::<Vec<_>>().join(",")
            )
        }
    }

    impl Default for Parameters {
        fn default() -> Self {
            Parameters::new()
        }
    }

    /// +1 if the axis points along the expected direction, -1 if opposite.
    fn parallel_sign(axis: &Vector3<f64>, expected: &Vector3<f64>, joint: usize) -> Result<i8> {
        if axis.cross(expected).norm() > DIRECTION_TOLERANCE {
            return Err(RobotError::UnsupportedGeometry(format!(
                "axis {} must be parallel to {:?}",
                joint,
                [expected.x, expected.y, expected.z]
            )));
        }
        Ok(if axis.dot(expected) > 0.0 { 1 } else { -1 })
    }

    fn distance_to_line(point: &Vector3<f64>, line_origin: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
        let d = direction.normalize();
        let v = point - line_origin;
        (v - d * v.dot(&d)).norm()
    }
}
