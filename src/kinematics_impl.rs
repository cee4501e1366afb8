//! Closed-form forward and inverse kinematics of the ortho-parallel arm with a spherical wrist.

use crate::kinematic_traits::{Joints, Kinematics, Pose, Solutions};
use crate::parameters::opw_kinematics::Parameters;
use crate::utils::normalize_angle;
use crate::utils::opw_kinematics::is_valid;
use nalgebra::{Isometry3, Matrix3, Rotation3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::PI;
use tracing::debug;

/// Tolerance of the forward kinematics cross check (mm and radians).
const CHECK_TOLERANCE: f64 = 1E-4;

/// Solver for the robot described by [`Parameters`]. Poses are of the flange (joint 6 origin)
/// relative to the robot base; joints in radians.
#[derive(Debug, Clone)]
pub struct OPWKinematics {
    parameters: Parameters,
}

impl OPWKinematics {
    /// Creates a new `OPWKinematics` instance with the given parameters.
    pub fn new(parameters: Parameters) -> Self {
        OPWKinematics { parameters }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Joint values as used internally by the solver (offsets and signs applied).
    pub(crate) fn solver_angles(&self, joints: &Joints) -> Joints {
        let p = &self.parameters;
        std::array::from_fn(|i| joints[i] * p.sign_corrections[i] as f64 - p.offsets[i])
    }
}

// Compare two poses with the given tolerance.
fn compare_poses(ta: &Isometry3<f64>, tb: &Isometry3<f64>, tolerance: f64) -> bool {
    let translation_distance = (ta.translation.vector - tb.translation.vector).norm();
    let angular_distance = ta.rotation.angle_to(&tb.rotation);

    if translation_distance.abs() > tolerance {
        debug!("Translation Error: {}", translation_distance);
        return false;
    }

    if angular_distance.abs() > tolerance {
        debug!("Angular Error: {}", angular_distance);
        return false;
    }
    true
}

/// Rotation of the arm up to the wrist: Rz(q1) * Ry(q2 + q3)
fn arm_rotation(q1: f64, q23: f64) -> Matrix3<f64> {
    let (s1, c1) = q1.sin_cos();
    let (s23, c23) = q23.sin_cos();
    Matrix3::new(
        c1 * c23, -s1, c1 * s23,
        s1 * c23, c1, s1 * s23,
        -s23, 0.0, c23,
    )
}

/// Wrist angles (ZYZ decomposition of the rotation remaining after the arm).
fn wrist_angles(r_ce: &Matrix3<f64>) -> (f64, f64, f64) {
    const SINGULAR: f64 = 1E-9;
    let s5 = f64::sqrt(r_ce[(0, 2)] * r_ce[(0, 2)] + r_ce[(1, 2)] * r_ce[(1, 2)]);
    let q5 = f64::atan2(s5, r_ce[(2, 2)]);
    if s5 > SINGULAR {
        let q4 = f64::atan2(r_ce[(1, 2)], r_ce[(0, 2)]);
        let q6 = f64::atan2(r_ce[(2, 1)], -r_ce[(2, 0)]);
        (q4, q5, q6)
    } else if r_ce[(2, 2)] > 0.0 {
        // Axes 4 and 6 are aligned, only their sum is defined. Joint 4 stays at zero.
        (0.0, q5, f64::atan2(r_ce[(1, 0)], r_ce[(0, 0)]))
    } else {
        (0.0, q5, f64::atan2(r_ce[(1, 0)], -r_ce[(0, 0)]))
    }
}

impl Kinematics for OPWKinematics {
    fn inverse(&self, pose: &Pose) -> Solutions {
        let p = &self.parameters;
        let rotation = pose.rotation.to_rotation_matrix();
        let matrix = rotation.matrix();
        let e = pose.translation.vector;
        let z = Vector3::new(matrix[(0, 2)], matrix[(1, 2)], matrix[(2, 2)]);

        // Wrist centre
        let c = e - p.c4 * z;

        let nx1 = f64::sqrt(c.x * c.x + c.y * c.y - p.b * p.b) - p.a1;
        let tmp1 = f64::atan2(c.y, c.x);
        let tmp2 = f64::atan2(p.b, nx1 + p.a1);
        let theta1_i = tmp1 - tmp2;
        let theta1_ii = tmp1 + tmp2 - PI;

        let tmp3 = c.z - p.c1;
        let s1_2 = nx1 * nx1 + tmp3 * tmp3;
        let tmp4 = nx1 + 2.0 * p.a1;
        let s2_2 = tmp4 * tmp4 + tmp3 * tmp3;
        let kappa_2 = p.a2 * p.a2 + p.c3 * p.c3;
        let c2_2 = p.c2 * p.c2;

        let s1 = f64::sqrt(s1_2);
        let s2 = f64::sqrt(s2_2);

        let tmp13 = f64::acos((s1_2 + c2_2 - kappa_2) / (2.0 * s1 * p.c2));
        let tmp14 = f64::atan2(nx1, tmp3);
        let theta2_i = -tmp13 + tmp14;
        let theta2_ii = tmp13 + tmp14;

        let tmp15 = f64::acos((s2_2 + c2_2 - kappa_2) / (2.0 * s2 * p.c2));
        let tmp16 = f64::atan2(tmp4, tmp3);
        let theta2_iii = -tmp15 - tmp16;
        let theta2_iv = tmp15 - tmp16;

        let tmp9 = 2.0 * p.c2 * f64::sqrt(kappa_2);
        let tmp10 = f64::atan2(p.a2, p.c3);
        let tmp11 = f64::acos((s1_2 - c2_2 - kappa_2) / tmp9);
        let tmp12 = f64::acos((s2_2 - c2_2 - kappa_2) / tmp9);
        let theta3_i = tmp11 - tmp10;
        let theta3_ii = -tmp11 - tmp10;
        let theta3_iii = tmp12 - tmp10;
        let theta3_iv = -tmp12 - tmp10;

        let arms = [
            (theta1_i, theta2_i, theta3_i),
            (theta1_i, theta2_ii, theta3_ii),
            (theta1_ii, theta2_iii, theta3_iii),
            (theta1_ii, theta2_iv, theta3_iv),
        ];

        let mut solutions: Solutions = Vec::with_capacity(8);
        for (q1, q2, q3) in arms {
            if !(q1.is_finite() && q2.is_finite() && q3.is_finite()) {
                continue;
            }
            let r_0c = arm_rotation(q1, q2 + q3);
            let r_ce = r_0c.transpose() * matrix;
            let (q4, q5, q6) = wrist_angles(&r_ce);

            for raw in [[q1, q2, q3, q4, q5, q6], [q1, q2, q3, q4 + PI, -q5, q6 - PI]] {
                let solution: Joints = std::array::from_fn(|i| {
                    normalize_angle((raw[i] + p.offsets[i]) * p.sign_corrections[i] as f64)
                });
                if !is_valid(&solution) {
                    continue;
                }
                if !compare_poses(pose, &self.forward(&solution), CHECK_TOLERANCE) {
                    debug!("Discarding candidate {:?} that fails the forward check", solution);
                    continue;
                }
                solutions.push(solution);
            }
        }
        solutions
    }

    fn forward(&self, joints: &Joints) -> Pose {
        let p = &self.parameters;
        let q = self.solver_angles(joints);

        let psi3 = f64::atan2(p.a2, p.c3);
        let k = f64::sqrt(p.a2 * p.a2 + p.c3 * p.c3);

        let cx1 = p.c2 * f64::sin(q[1]) + k * f64::sin(q[1] + q[2] + psi3) + p.a1;
        let cy1 = p.b;
        let cz1 = p.c2 * f64::cos(q[1]) + k * f64::cos(q[1] + q[2] + psi3);

        let cx0 = cx1 * f64::cos(q[0]) - cy1 * f64::sin(q[0]);
        let cy0 = cx1 * f64::sin(q[0]) + cy1 * f64::cos(q[0]);
        let cz0 = cz1 + p.c1;

        let s4 = f64::sin(q[3]);
        let s5 = f64::sin(q[4]);
        let s6 = f64::sin(q[5]);

        let c4 = f64::cos(q[3]);
        let c5 = f64::cos(q[4]);
        let c6 = f64::cos(q[5]);

        let r_0c = arm_rotation(q[0], q[1] + q[2]);

        let r_ce = Matrix3::new(
            c4 * c5 * c6 - s4 * s6, -c4 * c5 * s6 - s4 * c6, c4 * s5,
            s4 * c5 * c6 + c4 * s6, -s4 * c5 * s6 + c4 * c6, s4 * s5,
            -s5 * c6, s5 * s6, c5,
        );

        let r_oe = r_0c * r_ce;

        let translation = Vector3::new(cx0, cy0, cz0) + p.c4 * r_oe * Vector3::z();
        let rotation = Rotation3::from_matrix_unchecked(r_oe);

        Pose::from_parts(Translation3::from(translation),
                         UnitQuaternion::from_rotation_matrix(&rotation))
    }
}
