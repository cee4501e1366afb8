//! ABB axis configuration (the `cfx` digit of `confdata`) of a joint solution.

use bitflags::bitflags;
use crate::kinematic_traits::Joints;
use crate::kinematics_impl::OPWKinematics;
use crate::error::{Result, RobotError};
use std::fmt;

bitflags! {
    /// Branch of the closed-form solution. The numeric value is the `cfx` digit, 0 to 7.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AxisConfig: u8 {
        /// Axis 5 is negative.
        const WRIST_NEGATIVE =  0b001;

        /// Wrist centre is behind the lower arm.
        const ELBOW_BEHIND =    0b010;

        /// Wrist centre is behind axis 1.
        const SHOULDER_BEHIND = 0b100;
    }
}

impl AxisConfig {
    pub fn from_index(cfx: u8) -> Result<Self> {
        AxisConfig::from_bits(cfx).ok_or(RobotError::InvalidAxisConfiguration(cfx))
    }

    pub fn cfx(&self) -> u8 {
        self.bits()
    }

    /// Configuration of the joint solution (radians, robot convention).
    pub fn of(solver: &OPWKinematics, joints: &Joints) -> Self {
        let p = solver.parameters();
        let q = solver.solver_angles(joints);
        let psi3 = f64::atan2(p.a2, p.c3);
        let k = f64::sqrt(p.a2 * p.a2 + p.c3 * p.c3);

        // Wrist centre in the arm plane, measured from axis 1.
        let cx1 = p.c2 * q[1].sin() + k * (q[1] + q[2] + psi3).sin() + p.a1;

        let mut config = AxisConfig::empty();
        if cx1 < 0.0 {
            config |= AxisConfig::SHOULDER_BEHIND;
        }
        if (q[2] + psi3).sin() < 0.0 {
            config |= AxisConfig::ELBOW_BEHIND;
        }
        if joints[4] < 0.0 {
            config |= AxisConfig::WRIST_NEGATIVE;
        }
        config
    }
}

impl fmt::Display for AxisConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.cfx())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematic_traits::Kinematics;
    use crate::parameters::opw_kinematics::Parameters;
    use std::collections::HashSet;
    use std::f64::consts::PI;

    fn abb_1660() -> OPWKinematics {
        OPWKinematics::new(Parameters {
            a1: 150.0,
            a2: -110.0,
            b: 0.0,
            c1: 486.5,
            c2: 700.0,
            c3: 678.0,
            c4: 135.0,
            offsets: [0.0, 0.0, -PI / 2.0, 0.0, 0.0, 0.0],
            sign_corrections: [1; 6],
        })
    }

    fn radians(degrees: [f64; 6]) -> Joints {
        degrees.map(|d| d.to_radians())
    }

    #[test]
    fn test_known_configurations() {
        let robot = abb_1660();
        let cases = [
            ([-103.1, -85.03, 19.06, -70.19, -35.87, 185.01], 5),
            ([-124.68, -61.16, -20.4, 56.41, -38.79, -24.56], 5),
            ([-103.1, -85.03, 19.06, 109.81, 35.87, 5.01], 4),
            ([-127.36, -62.29, -16.83, -120.65, 35.14, 156.58], 4),
            ([0.0, 10.0, 10.0, 30.0, 30.0, 0.0], 0),
            ([0.0, 10.0, 10.0, 30.0, -30.0, 0.0], 1),
        ];
        for (joints, expected) in cases {
            assert_eq!(AxisConfig::of(&robot, &radians(joints)).cfx(), expected, "joints: {:?}", joints);
        }
    }

    #[test]
    fn test_branches_have_distinct_configurations() {
        let robot = abb_1660();
        let pose = robot.forward(&radians([20.0, 15.0, 5.0, 40.0, 50.0, 60.0]));
        let solutions = robot.inverse(&pose);
        assert_eq!(solutions.len(), 8);
        let configs: HashSet<u8> = solutions.iter().map(|s| AxisConfig::of(&robot, s).cfx()).collect();
        assert_eq!(configs.len(), 8);
    }

    #[test]
    fn test_invalid_index() {
        assert!(AxisConfig::from_index(7).is_ok());
        assert!(matches!(AxisConfig::from_index(8), Err(RobotError::InvalidAxisConfiguration(8))));
    }
}
