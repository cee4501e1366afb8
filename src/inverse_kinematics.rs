//! Inverse kinematics of a robot with its external axes: joint values reaching the target of
//! a movement, with the axis configuration resolved.
//!
//! The closed-form solver gives up to 8 candidates (shoulder, elbow and wrist branches).
//! Joints are then moved by whole turns into their limits where possible, and one candidate
//! is chosen:
//! - the one with the pinned axis configuration, if the target or the caller pins one;
//! - otherwise the candidate within limits that is closest to the reference joints
//!   (all zero by default);
//! - if no candidate is within limits, the one violating the limits least.
//!
//! Limit violations and unreachable targets are not errors: they are reported in
//! [`InverseKinematics::error_text`] and the result is still produced.

use crate::axis_config::AxisConfig;
use crate::error::Result;
use crate::external_joint_position::{ExternalJointPosition, EXTERNAL_AXES};
use crate::kinematic_traits::{Kinematics, JOINTS_AT_ZERO};
use crate::limits::Interval;
use crate::movement::Movement;
use crate::robot::Robot;
use crate::target::RobotTarget;
use crate::utils::to_degrees;
use tracing::{debug, warn};

/// One joint solution of the closed-form solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Joint values, degrees.
    pub joints: [f64; 6],
    pub axis_config: AxisConfig,

    /// Sum of the distances of the joints outside their limits, degrees. 0 if within limits.
    pub violation: f64,
}

impl Candidate {
    pub fn within_limits(&self) -> bool {
        self.violation == 0.0
    }

    fn distance_to(&self, reference: &[f64; 6]) -> f64 {
        self.joints.iter().zip(reference.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InverseKinematics {
    /// Joint values, degrees.
    pub internal_axis_values: [f64; 6],

    /// External axis values: attached axes resolved (unconnected becomes 0), other slots
    /// as given by the target.
    pub external_joint_position: ExternalJointPosition,
    pub axis_config: AxisConfig,
    pub internal_axis_in_limits: [bool; 6],
    pub external_axis_in_limits: [bool; EXTERNAL_AXES],
    pub error_text: Vec<String>,

    /// All candidates of the closed-form solver, after the limit adjustment.
    pub candidates: Vec<Candidate>,
}

impl InverseKinematics {
    pub fn is_reachable(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn in_limits(&self) -> bool {
        self.internal_axis_in_limits.iter().chain(self.external_axis_in_limits.iter()).all(|&ok| ok)
    }
}

impl Robot {
    /// Solves the movement with the all-zero reference. `fixed_config` pins the axis
    /// configuration and takes precedence over the one pinned by the target.
    pub fn inverse_kinematics(&self, movement: &Movement, fixed_config: Option<u8>) -> Result<InverseKinematics> {
        self.inverse_kinematics_with_reference(movement, fixed_config, &JOINTS_AT_ZERO)
    }

    /// Solves the movement, preferring the candidate closest to `reference` (degrees).
    pub fn inverse_kinematics_with_reference(
        &self,
        movement: &Movement,
        fixed_config: Option<u8>,
        reference: &[f64; 6],
    ) -> Result<InverseKinematics> {
        let pinned = match fixed_config {
            Some(cfx) => Some(AxisConfig::from_index(cfx)?),
            None => movement.target().axis_config(),
        };

        // The overriding tool changes the TCP the target is reached with
        let equipped = movement.equipped(self);
        let robot = equipped.as_ref().unwrap_or(self);

        let pose = movement.posed_global_target_pose(robot)?;
        let external = robot.resolve_external(movement.target().external_joint_position());
        let external_axis_in_limits = robot.external_in_limits(&external);
        let offset = robot.base_offset(&external.to_array());
        let solutions = robot.tcp_kinematics(&offset).inverse(&pose);

        let candidates: Vec<Candidate> = solutions.iter().map(|joints| {
            let degrees = fit_into_limits(&to_degrees(joints), robot.limits(), reference);
            Candidate {
                joints: degrees,
                axis_config: AxisConfig::of(robot.solver(), joints),
                violation: degrees.iter().zip(robot.limits().iter()).map(|(&v, l)| l.violation(v)).sum(),
            }
        }).collect();
        debug!("Target {}: {} candidates", movement.target().name(), candidates.len());

        let mut error_text = Vec::new();
        let chosen = robot.choose(&candidates, pinned, reference, movement.target(), &mut error_text);

        let (internal_axis_values, axis_config) = match chosen {
            Some(candidate) => (candidate.joints, candidate.axis_config),
            None => {
                warn!("The target {} is out of reach", movement.target().name());
                error_text.push(format!("The target {} is out of reach.", movement.target().name()));
                ([0.0; 6], pinned.unwrap_or_else(AxisConfig::empty))
            }
        };

        let internal_axis_in_limits: [bool; 6] =
            std::array::from_fn(|i| robot.limits()[i].includes(internal_axis_values[i]));
        for (i, in_limits) in external_axis_in_limits.iter().enumerate() {
            if !in_limits {
                error_text.push(format!("External axis value {} is not in range.", i));
            }
        }

        Ok(InverseKinematics {
            internal_axis_values,
            external_joint_position: external,
            axis_config,
            internal_axis_in_limits,
            external_axis_in_limits,
            error_text,
            candidates,
        })
    }

    fn choose<'a>(
        &self,
        candidates: &'a [Candidate],
        pinned: Option<AxisConfig>,
        reference: &[f64; 6],
        target: &RobotTarget,
        error_text: &mut Vec<String>,
    ) -> Option<&'a Candidate> {
        if candidates.is_empty() {
            return None;
        }

        if let Some(config) = pinned {
            if let Some(candidate) = candidates.iter().find(|c| c.axis_config == config) {
                self.report_violations(candidate, error_text);
                return Some(candidate);
            }
            warn!("Target {} has no solution with axis configuration {}", target.name(), config);
            error_text.push(format!(
                "The target {} cannot be reached with axis configuration {}.", target.name(), config));
        }

        let closest = candidates.iter()
            .filter(|c| c.within_limits())
            .min_by(|a, b| a.distance_to(reference).total_cmp(&b.distance_to(reference)));
        if let Some(candidate) = closest {
            debug!("Target {}: axis configuration {} chosen", target.name(), candidate.axis_config);
            return Some(candidate);
        }

        let least_violating = candidates.iter()
            .min_by(|a, b| a.violation.total_cmp(&b.violation))?;
        warn!("Target {}: no solution within the joint limits", target.name());
        self.report_violations(least_violating, error_text);
        Some(least_violating)
    }

    fn report_violations(&self, candidate: &Candidate, error_text: &mut Vec<String>) {
        for (i, (value, limits)) in candidate.joints.iter().zip(self.limits().iter()).enumerate() {
            if !limits.includes(*value) {
                error_text.push(format!("Internal axis value {} is not in range.", i));
            }
        }
    }

    /// The slot of every attached axis is connected (0 if left unconnected), other slots
    /// are copied.
    pub(crate) fn resolve_external(&self, position: &ExternalJointPosition) -> ExternalJointPosition {
        let mut values = position.to_array();
        for axis in self.external_axes() {
            if let Some(n) = axis.axis_number() {
                let slot = &mut values[n as usize];
                if !ExternalJointPosition::is_connected(*slot) {
                    *slot = 0.0;
                }
            }
        }
        ExternalJointPosition::from(values)
    }

    /// Slots without an attached axis count as within limits.
    pub(crate) fn external_in_limits(&self, external: &ExternalJointPosition) -> [bool; EXTERNAL_AXES] {
        let values = external.to_array();
        let limits = self.external_axis_limits();
        std::array::from_fn(|i| !limits[i].is_set() || limits[i].includes(values[i]))
    }
}

/// Moves each joint by whole turns into its limits, choosing the turn closest to the
/// reference when more than one fits. Joints that fit no turn are left as they are.
fn fit_into_limits(joints: &[f64; 6], limits: &[Interval; 6], reference: &[f64; 6]) -> [f64; 6] {
    std::array::from_fn(|i| {
        [joints[i], joints[i] - 360.0, joints[i] + 360.0]
            .into_iter()
            .filter(|v| limits[i].includes(*v))
            .min_by(|a, b| (a - reference[i]).abs().total_cmp(&(b - reference[i]).abs()))
            .unwrap_or(joints[i])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementType;
    use crate::robot_tool::RobotTool;
    use crate::robots::irb2600id_15_185;
    use crate::speed_data::SpeedData;
    use crate::zone_data::ZoneData;
    use crate::kinematic_traits::Pose;
    use nalgebra::Isometry3;

    fn movement(name: &str, pose: Pose) -> Movement {
        Movement::new(RobotTarget::new(name, pose), SpeedData::default(), ZoneData::default(),
                      MovementType::AbsoluteJoint)
    }

    #[test]
    fn test_fit_into_limits() {
        let limits = [Interval::new(-400.0, 400.0); 6];
        let fitted = fit_into_limits(&[170.0; 6], &limits, &[-200.0; 6]);
        assert_eq!(fitted[0], -190.0);

        let narrow = [Interval::new(-90.0, 90.0); 6];
        assert_eq!(fit_into_limits(&[170.0; 6], &narrow, &[0.0; 6])[0], 170.0);
        assert_eq!(fit_into_limits(&[300.0; 6], &narrow, &[0.0; 6])[0], -60.0);
    }

    #[test]
    fn test_unreachable_target() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let ik = robot.inverse_kinematics(&movement("far", Isometry3::translation(5000.0, 0.0, 0.0)), Some(3))
            .unwrap();
        assert!(!ik.is_reachable());
        assert_eq!(ik.internal_axis_values, [0.0; 6]);
        assert_eq!(ik.axis_config.cfx(), 3);
        assert_eq!(ik.error_text, vec!["The target far is out of reach.".to_string()]);
    }

    #[test]
    fn test_tcp_at_zero_resolves_to_zero_joints() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        let ik = robot.inverse_kinematics(&movement("home", *robot.tool_pose()), None).unwrap();
        assert!(ik.error_text.is_empty(), "{:?}", ik.error_text);
        for value in ik.internal_axis_values {
            assert!(value.abs() < 1E-6, "{:?}", ik.internal_axis_values);
        }
        assert_eq!(ik.axis_config.cfx(), 0);
        assert!(ik.in_limits());
    }

    #[test]
    fn test_invalid_fixed_config() {
        let robot = irb2600id_15_185(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
        assert!(robot.inverse_kinematics(&movement("home", *robot.tool_pose()), Some(8)).is_err());
    }
}
