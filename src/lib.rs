//! RAPID program generation with forward and inverse kinematics for six-axis ABB robots
//! with up to six external axes.
//!
//! The robot is described by the frames of its six joints, its joint limits, the tool and
//! the external axes (linear tracks carrying the robot, rotational positioners carrying the
//! work). From this description the crate
//!
//! - poses the robot and its external axes for given joint values (forward kinematics);
//! - finds joint values that reach a target, choosing among the solutions by the axis
//!   configuration (shoulder, elbow, wrist) or by proximity to a reference position, and
//!   moving joints by whole turns into their limits (inverse kinematics);
//! - generates the RAPID program module with the declarations of speeds, zones, work
//!   objects and targets followed by the instructions of `PROC main()`, and the BASE
//!   system module with the tool declarations.
//!
//! Inverse kinematics is closed-form: the joint frames are reduced to the seven OPW
//! parameters (_a1, a2, b, c1, c2, c3_ and _c4_) of a robot with an ortho-parallel basis
//! and a spherical wrist, as described in _An Analytical Solution of the Inverse Kinematics
//! Problem of Industrial Serial Manipulators with an Ortho-parallel Basis and a Spherical
//! Wrist_ by Mathias Brandstötter, Arthur Angerer, and Michael Hofbaur.
//!
//! Joint values are in degrees, lengths in mm, poses are [`nalgebra::Isometry3`].
//!
//! ```
//! use nalgebra::Isometry3;
//! use rs_rapid_kinematics::robot_tool::RobotTool;
//! use rs_rapid_kinematics::robots::irb2400_10;
//!
//! let robot = irb2400_10(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
//! let fk = robot.forward_kinematics(&[0.0, 10.0, 20.0, 0.0, 30.0, 0.0], &[], true);
//! assert!(fk.in_limits());
//! ```
//!
//! With the default feature `allow_filesystem`, cells and programs can be read from YAML
//! files (see [`cell_from_file`]) and the `rapid-gen` binary generates the modules from them.

pub mod error;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod parameters;
pub mod kinematics_impl;
pub mod tool;

pub mod limits;
pub mod mesh;
pub mod axis_config;
pub mod external_axis;
pub mod robot_tool;
pub mod robot;
pub mod robots;
pub mod frame;

pub mod forward_kinematics;
pub mod inverse_kinematics;

#[path = "actions/comment.rs"]
pub mod comment;
#[path = "actions/timer.rs"]
pub mod timer;
#[path = "actions/digital_output.rs"]
pub mod digital_output;
#[path = "actions/external_joint_position.rs"]
pub mod external_joint_position;
#[path = "actions/robot_joint_position.rs"]
pub mod robot_joint_position;
#[path = "actions/speed_data.rs"]
pub mod speed_data;
#[path = "actions/zone_data.rs"]
pub mod zone_data;
#[path = "actions/target.rs"]
pub mod target;
#[path = "actions/movement.rs"]
pub mod movement;
#[path = "actions/action.rs"]
pub mod action;

pub mod rapid_generator;

#[cfg(feature = "allow_filesystem")]
pub mod cell_from_file;

#[cfg(test)]
mod tests;
