//! The closed set of program steps the generator turns into RAPID code.

use crate::comment::Comment;
use crate::digital_output::DigitalOutput;
use crate::error::Result;
use crate::external_joint_position::ExternalJointPosition;
use crate::movement::Movement;
use crate::robot::Robot;
use crate::robot_joint_position::RobotJointPosition;
use crate::timer::Timer;

#[derive(Debug, Clone)]
pub enum Action {
    Comment(Comment),
    Timer(Timer),
    Movement(Movement),
    DigitalOutput(DigitalOutput),
    /// Joint position literal, `declaration_code` only. The generator emits nothing for it.
    ExternalJointPosition(ExternalJointPosition),
    RobotJointPosition(RobotJointPosition),
}

impl Action {
    /// Text for the declaration block, empty if the action declares nothing. Speed, zone
    /// and work object declarations of movements are added by the generator.
    pub fn declaration_code(&self, robot: &Robot) -> Result<String> {
        Ok(match self {
            Action::Comment(comment) => comment.declaration_code(),
            Action::Movement(movement) => movement.declaration_code(robot)?,
            Action::ExternalJointPosition(position) => position.to_rapid(),
            Action::RobotJointPosition(position) => position.to_rapid(),
            Action::Timer(_) | Action::DigitalOutput(_) => String::new(),
        })
    }

    /// Text for the program body, empty if the action has no instruction.
    pub fn instruction_code(&self, robot: &Robot) -> String {
        match self {
            Action::Comment(comment) => comment.instruction_code(),
            Action::Timer(timer) => timer.instruction_code(),
            Action::Movement(movement) => movement.instruction_code(robot),
            Action::DigitalOutput(output) => output.instruction_code(),
            Action::ExternalJointPosition(_) | Action::RobotJointPosition(_) => String::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Action::Comment(_) => true,
            Action::Timer(timer) => timer.is_valid(),
            Action::Movement(movement) => movement.is_valid(),
            Action::DigitalOutput(output) => output.is_valid(),
            Action::ExternalJointPosition(_) | Action::RobotJointPosition(_) => true,
        }
    }
}

impl From<Comment> for Action {
    fn from(comment: Comment) -> Self {
        Action::Comment(comment)
    }
}

impl From<Timer> for Action {
    fn from(timer: Timer) -> Self {
        Action::Timer(timer)
    }
}

impl From<Movement> for Action {
    fn from(movement: Movement) -> Self {
        Action::Movement(movement)
    }
}

impl From<DigitalOutput> for Action {
    fn from(output: DigitalOutput) -> Self {
        Action::DigitalOutput(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CodeType;
    use crate::robot_tool::RobotTool;
    use crate::robots::irb2400_10;
    use nalgebra::Isometry3;

    fn robot() -> Robot {
        irb2400_10(Isometry3::identity(), RobotTool::default(), vec![]).unwrap()
    }

    #[test]
    fn test_timer() {
        let robot = robot();
        let action = Action::from(Timer::new(2.5));
        assert_eq!(action.instruction_code(&robot), "WaitTime 2.5;");
        assert_eq!(action.declaration_code(&robot).unwrap(), "");
        assert!(!Action::from(Timer::new(-1.0)).is_valid());
    }

    #[test]
    fn test_comment_modes() {
        let robot = robot();
        let declaration = Action::from(Comment::new("start", CodeType::Declaration));
        assert_eq!(declaration.declaration_code(&robot).unwrap(), "! start");
        assert_eq!(declaration.instruction_code(&robot), "");

        let instruction = Action::from(Comment::new("start", CodeType::Instruction));
        assert_eq!(instruction.declaration_code(&robot).unwrap(), "");
        assert_eq!(instruction.instruction_code(&robot), "! start");
    }

    #[test]
    fn test_joint_position_literals() {
        let robot = robot();
        let external = ExternalJointPosition::from_slice(&[10.0, 20.0]).unwrap();
        let action = Action::ExternalJointPosition(external);
        assert_eq!(action.declaration_code(&robot).unwrap(), "[10, 20, 9E9, 9E9, 9E9, 9E9]");
        assert_eq!(action.instruction_code(&robot), "");

        let internal = RobotJointPosition::new([0.0, 15.5, -30.0, 0.0, 90.0, 0.0]);
        assert_eq!(Action::RobotJointPosition(internal).declaration_code(&robot).unwrap(),
                   "[0, 15.5, -30, 0, 90, 0]");
    }

    #[test]
    fn test_digital_output() {
        let robot = robot();
        let action = Action::from(DigitalOutput::new("do_valve", false));
        assert_eq!(action.instruction_code(&robot), "SetDO do_valve, 0;");
        assert_eq!(action.declaration_code(&robot).unwrap(), "");
    }
}
