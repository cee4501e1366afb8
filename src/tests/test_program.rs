#[cfg(test)]
mod tests {
    use crate::action::Action;
    use crate::comment::{CodeType, Comment};
    use crate::digital_output::DigitalOutput;
    use crate::external_joint_position::ExternalJointPosition;
    use crate::movement::MovementType;
    use crate::rapid_generator::{generate, RapidGenerator, ToolRegistry};
    use crate::robot_joint_position::RobotJointPosition;
    use crate::robot_tool::RobotTool;
    use crate::tests::test_utils::{irb2600, movement, pointing_down};
    use crate::timer::Timer;
    use crate::utils::LINE_TERMINATOR;
    use nalgebra::Isometry3;

    fn pick_and_place() -> Vec<Action> {
        vec![
            Comment::new("pick and place", CodeType::Declaration).into(),
            movement("home", pointing_down(900.0, 0.0, 1000.0), MovementType::AbsoluteJoint).into(),
            movement("p1", pointing_down(1000.0, 200.0, 600.0), MovementType::Joint).into(),
            movement("p2", pointing_down(1000.0, 200.0, 400.0), MovementType::Linear)
                .with_digital_output(DigitalOutput::new("do_gripper", true)).into(),
            Timer::new(0.5).into(),
            movement("p1", pointing_down(1000.0, 200.0, 600.0), MovementType::Linear).into(),
            DigitalOutput::new("do_gripper", false).into(),
        ]
    }

    #[test]
    fn test_generation_is_repeatable() {
        let robot = irb2600();
        let actions = pick_and_place();
        let mut generator = RapidGenerator::new("main_T", &actions, &robot);
        let first = generator.generate().unwrap();
        let targets = generator.declared_targets().to_vec();
        let second = generator.generate().unwrap();
        assert_eq!(first, second);
        assert_eq!(targets, generator.declared_targets());
        assert_eq!(targets, vec!["home_jt", "p1", "p2"]);
        assert!(generator.first_movement_is_move_abs());
        assert!(generator.error_text().is_empty(), "{:?}", generator.error_text());
    }

    #[test]
    fn test_target_declared_once_before_its_instructions() {
        let robot = irb2600();
        let actions = pick_and_place();
        let mut generator = RapidGenerator::new("main_T", &actions, &robot);
        let code = generator.generate().unwrap();
        let lines: Vec<&str> = code.split(LINE_TERMINATOR).collect();

        let declarations: Vec<usize> = (0..lines.len())
            .filter(|&i| lines[i].contains("VAR robtarget p1 :="))
            .collect();
        let instructions: Vec<usize> = (0..lines.len())
            .filter(|&i| lines[i].contains("p1, v500, z10, tool0\\WObj:=wobj0;"))
            .collect();
        assert_eq!(declarations.len(), 1);
        assert_eq!(instructions.len(), 2);
        assert!(instructions.iter().all(|&i| i > declarations[0]));
        assert!(lines[instructions[0]].starts_with("\t\tMoveJ p1"));
        assert!(lines[instructions[1]].starts_with("\t\tMoveL p1"));
    }

    #[test]
    fn test_module_layout() {
        let robot = irb2600();
        let actions = pick_and_place();
        let (program, system) = generate("main_T", &actions, &robot, &ToolRegistry::new("main_T")).unwrap();
        let lines: Vec<&str> = program.split(LINE_TERMINATOR).collect();

        assert_eq!(lines[0], "MODULE main_T");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "\t! pick and place");
        assert!(lines[3].starts_with("\tCONST jointtarget home_jt := [["));
        assert!(lines[4].starts_with("\tVAR robtarget p1 := [[1000, 200, 600], [0, 0, 1, 0]], [0,0,0,"));
        assert!(lines[5].starts_with("\tVAR robtarget p2 := [[1000, 200, 400], [0, 0, 1, 0]], [0,0,0,"));
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "\tPROC main()");
        assert_eq!(lines[8], "\t\tMoveAbsJ home_jt, v500, z10, tool0\\WObj:=wobj0;");
        assert_eq!(lines[9], "\t\tMoveJ p1, v500, z10, tool0\\WObj:=wobj0;");
        assert_eq!(lines[10], "\t\tMoveLDO p2, v500, z10, tool0\\WObj:=wobj0, do_gripper, 1;");
        assert_eq!(lines[11], "\t\tWaitTime 0.5;");
        assert_eq!(lines[12], "\t\tMoveL p1, v500, z10, tool0\\WObj:=wobj0;");
        assert_eq!(lines[13], "\t\tSetDO do_gripper, 0;");
        assert_eq!(lines[14], "\tENDPROC");
        assert_eq!(lines[15], "");
        assert_eq!(lines[16], "ENDMODULE");
        assert_eq!(lines.len(), 17);

        assert!(system.starts_with("MODULE BASE (SYSMODULE, NOSTEPIN, VIEWONLY)"));
        assert!(system.ends_with("ENDMODULE"));
    }

    #[test]
    fn test_tools_of_the_registry_are_declared() {
        let robot = irb2600();
        let torch = RobotTool::from_tcp("torch", Isometry3::translation(0.0, 0.0, 250.0)).with_load(3.0, nalgebra::Vector3::new(0.0, 0.0, 80.0));
        let actions: Vec<Action> = vec![
            movement("p1", pointing_down(1000.0, 0.0, 600.0), MovementType::Joint).with_tool(torch.clone()).into(),
        ];
        let mut registry = ToolRegistry::new("cell");
        registry.register(RobotTool::default());
        registry.register(torch);

        let (program, system) = generate("main_T", &actions, &robot, &registry).unwrap();
        assert!(program.contains("MoveJ p1, v500, z10, torch\\WObj:=wobj0;"));
        assert_eq!(system.matches("PERS tooldata tool0").count(), 1);
        assert_eq!(system.matches("PERS tooldata torch").count(), 1);
    }

    #[test]
    fn test_unreachable_target_is_reported_not_failed() {
        let robot = irb2600();
        let actions: Vec<Action> = vec![
            movement("far", pointing_down(4000.0, 0.0, 0.0), MovementType::Linear).into(),
        ];
        let mut generator = RapidGenerator::new("main_T", &actions, &robot);
        let code = generator.generate().unwrap();
        assert!(code.contains("VAR robtarget far := [[4000, 0, 0], [0, 0, 1, 0]], [0,0,0,0], [9E9, 9E9, 9E9, 9E9, 9E9, 9E9]];"));
        assert_eq!(generator.error_text(), ["The target far is out of reach.".to_string()]);
        assert!(!generator.first_movement_is_move_abs());
    }

    #[test]
    fn test_joint_positions_leave_no_literals_in_module() {
        let robot = irb2600();
        let external = ExternalJointPosition::from_slice(&[10.0, 20.0]).unwrap();
        let joints = RobotJointPosition::new([0.0; 6]);
        let actions: Vec<Action> = vec![
            Action::ExternalJointPosition(external),
            Comment::new("positions", CodeType::Declaration).into(),
            Action::RobotJointPosition(joints),
            movement("p1", pointing_down(1000.0, 200.0, 600.0), MovementType::Joint).into(),
        ];
        let mut generator = RapidGenerator::new("main_T", &actions, &robot);
        let code = generator.generate().unwrap();
        let lines: Vec<&str> = code.split(LINE_TERMINATOR).collect();

        assert!(lines.iter().all(|line| !line.starts_with("\t[")), "{}", code);
        assert_eq!(lines[0], "MODULE main_T");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "\t! positions");
        assert!(lines[3].starts_with("\tVAR robtarget p1 := "));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "\tPROC main()");
        assert_eq!(lines[6], "\t\tMoveJ p1, v500, z10, tool0\\WObj:=wobj0;");
        assert_eq!(lines[7], "\tENDPROC");

        // Still available to callers outside the generator
        assert_eq!(actions[0].declaration_code(&robot).unwrap(), "[10, 20, 9E9, 9E9, 9E9, 9E9]");
        assert_eq!(actions[2].declaration_code(&robot).unwrap(), "[0, 0, 0, 0, 0, 0]");
    }

    #[test]
    fn test_external_joint_position_arithmetic() {
        let a = ExternalJointPosition::from_slice(&[100.0, 20.0]).unwrap();
        let b = ExternalJointPosition::from_slice(&[10.0, 5.0]).unwrap();
        let sum = (a + b).unwrap();
        assert_eq!(sum.to_rapid(), "[110, 25, 9E9, 9E9, 9E9, 9E9]");
        assert_eq!((sum - b).unwrap(), a);
        assert_eq!((a + 1.5).to_rapid(), "[101.5, 21.5, 9E9, 9E9, 9E9, 9E9]");

        let c = ExternalJointPosition::from_slice(&[1.0]).unwrap();
        assert!((a + c).is_err());
        assert!((a / 0.0).is_err());
    }
}
