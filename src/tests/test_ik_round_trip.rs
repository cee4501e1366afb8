#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use nalgebra::Isometry3;
    use crate::axis_config::AxisConfig;
    use crate::movement::{Movement, MovementType};
    use crate::robot_tool::RobotTool;
    use crate::robots::irb2600id_15_185;
    use crate::speed_data::SpeedData;
    use crate::target::RobotTarget;
    use crate::tests::test_utils::{close_poses, irb2600, same_joints};
    use crate::utils::{dump_joints, to_radians};
    use crate::zone_data::ZoneData;

    /// Joints away from the wrist singularity and the configuration boundaries.
    fn random_joints(rng: &mut StdRng) -> [f64; 6] {
        let j5: f64 = rng.gen_range(20.0..100.0);
        [
            rng.gen_range(-150.0..150.0),
            rng.gen_range(-40.0..60.0),
            rng.gen_range(-60.0..40.0),
            rng.gen_range(-150.0..150.0),
            if rng.gen_bool(0.5) { j5 } else { -j5 },
            rng.gen_range(-300.0..300.0),
        ]
    }

    #[test]
    fn test_forward_then_inverse_with_pinned_config() {
        // On a pedestal and with a tool, so the whole chain is exercised
        let tool = RobotTool::from_tcp("torch", Isometry3::translation(0.0, 50.0, 200.0));
        let robot = irb2600id_15_185(Isometry3::translation(0.0, 0.0, 500.0), tool, vec![]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for case in 0..200 {
            let joints = random_joints(&mut rng);
            let fk = robot.forward_kinematics(&joints, &[], true);
            assert!(fk.in_limits(), "case {}: {:?}", case, fk.error_text);

            let config = AxisConfig::of(robot.solver(), &to_radians(&joints));
            let target = RobotTarget::new(format!("p{}", case), fk.tcp).with_axis_config(config.cfx()).unwrap();
            let movement = Movement::new(target, SpeedData::default(), ZoneData::default(), MovementType::Joint);
            let ik = robot.inverse_kinematics(&movement, None).unwrap();

            assert!(ik.error_text.is_empty(), "case {}: {:?}", case, ik.error_text);
            assert_eq!(ik.axis_config, config);
            if !same_joints(&ik.internal_axis_values, &joints, 1E-5) {
                dump_joints(&joints);
                dump_joints(&ik.internal_axis_values);
                panic!("case {}: joints differ", case);
            }

            let check = robot.forward_kinematics(&ik.internal_axis_values, &[], true);
            assert!(close_poses(&check.tcp, &fk.tcp, 1E-6), "case {}", case);
        }
    }

    #[test]
    fn test_closest_to_zero_is_chosen() {
        let robot = irb2600();
        let joints = [0.0, 10.0, 10.0, 30.0, 30.0, 0.0];
        let fk = robot.forward_kinematics(&joints, &[], true);
        let movement = Movement::new(RobotTarget::new("near", fk.tcp), SpeedData::default(),
                                     ZoneData::default(), MovementType::Linear);
        let ik = robot.inverse_kinematics(&movement, None).unwrap();

        let within = ik.candidates.iter().filter(|c| c.within_limits()).count();
        assert!(within >= 2, "only {} candidates within limits", within);
        for (value, expected) in ik.internal_axis_values.iter().zip(joints.iter()) {
            assert!((value - expected).abs() < 1E-6, "{:?}", ik.internal_axis_values);
        }
        assert_eq!(ik.axis_config, AxisConfig::of(robot.solver(), &to_radians(&joints)));
    }

    #[test]
    fn test_reference_steers_the_choice() {
        let robot = irb2600();
        let joints = [0.0, 10.0, 10.0, 30.0, 30.0, 0.0];
        let fk = robot.forward_kinematics(&joints, &[], true);
        let movement = Movement::new(RobotTarget::new("near", fk.tcp), SpeedData::default(),
                                     ZoneData::default(), MovementType::Linear);

        // The flipped wrist: J4 and J6 turned by half a turn, J5 negated
        let flipped = [0.0, 10.0, 10.0, -150.0, -30.0, 180.0];
        let ik = robot.inverse_kinematics_with_reference(&movement, None, &flipped).unwrap();
        assert!(same_joints(&ik.internal_axis_values, &flipped, 1E-6), "{:?}", ik.internal_axis_values);
        assert!(ik.axis_config.contains(AxisConfig::WRIST_NEGATIVE));
    }

    #[test]
    fn test_fixed_config_overrides_target() {
        let robot = irb2600();
        let joints = [0.0, 10.0, 10.0, 30.0, 30.0, 0.0];
        let fk = robot.forward_kinematics(&joints, &[], true);
        let config = AxisConfig::of(robot.solver(), &to_radians(&joints));
        let target = RobotTarget::new("pinned", fk.tcp).with_axis_config(config.cfx()).unwrap();
        let movement = Movement::new(target, SpeedData::default(), ZoneData::default(), MovementType::Joint);

        let flipped = config ^ AxisConfig::WRIST_NEGATIVE;
        let ik = robot.inverse_kinematics(&movement, Some(flipped.cfx())).unwrap();
        assert_eq!(ik.axis_config, flipped);
        assert!(ik.internal_axis_values[4] < 0.0);
    }
}
