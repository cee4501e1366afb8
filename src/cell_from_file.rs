//! Reading robot cells and programs from YAML (optional, feature `allow_filesystem`).
//!
//! ```yaml
//! version: 1
//! cell:
//!   robot: irb2600id_15_185
//!   position: { position: [0, 0, 0], orientation: [1, 0, 0, 0] }
//!   tool:
//!     name: gripper
//!     tcp: { position: [0, 0, 150] }
//!     mass: 2.5
//!     center_of_gravity: [0, 0, 60]
//!   external_axes:
//!     - name: STN1
//!       type: rotational
//!       attachment: { position: [1500, 0, 0] }
//!       limits: [-180, 180]
//! program:
//!   module: main_T
//!   work_objects:
//!     - name: table
//!       user_frame: { position: [1500, 0, 0] }
//!       external_axis: STN1
//!   actions:
//!     - comment: pick and place
//!       declaration: true
//!     - move:
//!         type: joint
//!         target: { name: p10, pose: { position: [0, 0, 300], orientation: [0, 0, 1, 0] }, external: [90] }
//!         speed: 500
//!         zone: z10
//!         work_object: table
//!     - timer: 1.5
//!     - digital_output: { name: do_gripper, active: true }
//! ```
//! Poses are given by position (mm) and orientation as a unit quaternion `[w, x, y, z]`;
//! both are optional and default to the identity. Numbers may be written with or
//! without decimals.

use crate::action::Action;
use crate::comment::{CodeType, Comment};
use crate::digital_output::DigitalOutput;
use crate::error::{Result, RobotError};
use crate::external_axis::{ExternalAxis, ExternalLinearAxis, ExternalRotationalAxis};
use crate::external_joint_position::ExternalJointPosition;
use crate::frame::WorkObject;
use crate::kinematic_traits::Pose;
use crate::limits::Interval;
use crate::mesh::Mesh;
use crate::movement::{Movement, MovementType};
use crate::rapid_generator::ToolRegistry;
use crate::robot::Robot;
use crate::robot_joint_position::RobotJointPosition;
use crate::robot_tool::RobotTool;
use crate::robots;
use crate::speed_data::SpeedData;
use crate::target::RobotTarget;
use crate::timer::Timer;
use crate::zone_data::ZoneData;
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};
use std::fmt::Write;
use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader};

/// Version of the file format this crate reads and writes.
pub const FORMAT_VERSION: i64 = 1;

/// Robot cell with the tools to declare in the system module.
#[derive(Debug, Clone)]
pub struct Cell {
    pub robot: Robot,
    pub registry: ToolRegistry,
}

/// Program: module name, the work objects and extra tools it refers to, and the actions.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub module_name: String,
    pub work_objects: Vec<WorkObject>,
    pub tools: Vec<RobotTool>,
    pub actions: Vec<Action>,
}

/// Reads cell and program from the YAML file.
pub fn read_cell_file<P: AsRef<Path>>(path: P) -> Result<(Cell, Program)> {
    let contents = std::fs::read_to_string(path)?;
    parse_cell(&contents)
}

/// Parses cell and program from YAML text.
pub fn parse_cell(contents: &str) -> Result<(Cell, Program)> {
    let docs = YamlLoader::load_from_str(contents)
        .map_err(|e| RobotError::Parse(format!("{}", e)))?;
    let doc = docs.first().ok_or_else(|| RobotError::Parse("empty document".to_string()))?;

    let version = doc["version"].as_i64().ok_or_else(|| RobotError::MissingField("version".to_string()))?;
    if version != FORMAT_VERSION {
        return Err(RobotError::Parse(format!("unsupported version {} (expected {})", version, FORMAT_VERSION)));
    }

    let cell_yaml = required(doc, "cell")?;
    let robot_tool = match optional(cell_yaml, "tool") {
        Some(tool) => parse_tool(tool)?,
        None => RobotTool::default(),
    };
    let external_axes = match optional(cell_yaml, "external_axes") {
        Some(axes) => list(axes, "external_axes")?.iter().map(parse_external_axis).collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };
    let preset = string(required(cell_yaml, "robot")?, "robot")?;
    let position = match optional(cell_yaml, "position") {
        Some(pose) => parse_pose(pose)?,
        None => Isometry3::identity(),
    };
    let robot = robots::by_name(&preset, position, robot_tool.clone(), external_axes)
        .ok_or_else(|| RobotError::Parse(format!("unknown robot '{}'", preset)))??;

    let program = match optional(doc, "program") {
        Some(program) => parse_program(program, &robot)?,
        None => Program::default(),
    };

    let mut registry = ToolRegistry::new(program.module_name.clone());
    registry.register(robot_tool);
    for tool in &program.tools {
        registry.register(tool.clone());
    }
    Ok((Cell { robot, registry }, program))
}

fn parse_program(yaml: &Yaml, robot: &Robot) -> Result<Program> {
    let module_name = string(required(yaml, "module")?, "module")?;
    let work_objects = match optional(yaml, "work_objects") {
        Some(list_yaml) => list(list_yaml, "work_objects")?.iter().map(parse_work_object).collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };
    let tools = match optional(yaml, "tools") {
        Some(list_yaml) => list(list_yaml, "tools")?.iter().map(parse_tool).collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };
    let mut program = Program { module_name, work_objects, tools, actions: Vec::new() };

    if let Some(actions) = optional(yaml, "actions") {
        for action in list(actions, "actions")? {
            let parsed = parse_action(action, &program, robot)?;
            program.actions.push(parsed);
        }
    }
    Ok(program)
}

fn parse_action(yaml: &Yaml, program: &Program, robot: &Robot) -> Result<Action> {
    if let Some(text) = optional(yaml, "comment") {
        let code_type = match optional(yaml, "declaration").and_then(|d| d.as_bool()) {
            Some(true) => CodeType::Declaration,
            _ => CodeType::Instruction,
        };
        return Ok(Action::Comment(Comment::new(string(text, "comment")?, code_type)));
    }
    if let Some(duration) = optional(yaml, "timer") {
        return Ok(Action::Timer(Timer::new(number(duration, "timer")?)));
    }
    if let Some(output) = optional(yaml, "digital_output") {
        return Ok(Action::DigitalOutput(parse_digital_output(output)?));
    }
    if let Some(values) = optional(yaml, "external_joint_position") {
        return Ok(Action::ExternalJointPosition(ExternalJointPosition::from_slice(
            &numbers(values, "external_joint_position")?)?));
    }
    if let Some(values) = optional(yaml, "robot_joint_position") {
        return Ok(Action::RobotJointPosition(RobotJointPosition::from_slice(
            &numbers(values, "robot_joint_position")?)?));
    }
    if let Some(movement) = optional(yaml, "move") {
        return Ok(Action::Movement(parse_movement(movement, program, robot)?));
    }
    Err(RobotError::Parse(format!("unknown action {:?}", yaml)))
}

fn parse_movement(yaml: &Yaml, program: &Program, robot: &Robot) -> Result<Movement> {
    let movement_type = match required(yaml, "type")? {
        Yaml::Integer(value) => {
            let value = i32::try_from(*value)
                .map_err(|_| RobotError::Parse(format!("unknown movement type {}", value)))?;
            MovementType::try_from(value)?
        }
        other => match string(other, "type")?.as_str() {
            "absolute_joint" => MovementType::AbsoluteJoint,
            "linear" => MovementType::Linear,
            "joint" => MovementType::Joint,
            unknown => return Err(RobotError::Parse(format!("unknown movement type '{}'", unknown))),
        },
    };

    let target_yaml = required(yaml, "target")?;
    let mut target = RobotTarget::new(string(required(target_yaml, "name")?, "target name")?,
                                      parse_pose(required(target_yaml, "pose")?)?);
    if let Some(config) = optional(target_yaml, "config") {
        let cfx = config.as_i64().ok_or_else(|| RobotError::Parse("config must be an integer".to_string()))?;
        let cfx = u8::try_from(cfx).map_err(|_| RobotError::Parse(format!("config {} out of range", cfx)))?;
        target = target.with_axis_config(cfx)?;
    }
    if let Some(external) = optional(target_yaml, "external") {
        target = target.with_external_joint_position(
            ExternalJointPosition::from_slice(&numbers(external, "external")?)?);
    }

    let speed = match optional(yaml, "speed") {
        Some(speed) if speed.as_hash().is_some() => SpeedData::new(
            string(required(speed, "name")?, "speed name")?,
            number(required(speed, "tcp")?, "tcp")?,
            optional_number(speed, "ori", 500.0)?,
            optional_number(speed, "leax", 5000.0)?,
            optional_number(speed, "reax", 1000.0)?,
        ),
        Some(speed) => SpeedData::predefined(number(speed, "speed")?),
        None => SpeedData::default(),
    };

    let zone = match optional(yaml, "zone") {
        Some(zone) if zone.as_hash().is_some() => {
            let values = numbers(required(zone, "values")?, "zone values")?;
            let values: [f64; 6] = values.try_into().map_err(|v: Vec<f64>| {
                RobotError::InvalidLength { expected: 6, found: v.len() }
            })?;
            ZoneData::new(string(required(zone, "name")?, "zone name")?,
                          optional(zone, "finep").and_then(|f| f.as_bool()).unwrap_or(false), values)
        }
        Some(Yaml::String(name)) if name == "fine" => ZoneData::fine(),
        Some(Yaml::String(name)) => {
            let precision = name.strip_prefix('z').and_then(|p| p.parse::<f64>().ok())
                .ok_or_else(|| RobotError::Parse(format!("unknown zone '{}'", name)))?;
            ZoneData::predefined(precision)
        }
        Some(zone) => ZoneData::predefined(number(zone, "zone")?),
        None => ZoneData::default(),
    };

    let mut movement = Movement::new(target, speed, zone, movement_type);

    if let Some(tool) = optional(yaml, "tool") {
        let name = string(tool, "tool")?;
        let tool = program.tools.iter()
            .find(|t| t.name() == name)
            .cloned()
            .or_else(|| (robot.tool().name() == name).then(|| robot.tool().clone()))
            .ok_or_else(|| RobotError::Parse(format!("unknown tool '{}'", name)))?;
        movement = movement.with_tool(tool);
    }
    if let Some(work_object) = optional(yaml, "work_object") {
        let name = string(work_object, "work_object")?;
        let work_object = if name == WorkObject::default().name() {
            WorkObject::default()
        } else {
            program.work_objects.iter()
                .find(|w| w.name() == name)
                .cloned()
                .ok_or_else(|| RobotError::Parse(format!("unknown work object '{}'", name)))?
        };
        movement = movement.with_work_object(work_object);
    }
    if let Some(output) = optional(yaml, "digital_output") {
        movement = movement.with_digital_output(parse_digital_output(output)?);
    }
    Ok(movement)
}

fn parse_digital_output(yaml: &Yaml) -> Result<DigitalOutput> {
    Ok(DigitalOutput::new(
        string(required(yaml, "name")?, "digital output name")?,
        optional(yaml, "active").and_then(|a| a.as_bool()).unwrap_or(false),
    ))
}

fn parse_work_object(yaml: &Yaml) -> Result<WorkObject> {
    let mut work_object = WorkObject::new(
        string(required(yaml, "name")?, "work object name")?,
        match optional(yaml, "user_frame") {
            Some(pose) => parse_pose(pose)?,
            None => Isometry3::identity(),
        },
    );
    if let Some(pose) = optional(yaml, "object_frame") {
        work_object = work_object.with_object_frame(parse_pose(pose)?);
    }
    if let Some(holds) = optional(yaml, "robot_holds").and_then(|h| h.as_bool()) {
        work_object = work_object.with_robot_holds(holds);
    }
    if let Some(axis) = optional(yaml, "external_axis") {
        work_object = work_object.with_external_axis(string(axis, "external_axis")?);
    }
    Ok(work_object)
}

fn parse_tool(yaml: &Yaml) -> Result<RobotTool> {
    let pose_or_identity = |key: &str| -> Result<Pose> {
        match optional(yaml, key) {
            Some(pose) => parse_pose(pose),
            None => Ok(Isometry3::identity()),
        }
    };
    let mut tool = RobotTool::new(
        string(required(yaml, "name")?, "tool name")?,
        Mesh::empty(),
        pose_or_identity("attachment")?,
        pose_or_identity("tcp")?,
    );
    if let Some(mass) = optional(yaml, "mass") {
        let cog = match optional(yaml, "center_of_gravity") {
            Some(cog) => vector(cog, "center_of_gravity")?,
            None => *tool.center_of_gravity(),
        };
        tool = tool.with_load(number(mass, "mass")?, cog);
    }
    Ok(tool)
}

fn parse_external_axis(yaml: &Yaml) -> Result<ExternalAxis> {
    let name = string(required(yaml, "name")?, "axis name")?;
    let attachment = match optional(yaml, "attachment") {
        Some(pose) => parse_pose(pose)?,
        None => Isometry3::identity(),
    };
    let limits = numbers(required(yaml, "limits")?, "limits")?;
    if limits.len() != 2 {
        return Err(RobotError::InvalidLength { expected: 2, found: limits.len() });
    }
    let limits = Interval::new(limits[0], limits[1]);

    let axis = match string(required(yaml, "type")?, "axis type")?.as_str() {
        "linear" => {
            let direction = match optional(yaml, "direction") {
                Some(direction) => vector(direction, "direction")?,
                None => Vector3::x(),
            };
            let moves_robot = optional(yaml, "moves_robot").and_then(|m| m.as_bool()).unwrap_or(true);
            ExternalAxis::Linear(ExternalLinearAxis::new(name, attachment, direction, limits)
                .with_moves_robot(moves_robot))
        }
        "rotational" => {
            let mut axis = ExternalRotationalAxis::new(name, attachment, limits);
            if let Some(pose) = optional(yaml, "axis_pose") {
                axis = axis.with_axis_pose(parse_pose(pose)?);
            }
            ExternalAxis::Rotational(axis)
        }
        other => return Err(RobotError::Parse(format!("unknown axis type '{}'", other))),
    };
    match optional(yaml, "number") {
        Some(number) => {
            let n = number.as_i64().ok_or_else(|| RobotError::Parse("axis number must be an integer".to_string()))?;
            let n = u8::try_from(n).map_err(|_| RobotError::AxisIndexOutOfRange(n.max(0) as usize))?;
            Ok(axis.with_axis_number(n))
        }
        None => Ok(axis),
    }
}

fn parse_pose(yaml: &Yaml) -> Result<Pose> {
    let position = match optional(yaml, "position") {
        Some(position) => vector(position, "position")?,
        None => Vector3::zeros(),
    };
    let rotation = match optional(yaml, "orientation") {
        Some(orientation) => {
            let q = numbers(orientation, "orientation")?;
            if q.len() != 4 {
                return Err(RobotError::InvalidLength { expected: 4, found: q.len() });
            }
            UnitQuaternion::from_quaternion(Quaternion::new(q[0], q[1], q[2], q[3]))
        }
        None => UnitQuaternion::identity(),
    };
    Ok(Isometry3::from_parts(Translation3::from(position), rotation))
}

fn required<'a>(yaml: &'a Yaml, key: &str) -> Result<&'a Yaml> {
    optional(yaml, key).ok_or_else(|| RobotError::MissingField(key.to_string()))
}

fn optional<'a>(yaml: &'a Yaml, key: &str) -> Option<&'a Yaml> {
    let value = &yaml[key];
    if value.is_badvalue() || value.is_null() { None } else { Some(value) }
}

fn list<'a>(yaml: &'a Yaml, field: &str) -> Result<&'a Vec<Yaml>> {
    yaml.as_vec().ok_or_else(|| RobotError::Parse(format!("{} must be a list", field)))
}

fn string(yaml: &Yaml, field: &str) -> Result<String> {
    match yaml {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(r) => Ok(r.clone()),
        _ => Err(RobotError::Parse(format!("{} must be a string", field))),
    }
}

/// Integers and reals are both accepted.
fn number(yaml: &Yaml, field: &str) -> Result<f64> {
    match yaml {
        Yaml::Real(_) => yaml.as_f64(),
        Yaml::Integer(i) => Some(*i as f64),
        _ => None,
    }
    .ok_or_else(|| RobotError::Parse(format!("{} must be a number", field)))
}

fn optional_number(yaml: &Yaml, key: &str, default: f64) -> Result<f64> {
    optional(yaml, key).map_or(Ok(default), |v| number(v, key))
}

fn numbers(yaml: &Yaml, field: &str) -> Result<Vec<f64>> {
    list(yaml, field)?.iter().map(|v| number(v, field)).collect()
}

fn vector(yaml: &Yaml, field: &str) -> Result<Vector3<f64>> {
    let values = numbers(yaml, field)?;
    if values.len() != 3 {
        return Err(RobotError::InvalidLength { expected: 3, found: values.len() });
    }
    Ok(Vector3::new(values[0], values[1], values[2]))
}

impl Program {
    /// The `program` section of the file format. Numbers are written exactly, so reading
    /// the text back yields the same program.
    pub fn to_yaml(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "program:");
        let _ = writeln!(out, "  module: {}", quote(&self.module_name));

        if !self.work_objects.is_empty() {
            let _ = writeln!(out, "  work_objects:");
            for wobj in &self.work_objects {
                let _ = writeln!(out, "    - name: {}", quote(wobj.name()));
                let _ = writeln!(out, "      user_frame: {}", pose_yaml(wobj.user_frame()));
                let _ = writeln!(out, "      object_frame: {}", pose_yaml(wobj.object_frame()));
                let _ = writeln!(out, "      robot_holds: {}", wobj.robot_holds());
                if let Some(axis) = wobj.external_axis() {
                    let _ = writeln!(out, "      external_axis: {}", quote(axis));
                }
            }
        }

        if !self.tools.is_empty() {
            let _ = writeln!(out, "  tools:");
            for tool in &self.tools {
                let cog = tool.center_of_gravity();
                let _ = writeln!(out, "    - name: {}", quote(tool.name()));
                let _ = writeln!(out, "      attachment: {}", pose_yaml(tool.attachment()));
                let _ = writeln!(out, "      tcp: {}", pose_yaml(tool.tcp()));
                let _ = writeln!(out, "      mass: {}", tool.mass());
                let _ = writeln!(out, "      center_of_gravity: [{}, {}, {}]", cog.x, cog.y, cog.z);
            }
        }

        let _ = writeln!(out, "  actions:");
        for action in &self.actions {
            match action {
                Action::Comment(comment) => {
                    let _ = writeln!(out, "    - comment: {}", quote(comment.text()));
                    let _ = writeln!(out, "      declaration: {}", comment.code_type() == CodeType::Declaration);
                }
                Action::Timer(timer) => {
                    let _ = writeln!(out, "    - timer: {}", timer.duration());
                }
                Action::DigitalOutput(output) => {
                    let _ = writeln!(out, "    - digital_output: {}", output_yaml(output));
                }
                Action::ExternalJointPosition(position) => {
                    let _ = writeln!(out, "    - external_joint_position: {}", list_yaml(&position.to_array()));
                }
                Action::RobotJointPosition(position) => {
                    let _ = writeln!(out, "    - robot_joint_position: {}", list_yaml(&position.to_array()));
                }
                Action::Movement(movement) => write_movement(&mut out, movement),
            }
        }
        out
    }
}

fn write_movement(out: &mut String, movement: &Movement) {
    let target = movement.target();
    let movement_type = match movement.movement_type() {
        MovementType::AbsoluteJoint => "absolute_joint",
        MovementType::Linear => "linear",
        MovementType::Joint => "joint",
    };
    let _ = writeln!(out, "    - move:");
    let _ = writeln!(out, "        type: {}", movement_type);
    let _ = write!(out, "        target: {{ name: {}, pose: {}", quote(target.name()), pose_yaml(target.pose()));
    if let Some(config) = target.axis_config() {
        let _ = write!(out, ", config: {}", config.cfx());
    }
    let _ = writeln!(out, ", external: {} }}", list_yaml(&target.external_joint_position().to_array()));

    let speed = movement.speed();
    if speed.is_predefined() {
        let _ = writeln!(out, "        speed: {}", speed.v_tcp());
    } else {
        let _ = writeln!(out, "        speed: {{ name: {}, tcp: {}, ori: {}, leax: {}, reax: {} }}",
                         quote(speed.name()), speed.v_tcp(), speed.v_ori(), speed.v_leax(), speed.v_reax());
    }

    let zone = movement.zone();
    if zone.is_predefined() {
        let _ = writeln!(out, "        zone: {}", zone.name());
    } else {
        let _ = writeln!(out, "        zone: {{ name: {}, finep: {}, values: {} }}",
                         quote(zone.name()), zone.is_fine(), list_yaml(&zone.values()));
    }

    if let Some(tool) = movement.tool() {
        let _ = writeln!(out, "        tool: {}", quote(tool.name()));
    }
    let _ = writeln!(out, "        work_object: {}", quote(movement.work_object().name()));
    if let Some(output) = movement.digital_output() {
        let _ = writeln!(out, "        digital_output: {}", output_yaml(output));
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

fn list_yaml(values: &[f64]) -> String {
    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(", "))
}

fn pose_yaml(pose: &Pose) -> String {
    let t = pose.translation.vector;
    let q = pose.rotation;
    format!("{{ position: [{}, {}, {}], orientation: [{}, {}, {}, {}] }}", t.x, t.y, t.z, q.w, q.i, q.j, q.k)
}

fn output_yaml(output: &DigitalOutput) -> String {
    format!("{{ name: {}, active: {} }}", quote(output.name()), output.is_active())
}
