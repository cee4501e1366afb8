//! Generates the RAPID program module and the BASE system module.
//!
//! The program module is built in two passes over the actions. The declaration pass emits
//! every speed, zone, work object and target declaration once per name, in the order the
//! names are first met. The instruction pass emits the instructions in program order.
//! ```
//! use nalgebra::Isometry3;
//! use rs_rapid_kinematics::action::Action;
//! use rs_rapid_kinematics::comment::Comment;
//! use rs_rapid_kinematics::rapid_generator::{RapidGenerator, ToolRegistry};
//! use rs_rapid_kinematics::robot_tool::RobotTool;
//! use rs_rapid_kinematics::robots::irb2400_10;
//! use rs_rapid_kinematics::timer::Timer;
//!
//! let robot = irb2400_10(Isometry3::identity(), RobotTool::default(), vec![]).unwrap();
//! let actions = vec![Action::from(Comment::instruction("wait")), Action::from(Timer::new(1.5))];
//!
//! let mut generator = RapidGenerator::new("main_T", &actions, &robot);
//! let program = generator.generate().unwrap();
//! assert!(program.contains("WaitTime 1.5;"));
//!
//! let registry = ToolRegistry::new("cell-1");
//! assert!(generator.generate_system_module(&registry).starts_with("MODULE BASE"));
//! ```

use crate::action::Action;
use crate::error::{Result, RobotError};
use crate::robot::Robot;
use crate::robot_tool::{RobotTool, DEFAULT_TOOL_NAME};
use crate::utils::LINE_TERMINATOR;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Tool definitions to declare in the BASE module, owned by one caller (a cell, a document).
/// Tools are kept in registration order; registering a name again replaces the definition.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    scope: String,
    tools: Vec<RobotTool>,
}

impl ToolRegistry {
    pub fn new(scope: impl Into<String>) -> Self {
        ToolRegistry { scope: scope.into(), tools: Vec::new() }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn register(&mut self, tool: RobotTool) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RobotTool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn tools(&self) -> &[RobotTool] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

pub struct RapidGenerator<'a> {
    module_name: String,
    actions: &'a [Action],
    robot: &'a Robot,
    declared_targets: Vec<String>,
    first_movement_is_move_abs: bool,
    error_text: Vec<String>,
}

impl<'a> RapidGenerator<'a> {
    pub fn new(module_name: impl Into<String>, actions: &'a [Action], robot: &'a Robot) -> Self {
        RapidGenerator {
            module_name: module_name.into(),
            actions,
            robot,
            declared_targets: Vec::new(),
            first_movement_is_move_abs: false,
            error_text: Vec::new(),
        }
    }

    /// The program module. Invalid actions are hard errors; limit violations and unreachable
    /// targets are collected in [`RapidGenerator::error_text`].
    pub fn generate(&mut self) -> Result<String> {
        self.declared_targets.clear();
        self.error_text.clear();
        self.first_movement_is_move_abs = false;

        for action in self.actions {
            if !action.is_valid() {
                return Err(match action {
                    Action::Movement(movement) => RobotError::InvalidMovement(movement.variable_name()),
                    other => RobotError::InvalidAction(format!("{:?}", other)),
                });
            }
        }

        let declarations = self.declarations()?;
        let instructions = self.instructions();
        debug!("Module {}: {} declarations, {} instructions",
            self.module_name, declarations.len(), instructions.len());
        if !self.error_text.is_empty() {
            warn!("Module {}: {}", self.module_name, self.error_text.join(" "));
        }

        let mut lines = vec![format!("MODULE {}", self.module_name), String::new()];
        if !declarations.is_empty() {
            push_indented(&mut lines, &declarations, "\t");
            lines.push(String::new());
        }
        lines.push("\tPROC main()".to_string());
        push_indented(&mut lines, &instructions, "\t\t");
        lines.push("\tENDPROC".to_string());
        lines.push(String::new());
        lines.push("ENDMODULE".to_string());
        Ok(lines.join(LINE_TERMINATOR))
    }

    fn declarations(&mut self) -> Result<Vec<String>> {
        let mut code = Vec::new();
        let mut declared: HashSet<String> = HashSet::new();
        let mut declare_once = |kind: &str, name: &str, declaration: String, code: &mut Vec<String>| {
            if !declaration.is_empty() && declared.insert(format!("{}:{}", kind, name)) {
                code.push(declaration);
            }
        };

        for action in self.actions {
            match action {
                Action::Movement(movement) => {
                    declare_once("speed", movement.speed().name(), movement.speed().declaration_code(), &mut code);
                    declare_once("zone", movement.zone().name(), movement.zone().declaration_code(), &mut code);
                    let work_object = movement.work_object();
                    declare_once("wobj", work_object.name(), work_object.declaration_code(), &mut code);

                    let name = movement.variable_name();
                    if !self.declared_targets.contains(&name) {
                        let (declaration, ik) = movement.declaration(self.robot)?;
                        self.error_text.extend(ik.error_text);
                        self.declared_targets.push(name);
                        code.push(declaration);
                    }
                }
                Action::Comment(comment) => {
                    let declaration = comment.declaration_code();
                    if !declaration.is_empty() {
                        code.push(declaration);
                    }
                }
                // Bare joint position literals are not RAPID declarations
                Action::ExternalJointPosition(_) | Action::RobotJointPosition(_) => {}
                Action::Timer(_) | Action::DigitalOutput(_) => {}
            }
        }
        Ok(code)
    }

    fn instructions(&mut self) -> Vec<String> {
        let mut found_movement = false;
        let mut code = Vec::new();
        for action in self.actions {
            if let Action::Movement(movement) = action {
                if !found_movement {
                    found_movement = true;
                    self.first_movement_is_move_abs = !movement.is_linear();
                    if self.first_movement_is_move_abs {
                        info!("First movement is {}", movement.describe());
                    }
                }
            }
            let instruction = action.instruction_code(self.robot);
            if !instruction.is_empty() {
                code.push(instruction);
            }
        }
        code
    }

    /// The BASE system module: the predefined `tool0`, `wobj0` and `load0`, and every tool
    /// of the registry.
    pub fn generate_system_module(&self, registry: &ToolRegistry) -> String {
        let mut lines: Vec<String> = vec![
            "MODULE BASE (SYSMODULE, NOSTEPIN, VIEWONLY)",
            "",
            " ! System module with basic predefined system data",
            " !************************************************",
            "",
            " ! System data tool0, wobj0 and load0",
            " ! Do not translate or delete tool0, wobj0, load0",
        ].into_iter().map(String::from).collect();

        push_indented(&mut lines, &[RobotTool::default().declaration()], "");
        lines.push(String::new());
        lines.push(" PERS wobjdata wobj0 := [FALSE, TRUE, \"\" , [[0, 0, 0],[1, 0, 0, 0]],".to_string());
        lines.push("\t\t\t\t\t\t[[0, 0, 0],[1, 0, 0, 0]]];".to_string());
        lines.push(String::new());
        lines.push(" PERS loaddata load0 := [0.001, [0, 0, 0.001],[1, 0, 0, 0], 0, 0, 0];".to_string());
        lines.push(String::new());

        for tool in registry.tools().iter().filter(|t| t.name() != DEFAULT_TOOL_NAME) {
            push_indented(&mut lines, &[tool.declaration()], "");
            lines.push(String::new());
        }
        lines.push("ENDMODULE".to_string());
        lines.join(LINE_TERMINATOR)
    }

    /// True if the first movement of the program is not a linear movement.
    pub fn first_movement_is_move_abs(&self) -> bool {
        self.first_movement_is_move_abs
    }

    /// Inverse kinematics messages of the declared targets, from the last generation.
    pub fn error_text(&self) -> &[String] {
        &self.error_text
    }

    /// Declared target variables in declaration order, from the last generation.
    pub fn declared_targets(&self) -> &[String] {
        &self.declared_targets
    }
}

/// Adds each line of each piece of code with the indentation.
fn push_indented(lines: &mut Vec<String>, code: &[String], indent: &str) {
    for piece in code {
        for line in piece.lines() {
            lines.push(format!("{}{}", indent, line));
        }
    }
}

/// Generates the program module and the system module.
pub fn generate(module_name: &str, actions: &[Action], robot: &Robot, registry: &ToolRegistry)
                -> Result<(String, String)> {
    let mut generator = RapidGenerator::new(module_name, actions, robot);
    let program = generator.generate()?;
    let system = generator.generate_system_module(registry);
    Ok((program, system))
}
