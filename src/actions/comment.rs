//! Comment lines in the generated module.

/// Where the comment is placed: among the declarations or in the program body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeType {
    Declaration,
    #[default]
    Instruction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    text: String,
    code_type: CodeType,
}

impl Comment {
    pub fn new(text: impl Into<String>, code_type: CodeType) -> Self {
        Comment { text: text.into(), code_type }
    }

    /// Comment in the program body.
    pub fn instruction(text: impl Into<String>) -> Self {
        Comment::new(text, CodeType::Instruction)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn code_type(&self) -> CodeType {
        self.code_type
    }

    /// One `! ` line per line of text.
    fn code(&self) -> String {
        if self.text.is_empty() {
            return "! ".to_string();
        }
        self.text.lines().map(|line| format!("! {}", line)).collect::<Vec<_>>().join("\n")
    }

    pub fn declaration_code(&self) -> String {
        match self.code_type {
            CodeType::Declaration => self.code(),
            CodeType::Instruction => String::new(),
        }
    }

    pub fn instruction_code(&self) -> String {
        match self.code_type {
            CodeType::Declaration => String::new(),
            CodeType::Instruction => self.code(),
        }
    }
}
