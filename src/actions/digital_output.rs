//! Digital output signals.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalOutput {
    name: String,
    is_active: bool,
}

impl DigitalOutput {
    pub fn new(name: impl Into<String>, is_active: bool) -> Self {
        DigitalOutput { name: name.into(), is_active }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Signal value as written in RAPID.
    pub fn value(&self) -> u8 {
        self.is_active as u8
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn instruction_code(&self) -> String {
        format!("SetDO {}, {};", self.name, self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_do() {
        assert_eq!(DigitalOutput::new("do_gripper", true).instruction_code(), "SetDO do_gripper, 1;");
        assert_eq!(DigitalOutput::new("do_gripper", false).instruction_code(), "SetDO do_gripper, 0;");
        assert!(!DigitalOutput::new("", true).is_valid());
    }
}
