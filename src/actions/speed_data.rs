//! Speed of movements (RAPID `speeddata`).

use crate::utils::format_value;

/// TCP speeds of the predefined ABB speed data `v5` to `v7000`, mm/s.
pub const PREDEFINED_SPEEDS: [f64; 25] = [
    5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 80.0, 100.0, 150.0, 200.0, 300.0, 400.0, 500.0,
    600.0, 800.0, 1000.0, 1500.0, 2000.0, 2500.0, 3000.0, 4000.0, 5000.0, 6000.0, 7000.0,
];

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedData {
    name: String,
    /// TCP speed, mm/s
    v_tcp: f64,
    /// Reorientation speed, degrees/s
    v_ori: f64,
    /// Linear external axes, mm/s
    v_leax: f64,
    /// Rotational external axes, degrees/s
    v_reax: f64,
    predefined: bool,
}

impl SpeedData {
    /// Custom speed data, declared in the generated module.
    pub fn new(name: impl Into<String>, v_tcp: f64, v_ori: f64, v_leax: f64, v_reax: f64) -> Self {
        SpeedData { name: name.into(), v_tcp, v_ori, v_leax, v_reax, predefined: false }
    }

    /// Predefined speed data with the TCP speed closest to `v_tcp`.
    pub fn predefined(v_tcp: f64) -> Self {
        let mut closest = PREDEFINED_SPEEDS[0];
        for &speed in PREDEFINED_SPEEDS.iter() {
            if (speed - v_tcp).abs() < (closest - v_tcp).abs() {
                closest = speed;
            }
        }
        SpeedData {
            name: format!("v{}", closest),
            v_tcp: closest,
            v_ori: 500.0,
            v_leax: 5000.0,
            v_reax: 1000.0,
            predefined: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn v_tcp(&self) -> f64 {
        self.v_tcp
    }

    pub fn v_ori(&self) -> f64 {
        self.v_ori
    }

    pub fn v_leax(&self) -> f64 {
        self.v_leax
    }

    pub fn v_reax(&self) -> f64 {
        self.v_reax
    }

    pub fn is_predefined(&self) -> bool {
        self.predefined
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.v_tcp > 0.0
    }

    /// Empty for predefined data, these exist on every controller.
    pub fn declaration_code(&self) -> String {
        if self.predefined {
            return String::new();
        }
        format!(
            "VAR speeddata {} := [{}, {}, {}, {}];",
            self.name,
            format_value(self.v_tcp),
            format_value(self.v_ori),
            format_value(self.v_leax),
            format_value(self.v_reax)
        )
    }
}

impl Default for SpeedData {
    fn default() -> Self {
        SpeedData::predefined(5.0)
    }
}
