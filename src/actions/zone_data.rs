//! Corner zones of movements (RAPID `zonedata`).

use crate::utils::format_value;

/// Predefined zones: name, pzone_tcp, pzone_ori, pzone_eax, zone_ori, zone_leax, zone_reax
const PREDEFINED_ZONES: [(&str, [f64; 6]); 14] = [
    ("z0", [0.3, 0.3, 0.3, 0.03, 0.3, 0.03]),
    ("z1", [1.0, 1.0, 1.0, 0.1, 1.0, 0.1]),
    ("z5", [5.0, 8.0, 8.0, 0.8, 8.0, 0.8]),
    ("z10", [10.0, 15.0, 15.0, 1.5, 15.0, 1.5]),
    ("z15", [15.0, 23.0, 23.0, 2.3, 23.0, 2.3]),
    ("z20", [20.0, 30.0, 30.0, 3.0, 30.0, 3.0]),
    ("z30", [30.0, 45.0, 45.0, 4.5, 45.0, 4.5]),
    ("z40", [40.0, 60.0, 60.0, 6.0, 60.0, 6.0]),
    ("z50", [50.0, 75.0, 75.0, 7.5, 75.0, 7.5]),
    ("z60", [60.0, 90.0, 90.0, 9.0, 90.0, 9.0]),
    ("z80", [80.0, 120.0, 120.0, 12.0, 120.0, 12.0]),
    ("z100", [100.0, 150.0, 150.0, 15.0, 150.0, 15.0]),
    ("z150", [150.0, 225.0, 225.0, 23.0, 225.0, 23.0]),
    ("z200", [200.0, 300.0, 300.0, 30.0, 300.0, 30.0]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneData {
    name: String,
    /// Fine point: the robot stops at the target
    finep: bool,
    /// [pzone_tcp, pzone_ori, pzone_eax, zone_ori, zone_leax, zone_reax]
    values: [f64; 6],
    predefined: bool,
}

impl ZoneData {
    /// Custom zone, declared in the generated module.
    pub fn new(name: impl Into<String>, finep: bool, values: [f64; 6]) -> Self {
        ZoneData { name: name.into(), finep, values, predefined: false }
    }

    /// `fine` for a negative precision, otherwise the predefined zone with the TCP path
    /// zone closest to it.
    pub fn predefined(precision: f64) -> Self {
        if precision < 0.0 {
            return ZoneData::fine();
        }
        let mut closest = &PREDEFINED_ZONES[0];
        for zone in PREDEFINED_ZONES.iter() {
            if (zone.1[0] - precision).abs() < (closest.1[0] - precision).abs() {
                closest = zone;
            }
        }
        ZoneData { name: closest.0.to_string(), finep: false, values: closest.1, predefined: true }
    }

    pub fn fine() -> Self {
        ZoneData { name: "fine".to_string(), finep: true, values: [0.0; 6], predefined: true }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_fine(&self) -> bool {
        self.finep
    }

    /// `[pzone_tcp, pzone_ori, pzone_eax, zone_ori, zone_leax, zone_reax]`
    pub fn values(&self) -> [f64; 6] {
        self.values
    }

    pub fn is_predefined(&self) -> bool {
        self.predefined
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.values.iter().all(|v| *v >= 0.0)
    }

    /// Empty for predefined zones.
    pub fn declaration_code(&self) -> String {
        if self.predefined {
            return String::new();
        }
        let values: Vec<String> = self.values.iter().map(|&v| format_value(v)).collect();
        format!(
            "VAR zonedata {} := [{}, {}];",
            self.name,
            if self.finep { "TRUE" } else { "FALSE" },
            values.join(", ")
        )
    }
}

impl Default for ZoneData {
    fn default() -> Self {
        ZoneData::predefined(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined() {
        assert_eq!(ZoneData::predefined(-1.0).name(), "fine");
        assert!(ZoneData::predefined(-1.0).is_fine());
        assert_eq!(ZoneData::predefined(0.0).name(), "z0");
        assert_eq!(ZoneData::predefined(12.0).name(), "z10");
        assert_eq!(ZoneData::predefined(500.0).name(), "z200");
    }

    #[test]
    fn test_custom_declaration() {
        let zone = ZoneData::new("zGlue", false, [2.0, 3.0, 3.0, 0.3, 3.0, 0.3]);
        assert_eq!(zone.declaration_code(), "VAR zonedata zGlue := [FALSE, 2, 3, 3, 0.3, 3, 0.3];");
    }
}
