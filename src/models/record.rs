use crate::models::style::Layer;
use crate::utils::{Dms, FEET_PER_METER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runway {
    pub heading_a: String,
    pub heading_b: String,
    pub length_m: f64,
    pub width_m: f64,
    pub length_ft: i64,
    pub width_ft: i64,
    pub surface: String,
}

impl Runway {
    pub fn new(
        heading_a: String,
        heading_b: String,
        length_m: f64,
        width_m: f64,
        surface: String,
    ) -> Self {
        Self {
            heading_a,
            heading_b,
            length_m,
            width_m,
            length_ft: meters_to_whole_feet(length_m),
            width_ft: meters_to_whole_feet(width_m),
            surface,
        }
    }

    /// "09 / 27" when both ends are known, otherwise whichever is
    pub fn orientation(&self) -> Option<String> {
        match (self.heading_a.is_empty(), self.heading_b.is_empty()) {
            (false, false) => Some(format!("{} / {}", self.heading_a, self.heading_b)),
            (false, true) => Some(self.heading_a.clone()),
            (true, false) => Some(self.heading_b.clone()),
            (true, true) => None,
        }
    }

    pub fn length_display(&self) -> Option<String> {
        (self.length_m > 0.0).then(|| dual_unit(&self.length_ft.to_string(), self.length_m))
    }

    pub fn width_display(&self) -> Option<String> {
        (self.width_m > 0.0).then(|| dual_unit(&self.width_ft.to_string(), self.width_m))
    }

    /// "4921 ft (1500 m) × 98 ft (30 m)" when both dimensions are known
    pub fn dimensions(&self) -> Option<String> {
        match (self.length_display(), self.width_display()) {
            (Some(length), Some(width)) => Some(format!("{} × {}", length, width)),
            _ => None,
        }
    }
}

/// One register row after extraction, normalisation and geodetic conversion.
///
/// Fields wrapped in `Option` exist only in some schema versions and are
/// `None` when the active layout has no such column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// 1-based source row, used for ordering and diagnostics
    pub row: usize,
    pub file_number: String,
    pub aerodrome_type: String,
    pub identifier: String,
    pub name: String,
    pub state: String,
    pub municipality: String,
    pub operation_type: String,
    pub service_type: String,
    pub classification: Option<String>,
    pub reference_key: Option<String>,
    pub owner: String,
    pub elevation_m: f64,
    pub elevation_ft: f64,
    pub coordinate_system: Option<String>,
    pub latitude_dms: Dms,
    pub longitude_dms: Dms,
    pub latitude: f64,
    pub longitude: f64,
    pub runway: Option<Runway>,
    pub critical_aircraft: Option<String>,
    pub issue_date: String,
    pub permit_duration: String,
    pub expiration_date: String,
    pub active: String,
    pub status: String,
    pub coordination_airport: Option<String>,
    pub layers: BTreeSet<Layer>,
}

impl CanonicalRecord {
    /// Identifier, or the record name when the source had no designator
    pub fn display_name(&self, identifier_prefix: &str) -> &str {
        if self.identifier == identifier_prefix {
            &self.name
        } else {
            &self.identifier
        }
    }

    pub fn elevation_display(&self) -> String {
        dual_unit(&trim_decimal(self.elevation_ft), self.elevation_m)
    }

    pub fn belongs_to(&self, layer: Layer) -> bool {
        self.layers.contains(&layer)
    }
}

/// round(m × 3.28084, 2)
pub fn meters_to_feet(meters: f64) -> f64 {
    (meters * FEET_PER_METER * 100.0).round() / 100.0
}

pub fn meters_to_whole_feet(meters: f64) -> i64 {
    (meters * FEET_PER_METER).round() as i64
}

/// `"{feet} ft ({meters} m)"`; meters keep their full precision
pub fn dual_unit(feet: &str, meters: f64) -> String {
    let meters = if meters == 0.0 { 0.0 } else { meters };
    format!("{} ft ({} m)", feet, meters)
}

/// Two-decimal rendering without trailing zeros: 1500.0 -> "1500", 12.50 -> "12.5"
pub fn trim_decimal(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_feet() {
        assert_eq!(meters_to_feet(100.0), 328.08);
        assert_eq!(meters_to_feet(0.0), 0.0);
        assert_eq!(meters_to_feet(2240.0), 7349.08);
        assert_eq!(meters_to_whole_feet(1500.0), 4921);
        assert_eq!(meters_to_whole_feet(30.0), 98);
    }

    #[test]
    fn test_trim_decimal() {
        assert_eq!(trim_decimal(1500.0), "1500");
        assert_eq!(trim_decimal(12.5), "12.5");
        assert_eq!(trim_decimal(328.08), "328.08");
        assert_eq!(trim_decimal(0.0), "0");
        assert_eq!(trim_decimal(-0.001), "0");
    }

    #[test]
    fn test_dual_unit_keeps_meter_precision() {
        assert_eq!(dual_unit("4050", 1234.567), "4050 ft (1234.567 m)");
        assert_eq!(dual_unit("7349.08", 2240.0), "7349.08 ft (2240 m)");
        assert_eq!(dual_unit("0", -0.0), "0 ft (0 m)");
    }

    #[test]
    fn test_runway_displays() {
        let runway = Runway::new(
            "09".to_string(),
            "27".to_string(),
            1500.0,
            30.0,
            "Asphalt".to_string(),
        );
        assert_eq!(runway.orientation().as_deref(), Some("09 / 27"));
        assert_eq!(
            runway.dimensions().as_deref(),
            Some("4921 ft (1500 m) × 98 ft (30 m)")
        );

        let partial = Runway::new(String::new(), "18".to_string(), 800.0, 0.0, String::new());
        assert_eq!(partial.orientation().as_deref(), Some("18"));
        assert_eq!(partial.dimensions(), None);
        assert_eq!(partial.length_display().as_deref(), Some("2625 ft (800 m)"));
    }
}
