use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic fields the record builder knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FileNumber,
    AerodromeType,
    Designator,
    Name,
    State,
    Municipality,
    OperationType,
    ServiceType,
    Classification,
    ReferenceKey,
    Owner,
    ElevationM,
    CoordinateSystem,
    LatDegrees,
    LatMinutes,
    LatSeconds,
    LonDegrees,
    LonMinutes,
    LonSeconds,
    RunwayHeadingA,
    RunwayHeadingB,
    RunwayLengthM,
    RunwayWidthM,
    SurfaceType,
    CriticalAircraft,
    IssueDate,
    PermitDuration,
    ExpirationDate,
    ActiveFlag,
    Status,
    CoordinationAirport,
}

impl Field {
    /// Fields without which a row cannot become a placemark
    pub const REQUIRED: [Field; 10] = [
        Field::AerodromeType,
        Field::Designator,
        Field::Name,
        Field::Status,
        Field::LatDegrees,
        Field::LatMinutes,
        Field::LatSeconds,
        Field::LonDegrees,
        Field::LonMinutes,
        Field::LonSeconds,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::FileNumber => "file_number",
            Field::AerodromeType => "aerodrome_type",
            Field::Designator => "designator",
            Field::Name => "name",
            Field::State => "state",
            Field::Municipality => "municipality",
            Field::OperationType => "operation_type",
            Field::ServiceType => "service_type",
            Field::Classification => "classification",
            Field::ReferenceKey => "reference_key",
            Field::Owner => "owner",
            Field::ElevationM => "elevation_m",
            Field::CoordinateSystem => "coordinate_system",
            Field::LatDegrees => "lat_degrees",
            Field::LatMinutes => "lat_minutes",
            Field::LatSeconds => "lat_seconds",
            Field::LonDegrees => "lon_degrees",
            Field::LonMinutes => "lon_minutes",
            Field::LonSeconds => "lon_seconds",
            Field::RunwayHeadingA => "runway_heading_a",
            Field::RunwayHeadingB => "runway_heading_b",
            Field::RunwayLengthM => "runway_length_m",
            Field::RunwayWidthM => "runway_width_m",
            Field::SurfaceType => "surface_type",
            Field::CriticalAircraft => "critical_aircraft",
            Field::IssueDate => "issue_date",
            Field::PermitDuration => "permit_duration",
            Field::ExpirationDate => "expiration_date",
            Field::ActiveFlag => "active_flag",
            Field::Status => "status",
            Field::CoordinationAirport => "coordination_airport",
        }
    }

    /// How the raw cell is interpreted
    pub fn kind(&self) -> ValueKind {
        match self {
            Field::AerodromeType => ValueKind::Code(TableKind::AerodromeType),
            Field::OperationType => ValueKind::Code(TableKind::OperationType),
            Field::ServiceType => ValueKind::Code(TableKind::ServiceType),
            Field::Classification => ValueKind::Code(TableKind::Classification),
            Field::SurfaceType => ValueKind::Code(TableKind::SurfaceType),
            Field::CriticalAircraft => ValueKind::Code(TableKind::AircraftCategory),
            Field::IssueDate => ValueKind::Code(TableKind::IssueDate),
            Field::PermitDuration => ValueKind::Code(TableKind::DurationUnit),
            Field::ExpirationDate => ValueKind::Code(TableKind::ExpirationDate),
            Field::ActiveFlag => ValueKind::Code(TableKind::ActiveFlag),
            Field::Status => ValueKind::Code(TableKind::Status),
            Field::ElevationM
            | Field::LatDegrees
            | Field::LatMinutes
            | Field::LatSeconds
            | Field::LonDegrees
            | Field::LonMinutes
            | Field::LonSeconds
            | Field::RunwayLengthM
            | Field::RunwayWidthM => ValueKind::Decimal,
            _ => ValueKind::Text,
        }
    }
}

/// Lookup tables used to normalise categorical cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    AerodromeType,
    OperationType,
    ServiceType,
    ActiveFlag,
    Status,
    IssueDate,
    ExpirationDate,
    DurationUnit,
    Classification,
    SurfaceType,
    AircraftCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Decimal,
    Code(TableKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub index: usize,
    pub field: Field,
    pub kind: ValueKind,
}

/// A column layout of the register. The authority has republished it with
/// different column sets over time; one layout is chosen per run and every
/// row is read through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// 23 columns, no classification or runway data, month/year helper columns
    Legacy,
    /// 25 columns, adds classification, reference key, datum and coordination airport
    Classified,
    /// 31 columns, adds runway, surface and critical aircraft
    Runway,
    /// Column map supplied by configuration
    Custom,
}

impl SchemaVersion {
    pub const BUILT_IN: [SchemaVersion; 3] = [
        SchemaVersion::Legacy,
        SchemaVersion::Classified,
        SchemaVersion::Runway,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SchemaVersion::Legacy => "legacy",
            SchemaVersion::Classified => "classified",
            SchemaVersion::Runway => "runway",
            SchemaVersion::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Some(SchemaVersion::Legacy),
            "classified" => Some(SchemaVersion::Classified),
            "runway" => Some(SchemaVersion::Runway),
            "custom" => Some(SchemaVersion::Custom),
            _ => None,
        }
    }

    /// Number of cells in a row of this layout
    pub fn width(&self) -> usize {
        match self {
            SchemaVersion::Legacy => 23,
            SchemaVersion::Classified => 25,
            SchemaVersion::Runway => 31,
            SchemaVersion::Custom => 0,
        }
    }

    /// Pick the widest built-in layout that fits the header width
    pub fn detect(header_width: usize) -> Self {
        Self::BUILT_IN
            .iter()
            .rev()
            .copied()
            .find(|v| v.width() <= header_width)
            .unwrap_or(SchemaVersion::Legacy)
    }

    fn layout(&self) -> &'static [(usize, Field)] {
        match self {
            SchemaVersion::Legacy => LEGACY_LAYOUT,
            SchemaVersion::Classified => CLASSIFIED_LAYOUT,
            SchemaVersion::Runway => RUNWAY_LAYOUT,
            SchemaVersion::Custom => &[],
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Columns 19 (MES) and 20 (AÑO) are spreadsheet helpers derived from the
// expiration date and are not read.
const LEGACY_LAYOUT: &[(usize, Field)] = &[
    (0, Field::FileNumber),
    (1, Field::AerodromeType),
    (2, Field::Designator),
    (3, Field::Name),
    (4, Field::State),
    (5, Field::Municipality),
    (6, Field::OperationType),
    (7, Field::ServiceType),
    (8, Field::Owner),
    (9, Field::ElevationM),
    (10, Field::LatDegrees),
    (11, Field::LatMinutes),
    (12, Field::LatSeconds),
    (13, Field::LonDegrees),
    (14, Field::LonMinutes),
    (15, Field::LonSeconds),
    (16, Field::IssueDate),
    (17, Field::PermitDuration),
    (18, Field::ExpirationDate),
    (21, Field::ActiveFlag),
    (22, Field::Status),
];

const CLASSIFIED_LAYOUT: &[(usize, Field)] = &[
    (0, Field::FileNumber),
    (1, Field::AerodromeType),
    (2, Field::Designator),
    (3, Field::Name),
    (4, Field::State),
    (5, Field::Municipality),
    (6, Field::OperationType),
    (7, Field::ServiceType),
    (8, Field::Classification),
    (9, Field::ReferenceKey),
    (10, Field::Owner),
    (11, Field::ElevationM),
    (12, Field::CoordinateSystem),
    (13, Field::LatDegrees),
    (14, Field::LatMinutes),
    (15, Field::LatSeconds),
    (16, Field::LonDegrees),
    (17, Field::LonMinutes),
    (18, Field::LonSeconds),
    (19, Field::IssueDate),
    (20, Field::PermitDuration),
    (21, Field::ExpirationDate),
    (22, Field::ActiveFlag),
    (23, Field::Status),
    (24, Field::CoordinationAirport),
];

const RUNWAY_LAYOUT: &[(usize, Field)] = &[
    (0, Field::FileNumber),
    (1, Field::AerodromeType),
    (2, Field::Designator),
    (3, Field::Name),
    (4, Field::State),
    (5, Field::Municipality),
    (6, Field::OperationType),
    (7, Field::ServiceType),
    (8, Field::Classification),
    (9, Field::ReferenceKey),
    (10, Field::Owner),
    (11, Field::ElevationM),
    (12, Field::CoordinateSystem),
    (13, Field::LatDegrees),
    (14, Field::LatMinutes),
    (15, Field::LatSeconds),
    (16, Field::LonDegrees),
    (17, Field::LonMinutes),
    (18, Field::LonSeconds),
    (19, Field::RunwayHeadingA),
    (20, Field::RunwayHeadingB),
    (21, Field::RunwayLengthM),
    (22, Field::RunwayWidthM),
    (23, Field::SurfaceType),
    (24, Field::CriticalAircraft),
    (25, Field::IssueDate),
    (26, Field::PermitDuration),
    (27, Field::ExpirationDate),
    (28, Field::ActiveFlag),
    (29, Field::Status),
    (30, Field::CoordinationAirport),
];

/// How the active layout is chosen for a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaSelection {
    /// Infer from the width of the header rows
    #[default]
    Auto,
    Fixed(SchemaVersion),
    Custom(BTreeMap<Field, usize>),
}

impl SchemaSelection {
    pub fn resolve(&self, header_width: usize) -> ColumnSchema {
        match self {
            SchemaSelection::Auto => ColumnSchema::for_version(SchemaVersion::detect(header_width)),
            SchemaSelection::Fixed(version) => ColumnSchema::for_version(*version),
            SchemaSelection::Custom(map) => ColumnSchema::custom(map),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    version: SchemaVersion,
    columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    pub fn for_version(version: SchemaVersion) -> Self {
        let columns = version
            .layout()
            .iter()
            .map(|&(index, field)| ColumnSpec {
                index,
                field,
                kind: field.kind(),
            })
            .collect();

        Self { version, columns }
    }

    /// Build a layout from a `field -> column` map (0-based)
    pub fn custom(map: &BTreeMap<Field, usize>) -> Self {
        let mut columns: Vec<ColumnSpec> = map
            .iter()
            .map(|(&field, &index)| ColumnSpec {
                index,
                field,
                kind: field.kind(),
            })
            .collect();
        columns.sort_by_key(|c| c.index);

        Self {
            version: SchemaVersion::Custom,
            columns,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Column index of a field, `None` when this version has no such column
    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.index)
    }

    pub fn has(&self, field: Field) -> bool {
        self.column(field).is_some()
    }

    /// Fail before any row is built if a required field is unmapped
    pub fn validate(&self) -> Result<()> {
        for field in Field::REQUIRED {
            if !self.has(field) {
                return Err(ProcessingError::SchemaMismatch {
                    version: self.version.to_string(),
                    field: field.name().to_string(),
                });
            }
        }

        for (i, column) in self.columns.iter().enumerate() {
            if let Some(other) = self.columns[i + 1..]
                .iter()
                .find(|c| c.index == column.index)
            {
                return Err(ProcessingError::Config(format!(
                    "column {} is mapped to both '{}' and '{}'",
                    column.index,
                    column.field.name(),
                    other.field.name()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_layouts_are_valid() {
        for version in SchemaVersion::BUILT_IN {
            let schema = ColumnSchema::for_version(version);
            assert!(schema.validate().is_ok(), "{} should validate", version);
            let max_index = schema.columns().iter().map(|c| c.index).max().unwrap();
            assert!(max_index < version.width());
        }
    }

    #[test]
    fn test_absent_fields_are_explicit() {
        let legacy = ColumnSchema::for_version(SchemaVersion::Legacy);
        assert_eq!(legacy.column(Field::Name), Some(3));
        assert_eq!(legacy.column(Field::Status), Some(22));
        assert_eq!(legacy.column(Field::Classification), None);
        assert_eq!(legacy.column(Field::RunwayLengthM), None);

        let runway = ColumnSchema::for_version(SchemaVersion::Runway);
        assert_eq!(runway.column(Field::RunwayLengthM), Some(21));
        assert_eq!(runway.column(Field::CoordinationAirport), Some(30));
    }

    #[test]
    fn test_detect_version_from_header_width() {
        assert_eq!(SchemaVersion::detect(23), SchemaVersion::Legacy);
        assert_eq!(SchemaVersion::detect(24), SchemaVersion::Legacy);
        assert_eq!(SchemaVersion::detect(25), SchemaVersion::Classified);
        assert_eq!(SchemaVersion::detect(31), SchemaVersion::Runway);
        assert_eq!(SchemaVersion::detect(40), SchemaVersion::Runway);
        assert_eq!(SchemaVersion::detect(5), SchemaVersion::Legacy);
    }

    #[test]
    fn test_custom_schema_missing_required_field() {
        let mut map = BTreeMap::new();
        map.insert(Field::AerodromeType, 0);
        map.insert(Field::Name, 1);

        let schema = ColumnSchema::custom(&map);
        match schema.validate() {
            Err(ProcessingError::SchemaMismatch { version, field }) => {
                assert_eq!(version, "custom");
                assert_eq!(field, "designator");
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_schema_duplicate_column() {
        let mut map: BTreeMap<Field, usize> = Field::REQUIRED
            .iter()
            .enumerate()
            .map(|(i, f)| (*f, i))
            .collect();
        map.insert(Field::Owner, 0);

        assert!(matches!(
            ColumnSchema::custom(&map).validate(),
            Err(ProcessingError::Config(_))
        ));
    }

    #[test]
    fn test_selection_resolve() {
        assert_eq!(
            SchemaSelection::Auto.resolve(31).version(),
            SchemaVersion::Runway
        );
        assert_eq!(
            SchemaSelection::Fixed(SchemaVersion::Legacy).resolve(31).version(),
            SchemaVersion::Legacy
        );
        let map: BTreeMap<Field, usize> = [(Field::Name, 4)].into_iter().collect();
        assert_eq!(
            SchemaSelection::Custom(map).resolve(0).column(Field::Name),
            Some(4)
        );
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(Field::ElevationM.kind(), ValueKind::Decimal);
        assert_eq!(Field::Name.kind(), ValueKind::Text);
        assert_eq!(
            Field::Status.kind(),
            ValueKind::Code(TableKind::Status)
        );
    }
}
