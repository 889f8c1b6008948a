use crate::models::record::meters_to_feet;
use crate::models::{CanonicalRecord, ColumnSchema, Field, Runway, TableKind, ValueKind};
use crate::processors::classifier::layer_membership;
use crate::processors::normalizer::{self, translate_duration_checked};
use crate::readers::Cell;
use crate::utils::{
    latitude_from_dms, longitude_from_dms, validate_mexico_coordinates, Dms, Rejection,
};
use tracing::debug;

/// A categorical value with no table entry, kept verbatim in the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationMiss {
    pub table: TableKind,
    pub value: String,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Accepted {
        record: Box<CanonicalRecord>,
        misses: Vec<NormalizationMiss>,
    },
    Rejected {
        row: usize,
        reason: Rejection,
    },
}

impl BuildOutcome {
    pub fn record(&self) -> Option<&CanonicalRecord> {
        match self {
            BuildOutcome::Accepted { record, .. } => Some(record.as_ref()),
            BuildOutcome::Rejected { .. } => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, BuildOutcome::Rejected { .. })
    }
}

/// Turns raw rows into canonical records through one column schema.
///
/// Building never fails on a malformed cell: text is trimmed, numbers parse
/// leniently to 0.0, and unknown codes pass through. Only a coordinate pair
/// outside Mexico rejects the row.
pub struct RecordBuilder<'a> {
    schema: &'a ColumnSchema,
    identifier_prefix: String,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(schema: &'a ColumnSchema, identifier_prefix: impl Into<String>) -> Self {
        Self {
            schema,
            identifier_prefix: identifier_prefix.into(),
        }
    }

    pub fn identifier_prefix(&self) -> &str {
        &self.identifier_prefix
    }

    pub fn build(&self, row: usize, cells: &[Cell]) -> BuildOutcome {
        let mut misses = Vec::new();

        let aerodrome_type = self.code(cells, Field::AerodromeType, &mut misses);
        let operation_type = self.code(cells, Field::OperationType, &mut misses);
        let service_type = self.code(cells, Field::ServiceType, &mut misses);
        let classification = self.optional_code(cells, Field::Classification, &mut misses);
        let critical_aircraft = self.optional_code(cells, Field::CriticalAircraft, &mut misses);
        let issue_date = self.code(cells, Field::IssueDate, &mut misses);
        let permit_duration = self.code(cells, Field::PermitDuration, &mut misses);
        let expiration_date = self.code(cells, Field::ExpirationDate, &mut misses);
        let active = self.code(cells, Field::ActiveFlag, &mut misses);
        let status = self.code(cells, Field::Status, &mut misses);

        let latitude_dms = Dms::new(
            self.decimal(cells, Field::LatDegrees),
            self.decimal(cells, Field::LatMinutes),
            self.decimal(cells, Field::LatSeconds),
        );
        let longitude_dms = Dms::new(
            self.decimal(cells, Field::LonDegrees),
            self.decimal(cells, Field::LonMinutes),
            self.decimal(cells, Field::LonSeconds),
        );
        let latitude = latitude_from_dms(&latitude_dms);
        let longitude = longitude_from_dms(&longitude_dms);

        if let Err(reason) = validate_mexico_coordinates(latitude, longitude) {
            debug!("Row {} rejected: {}", row, reason);
            return BuildOutcome::Rejected { row, reason };
        }

        let elevation_m = self.decimal(cells, Field::ElevationM);
        let runway = self.runway(cells, &mut misses);

        let record = CanonicalRecord {
            row,
            file_number: self.text(cells, Field::FileNumber),
            identifier: format!(
                "{}{}",
                self.identifier_prefix,
                self.text(cells, Field::Designator)
            ),
            name: self.text(cells, Field::Name),
            state: self.text(cells, Field::State),
            municipality: self.text(cells, Field::Municipality),
            operation_type,
            service_type,
            classification,
            reference_key: self.optional_text(cells, Field::ReferenceKey),
            owner: self.text(cells, Field::Owner),
            elevation_m,
            elevation_ft: meters_to_feet(elevation_m),
            coordinate_system: self.optional_text(cells, Field::CoordinateSystem),
            latitude_dms,
            longitude_dms,
            latitude,
            longitude,
            runway,
            critical_aircraft,
            issue_date,
            permit_duration,
            expiration_date,
            active,
            status,
            coordination_airport: self.optional_text(cells, Field::CoordinationAirport),
            layers: layer_membership(&aerodrome_type),
            aerodrome_type,
        };

        BuildOutcome::Accepted {
            record: Box::new(record),
            misses,
        }
    }

    fn cell<'c>(&self, cells: &'c [Cell], field: Field) -> Option<&'c Cell> {
        self.schema.column(field).and_then(|index| cells.get(index))
    }

    fn text(&self, cells: &[Cell], field: Field) -> String {
        self.cell(cells, field).map(Cell::as_text).unwrap_or_default()
    }

    fn optional_text(&self, cells: &[Cell], field: Field) -> Option<String> {
        self.schema
            .has(field)
            .then(|| self.text(cells, field))
    }

    fn decimal(&self, cells: &[Cell], field: Field) -> f64 {
        self.cell(cells, field).map_or(0.0, Cell::as_f64)
    }

    fn code(&self, cells: &[Cell], field: Field, misses: &mut Vec<NormalizationMiss>) -> String {
        let raw = self.text(cells, field);
        let ValueKind::Code(kind) = field.kind() else {
            return raw;
        };
        if raw.is_empty() {
            return raw;
        }
        // Actual dates pass through; only placeholders are translated
        let is_date_table = matches!(kind, TableKind::IssueDate | TableKind::ExpirationDate);
        if is_date_table && raw.starts_with(|c: char| c.is_ascii_digit()) {
            return raw;
        }

        let table = normalizer::table(kind);
        let (value, found) = if kind == TableKind::DurationUnit {
            translate_duration_checked(&raw, table)
        } else {
            match normalizer::lookup(table, &raw) {
                Some(canonical) => (canonical.to_string(), true),
                None => (raw.clone(), false),
            }
        };

        if !found {
            misses.push(NormalizationMiss {
                table: kind,
                value: raw,
            });
        }
        value
    }

    fn optional_code(
        &self,
        cells: &[Cell],
        field: Field,
        misses: &mut Vec<NormalizationMiss>,
    ) -> Option<String> {
        self.schema
            .has(field)
            .then(|| self.code(cells, field, misses))
    }

    fn runway(&self, cells: &[Cell], misses: &mut Vec<NormalizationMiss>) -> Option<Runway> {
        const RUNWAY_FIELDS: [Field; 5] = [
            Field::RunwayHeadingA,
            Field::RunwayHeadingB,
            Field::RunwayLengthM,
            Field::RunwayWidthM,
            Field::SurfaceType,
        ];
        if !RUNWAY_FIELDS.iter().any(|f| self.schema.has(*f)) {
            return None;
        }

        Some(Runway::new(
            self.text(cells, Field::RunwayHeadingA),
            self.text(cells, Field::RunwayHeadingB),
            self.decimal(cells, Field::RunwayLengthM),
            self.decimal(cells, Field::RunwayWidthM),
            self.code(cells, Field::SurfaceType, misses),
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Layer, SchemaVersion};

    /// A legacy-layout row (23 cells) for the given type, designator and DMS
    pub(crate) fn legacy_row(
        aerodrome_type: &str,
        designator: &str,
        name: &str,
        lat: (f64, f64, f64),
        lon: (f64, f64, f64),
    ) -> Vec<Cell> {
        let mut cells = vec![Cell::Empty; 23];
        cells[0] = Cell::Number(101.0);
        cells[1] = Cell::from(aerodrome_type);
        cells[2] = Cell::from(designator);
        cells[3] = Cell::from(name);
        cells[4] = Cell::from("ESTADO DE MÉXICO");
        cells[5] = Cell::from("ZUMPANGO");
        cells[6] = Cell::from("INTERNACIONAL");
        cells[7] = Cell::from("PÚBLICO");
        cells[8] = Cell::from("SEDENA");
        cells[9] = Cell::Number(2240.0);
        cells[10] = Cell::Number(lat.0);
        cells[11] = Cell::Number(lat.1);
        cells[12] = Cell::Number(lat.2);
        cells[13] = Cell::Number(lon.0);
        cells[14] = Cell::Number(lon.1);
        cells[15] = Cell::Number(lon.2);
        cells[16] = Cell::from("21/03/2022");
        cells[17] = Cell::from("50 AÑOS");
        cells[18] = Cell::from("INDEFINIDO");
        cells[21] = Cell::from("SI");
        cells[22] = Cell::from("OPERATIVO");
        cells
    }

    fn accepted(outcome: BuildOutcome) -> (CanonicalRecord, Vec<NormalizationMiss>) {
        match outcome {
            BuildOutcome::Accepted { record, misses } => (*record, misses),
            BuildOutcome::Rejected { row, reason } => {
                panic!("row {} unexpectedly rejected: {}", row, reason)
            }
        }
    }

    #[test]
    fn test_build_legacy_record() {
        let schema = ColumnSchema::for_version(SchemaVersion::Legacy);
        let builder = RecordBuilder::new(&schema, "X");
        let row = legacy_row(
            "AERÓDROMO",
            "NLU",
            "FELIPE ÁNGELES",
            (19.0, 44.0, 24.0),
            (99.0, 0.0, 54.0),
        );

        let (record, misses) = accepted(builder.build(3, &row));
        assert!(misses.is_empty(), "unexpected misses: {:?}", misses);
        assert_eq!(record.row, 3);
        assert_eq!(record.file_number, "101");
        assert_eq!(record.identifier, "XNLU");
        assert_eq!(record.aerodrome_type, "Aerodrome");
        assert_eq!(record.operation_type, "International");
        assert_eq!(record.service_type, "Public");
        assert_eq!(record.permit_duration, "50 Years");
        assert_eq!(record.issue_date, "21/03/2022");
        assert_eq!(record.expiration_date, "Indefinite");
        assert_eq!(record.active, "Yes");
        assert_eq!(record.status, "Active");
        assert_eq!(record.elevation_ft, 7349.08);
        assert!((record.latitude - 19.74).abs() < 1e-9);
        assert!((record.longitude - -99.015).abs() < 1e-9);
        assert_eq!(record.classification, None);
        assert_eq!(record.runway, None);
        assert_eq!(record.layers.iter().copied().collect::<Vec<_>>(), vec![Layer::Airports]);
    }

    #[test]
    fn test_elevation_feet_rounding() {
        let schema = ColumnSchema::for_version(SchemaVersion::Legacy);
        let builder = RecordBuilder::new(&schema, "X");
        let mut row = legacy_row("AERÓDROMO", "ABC", "A", (19.4, 0.0, 0.0), (99.1, 0.0, 0.0));
        row[9] = Cell::from("100");

        let (record, _) = accepted(builder.build(3, &row));
        assert_eq!(record.elevation_ft, 328.08);
    }

    #[test]
    fn test_rejects_zero_and_out_of_bounds() {
        let schema = ColumnSchema::for_version(SchemaVersion::Legacy);
        let builder = RecordBuilder::new(&schema, "X");

        let zero = legacy_row("AERÓDROMO", "ZZZ", "ZERO", (0.0, 0.0, 0.0), (0.0, 0.0, 0.0));
        assert!(matches!(
            builder.build(3, &zero),
            BuildOutcome::Rejected {
                row: 3,
                reason: Rejection::ZeroCoordinates
            }
        ));

        let south = legacy_row("AERÓDROMO", "SSS", "SOUTH", (10.0, 0.0, 0.0), (99.1, 0.0, 0.0));
        assert!(builder.build(4, &south).is_rejected());

        let ok = legacy_row("AERÓDROMO", "MEX", "CDMX", (19.4, 0.0, 0.0), (99.1, 0.0, 0.0));
        assert!(!builder.build(5, &ok).is_rejected());
    }

    #[test]
    fn test_blank_and_malformed_cells_default() {
        let schema = ColumnSchema::for_version(SchemaVersion::Legacy);
        let builder = RecordBuilder::new(&schema, "X");
        let mut row = legacy_row("HELIPUERTO", "", "HOSPITAL", (19.4, 0.0, 0.0), (99.1, 0.0, 0.0));
        row[9] = Cell::from("N/D");
        row.truncate(20); // active flag and status columns missing entirely

        let (record, _) = accepted(builder.build(7, &row));
        assert_eq!(record.elevation_m, 0.0);
        assert_eq!(record.elevation_ft, 0.0);
        assert_eq!(record.identifier, "X");
        assert_eq!(record.display_name("X"), "HOSPITAL");
        assert_eq!(record.status, "");
        assert_eq!(record.active, "");
    }

    #[test]
    fn test_unknown_codes_pass_through_and_are_reported() {
        let schema = ColumnSchema::for_version(SchemaVersion::Legacy);
        let builder = RecordBuilder::new(&schema, "X");
        let mut row = legacy_row("PISTA", "PST", "PISTA", (25.0, 0.0, 0.0), (105.0, 0.0, 0.0));
        row[17] = Cell::from("12 SEMANAS");
        row[22] = Cell::from(" Reubicado ");

        let (record, misses) = accepted(builder.build(3, &row));
        assert_eq!(record.aerodrome_type, "PISTA");
        assert_eq!(record.permit_duration, "12 SEMANAS");
        assert_eq!(record.status, "Reubicado");
        assert_eq!(
            misses.iter().map(|m| m.table).collect::<Vec<_>>(),
            vec![TableKind::AerodromeType, TableKind::DurationUnit, TableKind::Status]
        );
    }

    #[test]
    fn test_build_classified_record() {
        let schema = ColumnSchema::for_version(SchemaVersion::Classified);
        let builder = RecordBuilder::new(&schema, "X");

        let mut row = vec![Cell::Empty; 25];
        row[0] = Cell::Number(202.0);
        row[1] = Cell::from("HELIPUERTO");
        row[2] = Cell::from("HSM");
        row[3] = Cell::from("SANTA MARÍA");
        row[4] = Cell::from("NUEVO LEÓN");
        row[5] = Cell::from("MONTERREY");
        row[6] = Cell::from("NACIONAL");
        row[7] = Cell::from("PRIVADO");
        row[8] = Cell::from("MILITAR");
        row[9] = Cell::from("2B");
        row[10] = Cell::from("GOBIERNO DEL ESTADO");
        row[11] = Cell::Number(540.5);
        row[12] = Cell::from("ITRF08");
        row[13] = Cell::Number(25.0);
        row[14] = Cell::Number(40.0);
        row[15] = Cell::Number(12.0);
        row[16] = Cell::Number(100.0);
        row[17] = Cell::Number(18.0);
        row[18] = Cell::Number(30.0);
        row[19] = Cell::from("01/02/2020");
        row[20] = Cell::from("5 AÑOS");
        row[21] = Cell::from("01/02/2025");
        row[22] = Cell::from("NO");
        row[23] = Cell::from("INOPERATIVO");
        row[24] = Cell::from("MMMY");

        let (record, misses) = accepted(builder.build(4, &row));
        assert!(misses.is_empty(), "unexpected misses: {:?}", misses);
        assert_eq!(record.file_number, "202");
        assert_eq!(record.identifier, "XHSM");
        assert_eq!(record.aerodrome_type, "Heliport");
        assert_eq!(record.classification.as_deref(), Some("Military"));
        assert_eq!(record.reference_key.as_deref(), Some("2B"));
        assert_eq!(record.owner, "GOBIERNO DEL ESTADO");
        assert_eq!(record.elevation_m, 540.5);
        assert_eq!(record.coordinate_system.as_deref(), Some("ITRF08"));
        assert_eq!(record.latitude_dms, Dms::new(25.0, 40.0, 12.0));
        assert!((record.latitude - 25.67).abs() < 1e-9);
        assert!((record.longitude - -100.308333).abs() < 1e-6);
        assert_eq!(record.issue_date, "01/02/2020");
        assert_eq!(record.permit_duration, "5 Years");
        assert_eq!(record.expiration_date, "01/02/2025");
        assert_eq!(record.active, "No");
        assert_eq!(record.status, "Inoperative");
        assert_eq!(record.coordination_airport.as_deref(), Some("MMMY"));
        assert_eq!(record.runway, None);
        assert_eq!(record.critical_aircraft, None);
        assert_eq!(
            record.layers.iter().copied().collect::<Vec<_>>(),
            vec![Layer::Heliports]
        );
    }

    #[test]
    fn test_build_runway_record() {
        let schema = ColumnSchema::for_version(SchemaVersion::Runway);
        let builder = RecordBuilder::new(&schema, "X");

        let mut row = vec![Cell::Empty; 31];
        row[1] = Cell::from("Aeródromo-Helipuerto");
        row[2] = Cell::from("TLC");
        row[3] = Cell::from("TOLUCA");
        row[8] = Cell::from("civil");
        row[9] = Cell::from("4E");
        row[11] = Cell::Number(2580.0);
        row[12] = Cell::from("WGS84");
        row[13] = Cell::Number(19.0);
        row[14] = Cell::Number(20.0);
        row[15] = Cell::Number(13.0);
        row[16] = Cell::Number(-99.0);
        row[17] = Cell::Number(34.0);
        row[18] = Cell::Number(0.0);
        row[19] = Cell::from("15");
        row[20] = Cell::from("33");
        row[21] = Cell::Number(4200.0);
        row[22] = Cell::Number(45.0);
        row[23] = Cell::from("Concreto");
        row[24] = Cell::from("ALA FIJA");
        row[29] = Cell::from("EN TRÁMITE");
        row[30] = Cell::from("MMMX");

        let (record, _) = accepted(builder.build(9, &row));
        assert_eq!(record.aerodrome_type, "Aerodrome Heliport");
        assert_eq!(record.classification.as_deref(), Some("Civil"));
        assert_eq!(record.reference_key.as_deref(), Some("4E"));
        assert_eq!(record.coordinate_system.as_deref(), Some("WGS84"));
        assert_eq!(record.critical_aircraft.as_deref(), Some("Fixed Wing"));
        assert_eq!(record.coordination_airport.as_deref(), Some("MMMX"));
        assert_eq!(record.status, "In Process");
        assert!(record.longitude < 0.0);
        assert_eq!(record.layers.len(), 2);

        let runway = record.runway.expect("runway schema yields runway data");
        assert_eq!(runway.orientation().as_deref(), Some("15 / 33"));
        assert_eq!(runway.length_ft, 13780);
        assert_eq!(runway.width_ft, 148);
        assert_eq!(runway.surface, "Concrete");
    }
}
