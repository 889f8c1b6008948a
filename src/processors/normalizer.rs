use crate::models::TableKind;
use regex::Regex;
use std::sync::OnceLock;

/// Register vocabulary to canonical English labels.
///
/// Keyed by the trimmed, upper-cased raw value; accented and unaccented
/// spellings are both listed. A value with no entry passes through trimmed
/// and is counted as a miss.
#[derive(Debug, Clone, Copy)]
pub struct NormalizationTable {
    pub kind: TableKind,
    entries: &'static [(&'static str, &'static str)],
}

impl NormalizationTable {
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(raw, _)| *raw == key)
            .map(|(_, canonical)| *canonical)
    }
}

pub const AERODROME_TYPES: NormalizationTable = NormalizationTable {
    kind: TableKind::AerodromeType,
    entries: &[
        ("AERÓDROMO", "Aerodrome"),
        ("AERODROMO", "Aerodrome"),
        ("HELIPUERTO", "Heliport"),
        ("HELIPUERTO (BARCO)", "Heliport (Boat)"),
        ("HELIPUERTO EN BARCO", "Heliport (Boat)"),
        ("HELIPUERTO PLATAFORMA", "Heliport Platform"),
        ("HELIPUERTO EN PLATAFORMA", "Heliport Platform"),
        ("HELIPLATAFORMA", "Heliplatform"),
        ("ACUATIZADOR", "Seaplane Base"),
        ("BASE DE HIDROAVIONES", "Seaplane Base"),
        ("ZONA DE DESPEGUE", "Takeoff Zone"),
        ("ZONA DE DESPEGUE Y ATERRIZAJE", "Takeoff Zone"),
        ("AERÓDROMO HELIPUERTO", "Aerodrome Heliport"),
        ("AERODROMO HELIPUERTO", "Aerodrome Heliport"),
        ("AERÓDROMO-HELIPUERTO", "Aerodrome Heliport"),
        ("AERODROMO-HELIPUERTO", "Aerodrome Heliport"),
        ("AERÓDROMO Y HELIPUERTO", "Aerodrome Heliport"),
    ],
};

pub const OPERATION_TYPES: NormalizationTable = NormalizationTable {
    kind: TableKind::OperationType,
    entries: &[
        ("NACIONAL", "Domestic"),
        ("INTERNACIONAL", "International"),
        ("VISUAL", "Visual (VFR)"),
        ("VFR", "Visual (VFR)"),
        ("INSTRUMENTOS", "Instrument (IFR)"),
        ("IFR", "Instrument (IFR)"),
        ("DIURNA", "Day"),
        ("DIURNO", "Day"),
        ("NOCTURNA", "Night"),
        ("DIURNA Y NOCTURNA", "Day and Night"),
        ("DIURNO Y NOCTURNO", "Day and Night"),
    ],
};

pub const SERVICE_TYPES: NormalizationTable = NormalizationTable {
    kind: TableKind::ServiceType,
    entries: &[
        ("PRIVADO", "Private"),
        ("PÚBLICO", "Public"),
        ("PUBLICO", "Public"),
        ("PRIVADO COMERCIAL", "Private Commercial"),
        ("PRIVADO NO COMERCIAL", "Private Non-Commercial"),
        ("OFICIAL", "Official"),
        ("MILITAR", "Military"),
        ("GUBERNAMENTAL", "Government"),
    ],
};

pub const ACTIVE_FLAGS: NormalizationTable = NormalizationTable {
    kind: TableKind::ActiveFlag,
    entries: &[
        ("SI", "Yes"),
        ("SÍ", "Yes"),
        ("S", "Yes"),
        ("NO", "No"),
        ("N", "No"),
    ],
};

pub const STATUSES: NormalizationTable = NormalizationTable {
    kind: TableKind::Status,
    entries: &[
        ("OPERATIVO", "Active"),
        ("ACTIVO", "Active"),
        ("VIGENTE", "Active"),
        ("EN OPERACIÓN", "Active"),
        ("EN OPERACION", "Active"),
        ("EN TRÁMITE", "In Process"),
        ("EN TRAMITE", "In Process"),
        ("EN PROCESO", "In Process"),
        ("INOPERATIVO", "Inoperative"),
        ("NO OPERATIVO", "Inoperative"),
        ("MILITAR", "Military"),
        ("EN PROCESO DE CANCELACIÓN", "Cancellation in Process"),
        ("EN PROCESO DE CANCELACION", "Cancellation in Process"),
        ("CANCELADO", "Cancelled"),
        ("VENCIDO", "Expired"),
        ("SUSPENDIDO", "Suspended"),
        ("CERRADO", "Closed"),
    ],
};

pub const ISSUE_DATES: NormalizationTable = NormalizationTable {
    kind: TableKind::IssueDate,
    entries: &[
        ("S/F", "No Date"),
        ("SIN FECHA", "No Date"),
        ("EN TRÁMITE", "In Process"),
        ("EN TRAMITE", "In Process"),
        ("N/A", "N/A"),
        ("NO APLICA", "N/A"),
    ],
};

pub const EXPIRATION_DATES: NormalizationTable = NormalizationTable {
    kind: TableKind::ExpirationDate,
    entries: &[
        ("INDEFINIDO", "Indefinite"),
        ("INDEFINIDA", "Indefinite"),
        ("INDETERMINADO", "Indefinite"),
        ("PERMANENTE", "Permanent"),
        ("S/F", "No Date"),
        ("SIN FECHA", "No Date"),
        ("EN TRÁMITE", "In Process"),
        ("EN TRAMITE", "In Process"),
        ("N/A", "N/A"),
        ("NO APLICA", "N/A"),
    ],
};

/// Units for "30 DIAS" style durations, plus whole-token keywords such as
/// "PROYECTO" that appear in the same column without a number
pub const DURATION_UNITS: NormalizationTable = NormalizationTable {
    kind: TableKind::DurationUnit,
    entries: &[
        ("DIA", "Day"),
        ("DÍA", "Day"),
        ("DIAS", "Days"),
        ("DÍAS", "Days"),
        ("MES", "Month"),
        ("MESES", "Months"),
        ("AÑO", "Year"),
        ("ANO", "Year"),
        ("AÑOS", "Years"),
        ("ANOS", "Years"),
        ("PROYECTO", "Project"),
        ("UNA VEZ", "One Time"),
        ("ÚNICA VEZ", "One Time"),
        ("UNICA VEZ", "One Time"),
        ("INDEFINIDO", "Indefinite"),
        ("INDEFINIDA", "Indefinite"),
        ("PERMANENTE", "Permanent"),
    ],
};

pub const CLASSIFICATIONS: NormalizationTable = NormalizationTable {
    kind: TableKind::Classification,
    entries: &[
        ("CIVIL", "Civil"),
        ("MILITAR", "Military"),
        ("MIXTO", "Mixed"),
        ("ESTATAL", "State"),
        ("AEROPUERTO", "Airport"),
        ("AERÓDROMO", "Aerodrome"),
        ("AERODROMO", "Aerodrome"),
    ],
};

pub const SURFACE_TYPES: NormalizationTable = NormalizationTable {
    kind: TableKind::SurfaceType,
    entries: &[
        ("ASFALTO", "Asphalt"),
        ("CONCRETO", "Concrete"),
        ("CONCRETO HIDRÁULICO", "Concrete"),
        ("CONCRETO HIDRAULICO", "Concrete"),
        ("CONCRETO ASFÁLTICO", "Asphalt"),
        ("CONCRETO ASFALTICO", "Asphalt"),
        ("TERRACERÍA", "Dirt"),
        ("TERRACERIA", "Dirt"),
        ("TIERRA", "Dirt"),
        ("GRAVA", "Gravel"),
        ("PASTO", "Grass"),
        ("ARCILLA", "Clay"),
        ("METAL", "Metal"),
        ("ACERO", "Steel"),
        ("MADERA", "Wood"),
        ("AGUA", "Water"),
    ],
};

pub const AIRCRAFT_CATEGORIES: NormalizationTable = NormalizationTable {
    kind: TableKind::AircraftCategory,
    entries: &[
        ("ALA FIJA", "Fixed Wing"),
        ("ALA ROTATIVA", "Rotary Wing"),
        ("HELICÓPTERO", "Helicopter"),
        ("HELICOPTERO", "Helicopter"),
        ("AVIONETA", "Light Aircraft"),
        ("ULTRALIGERO", "Ultralight"),
        ("ULTRALIGERA", "Ultralight"),
        ("HIDROAVIÓN", "Seaplane"),
        ("HIDROAVION", "Seaplane"),
    ],
};

pub fn table(kind: TableKind) -> &'static NormalizationTable {
    match kind {
        TableKind::AerodromeType => &AERODROME_TYPES,
        TableKind::OperationType => &OPERATION_TYPES,
        TableKind::ServiceType => &SERVICE_TYPES,
        TableKind::ActiveFlag => &ACTIVE_FLAGS,
        TableKind::Status => &STATUSES,
        TableKind::IssueDate => &ISSUE_DATES,
        TableKind::ExpirationDate => &EXPIRATION_DATES,
        TableKind::DurationUnit => &DURATION_UNITS,
        TableKind::Classification => &CLASSIFICATIONS,
        TableKind::SurfaceType => &SURFACE_TYPES,
        TableKind::AircraftCategory => &AIRCRAFT_CATEGORIES,
    }
}

fn lookup_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Canonical label for `raw`, or `None` on a miss
pub fn lookup(table: &NormalizationTable, raw: &str) -> Option<&'static str> {
    table.get(&lookup_key(raw))
}

/// Canonical label for `raw`; a miss returns the trimmed input unchanged
pub fn normalize(table: &NormalizationTable, raw: &str) -> String {
    lookup(table, raw).map_or_else(|| raw.trim().to_string(), str::to_string)
}

fn numeric_duration() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(\d+)\s*(\p{L}+)$").ok())
        .as_ref()
}

/// Translate a permit duration such as "30 DIAS" or "PROYECTO".
///
/// `<number><optional space><word>` keeps the number and normalises only
/// the unit; anything else is looked up as a whole token.
pub fn translate_duration(raw: &str, units: &NormalizationTable) -> String {
    translate_duration_checked(raw, units).0
}

/// As `translate_duration`, also reporting whether the unit or token was found
pub fn translate_duration_checked(raw: &str, units: &NormalizationTable) -> (String, bool) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return (String::new(), true);
    }

    if let Some(caps) = numeric_duration().and_then(|re| re.captures(trimmed)) {
        let amount = &caps[1];
        let unit = &caps[2];
        return match lookup(units, unit) {
            Some(canonical) => (format!("{} {}", amount, canonical), true),
            None => (format!("{} {}", amount, unit), false),
        };
    }

    match lookup(units, trimmed) {
        Some(canonical) => (canonical.to_string(), true),
        None => (trimmed.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TABLES: [&NormalizationTable; 11] = [
        &AERODROME_TYPES,
        &OPERATION_TYPES,
        &SERVICE_TYPES,
        &ACTIVE_FLAGS,
        &STATUSES,
        &ISSUE_DATES,
        &EXPIRATION_DATES,
        &DURATION_UNITS,
        &CLASSIFICATIONS,
        &SURFACE_TYPES,
        &AIRCRAFT_CATEGORIES,
    ];

    #[test]
    fn test_normalize_case_and_whitespace() {
        assert_eq!(normalize(&AERODROME_TYPES, "  helipuerto "), "Heliport");
        assert_eq!(normalize(&AERODROME_TYPES, "Aeródromo"), "Aerodrome");
        assert_eq!(normalize(&AERODROME_TYPES, "aerodromo"), "Aerodrome");
        assert_eq!(normalize(&STATUSES, "En trámite"), "In Process");
        assert_eq!(normalize(&ACTIVE_FLAGS, "sí"), "Yes");
    }

    #[test]
    fn test_normalize_miss_passes_through_trimmed() {
        assert_eq!(normalize(&STATUSES, "  Reubicado  "), "Reubicado");
        assert_eq!(lookup(&STATUSES, "Reubicado"), None);
        assert_eq!(normalize(&STATUSES, ""), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for table in ALL_TABLES {
            for (raw, canonical) in table.entries() {
                let once = normalize(table, raw);
                assert_eq!(once, *canonical);
                assert_eq!(
                    normalize(table, &once),
                    once,
                    "re-normalising '{}' in {:?} changed it",
                    once,
                    table.kind
                );
            }
        }
    }

    #[test]
    fn test_table_keys_are_upper_case_and_unique() {
        for table in ALL_TABLES {
            for (i, (raw, _)) in table.entries().iter().enumerate() {
                assert_eq!(*raw, raw.to_uppercase(), "{:?} key not upper-case", table.kind);
                assert!(
                    table.entries()[i + 1..].iter().all(|(other, _)| other != raw),
                    "{:?} has duplicate key {}",
                    table.kind,
                    raw
                );
            }
        }
    }

    #[test]
    fn test_translate_duration() {
        assert_eq!(translate_duration("30 DIAS", &DURATION_UNITS), "30 Days");
        assert_eq!(translate_duration("PROYECTO", &DURATION_UNITS), "Project");
        assert_eq!(translate_duration("", &DURATION_UNITS), "");
        assert_eq!(translate_duration("5AÑOS", &DURATION_UNITS), "5 Years");
        assert_eq!(translate_duration("1 año", &DURATION_UNITS), "1 Year");
        assert_eq!(translate_duration("Una vez", &DURATION_UNITS), "One Time");
    }

    #[test]
    fn test_translate_duration_unknown_unit_passes_through() {
        assert_eq!(
            translate_duration("12 SEMANAS", &DURATION_UNITS),
            "12 SEMANAS"
        );
        assert_eq!(
            translate_duration_checked("12 SEMANAS", &DURATION_UNITS),
            ("12 SEMANAS".to_string(), false)
        );
        assert_eq!(
            translate_duration("HASTA NUEVO AVISO", &DURATION_UNITS),
            "HASTA NUEVO AVISO"
        );
    }

    #[test]
    fn test_translated_duration_is_stable() {
        for raw in ["30 DIAS", "PROYECTO", "2 AÑOS", "UNA VEZ"] {
            let once = translate_duration(raw, &DURATION_UNITS);
            assert_eq!(translate_duration(&once, &DURATION_UNITS), once);
        }
    }
}
