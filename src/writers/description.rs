use crate::models::{CanonicalRecord, Description};
use crate::utils::{format_dms, Hemisphere};
use quick_xml::escape::escape;

const NOT_AVAILABLE: &str = "N/A";

const CONTAINER_STYLE: &str = "font-family:Arial,Helvetica,sans-serif;font-size:12px;min-width:260px;";
const TITLE_STYLE: &str = "margin:0 0 6px 0;font-size:14px;color:#1a3c6e;";
const TABLE_STYLE: &str = "border-collapse:collapse;width:100%;";
const LABEL_STYLE: &str =
    "padding:2px 6px;font-weight:bold;color:#555555;white-space:nowrap;vertical-align:top;";
const VALUE_STYLE: &str = "padding:2px 6px;";
const SHADED_ROW_STYLE: &str = "background-color:#f2f5f9;";

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Labelled fields in display order; fields the schema lacks are left out
pub fn fields(record: &CanonicalRecord) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("File Number", or_na(&record.file_number)),
        ("Aerodrome Type", or_na(&record.aerodrome_type)),
        ("Identifier", or_na(&record.identifier)),
        ("Name", or_na(&record.name)),
        ("State", or_na(&record.state)),
        ("Municipality", or_na(&record.municipality)),
        ("Operation Type", or_na(&record.operation_type)),
        ("Service Type", or_na(&record.service_type)),
    ];

    if let Some(classification) = &record.classification {
        fields.push(("Classification", or_na(classification)));
    }
    if let Some(reference_key) = &record.reference_key {
        fields.push(("Reference Key", or_na(reference_key)));
    }
    fields.push(("Owner", or_na(&record.owner)));
    fields.push(("Elevation", record.elevation_display()));
    if let Some(coordinate_system) = &record.coordinate_system {
        fields.push(("Coordinate System", or_na(coordinate_system)));
    }
    fields.push((
        "Latitude",
        format_dms(&record.latitude_dms, Hemisphere::North),
    ));
    fields.push((
        "Longitude",
        format_dms(&record.longitude_dms, Hemisphere::West),
    ));

    if let Some(runway) = &record.runway {
        fields.push((
            "Runway",
            runway.orientation().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ));
        fields.push((
            "Runway Dimensions",
            runway.dimensions().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ));
        fields.push(("Surface", or_na(&runway.surface)));
    }
    if let Some(critical_aircraft) = &record.critical_aircraft {
        fields.push(("Critical Aircraft", or_na(critical_aircraft)));
    }

    fields.push(("Issue Date", or_na(&record.issue_date)));
    fields.push(("Permit Duration", or_na(&record.permit_duration)));
    fields.push(("Expiration Date", or_na(&record.expiration_date)));
    fields.push(("Active", or_na(&record.active)));
    fields.push(("Status", or_na(&record.status)));
    if let Some(coordination_airport) = &record.coordination_airport {
        fields.push(("Coordination Airport", or_na(coordination_airport)));
    }

    fields
}

/// Render both description blocks for a record
pub fn render(record: &CanonicalRecord) -> Description {
    let fields = fields(record);
    Description {
        html: render_html(&record.name, &fields),
        text: render_text(&fields),
    }
}

fn render_text(fields: &[(&'static str, String)]) -> String {
    fields
        .iter()
        .map(|(label, value)| format!("{}: {}\n", label, value))
        .collect()
}

/// Self-contained popup fragment: inline CSS only, every value escaped
fn render_html(title: &str, fields: &[(&'static str, String)]) -> String {
    let mut html = String::with_capacity(256 + fields.len() * 160);
    html.push_str(&format!("<div style=\"{}\">", CONTAINER_STYLE));
    if !title.trim().is_empty() {
        html.push_str(&format!(
            "<h3 style=\"{}\">{}</h3>",
            TITLE_STYLE,
            escape(title)
        ));
    }
    html.push_str(&format!("<table style=\"{}\">", TABLE_STYLE));
    for (i, (label, value)) in fields.iter().enumerate() {
        if i % 2 == 1 {
            html.push_str(&format!("<tr style=\"{}\">", SHADED_ROW_STYLE));
        } else {
            html.push_str("<tr>");
        }
        html.push_str(&format!(
            "<td style=\"{}\">{}</td><td style=\"{}\">{}</td></tr>",
            LABEL_STYLE,
            escape(*label),
            VALUE_STYLE,
            escape(value.as_str())
        ));
    }
    html.push_str("</table></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnSchema, SchemaVersion};
    use crate::processors::record_builder::tests::legacy_row;
    use crate::processors::record_builder::{BuildOutcome, RecordBuilder};
    use pretty_assertions::assert_eq;

    fn legacy_record() -> CanonicalRecord {
        let schema = ColumnSchema::for_version(SchemaVersion::Legacy);
        let builder = RecordBuilder::new(&schema, "X");
        let row = legacy_row(
            "AERÓDROMO",
            "NLU",
            "FELIPE ÁNGELES <AIFA> & CO",
            (19.0, 44.0, 24.0),
            (99.0, 0.0, 54.0),
        );
        match builder.build(3, &row) {
            BuildOutcome::Accepted { record, .. } => *record,
            BuildOutcome::Rejected { .. } => panic!("row should be accepted"),
        }
    }

    #[test]
    fn test_text_block_lists_legacy_fields_in_order() {
        let description = render(&legacy_record());
        let expected = "\
File Number: 101
Aerodrome Type: Aerodrome
Identifier: XNLU
Name: FELIPE ÁNGELES <AIFA> & CO
State: ESTADO DE MÉXICO
Municipality: ZUMPANGO
Operation Type: International
Service Type: Public
Owner: SEDENA
Elevation: 7349.08 ft (2240 m)
Latitude: 19° 44' 24.00\" N
Longitude: 99° 00' 54.00\" W
Issue Date: 21/03/2022
Permit Duration: 50 Years
Expiration Date: Indefinite
Active: Yes
Status: Active
";
        assert_eq!(description.text, expected);
    }

    #[test]
    fn test_html_block_escapes_markup() {
        let description = render(&legacy_record());
        assert!(description.html.starts_with("<div style="));
        assert!(description.html.ends_with("</table></div>"));
        assert!(description.html.contains("FELIPE ÁNGELES &lt;AIFA&gt; &amp; CO"));
        assert!(!description.html.contains("<AIFA>"));
        assert!(!description.html.contains("href"));
        assert!(!description.html.contains("<link"));
    }

    #[test]
    fn test_schema_optional_fields_render_when_present() {
        let mut record = legacy_record();
        record.classification = Some("Civil".to_string());
        record.coordination_airport = Some(String::new());
        record.runway = Some(crate::models::Runway::new(
            "09".to_string(),
            "27".to_string(),
            1500.0,
            0.0,
            "Asphalt".to_string(),
        ));

        let labels: Vec<(&str, String)> = fields(&record);
        let find = |label: &str| {
            labels
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(find("Classification").as_deref(), Some("Civil"));
        assert_eq!(find("Runway").as_deref(), Some("09 / 27"));
        assert_eq!(find("Runway Dimensions").as_deref(), Some("N/A"));
        assert_eq!(find("Coordination Airport").as_deref(), Some("N/A"));
        assert_eq!(find("Reference Key"), None);

        let position = |label: &str| labels.iter().position(|(l, _)| *l == label);
        assert!(position("Classification") < position("Owner"));
        assert!(position("Surface") < position("Issue Date"));
        assert_eq!(position("Coordination Airport"), Some(labels.len() - 1));
    }
}
