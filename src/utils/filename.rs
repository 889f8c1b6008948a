use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

/// Default content pack filename: mx-aerodromes-{YYMMDD}.zip
pub fn generate_default_package_filename(output_dir: &Path, date: NaiveDate) -> PathBuf {
    let year = date.year() % 100; // Get last 2 digits of year
    let filename = format!(
        "mx-aerodromes-{:02}{:02}{:02}.zip",
        year,
        date.month(),
        date.day()
    );
    output_dir.join(filename)
}

/// Filesystem-safe stem derived from a display name, e.g. "Mexican Airports" -> "mexican_airports"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}
