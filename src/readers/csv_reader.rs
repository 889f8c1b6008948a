use crate::error::Result;
use crate::readers::sheet::{Cell, SheetSource};
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A worksheet exported to CSV.
///
/// Exports from Spanish-locale spreadsheet software are often Windows-1252
/// rather than UTF-8; input that is not valid UTF-8 is decoded as such.
pub struct CsvSheet {
    rows: Vec<Vec<Cell>>,
}

impl CsvSheet {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = decode(bytes);
        let delimiter = detect_delimiter(&text);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::from).collect());
        }

        debug!("Read {} CSV rows", rows.len());
        Ok(Self { rows })
    }
}

impl SheetSource for CsvSheet {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<&[Cell]> {
        index
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .map(|r| r.as_slice())
    }
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            debug!("Input is not UTF-8, decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}

/// Semicolon-separated exports are common in Spanish locales
fn detect_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.matches(';').count() > first_line.matches(',').count() {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_utf8_csv() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "REGISTRO DE AERÓDROMOS,,")?;
        writeln!(temp_file, "NO. DE EXPEDIENTE,TIPO AERÓDROMO,DESIGNADOR")?;
        writeln!(temp_file, "101,AERÓDROMO,AIF")?;

        let sheet = CsvSheet::open(temp_file.path())?;
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.row(3).unwrap()[1].as_text(), "AERÓDROMO");
        assert_eq!(sheet.row(3).unwrap()[0].as_f64(), 101.0);
        Ok(())
    }

    #[test]
    fn test_read_windows_1252_csv() -> Result<()> {
        // "HELIPUERTO;SÍ" with Í encoded as 0xCD
        let bytes = b"HELIPUERTO;S\xCD\n";
        let sheet = CsvSheet::from_bytes(bytes)?;
        assert_eq!(sheet.row(1).unwrap()[1].as_text(), "SÍ");
        Ok(())
    }

    #[test]
    fn test_flexible_row_widths() -> Result<()> {
        let sheet = CsvSheet::from_bytes(b"a,b,c\nd\n")?;
        assert_eq!(sheet.row(1).unwrap().len(), 3);
        assert_eq!(sheet.row(2).unwrap().len(), 1);
        Ok(())
    }
}
