use serde::{Deserialize, Serialize};

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Trimmed text; numbers render without a trailing ".0"
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => n.to_string(),
        }
    }

    /// Lenient numeric value: blanks and non-numeric text become 0.0
    pub fn as_f64(&self) -> f64 {
        match self {
            Cell::Empty => 0.0,
            Cell::Number(n) if n.is_finite() => *n,
            Cell::Number(_) => 0.0,
            Cell::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<f64>()
                    .or_else(|_| trimmed.replace(',', ".").parse::<f64>())
                    .ok()
                    .filter(|n| n.is_finite())
                    .unwrap_or(0.0)
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Row-oriented view of a worksheet. Rows are 1-indexed; the first two rows
/// are headers and are skipped by the caller, not the source.
pub trait SheetSource {
    fn row_count(&self) -> usize;

    /// Cells of row `index`, `None` outside `1..=row_count()`
    fn row(&self, index: usize) -> Option<&[Cell]>;

    /// Widest populated row among the first `rows` rows
    fn header_width(&self, rows: usize) -> usize {
        (1..=rows.min(self.row_count()))
            .filter_map(|i| self.row(i))
            .map(|cells| {
                cells
                    .iter()
                    .rposition(|c| !c.is_blank())
                    .map_or(0, |last| last + 1)
            })
            .max()
            .unwrap_or(0)
    }
}

/// Rows held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    rows: Vec<Vec<Cell>>,
}

impl MemorySheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

impl SheetSource for MemorySheet {
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
