pub mod csv_reader;
pub mod sheet;

pub use csv_reader::CsvSheet;
pub use sheet::{Cell, MemorySheet, SheetSource};
