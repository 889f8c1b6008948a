pub mod document;
pub mod record;
pub mod schema;
pub mod style;

pub use document::{Description, Document, Placemark};
pub use record::{CanonicalRecord, Runway};
pub use schema::{
    ColumnSchema, ColumnSpec, Field, SchemaSelection, SchemaVersion, TableKind, ValueKind,
};
pub use style::{Layer, StatusSuffix, StyleBase, StyleId};
