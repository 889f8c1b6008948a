pub mod description;
pub mod kml_writer;

pub use description::render as render_description;
pub use kml_writer::{DescriptionFormat, KmlWriter};
