pub mod container;
pub mod icons;
pub mod manifest;
pub mod package;

pub use container::pack_document;
pub use icons::IconLibrary;
pub use manifest::Manifest;
pub use package::{archive_directory, write_atomically, NamedContainer, PackageBuilder};

use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime};

/// Options shared by every entry written.
///
/// The timestamp is pinned to the zip epoch (1980-01-01) so identical input
/// produces identical archive bytes.
pub fn entry_options() -> FileOptions {
    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}
