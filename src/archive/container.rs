use crate::archive::{entry_options, IconLibrary};
use crate::error::Result;
use crate::models::Document;
use crate::utils::constants::{DOCUMENT_ENTRY, ICON_DIR};
use crate::writers::KmlWriter;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::ZipWriter;

/// Package one document with the icons its styles reference.
///
/// Every icon is loaded before the archive is started, so a missing asset
/// fails without producing a partial container.
pub fn pack_document(
    document: &Document,
    writer: &KmlWriter,
    icons: &IconLibrary,
) -> Result<Vec<u8>> {
    let mut assets = Vec::with_capacity(document.style_count());
    for style in document.styles() {
        assets.push((style.icon_href(), icons.load(style)?));
    }

    let kml = writer.to_bytes(document)?;
    let options = entry_options();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file(DOCUMENT_ENTRY, options)?;
    zip.write_all(&kml)?;

    zip.add_directory(format!("{}/", ICON_DIR), options)?;
    for (href, bytes) in assets {
        zip.start_file(href, options)?;
        zip.write_all(&bytes)?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!(
        "Packed '{}': {} placemarks, {} icons, {} bytes",
        document.name(),
        document.placemarks().len(),
        document.style_count(),
        bytes.len()
    );
    Ok(bytes)
}
