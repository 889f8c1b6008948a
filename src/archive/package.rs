use crate::archive::{entry_options, Manifest};
use crate::error::{ProcessingError, Result};
use crate::utils::constants::{CONTAINER_EXTENSION, MANIFEST_FILE, NAVDATA_DIR};
use std::fs::{self, File};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::ZipWriter;

fn archive_write(path: &Path) -> impl Fn(io::Error) -> ProcessingError + '_ {
    move |source| ProcessingError::ArchiveWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// A named container destined for `navdata/{name}.kmz`
#[derive(Debug, Clone)]
pub struct NamedContainer {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedContainer {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn entry_path(&self) -> String {
        format!("{}/{}.{}", NAVDATA_DIR, self.name, CONTAINER_EXTENSION)
    }
}

/// Builds the distributable pack from a freshly staged directory tree
pub struct PackageBuilder {
    staging_dir: PathBuf,
    extra_content: Option<PathBuf>,
    keep_staging: bool,
}

impl PackageBuilder {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            extra_content: None,
            keep_staging: false,
        }
    }

    /// Directory whose tree is mirrored into the pack root
    pub fn with_extra_content(mut self, dir: Option<PathBuf>) -> Self {
        self.extra_content = dir;
        self
    }

    pub fn with_keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging = keep;
        self
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Recreate the staging tree from scratch.
    ///
    /// Extra content is copied first so the manifest and containers always
    /// win over a same-named file in it.
    pub fn stage(&self, manifest: &Manifest, containers: &[NamedContainer]) -> Result<()> {
        let staging = self.staging_dir.as_path();
        if staging.exists() {
            debug!("Removing stale staging directory {}", staging.display());
            fs::remove_dir_all(staging).map_err(archive_write(staging))?;
        }
        fs::create_dir_all(staging).map_err(archive_write(staging))?;

        if let Some(extra) = &self.extra_content {
            mirror_tree(extra, staging)?;
        }

        let manifest_path = staging.join(MANIFEST_FILE);
        fs::write(&manifest_path, manifest.to_json()?).map_err(archive_write(&manifest_path))?;

        let navdata = staging.join(NAVDATA_DIR);
        fs::create_dir_all(&navdata).map_err(archive_write(&navdata))?;
        for container in containers {
            let path = staging.join(container.entry_path());
            fs::write(&path, &container.bytes).map_err(archive_write(&path))?;
        }

        Ok(())
    }

    /// Stage, then archive the staging directory
    pub fn build_package(
        &self,
        manifest: &Manifest,
        containers: &[NamedContainer],
    ) -> Result<Vec<u8>> {
        self.stage(manifest, containers)?;
        let bytes = archive_directory(&self.staging_dir);

        if !self.keep_staging && self.staging_dir.exists() {
            fs::remove_dir_all(&self.staging_dir).map_err(archive_write(&self.staging_dir))?;
        }
        bytes
    }

    /// Build and replace `output`; returns the archive size in bytes
    pub fn write(
        &self,
        manifest: &Manifest,
        containers: &[NamedContainer],
        output: &Path,
    ) -> Result<u64> {
        let bytes = self.build_package(manifest, containers)?;
        write_atomically(output, &bytes)?;
        info!("Wrote {} ({} bytes)", output.display(), bytes.len());
        Ok(bytes.len() as u64)
    }
}

/// Zip a directory tree with paths relative to `root`.
///
/// Entries are visited depth-first with siblings sorted by name, so each
/// directory entry precedes the files it contains and the order never
/// depends on the filesystem.
pub fn archive_directory(root: &Path) -> Result<Vec<u8>> {
    let options = entry_options();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ProcessingError::Io(e.into()))?;
        let name = relative_entry_name(root, entry.path())?;

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, options)?;
            let mut file = File::open(entry.path())?;
            io::copy(&mut file, &mut zip)?;
        }
    }

    Ok(zip.finish()?.into_inner())
}

fn relative_entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        ProcessingError::InvalidFormat(format!(
            "{} is outside {}",
            path.display(),
            root.display()
        ))
    })?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}

fn mirror_tree(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ProcessingError::Io(e.into()))?;
        let target = destination.join(relative_entry_name(source, entry.path())?);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(archive_write(&target))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(archive_write(&target))?;
        }
    }
    Ok(())
}

/// Replace `output` with `bytes`; a failed write never leaves a partial archive
pub fn write_atomically(output: &Path, bytes: &[u8]) -> Result<()> {
    let wrap = archive_write(output);
    if output.exists() {
        debug!("Removing stale archive {}", output.display());
        fs::remove_file(output).map_err(&wrap)?;
    }

    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(&wrap)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(&wrap)?;
    temp.write_all(bytes).map_err(&wrap)?;
    temp.flush().map_err(&wrap)?;
    temp.persist(output).map_err(|e| wrap(e.error))?;
    Ok(())
}
