use crate::error::{ProcessingError, Result};
use crate::models::StyleId;
use std::fs;
use std::path::{Path, PathBuf};

/// Icon images on disk, one `{base}_{suffix}.png` per style
#[derive(Debug, Clone)]
pub struct IconLibrary {
    root: PathBuf,
}

impl IconLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, style: &StyleId) -> PathBuf {
        self.root.join(style.icon_file_name())
    }

    /// Raw image bytes; a missing file is fatal rather than a dangling reference
    pub fn load(&self, style: &StyleId) -> Result<Vec<u8>> {
        let path = self.path_for(style);
        if !path.is_file() {
            return Err(ProcessingError::AssetMissing {
                style: style.to_string(),
                path,
            });
        }
        Ok(fs::read(&path)?)
    }

    /// Styles among `styles` whose icon file does not exist
    pub fn missing<'a>(&self, styles: impl IntoIterator<Item = &'a StyleId>) -> Vec<StyleId> {
        styles
            .into_iter()
            .filter(|style| !self.path_for(style).is_file())
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StatusSuffix, StyleBase};
    use tempfile::TempDir;

    #[test]
    fn test_load_and_missing() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("heliport_active.png"), b"PNG")?;
        let icons = IconLibrary::new(dir.path());

        let present = StyleId::new(StyleBase::Heliport, StatusSuffix::Active);
        let absent = StyleId::new(StyleBase::Heliport, StatusSuffix::Inactive);

        assert_eq!(icons.load(&present)?, b"PNG".to_vec());
        match icons.load(&absent) {
            Err(ProcessingError::AssetMissing { style, path }) => {
                assert_eq!(style, "heliport_inactive");
                assert!(path.ends_with("heliport_inactive.png"));
            }
            other => panic!("expected AssetMissing, got {:?}", other),
        }
        assert_eq!(icons.missing([&present, &absent]), vec![absent]);
        Ok(())
    }
}
