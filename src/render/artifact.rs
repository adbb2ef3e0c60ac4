use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{RenderError, Result};

const TEMP_PREFIX: &str = "umlview-";

/// Scoped output location for one render.
///
/// Dropping the artifact deletes the directory and everything the renderer
/// wrote into it.
#[derive(Debug)]
pub struct RenderArtifact {
    dir: TempDir,
    image_path: PathBuf,
}

impl RenderArtifact {
    pub fn create(source: &Path, format: &str, temp_root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        let dir = match temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(RenderError::TempDir)?;

        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "diagram".to_string());
        let image_path = dir.path().join(format!("{stem}.{format}"));
        Ok(Self { dir, image_path })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn read(&self, diagnostics: &str) -> Result<Vec<u8>> {
        fs::read(&self.image_path).map_err(|error| {
            let diagnostics = if error.kind() == ErrorKind::NotFound {
                diagnostics.to_string()
            } else if diagnostics.is_empty() {
                error.to_string()
            } else {
                format!("{error}; {diagnostics}")
            };
            RenderError::MissingArtifact {
                path: self.image_path.clone(),
                diagnostics,
            }
        })
    }
}
