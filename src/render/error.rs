use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

/// Every variant is a render failure: the viewer shows a placeholder and
/// keeps the window alive.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not prepare temporary render output: {0}")]
    TempDir(#[source] std::io::Error),

    #[error("failed to launch renderer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer exited with {status}{}", format_diagnostics(.diagnostics))]
    Exited { status: String, diagnostics: String },

    #[error("renderer produced no image at {}{}", .path.display(), format_diagnostics(.diagnostics))]
    MissingArtifact { path: PathBuf, diagnostics: String },

    #[error("rendered image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("{0} is not a file on disk and cannot be rendered")]
    NotAFile(String),
}

impl RenderError {
    /// Captured renderer output, when the renderer got far enough to produce any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Exited { diagnostics, .. } | Self::MissingArtifact { diagnostics, .. }
                if !diagnostics.is_empty() =>
            {
                Some(diagnostics)
            }
            _ => None,
        }
    }
}

fn format_diagnostics(diagnostics: &str) -> String {
    if diagnostics.is_empty() {
        String::new()
    } else {
        format!(": {diagnostics}")
    }
}
