use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// Stable key for one logical diagram source.
///
/// Real files are keyed by their normalized absolute path. References that
/// carry a virtual scheme (editor buffers, remote workspaces) are kept
/// verbatim and only ever compared literally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileIdentity {
    Path(PathBuf),
    Virtual(String),
}

impl FileIdentity {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Virtual(_) => None,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual(_))
    }

    pub fn parent_dir(&self) -> Option<&Path> {
        self.as_path().and_then(Path::parent)
    }

    /// Base name shown as the window title.
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Virtual(reference) => reference
                .rsplit(['/', '\\'])
                .find(|segment| !segment.is_empty())
                .unwrap_or(reference)
                .to_string(),
        }
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(formatter, "{}", path.display()),
            Self::Virtual(reference) => formatter.write_str(reference),
        }
    }
}
