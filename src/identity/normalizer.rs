use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

use super::FileIdentity;

pub const DEFAULT_VIRTUAL_PREFIXES: [&str; 4] = [
    "untitled:",
    "vscode-remote://",
    "vscode-vfs://",
    "vscode-notebook-cell:",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    virtual_prefixes: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_PREFIXES)
    }
}

impl Normalizer {
    pub fn new<I, S>(virtual_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            virtual_prefixes: virtual_prefixes
                .into_iter()
                .map(Into::<String>::into)
                .filter(|prefix| !prefix.is_empty())
                .collect(),
        }
    }

    pub fn virtual_prefixes(&self) -> &[String] {
        &self.virtual_prefixes
    }

    pub fn is_virtual(&self, reference: &str) -> bool {
        self.virtual_prefixes
            .iter()
            .any(|prefix| reference.starts_with(prefix.as_str()))
    }

    /// Normalizes against the process working directory.
    pub fn normalize(&self, reference: &str) -> FileIdentity {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        self.normalize_with_base(reference, &base)
    }

    pub fn normalize_with_base(&self, reference: &str, base: &Path) -> FileIdentity {
        if self.is_virtual(reference) {
            return FileIdentity::Virtual(reference.to_string());
        }

        let expanded = expand_home(reference);
        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            base.join(expanded)
        };
        FileIdentity::Path(clean_path(&absolute))
    }
}

fn expand_home(reference: &str) -> PathBuf {
    if let Some(rest) = reference.strip_prefix("~/")
        && let Some(dirs) = BaseDirs::new()
    {
        return dirs.home_dir().join(rest);
    }
    PathBuf::from(reference)
}

// Lexical only: symlinks are left alone and the path need not exist.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
