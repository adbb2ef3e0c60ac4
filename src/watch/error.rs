use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot watch {}: {source}", .directory.display())]
    Unavailable {
        directory: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("{} has no containing directory to watch", .0.display())]
    NoParent(PathBuf),
}
