use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;

use super::{Result, WatchError};

/// Callback run on the watcher's delivery thread when a watched file changes.
pub type ChangeHandler = Arc<dyn Fn() + Send + Sync>;

type HandlerTable = Arc<Mutex<HashMap<PathBuf, ChangeHandler>>>;

/// One OS-level, non-recursive watch on a directory, shared by every watched
/// file inside it.
pub struct WatchSubscription {
    directory: PathBuf,
    handlers: HandlerTable,
    watcher: Option<RecommendedWatcher>,
}

impl std::fmt::Debug for WatchSubscription {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("WatchSubscription")
            .field("directory", &self.directory)
            .field("handlers", &self.handler_count())
            .field("live", &self.watcher.is_some())
            .finish()
    }
}

impl WatchSubscription {
    pub fn start(directory: &Path) -> Result<Self> {
        let handlers = HandlerTable::default();
        let delivery = handlers.clone();
        let watched = directory.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    dispatch_to(&delivery, &event);
                }
                Err(error) => {
                    tracing::warn!(
                        directory = %watched.display(),
                        %error,
                        "watch delivery failed"
                    );
                }
            }
        })
        .map_err(|source| unavailable(directory, source))?;

        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|source| unavailable(directory, source))?;

        tracing::debug!(directory = %directory.display(), "directory watch started");
        Ok(Self {
            directory: directory.to_path_buf(),
            handlers,
            watcher: Some(watcher),
        })
    }

    /// A subscription with no OS watch behind it; events arrive only through
    /// [`WatchSubscription::dispatch`].
    pub fn detached(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            handlers: HandlerTable::default(),
            watcher: None,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn attach(&self, file: PathBuf, handler: ChangeHandler) {
        self.handlers.lock().insert(file, handler);
    }

    pub fn detach(&self, file: &Path) -> bool {
        self.handlers.lock().remove(file).is_some()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }

    pub fn has_handler(&self, file: &Path) -> bool {
        self.handlers.lock().contains_key(file)
    }

    /// Runs the handlers whose file is named by `event`. Returns how many ran.
    pub fn dispatch(&self, event: &Event) -> usize {
        dispatch_to(&self.handlers, event)
    }
}

/// Creation and modification (including rename-into-place saves) count as a
/// content change; access and removal do not.
pub fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}

fn dispatch_to(handlers: &HandlerTable, event: &Event) -> usize {
    if !is_content_change(&event.kind) {
        return 0;
    }

    // Run handlers outside the lock.
    let matched = {
        let table = handlers.lock();
        table
            .iter()
            .filter(|(file, _)| event.paths.iter().any(|changed| changed == *file))
            .map(|(_, handler)| handler.clone())
            .collect::<Vec<_>>()
    };
    for handler in &matched {
        handler();
    }
    matched.len()
}

fn unavailable(directory: &Path, source: notify::Error) -> WatchError {
    WatchError::Unavailable {
        directory: directory.to_path_buf(),
        source,
    }
}
