use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use crate::identity::FileIdentity;

use super::{ChangeHandler, Result, WatchError, WatchSubscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A new directory watch was started for the file.
    Created,
    /// The file joined the existing watch on its directory.
    Attached,
    /// Virtual identities have no directory to watch.
    Skipped,
}

/// Directory path to its single [`WatchSubscription`].
#[derive(Debug, Default)]
pub struct DirectoryWatchRegistry {
    subscriptions: HashMap<PathBuf, WatchSubscription>,
}

impl DirectoryWatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        identity: &FileIdentity,
        on_change: ChangeHandler,
    ) -> Result<SubscribeOutcome> {
        let Some(file) = identity.as_path() else {
            return Ok(SubscribeOutcome::Skipped);
        };
        let directory = file
            .parent()
            .ok_or_else(|| WatchError::NoParent(file.to_path_buf()))?;

        match self.subscriptions.entry(directory.to_path_buf()) {
            Entry::Occupied(entry) => {
                entry.get().attach(file.to_path_buf(), on_change);
                Ok(SubscribeOutcome::Attached)
            }
            Entry::Vacant(entry) => {
                let subscription = WatchSubscription::start(directory)?;
                subscription.attach(file.to_path_buf(), on_change);
                entry.insert(subscription);
                Ok(SubscribeOutcome::Created)
            }
        }
    }

    /// Detaches the file's handler. The directory watch is torn down once its
    /// last handler is gone.
    pub fn unsubscribe(&mut self, identity: &FileIdentity) -> bool {
        let Some((file, directory)) = identity.as_path().zip(identity.parent_dir()) else {
            return false;
        };
        let Some(subscription) = self.subscriptions.get(directory) else {
            return false;
        };

        let removed = subscription.detach(file);
        if subscription.handler_count() == 0 {
            self.subscriptions.remove(directory);
            tracing::debug!(directory = %directory.display(), "directory watch released");
        }
        removed
    }

    pub fn is_watching(&self, identity: &FileIdentity) -> bool {
        identity
            .as_path()
            .zip(identity.parent_dir())
            .and_then(|(file, directory)| {
                self.subscriptions
                    .get(directory)
                    .map(|subscription| subscription.has_handler(file))
            })
            .unwrap_or(false)
    }

    pub fn subscription(&self, directory: &Path) -> Option<&WatchSubscription> {
        self.subscriptions.get(directory)
    }

    pub fn directory_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn handler_count(&self, directory: &Path) -> usize {
        self.subscriptions
            .get(directory)
            .map(WatchSubscription::handler_count)
            .unwrap_or(0)
    }
}
