use std::collections::HashMap;

use crate::identity::FileIdentity;

use super::{RegistryError, Result, WindowId};

/// At most one window per [`FileIdentity`], and never one window for two
/// identities.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    by_identity: HashMap<FileIdentity, WindowId>,
    by_window: HashMap<WindowId, FileIdentity>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, identity: &FileIdentity) -> Option<WindowId> {
        self.by_identity.get(identity).copied()
    }

    pub fn identity_of(&self, window: WindowId) -> Option<&FileIdentity> {
        self.by_window.get(&window)
    }

    pub fn register(&mut self, identity: FileIdentity, window: WindowId) -> Result<()> {
        if let Some(existing) = self.by_identity.get(&identity) {
            return Err(RegistryError::AlreadyRegistered {
                identity,
                window: *existing,
            });
        }
        if let Some(owner) = self.by_window.get(&window) {
            return Err(RegistryError::HandleInUse {
                window,
                identity: owner.clone(),
            });
        }

        self.by_window.insert(window, identity.clone());
        self.by_identity.insert(identity, window);
        Ok(())
    }

    pub fn unregister(&mut self, identity: &FileIdentity) -> Option<WindowId> {
        let window = self.by_identity.remove(identity)?;
        if self
            .by_window
            .get(&window)
            .is_some_and(|known| known == identity)
        {
            self.by_window.remove(&window);
        }
        Some(window)
    }

    pub fn unregister_window(&mut self, window: WindowId) -> Option<FileIdentity> {
        let identity = self.by_window.remove(&window)?;
        if self
            .by_identity
            .get(&identity)
            .is_some_and(|known| *known == window)
        {
            self.by_identity.remove(&identity);
        }
        Some(identity)
    }

    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileIdentity, WindowId)> {
        self.by_identity
            .iter()
            .map(|(identity, window)| (identity, *window))
    }
}
