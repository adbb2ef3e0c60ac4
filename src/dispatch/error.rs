use thiserror::Error;

use crate::identity::FileIdentity;

use super::WindowId;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{identity} is already shown in {window}")]
    AlreadyRegistered {
        identity: FileIdentity,
        window: WindowId,
    },

    #[error("{window} already belongs to {identity}")]
    HandleInUse {
        window: WindowId,
        identity: FileIdentity,
    },
}
