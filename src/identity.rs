mod file_identity;
mod normalizer;


pub use file_identity::FileIdentity;
pub use normalizer::{DEFAULT_VIRTUAL_PREFIXES, Normalizer};
