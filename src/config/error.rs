use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration I/O failure at `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration TOML parse failure: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("configuration TOML serialization failure: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("configuration JSON failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("control address `{host}:{port}` does not resolve")]
    Address { host: String, port: u16 },
}
