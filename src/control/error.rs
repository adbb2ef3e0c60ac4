use std::net::SocketAddr;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ControlError>;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("cannot bind control channel on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("no viewer is listening on {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed control request: {0}")]
    MalformedRequest(String),

    #[error("control channel I/O failure: {0}")]
    Io(#[from] std::io::Error),
}
