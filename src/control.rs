mod client;
mod error;
mod listener;
mod request;

#[cfg(test)]
mod tests;

pub use client::{DEFAULT_CONNECT_TIMEOUT, send_open_requests};
pub use error::{ControlError, Result};
pub use listener::{ConnectionMode, ControlChannelListener, ListenerHandle, ListenerOptions};
pub use request::{RequestStats, parse_request, read_requests};
