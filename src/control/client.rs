use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use super::{ControlError, Result};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Hands file references to the viewer already listening on `addr`.
///
/// Fire-and-forget: the viewer sends nothing back. References should already
/// be absolute, since the receiving process has its own working directory.
pub fn send_open_requests<S: AsRef<str>>(
    addr: SocketAddr,
    references: &[S],
    timeout: Duration,
) -> Result<()> {
    if let Some(bad) = references
        .iter()
        .map(AsRef::as_ref)
        .find(|reference| reference.contains(['\n', '\r']))
    {
        return Err(ControlError::MalformedRequest(format!(
            "line break inside {bad:?}"
        )));
    }

    let mut stream = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|source| ControlError::Connect { addr, source })?;
    stream.set_write_timeout(Some(timeout))?;

    let mut payload = String::new();
    for reference in references {
        payload.push_str(reference.as_ref());
        payload.push('\n');
    }
    stream.write_all(payload.as_bytes())?;
    stream.flush()?;
    stream.shutdown(Shutdown::Write)?;

    tracing::debug!(%addr, count = references.len(), "forwarded open requests");
    Ok(())
}
