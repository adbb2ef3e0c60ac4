use std::io::{BufRead, ErrorKind};

use super::{ControlError, Result};

/// Per-connection tally, logged when the connection ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStats {
    pub accepted: usize,
    pub malformed: usize,
}

/// Extracts the file reference carried by one raw line.
pub fn parse_request(raw: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(raw)
        .map_err(|error| ControlError::MalformedRequest(format!("invalid UTF-8: {error}")))?;
    let reference = text.trim_end_matches(['\r', '\n']);
    if reference.trim().is_empty() {
        return Err(ControlError::MalformedRequest("empty line".to_string()));
    }
    if reference.contains('\0') {
        return Err(ControlError::MalformedRequest("embedded NUL byte".to_string()));
    }
    Ok(reference)
}

/// Reads newline- or EOF-terminated requests until the peer is done.
///
/// Malformed lines are logged and skipped. Reading stops early when
/// `on_request` returns `false`.
pub fn read_requests<R: BufRead>(
    reader: &mut R,
    mut on_request: impl FnMut(&str) -> bool,
) -> RequestStats {
    let mut stats = RequestStats::default();
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => match parse_request(&line) {
                Ok(reference) => {
                    stats.accepted += 1;
                    if !on_request(reference) {
                        break;
                    }
                }
                Err(error) => {
                    stats.malformed += 1;
                    tracing::warn!(%error, "dropping control request");
                }
            },
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => {
                tracing::warn!(%error, "control connection read failed");
                break;
            }
        }
    }
    stats
}
