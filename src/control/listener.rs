use std::io::BufReader;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dispatch::{Command, CommandSender};
use crate::identity::Normalizer;

use super::{ControlError, Result, read_requests};

const WAKE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Finish one connection before accepting the next.
    Serial,
    /// One handler thread per accepted connection.
    #[default]
    Concurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    pub mode: ConnectionMode,
    pub read_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
struct ConnectionContext {
    normalizer: Normalizer,
    sender: CommandSender,
    read_timeout: Option<Duration>,
}

/// Single-instance endpoint: turns every received line into an
/// `OpenOrActivate` command. Never touches UI state itself.
#[derive(Debug)]
pub struct ControlChannelListener {
    listener: TcpListener,
    addr: SocketAddr,
    mode: ConnectionMode,
    context: ConnectionContext,
}

impl ControlChannelListener {
    pub fn bind(
        addr: SocketAddr,
        normalizer: Normalizer,
        sender: CommandSender,
        options: ListenerOptions,
    ) -> Result<Self> {
        let listener =
            TcpListener::bind(addr).map_err(|source| ControlError::BindFailed { addr, source })?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, mode = ?options.mode, "control channel listening");
        Ok(Self {
            listener,
            addr,
            mode: options.mode,
            context: ConnectionContext {
                normalizer,
                sender,
                read_timeout: options.read_timeout,
            },
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn spawn(self) -> Result<ListenerHandle> {
        let addr = self.addr;
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let thread = std::thread::Builder::new()
            .name("control-channel".to_string())
            .spawn(move || self.accept_loop(&stop_flag))?;
        Ok(ListenerHandle {
            addr,
            stop,
            thread: Some(thread),
        })
    }

    fn accept_loop(self, stop: &AtomicBool) {
        for connection in self.listener.incoming() {
            if stop.load(Ordering::Acquire) {
                break;
            }
            let stream = match connection {
                Ok(stream) => stream,
                Err(error) => {
                    tracing::warn!(%error, "control channel accept failed");
                    continue;
                }
            };

            match self.mode {
                ConnectionMode::Serial => serve_connection(stream, &self.context),
                ConnectionMode::Concurrent => {
                    let context = self.context.clone();
                    let spawned = std::thread::Builder::new()
                        .name("control-connection".to_string())
                        .spawn(move || serve_connection(stream, &context));
                    if let Err(error) = spawned {
                        tracing::warn!(%error, "cannot spawn control connection handler");
                    }
                }
            }
        }
        tracing::debug!(addr = %self.addr, "control channel stopped");
    }
}

fn serve_connection(stream: TcpStream, context: &ConnectionContext) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    if let Err(error) = stream.set_read_timeout(context.read_timeout) {
        tracing::warn!(%peer, %error, "cannot set control read timeout");
    }

    let mut reader = BufReader::new(stream);
    let stats = read_requests(&mut reader, |reference| {
        let identity = context.normalizer.normalize(reference);
        tracing::info!(%peer, %identity, "open request received");
        context.sender.post(Command::OpenOrActivate(identity))
    });
    tracing::debug!(
        %peer,
        accepted = stats.accepted,
        malformed = stats.malformed,
        "control connection closed"
    );
}

/// Running accept loop. Dropping the handle leaves the loop running for the
/// life of the process; call [`ListenerHandle::shutdown`] to stop it.
#[derive(Debug)]
pub struct ListenerHandle {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::Release);
        // Wake the blocking accept so it observes the flag.
        let wake = wake_addr(self.addr);
        if let Err(error) = TcpStream::connect_timeout(&wake, WAKE_TIMEOUT) {
            tracing::warn!(%wake, %error, "cannot wake control channel accept loop");
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::warn!(addr = %self.addr, "control channel thread panicked");
        }
    }
}

/// Address that reaches a listener bound to `addr`. Wildcard binds are not
/// connectable everywhere, so they map to loopback of the same family.
pub(crate) fn wake_addr(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}
