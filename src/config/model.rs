use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::control::{ConnectionMode, ListenerOptions};
use crate::dispatch::{DispatcherOptions, RenderMode};
use crate::identity::{DEFAULT_VIRTUAL_PREFIXES, Normalizer};
use crate::render::{RenderPipeline, RendererCommand};

use super::{ConfigError, Result};

pub const DEFAULT_CONTROL_PORT: u16 = 47474;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub control: ControlConfig,
    pub renderer: RendererConfig,
    pub render: RenderConfig,
    pub watch: WatchConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.identity.virtual_prefixes.iter().cloned())
    }

    pub fn pipeline(&self) -> RenderPipeline {
        let pipeline = RenderPipeline::new(RendererCommand::from(&self.renderer));
        match &self.render.temp_dir {
            Some(root) => pipeline.with_temp_root(root.clone()),
            None => pipeline,
        }
    }

    pub fn dispatcher_options(&self) -> DispatcherOptions {
        DispatcherOptions {
            render_mode: self.render.mode,
            watch_enabled: self.watch.enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub host: String,
    pub port: u16,
    pub connection_mode: ConnectionMode,
    /// Zero disables the timeout.
    pub read_timeout_ms: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_CONTROL_PORT,
            connection_mode: ConnectionMode::default(),
            read_timeout_ms: 5_000,
        }
    }
}

impl ControlConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::Address {
                host: self.host.clone(),
                port: self.port,
            })
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    pub fn listener_options(&self) -> ListenerOptions {
        ListenerOptions {
            mode: self.connection_mode,
            read_timeout: self.read_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: String,
    pub args: Vec<String>,
    pub format: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        let command = RendererCommand::default();
        Self {
            program: command.program,
            args: command.args,
            format: command.format,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Parent for per-render scratch directories. System temp dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub enabled: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub virtual_prefixes: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            virtual_prefixes: DEFAULT_VIRTUAL_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}
