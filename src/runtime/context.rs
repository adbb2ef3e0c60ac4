use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::AppConfig;
use crate::control::{
    ControlChannelListener, DEFAULT_CONNECT_TIMEOUT, ListenerHandle, send_open_requests,
};
use crate::dispatch::{CommandSender, Dispatcher};
use crate::identity::{FileIdentity, Normalizer};
use crate::render::{DiagramImage, RenderPipeline};

use super::{AppError, Result};

/// Services derived once from the effective configuration.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    config: AppConfig,
    normalizer: Normalizer,
    pipeline: RenderPipeline,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            normalizer: config.normalizer(),
            pipeline: config.pipeline(),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn control_addr(&self) -> Result<SocketAddr> {
        Ok(self.config.control.socket_addr()?)
    }

    pub fn normalize_all<S: AsRef<str>>(&self, references: &[S]) -> Vec<FileIdentity> {
        references
            .iter()
            .map(|reference| self.normalizer.normalize(reference.as_ref()))
            .collect()
    }

    /// Sends already-normalized identities to the running viewer.
    pub fn forward(&self, identities: &[FileIdentity]) -> Result<()> {
        let addr = self.control_addr()?;
        let references = identities
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        send_open_requests(addr, &references, DEFAULT_CONNECT_TIMEOUT)?;
        Ok(())
    }

    pub fn dispatcher(&self, sender: CommandSender) -> Dispatcher {
        Dispatcher::new(
            self.pipeline.clone(),
            sender,
            self.config.dispatcher_options(),
        )
    }

    pub fn bind_control(&self, sender: CommandSender) -> Result<ListenerHandle> {
        let listener = ControlChannelListener::bind(
            self.control_addr()?,
            self.normalizer.clone(),
            sender,
            self.config.control.listener_options(),
        )?;
        Ok(listener.spawn()?)
    }

    /// One-shot render that copies the encoded artifact to `output`.
    pub fn render_to(&self, input: &Path, output: &Path) -> Result<DiagramImage> {
        let image = self.pipeline.render(input)?;
        fs::write(output, &image.encoded).map_err(|source| AppError::Output {
            path: output.to_path_buf(),
            source,
        })?;
        Ok(image)
    }
}
