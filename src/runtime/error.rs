use std::path::PathBuf;

use crate::config::ConfigError;
use crate::control::ControlError;
use crate::render::RenderError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("control channel error: {0}")]
    Control(#[from] ControlError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("cannot write `{path}`: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("viewer failed: {0}")]
    Ui(String),
}
