use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "umlview",
    version,
    about = "Single-instance PlantUML diagram viewer with live reload"
)]
pub(super) struct Cli {
    /// Configuration file (TOML, or JSON by extension).
    #[arg(long, global = true, value_name = "PATH")]
    pub(super) config: Option<PathBuf>,

    #[command(subcommand)]
    pub(super) command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Opens files in the running viewer, starting one if none answers.
    Open {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<String>,
    },
    /// Sends files to the running viewer; fails if none is listening.
    Send {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<String>,
    },
    /// Renders one diagram to an image file without opening a window.
    Render { input: PathBuf, output: PathBuf },
    /// Prints the effective configuration.
    Config {
        /// Emit TOML instead of JSON.
        #[arg(long)]
        toml: bool,
    },
}

#[derive(Debug, Serialize)]
pub(super) struct RenderReport {
    pub(super) status: &'static str,
    pub(super) input: PathBuf,
    pub(super) output: PathBuf,
    pub(super) width: usize,
    pub(super) height: usize,
}
