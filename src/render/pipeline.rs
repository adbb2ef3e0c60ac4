use std::path::{Path, PathBuf};
use std::process::Output;

use super::{DiagramImage, RenderArtifact, RenderError, RendererCommand, Result};

#[derive(Debug, Clone, Default)]
pub struct RenderPipeline {
    command: RendererCommand,
    temp_root: Option<PathBuf>,
}

impl RenderPipeline {
    pub fn new(command: RendererCommand) -> Self {
        Self {
            command,
            temp_root: None,
        }
    }

    /// Creates per-render scratch directories under `root` instead of the
    /// system temporary directory.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn command(&self) -> &RendererCommand {
        &self.command
    }

    /// Runs the renderer once for `source` and loads the produced image.
    ///
    /// The scratch directory is owned by this call and removed before it
    /// returns, whether the render succeeded or not. Nothing is retried.
    pub fn render(&self, source: &Path) -> Result<DiagramImage> {
        let artifact =
            RenderArtifact::create(source, &self.command.format, self.temp_root.as_deref())?;
        tracing::debug!(
            source = %source.display(),
            output_dir = %artifact.dir().display(),
            program = %self.command.program,
            "invoking renderer"
        );

        let output = self
            .command
            .build(source, artifact.dir())
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;
        let diagnostics = diagnostics(&output);

        if !output.status.success() {
            return Err(RenderError::Exited {
                status: output.status.to_string(),
                diagnostics,
            });
        }

        let encoded = artifact.read(&diagnostics)?;
        let image = DiagramImage::decode(encoded)?;
        tracing::debug!(
            source = %source.display(),
            width = image.width,
            height = image.height,
            "render complete"
        );
        Ok(image)
    }
}

fn diagnostics(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
