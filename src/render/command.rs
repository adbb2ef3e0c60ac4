use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::RendererConfig;

pub const DEFAULT_FORMAT: &str = "png";

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_DIR_PLACEHOLDER: &str = "{output_dir}";
const FORMAT_PLACEHOLDER: &str = "{format}";

/// Command-line template for the external renderer.
///
/// Arguments may contain `{input}`, `{output_dir}` and `{format}`; each is
/// substituted per invocation. The renderer must write
/// `<output_dir>/<input stem>.<format>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererCommand {
    pub program: String,
    pub args: Vec<String>,
    pub format: String,
}

impl Default for RendererCommand {
    fn default() -> Self {
        Self {
            program: "plantuml".to_string(),
            args: vec![
                format!("-t{FORMAT_PLACEHOLDER}"),
                "-o".to_string(),
                OUTPUT_DIR_PLACEHOLDER.to_string(),
                INPUT_PLACEHOLDER.to_string(),
            ],
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl From<&RendererConfig> for RendererCommand {
    fn from(config: &RendererConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            format: config.format.clone(),
        }
    }
}

impl RendererCommand {
    pub fn expand_args(&self, input: &Path, output_dir: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output_dir = output_dir.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_DIR_PLACEHOLDER, &output_dir)
                    .replace(FORMAT_PLACEHOLDER, &self.format)
            })
            .collect()
    }

    pub(crate) fn build(&self, input: &Path, output_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.expand_args(input, output_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}
