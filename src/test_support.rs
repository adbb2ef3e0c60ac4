use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};

use crate::render::RendererCommand;

/// Copies a PNG-bearing `.puml` source into the output directory.
pub(crate) const COPY_RENDERER: &str = r#"cp "$1" "$2/$(basename "$1" .puml).png""#;

pub(crate) const FAILING_RENDERER: &str = r#"echo "Syntax Error? (line 2)" >&2; exit 3"#;

/// Renderer stand-in: `sh -c <script> sh <input> <output_dir>`.
pub(crate) fn shell_renderer(script: &str) -> RendererCommand {
    RendererCommand {
        program: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
            "{input}".to_string(),
            "{output_dir}".to_string(),
        ],
        format: "png".to_string(),
    }
}

/// Writes a tiny PNG under a diagram-looking name so [`COPY_RENDERER`] can
/// "render" it.
pub(crate) fn write_png_source(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .expect("write png fixture");
    path
}
