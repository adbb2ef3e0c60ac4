mod artifact;
mod command;
mod diagram;
mod error;
mod pipeline;


pub use artifact::RenderArtifact;
pub use command::{DEFAULT_FORMAT, RendererCommand};
pub use diagram::DiagramImage;
pub use error::{RenderError, Result};
pub use pipeline::RenderPipeline;
