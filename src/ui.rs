mod app;
mod windows;
mod zoom;

#[cfg(test)]
mod tests;

pub use app::run;
pub use windows::{ViewerContent, ViewerWindow, ViewerWindows, viewport_id_for};
pub use zoom::{ZoomState, ZoomStep};
