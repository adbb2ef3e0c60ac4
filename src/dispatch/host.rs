use std::fmt;

use crate::identity::FileIdentity;
use crate::render::DiagramImage;

const VIEWER_PREFIX: &str = "viewer-";

/// Opaque handle to a live viewer window, issued by the [`WindowHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{VIEWER_PREFIX}{}", self.0)
    }
}

/// The toolkit side of the dispatcher. Every method runs on the UI thread and
/// must return promptly.
pub trait WindowHost {
    fn create_window(&mut self, identity: &FileIdentity, title: &str) -> WindowId;

    /// Raise and focus.
    fn activate(&mut self, window: WindowId);

    fn show_diagram(&mut self, window: WindowId, image: DiagramImage);

    fn show_placeholder(&mut self, window: WindowId, message: &str);

    /// A render was started off the UI thread.
    fn show_pending(&mut self, _window: WindowId) {}
}
