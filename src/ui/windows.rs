use std::collections::BTreeMap;
use std::fmt;

use eframe::egui;

use crate::dispatch::{WindowHost, WindowId};
use crate::identity::FileIdentity;
use crate::render::DiagramImage;

use super::zoom::ZoomState;

pub enum ViewerContent {
    /// First render has not finished yet.
    Empty,
    Diagram {
        texture: egui::TextureHandle,
        size: [usize; 2],
    },
    Placeholder(String),
}

impl fmt::Debug for ViewerContent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("Empty"),
            Self::Diagram { texture, size } => formatter
                .debug_struct("Diagram")
                .field("texture", &texture.id())
                .field("size", size)
                .finish(),
            Self::Placeholder(message) => {
                formatter.debug_tuple("Placeholder").field(message).finish()
            }
        }
    }
}

#[derive(Debug)]
pub struct ViewerWindow {
    pub identity: FileIdentity,
    pub title: String,
    pub viewport_id: egui::ViewportId,
    pub content: ViewerContent,
    pub zoom: ZoomState,
    pub rendering: bool,
}

/// egui-side state of every viewer viewport, driven by the dispatcher.
pub struct ViewerWindows {
    ctx: egui::Context,
    next_id: u64,
    windows: BTreeMap<WindowId, ViewerWindow>,
    focus_requests: Vec<WindowId>,
}

impl ViewerWindows {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            next_id: 0,
            windows: BTreeMap::new(),
            focus_requests: Vec::new(),
        }
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn get(&self, window: WindowId) -> Option<&ViewerWindow> {
        self.windows.get(&window)
    }

    pub fn get_mut(&mut self, window: WindowId) -> Option<&mut ViewerWindow> {
        self.windows.get_mut(&window)
    }

    pub fn remove(&mut self, window: WindowId) -> Option<ViewerWindow> {
        self.focus_requests.retain(|pending| *pending != window);
        self.windows.remove(&window)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn has_pending_focus(&self) -> bool {
        !self.focus_requests.is_empty()
    }

    /// Sends queued focus requests to viewports shown this frame.
    pub fn apply_focus(&mut self) {
        for window in std::mem::take(&mut self.focus_requests) {
            let Some(viewer) = self.windows.get(&window) else {
                continue;
            };
            self.ctx
                .send_viewport_cmd_to(viewer.viewport_id, egui::ViewportCommand::Minimized(false));
            self.ctx
                .send_viewport_cmd_to(viewer.viewport_id, egui::ViewportCommand::Focus);
        }
    }
}

impl WindowHost for ViewerWindows {
    fn create_window(&mut self, identity: &FileIdentity, title: &str) -> WindowId {
        self.next_id += 1;
        let window = WindowId::new(self.next_id);
        self.windows.insert(
            window,
            ViewerWindow {
                identity: identity.clone(),
                title: title.to_string(),
                viewport_id: viewport_id_for(window),
                content: ViewerContent::Empty,
                zoom: ZoomState::default(),
                rendering: false,
            },
        );
        self.ctx.request_repaint();
        window
    }

    fn activate(&mut self, window: WindowId) {
        if !self.focus_requests.contains(&window) {
            self.focus_requests.push(window);
        }
        self.ctx.request_repaint();
    }

    fn show_diagram(&mut self, window: WindowId, image: DiagramImage) {
        let Some(viewer) = self.windows.get_mut(&window) else {
            return;
        };
        let size = image.size();
        let color = egui::ColorImage::from_rgba_unmultiplied(size, &image.rgba);

        match &mut viewer.content {
            ViewerContent::Diagram {
                texture,
                size: shown,
            } => {
                texture.set(color, egui::TextureOptions::LINEAR);
                *shown = size;
            }
            content => {
                *content = ViewerContent::Diagram {
                    texture: self.ctx.load_texture(
                        format!("diagram-{window}"),
                        color,
                        egui::TextureOptions::LINEAR,
                    ),
                    size,
                };
            }
        }
        viewer.rendering = false;
        self.ctx.request_repaint();
    }

    fn show_placeholder(&mut self, window: WindowId, message: &str) {
        let Some(viewer) = self.windows.get_mut(&window) else {
            return;
        };
        viewer.content = ViewerContent::Placeholder(message.to_string());
        viewer.rendering = false;
        self.ctx.request_repaint();
    }

    fn show_pending(&mut self, window: WindowId) {
        if let Some(viewer) = self.windows.get_mut(&window) {
            viewer.rendering = true;
        }
    }
}

pub fn viewport_id_for(window: WindowId) -> egui::ViewportId {
    egui::ViewportId::from_hash_of(format!("viewport-{window}"))
}
