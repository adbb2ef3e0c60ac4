use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use eframe::egui;
use rfd::FileDialog;

use crate::control::ListenerHandle;
use crate::dispatch::{Command, Dispatcher, WindowHost, WindowId, command_channel};
use crate::identity::FileIdentity;
use crate::runtime::{AppContext, AppError, Result};

use super::windows::{ViewerContent, ViewerWindow, ViewerWindows};
use super::zoom::ZoomStep;

const APP_TITLE: &str = "umlview";
const VIEWER_DEFAULT_SIZE: [f32; 2] = [900.0, 700.0];
const VIEWER_MIN_SIZE: [f32; 2] = [320.0, 240.0];
const LAUNCHER_MIN_WINDOW_SIZE: [f32; 2] = [420.0, 220.0];
const DIAGRAM_EXTENSIONS: [&str; 5] = ["puml", "plantuml", "pu", "iuml", "wsd"];

#[derive(Debug)]
enum UiAction {
    OpenPaths(Vec<PathBuf>),
    Activate(WindowId),
    Close(WindowId),
}

/// Starts the viewer and blocks until the control window closes.
pub fn run(context: AppContext, initial: Vec<FileIdentity>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size(LAUNCHER_MIN_WINDOW_SIZE)
            .with_min_inner_size(LAUNCHER_MIN_WINDOW_SIZE)
            .with_resizable(true)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, context, initial)))),
    )
    .map_err(|error| AppError::Ui(error.to_string()))
}

struct ViewerApp {
    context: AppContext,
    dispatcher: Dispatcher,
    commands: Receiver<Command>,
    windows: ViewerWindows,
    listener: Option<ListenerHandle>,
    status: String,
}

impl ViewerApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        context: AppContext,
        initial: Vec<FileIdentity>,
    ) -> Self {
        let waker = cc.egui_ctx.clone();
        let (sender, commands) = command_channel();
        let sender = sender.with_waker(move || waker.request_repaint());

        let (listener, status) = match context.bind_control(sender.clone()) {
            Ok(handle) => {
                let status = format!("Listening on {}", handle.local_addr());
                (Some(handle), status)
            }
            Err(error) => {
                tracing::error!(%error, "control channel unavailable; running single-window");
                (None, format!("Single-window mode: {error}"))
            }
        };

        for identity in initial {
            sender.post(Command::OpenOrActivate(identity));
        }

        Self {
            dispatcher: context.dispatcher(sender),
            windows: ViewerWindows::new(cc.egui_ctx.clone()),
            context,
            commands,
            listener,
            status,
        }
    }

    fn draw_launcher(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let open_requested = ctx.input(|input| {
            (input.modifiers.command || input.modifiers.ctrl) && input.key_pressed(egui::Key::O)
        });

        egui::TopBottomPanel::top("launcher-header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open…").on_hover_text("Ctrl+O").clicked() || open_requested {
                    if let Some(paths) = pick_diagrams() {
                        actions.push(UiAction::OpenPaths(paths));
                    }
                }
            });
        });

        egui::TopBottomPanel::bottom("launcher-status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.windows.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("Drop PlantUML files here or press Ctrl+O");
                });
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (identity, window) in self.dispatcher.windows().iter() {
                    let text = match self.windows.get(window) {
                        Some(viewer) if viewer.rendering => format!("{identity} (rendering)"),
                        _ => identity.to_string(),
                    };
                    if ui.selectable_label(false, text).clicked() {
                        actions.push(UiAction::Activate(window));
                    }
                }
            });
        });

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let dropped_paths = dropped
            .into_iter()
            .filter_map(|file| file.path)
            .collect::<Vec<_>>();
        if !dropped_paths.is_empty() {
            actions.push(UiAction::OpenPaths(dropped_paths));
        }
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::OpenPaths(paths) => {
                    for path in paths {
                        let identity =
                            self.context.normalizer().normalize(&path.to_string_lossy());
                        self.dispatcher
                            .handle(Command::OpenOrActivate(identity), &mut self.windows);
                    }
                }
                UiAction::Activate(window) => self.windows.activate(window),
                UiAction::Close(window) => {
                    self.dispatcher.window_closed(window);
                    self.windows.remove(window);
                }
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let handled = self.dispatcher.drain(&self.commands, &mut self.windows);
        if handled > 0 {
            tracing::trace!(handled, "commands dispatched");
        }

        let mut actions = Vec::new();
        self.draw_launcher(ctx, &mut actions);

        for window in self.windows.ids() {
            let Some(viewer) = self.windows.get_mut(window) else {
                continue;
            };
            let viewport_id = viewer.viewport_id;
            let builder = egui::ViewportBuilder::default()
                .with_title(viewer.title.clone())
                .with_inner_size(VIEWER_DEFAULT_SIZE)
                .with_min_inner_size(VIEWER_MIN_SIZE);
            ctx.show_viewport_immediate(viewport_id, builder, |ctx, _class| {
                draw_viewer_viewport(ctx, window, viewer, &mut actions);
            });
        }

        let has_pending_actions = !actions.is_empty();
        self.apply_actions(actions);
        self.windows.apply_focus();

        if has_pending_actions || self.windows.has_pending_focus() {
            ctx.request_repaint();
        }
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.shutdown();
        }
    }
}

fn draw_viewer_viewport(
    ctx: &egui::Context,
    window: WindowId,
    viewer: &mut ViewerWindow,
    actions: &mut Vec<UiAction>,
) {
    if ctx.input(|i| i.viewport().close_requested()) {
        actions.push(UiAction::Close(window));
    }

    egui::TopBottomPanel::bottom("viewer-status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(viewer.identity.to_string());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if viewer.rendering {
                    ui.spinner();
                }
                if let ViewerContent::Diagram { size, .. } = &viewer.content {
                    ui.label(format!(
                        "{}×{}  {}%",
                        size[0],
                        size[1],
                        viewer.zoom.percent()
                    ));
                }
            });
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        let ViewerWindow { content, zoom, .. } = &mut *viewer;
        match content {
            ViewerContent::Empty => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            ViewerContent::Placeholder(message) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.heading("Diagram could not be rendered");
                    ui.add_space(8.0);
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.monospace(message.as_str());
                    });
                });
            }
            ViewerContent::Diagram { texture, size } => {
                let size = *size;
                let (canvas, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
                if zoom.fit {
                    zoom.fit_to(canvas, size);
                }

                let input = ui.input(|i| i.clone());
                let pointer = response.hover_pos().unwrap_or(canvas.center());
                if input.key_pressed(egui::Key::Plus) || input.key_pressed(egui::Key::Equals) {
                    zoom.step_at(ZoomStep::In, canvas, canvas.center(), size);
                }
                if input.key_pressed(egui::Key::Minus) {
                    zoom.step_at(ZoomStep::Out, canvas, canvas.center(), size);
                }
                if input.key_pressed(egui::Key::Num0) {
                    zoom.actual_size();
                }
                if input.key_pressed(egui::Key::F) {
                    zoom.fit_to(canvas, size);
                }

                if response.hovered() {
                    let zoom_delta = input.zoom_delta();
                    if zoom_delta > 1.0 {
                        zoom.step_at(ZoomStep::In, canvas, pointer, size);
                    } else if zoom_delta < 1.0 {
                        zoom.step_at(ZoomStep::Out, canvas, pointer, size);
                    } else {
                        zoom.pan_by(input.smooth_scroll_delta, canvas, size);
                    }
                }
                if response.dragged() {
                    zoom.pan_by(response.drag_delta(), canvas, size);
                }

                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                ui.painter_at(canvas).image(
                    texture.id(),
                    zoom.image_rect(canvas, size),
                    uv,
                    egui::Color32::WHITE,
                );
            }
        }
    });
}

fn pick_diagrams() -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .add_filter("PlantUML", &DIAGRAM_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_files()
}
