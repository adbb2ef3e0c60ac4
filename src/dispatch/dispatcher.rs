use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};

use crate::identity::FileIdentity;
use crate::render::{DiagramImage, RenderError, RenderPipeline};
use crate::watch::{ChangeHandler, DirectoryWatchRegistry};

use super::{Command, CommandSender, WindowHost, WindowId, WindowRegistry};

/// Where the renderer runs relative to the UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Block the UI loop until the renderer exits.
    Inline,
    /// Render on a worker thread and post the result back as a command.
    #[default]
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherOptions {
    pub render_mode: RenderMode,
    pub watch_enabled: bool,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::default(),
            watch_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Opened(WindowId),
    Activated(WindowId),
    Rendered(WindowId),
    RenderQueued(WindowId),
    Ignored,
}

/// Sole owner of the window and watch registries.
///
/// Lives on the UI thread. Other threads reach it only through commands.
#[derive(Debug)]
pub struct Dispatcher {
    windows: WindowRegistry,
    watches: DirectoryWatchRegistry,
    pipeline: RenderPipeline,
    sender: CommandSender,
    options: DispatcherOptions,
    generations: HashMap<FileIdentity, u64>,
    next_generation: u64,
}

impl Dispatcher {
    pub fn new(
        pipeline: RenderPipeline,
        sender: CommandSender,
        options: DispatcherOptions,
    ) -> Self {
        Self {
            windows: WindowRegistry::new(),
            watches: DirectoryWatchRegistry::new(),
            pipeline,
            sender,
            options,
            generations: HashMap::new(),
            next_generation: 0,
        }
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn watches(&self) -> &DirectoryWatchRegistry {
        &self.watches
    }

    pub fn options(&self) -> DispatcherOptions {
        self.options
    }

    /// Handles every queued command without blocking. Returns how many ran.
    pub fn drain<H: WindowHost>(&mut self, commands: &Receiver<Command>, host: &mut H) -> usize {
        let mut handled = 0;
        while let Ok(command) = commands.try_recv() {
            self.handle(command, host);
            handled += 1;
        }
        handled
    }

    pub fn handle<H: WindowHost>(&mut self, command: Command, host: &mut H) -> DispatchOutcome {
        match command {
            Command::OpenOrActivate(identity) => self.open_or_activate(identity, host),
            Command::FileChanged(identity) => self.file_changed(&identity, host),
            Command::RenderFinished {
                identity,
                window,
                generation,
                result,
            } => self.render_finished(&identity, window, generation, result, host),
        }
    }

    /// Toolkit close notification. The only way a registry entry goes away.
    pub fn window_closed(&mut self, window: WindowId) -> Option<FileIdentity> {
        let identity = self.windows.unregister_window(window)?;
        self.watches.unsubscribe(&identity);
        self.generations.remove(&identity);
        tracing::info!(%identity, %window, "viewer closed");
        Some(identity)
    }

    fn open_or_activate<H: WindowHost>(
        &mut self,
        identity: FileIdentity,
        host: &mut H,
    ) -> DispatchOutcome {
        if let Some(window) = self.windows.lookup(&identity) {
            tracing::info!(%identity, %window, "activating existing viewer");
            host.activate(window);
            return DispatchOutcome::Activated(window);
        }

        let window = host.create_window(&identity, &identity.display_name());
        if let Err(error) = self.windows.register(identity.clone(), window) {
            tracing::error!(%error, "window host returned a handle that is already in use");
            return DispatchOutcome::Ignored;
        }
        tracing::info!(%identity, %window, "opened viewer");

        self.start_render(&identity, window, host);
        self.watch(&identity);
        host.activate(window);
        DispatchOutcome::Opened(window)
    }

    fn file_changed<H: WindowHost>(
        &mut self,
        identity: &FileIdentity,
        host: &mut H,
    ) -> DispatchOutcome {
        let Some(window) = self.windows.lookup(identity) else {
            tracing::debug!(%identity, "change for a closed viewer ignored");
            return DispatchOutcome::Ignored;
        };
        tracing::info!(%identity, %window, "source changed; re-rendering");
        self.start_render(identity, window, host)
    }

    fn start_render<H: WindowHost>(
        &mut self,
        identity: &FileIdentity,
        window: WindowId,
        host: &mut H,
    ) -> DispatchOutcome {
        let Some(source) = identity.as_path().map(Path::to_path_buf) else {
            let error = RenderError::NotAFile(identity.to_string());
            show_render_result(identity, window, Err(error), host);
            return DispatchOutcome::Rendered(window);
        };

        let generation = self.bump_generation(identity);
        match self.options.render_mode {
            RenderMode::Inline => {
                let result = self.pipeline.render(&source);
                show_render_result(identity, window, result, host);
                DispatchOutcome::Rendered(window)
            }
            RenderMode::Background => {
                let pipeline = self.pipeline.clone();
                let sender = self.sender.clone();
                let identity_for_task = identity.clone();
                let source_for_task = source.clone();
                let spawned = std::thread::Builder::new()
                    .name("render-worker".to_string())
                    .spawn(move || {
                        let result = pipeline.render(&source_for_task);
                        sender.post(Command::RenderFinished {
                            identity: identity_for_task,
                            window,
                            generation,
                            result,
                        });
                    });

                match spawned {
                    Ok(_) => {
                        host.show_pending(window);
                        DispatchOutcome::RenderQueued(window)
                    }
                    Err(error) => {
                        tracing::warn!(
                            %identity,
                            %error,
                            "render worker unavailable; rendering inline"
                        );
                        let result = self.pipeline.render(&source);
                        show_render_result(identity, window, result, host);
                        DispatchOutcome::Rendered(window)
                    }
                }
            }
        }
    }

    fn render_finished<H: WindowHost>(
        &mut self,
        identity: &FileIdentity,
        window: WindowId,
        generation: u64,
        result: Result<DiagramImage, RenderError>,
        host: &mut H,
    ) -> DispatchOutcome {
        if self.windows.lookup(identity) != Some(window) {
            tracing::debug!(%identity, %window, "render finished for a closed viewer");
            return DispatchOutcome::Ignored;
        }
        if self.generations.get(identity) != Some(&generation) {
            tracing::debug!(%identity, generation, "superseded render result dropped");
            return DispatchOutcome::Ignored;
        }

        show_render_result(identity, window, result, host);
        DispatchOutcome::Rendered(window)
    }

    fn watch(&mut self, identity: &FileIdentity) {
        if !self.options.watch_enabled {
            return;
        }

        let sender = self.sender.clone();
        let changed = identity.clone();
        let handler: ChangeHandler = Arc::new(move || {
            sender.post(Command::FileChanged(changed.clone()));
        });

        match self.watches.subscribe(identity, handler) {
            Ok(outcome) => tracing::debug!(%identity, ?outcome, "watching for changes"),
            Err(error) => {
                tracing::warn!(%identity, %error, "live reload unavailable for this viewer");
            }
        }
    }

    fn bump_generation(&mut self, identity: &FileIdentity) -> u64 {
        self.next_generation = self.next_generation.saturating_add(1);
        self.generations.insert(identity.clone(), self.next_generation);
        self.next_generation
    }
}

fn show_render_result<H: WindowHost>(
    identity: &FileIdentity,
    window: WindowId,
    result: Result<DiagramImage, RenderError>,
    host: &mut H,
) {
    match result {
        Ok(image) => {
            tracing::info!(
                %identity,
                %window,
                width = image.width,
                height = image.height,
                "diagram updated"
            );
            host.show_diagram(window, image);
        }
        Err(error) => {
            tracing::warn!(%identity, %window, %error, "render failed");
            host.show_placeholder(window, &error.to_string());
        }
    }
}
