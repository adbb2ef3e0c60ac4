use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::identity::FileIdentity;
use crate::render::{DiagramImage, RenderError};

use super::WindowId;

/// A unit of work for the dispatcher. Produced on any thread, consumed only on
/// the UI thread.
#[derive(Debug)]
pub enum Command {
    OpenOrActivate(FileIdentity),
    FileChanged(FileIdentity),
    RenderFinished {
        identity: FileIdentity,
        window: WindowId,
        generation: u64,
        result: Result<DiagramImage, RenderError>,
    },
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Thread-safe posting end of the command queue.
///
/// Posting preserves order per sender. The optional waker nudges an idle UI
/// loop so the command is picked up without waiting for input.
#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
    waker: Option<Waker>,
}

impl fmt::Debug for CommandSender {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CommandSender")
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

impl CommandSender {
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Returns `false` once the consuming side is gone.
    pub fn post(&self, command: Command) -> bool {
        if self.tx.send(command).is_err() {
            tracing::debug!("command queue closed; dropping command");
            return false;
        }
        if let Some(waker) = &self.waker {
            waker();
        }
        true
    }
}

pub fn command_channel() -> (CommandSender, Receiver<Command>) {
    let (tx, rx) = mpsc::channel();
    (CommandSender { tx, waker: None }, rx)
}
