mod command;
mod dispatcher;
mod error;
mod host;
mod registry;


pub use command::{Command, CommandSender, command_channel};
pub use dispatcher::{DispatchOutcome, Dispatcher, DispatcherOptions, RenderMode};
pub use error::{RegistryError, Result};
pub use host::{WindowHost, WindowId};
pub use registry::WindowRegistry;
