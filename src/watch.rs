mod error;
mod registry;
mod subscription;

#[cfg(test)]
mod tests;

pub use error::{Result, WatchError};
pub use registry::{DirectoryWatchRegistry, SubscribeOutcome};
pub use subscription::{ChangeHandler, WatchSubscription, is_content_change};
