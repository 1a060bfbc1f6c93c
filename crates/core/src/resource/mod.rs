//! Remote feed loading.

/// HTTP client and feed shaping.
pub mod loader;
/// Background load tasks and their result events.
pub mod tasks;

pub use loader::FeedLoader;
pub use tasks::{spawn_loads, LoadEvent};
