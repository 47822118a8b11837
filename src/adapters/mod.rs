// Adapters layer: concrete implementations for external systems (feed transport, map provider, provider script).

pub mod feed;
pub mod headless;
pub mod maps_script;

pub use feed::{feed_source_for, FileFeed, HttpFeed};
pub use headless::HeadlessMap;
