pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileFeed, HeadlessMap, HttpFeed};
pub use config::LocatorConfig;
pub use core::controller::StoreSyncController;
pub use utils::error::{LocatorError, Result};
