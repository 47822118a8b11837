use crate::adapters::feed::feed_source_for;
use crate::adapters::headless::HeadlessMap;
use crate::app::session::Session;
use crate::config::toml_config::LocatorConfig;
use crate::core::controller::StoreSyncController;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::time::Duration;

/// Validate the configuration, mount the map and load the store feed.
///
/// Configuration problems (including a missing API key) are returned before
/// anything is mounted. A feed that cannot be fetched or decoded is not fatal:
/// the session starts with an empty list and the error as its empty state.
pub async fn start(config: &LocatorConfig) -> Result<Session> {
    config.validate()?;
    tracing::info!("✅ Configuration validated");

    let script = config.script_request();
    tracing::debug!("Map provider script: {}", script.redacted_url()?);

    let map = HeadlessMap::new();
    let controller = StoreSyncController::mount(map.clone(), &config.map_options())?;
    let feed = feed_source_for(
        config.feed_location(),
        Duration::from_secs(config.feed_timeout_seconds()),
    )?;

    let mut session = Session::new(controller, map, feed);
    match session.load_stores().await {
        Ok(lines) => {
            for line in lines {
                tracing::debug!("{}", line);
            }
        }
        Err(e) if e.is_retryable() => {
            tracing::warn!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        }
        Err(e) => return Err(e),
    }

    Ok(session)
}
