use anyhow::Result;
use httpmock::prelude::*;
use std::time::Duration;
use store_locator::core::view::EMPTY_STATE_LOADING;
use store_locator::domain::model::LoadStatus;
use store_locator::domain::ports::MapOptions;
use store_locator::utils::error::{ErrorCategory, LocatorError};
use store_locator::{FileFeed, HeadlessMap, HttpFeed, StoreSyncController};
use tempfile::TempDir;

fn stores_json() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-73.9857, 40.7484]},
                "properties": {"name": "Midtown", "description": "Flagship", "timing": "8am - 10pm"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-0.1276, 51.5072]},
                "properties": {"name": "London", "description": "Covent Garden", "timing": "9am - 9pm"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point"},
                "properties": {"name": "Unmapped"}
            }
        ]
    })
}

fn mount() -> (StoreSyncController<HeadlessMap>, HeadlessMap) {
    let map = HeadlessMap::new();
    let controller = StoreSyncController::mount(map.clone(), &MapOptions::default()).unwrap();
    (controller, map)
}

#[tokio::test]
async fn test_load_from_http_feed() -> Result<()> {
    let server = MockServer::start();
    let feed_mock = server.mock(|when, then| {
        when.method(GET).path("/stores.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(stores_json());
    });

    let (mut controller, map) = mount();
    assert_eq!(controller.empty_state().as_deref(), Some(EMPTY_STATE_LOADING));

    let feed = HttpFeed::new(server.url("/stores.json"), Duration::from_secs(5))?;
    let report = controller.load_from(&feed).await?;

    feed_mock.assert();
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].index, 2);
    assert_eq!(map.markers().len(), 2);
    assert!(matches!(controller.status(), LoadStatus::Ready(_)));
    assert_eq!(controller.empty_state(), None);
    Ok(())
}

#[tokio::test]
async fn test_server_error_shows_empty_state_and_can_retry() -> Result<()> {
    let server = MockServer::start();
    let mut failing = server.mock(|when, then| {
        when.method(GET).path("/stores.json");
        then.status(500);
    });

    let (mut controller, map) = mount();
    let feed = HttpFeed::new(server.url("/stores.json"), Duration::from_secs(5))?;

    let err = controller.load_from(&feed).await.unwrap_err();
    failing.assert();
    assert!(matches!(err, LocatorError::FeedStatusError { status: 500, .. }));
    assert_eq!(err.category(), ErrorCategory::DataLoad);
    assert!(err.is_retryable());

    assert!(controller.sidebar().is_empty());
    assert!(map.markers().is_empty());
    let message = controller.empty_state().unwrap();
    assert!(message.contains("Stores could not be loaded"));
    assert!(message.contains("500"));

    // 使用者重試
    failing.delete();
    let recovered = server.mock(|when, then| {
        when.method(GET).path("/stores.json");
        then.status(200).json_body(stores_json());
    });

    let report = controller.load_from(&feed).await?;
    recovered.assert();
    assert_eq!(report.accepted, 2);
    assert_eq!(controller.sidebar().len(), 2);

    // 標記只建立一次
    let again = controller.load_from(&feed).await.unwrap_err();
    assert!(matches!(again, LocatorError::AlreadyLoaded { count: 2 }));
    assert_eq!(map.markers().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_is_data_load_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/stores.json");
        then.status(200).body("<html>not json</html>");
    });

    let (mut controller, _map) = mount();
    let feed = HttpFeed::new(server.url("/stores.json"), Duration::from_secs(5))?;
    let err = controller.load_from(&feed).await.unwrap_err();

    assert!(matches!(err, LocatorError::SerializationError(_)));
    assert!(matches!(controller.status(), LoadStatus::Failed { .. }));
    assert!(controller.sidebar().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_load_from_file_feed() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("stores.json");
    tokio::fs::write(&path, serde_json::to_vec(&stores_json())?).await?;

    let (mut controller, _map) = mount();
    let report = controller.load_from(&FileFeed::new(&path)).await?;

    assert_eq!(report.accepted, 2);
    assert_eq!(controller.stores()[1].name, "London");
    assert_eq!(controller.stores()[1].location.lat, 51.5072);
    assert_eq!(controller.stores()[1].location.lng, -0.1276);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_data_load_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (mut controller, _map) = mount();

    let err = controller
        .load_from(&FileFeed::new(temp_dir.path().join("absent.json")))
        .await
        .unwrap_err();

    assert!(matches!(err, LocatorError::IoError(_)));
    assert!(controller.empty_state().is_some());
    Ok(())
}

#[tokio::test]
async fn test_bundled_feed_loads_cleanly() -> Result<()> {
    let (mut controller, map) = mount();
    let feed = FileFeed::new(concat!(env!("CARGO_MANIFEST_DIR"), "/public/stores.json"));
    let report = controller.load_from(&feed).await?;

    assert_eq!(report.accepted, 5);
    assert!(report.rejected.is_empty());
    assert_eq!(map.markers().len(), controller.sidebar().len());
    Ok(())
}
