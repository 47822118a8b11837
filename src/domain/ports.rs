use crate::domain::model::{LatLng, Place};
use crate::utils::error::Result;
use async_trait::async_trait;

macro_rules! handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);
    };
}

handle!(MapHandle);
handle!(MarkerHandle);
handle!(InfoWindowHandle);
handle!(AutocompleteHandle);
handle!(ListenerHandle);

/// Options used when the map widget is first created.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub container: String,
    pub search_input: String,
    pub center: LatLng,
    pub zoom: u8,
    pub place_zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            container: "google-map".to_string(),
            search_input: "search-bar".to_string(),
            center: LatLng::new(20.0, 0.0),
            zoom: 3,
            place_zoom: STREET_ZOOM,
        }
    }
}

/// Zoom level applied when the user picks a place from the search box.
pub const STREET_ZOOM: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTarget {
    Marker(MarkerHandle),
    Autocomplete(AutocompleteHandle),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    MarkerClicked {
        listener: ListenerHandle,
        marker: MarkerHandle,
    },
    PlaceChanged {
        listener: ListenerHandle,
        place: Place,
    },
}

/// Capability offered by a mapping SDK. Rendering, tiles, geocoding and
/// autocomplete ranking all live behind this trait.
///
/// Notifications for registered listeners are queued by the provider and
/// drained with [`MapProvider::poll_event`] on the same execution context.
pub trait MapProvider {
    fn create_map(&mut self, container: &str, options: &MapOptions) -> Result<MapHandle>;

    fn create_marker(
        &mut self,
        map: MapHandle,
        position: LatLng,
        title: &str,
    ) -> Result<MarkerHandle>;

    fn create_info_window(&mut self) -> Result<InfoWindowHandle>;

    fn set_info_window_content(&mut self, window: InfoWindowHandle, html: &str);

    fn open_info_window(&mut self, window: InfoWindowHandle, map: MapHandle, anchor: MarkerHandle);

    fn close_info_window(&mut self, window: InfoWindowHandle);

    fn pan_to(&mut self, map: MapHandle, position: LatLng);

    fn set_zoom(&mut self, map: MapHandle, level: u8);

    fn create_autocomplete(&mut self, input_element: &str) -> Result<AutocompleteHandle>;

    fn add_listener(&mut self, target: ListenerTarget) -> ListenerHandle;

    fn remove_listener(&mut self, listener: ListenerHandle);

    fn poll_event(&mut self) -> Option<MapEvent>;

    fn release_autocomplete(&mut self, autocomplete: AutocompleteHandle);

    fn destroy_map(&mut self, map: MapHandle);
}

/// Where the store feed comes from. Fetched once per load attempt.
#[async_trait]
pub trait FeedSource: Send + Sync {
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> Option<&str>;
    fn feed_location(&self) -> &str;
    fn feed_timeout_seconds(&self) -> u64;
    fn map_options(&self) -> MapOptions;
}
