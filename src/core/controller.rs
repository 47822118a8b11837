use crate::core::loader;
use crate::core::view;
use crate::domain::model::{
    FeatureCollection, LoadReport, LoadStatus, Place, RejectedRecord, Selection, SidebarRow,
    Store, StoreId,
};
use crate::domain::ports::{
    AutocompleteHandle, FeedSource, InfoWindowHandle, ListenerHandle, ListenerTarget, MapEvent,
    MapHandle, MapOptions, MapProvider, MarkerHandle,
};
use crate::utils::error::{LocatorError, Result};
use std::collections::HashMap;

/// Keeps the sidebar list, the map markers and the single shared info window
/// consistent with each other.
///
/// The controller owns every provider handle it creates. Dropping it removes
/// the registered listeners and releases the autocomplete widget and the map.
pub struct StoreSyncController<M: MapProvider> {
    provider: M,
    map: MapHandle,
    info_window: InfoWindowHandle,
    autocomplete: AutocompleteHandle,
    place_listener: ListenerHandle,
    place_zoom: u8,
    stores: Vec<Store>,
    // 與 stores 一一對應
    markers: Vec<MarkerHandle>,
    marker_lookup: HashMap<MarkerHandle, StoreId>,
    marker_listeners: Vec<ListenerHandle>,
    selection: Selection,
    status: LoadStatus,
}

impl<M: MapProvider> StoreSyncController<M> {
    /// Create the map, the shared info window and the search autocomplete.
    pub fn mount(mut provider: M, options: &MapOptions) -> Result<Self> {
        let map = provider.create_map(&options.container, options)?;

        let info_window = match provider.create_info_window() {
            Ok(window) => window,
            Err(e) => {
                provider.destroy_map(map);
                return Err(e);
            }
        };

        let autocomplete = match provider.create_autocomplete(&options.search_input) {
            Ok(autocomplete) => autocomplete,
            Err(e) => {
                provider.destroy_map(map);
                return Err(e);
            }
        };
        let place_listener = provider.add_listener(ListenerTarget::Autocomplete(autocomplete));

        tracing::debug!(
            "🗺️ Map mounted in '{}' at {} zoom {}",
            options.container,
            options.center,
            options.zoom
        );

        Ok(Self {
            provider,
            map,
            info_window,
            autocomplete,
            place_listener,
            place_zoom: options.place_zoom,
            stores: Vec::new(),
            markers: Vec::new(),
            marker_lookup: HashMap::new(),
            marker_listeners: Vec::new(),
            selection: Selection::Idle,
            status: LoadStatus::Pending,
        })
    }

    /// Fetch the feed and place its stores. A fetch or decode failure leaves
    /// the list empty with a visible message and can be retried.
    pub async fn load_from(&mut self, source: &dyn FeedSource) -> Result<LoadReport> {
        self.ensure_not_loaded()?;
        self.status = LoadStatus::Pending;

        tracing::info!("📥 Loading stores from {}", source.describe());
        let fetched = source.fetch().await;
        let collection = match fetched.and_then(|bytes| loader::parse_feed(&bytes)) {
            Ok(collection) => collection,
            Err(e) => {
                tracing::error!("❌ Store feed failed: {}", e);
                self.status = LoadStatus::Failed {
                    message: e.user_friendly_message(),
                };
                return Err(e);
            }
        };

        self.load(&collection)
    }

    /// Place one marker per valid feature, in source order. Markers are
    /// created once per session, so a second successful load is refused.
    pub fn load(&mut self, collection: &FeatureCollection) -> Result<LoadReport> {
        self.ensure_not_loaded()?;

        let parsed = loader::parse_records(collection);
        let mut rejected = parsed.rejected;

        for record in parsed.records {
            let marker = match self
                .provider
                .create_marker(self.map, record.location, &record.name)
            {
                Ok(marker) => marker,
                Err(e) => {
                    tracing::warn!("⚠️ Skipping record #{}: {}", record.source_index, e);
                    rejected.push(RejectedRecord::new(record.source_index, e.to_string()));
                    continue;
                }
            };

            let id = StoreId(self.stores.len());
            let listener = self.provider.add_listener(ListenerTarget::Marker(marker));
            self.marker_listeners.push(listener);
            self.marker_lookup.insert(marker, id);
            self.markers.push(marker);
            self.stores.push(Store {
                id,
                name: record.name,
                description: record.description,
                timing: record.timing,
                location: record.location,
            });
        }

        rejected.sort_by_key(|r| r.index);
        let report = LoadReport {
            accepted: self.stores.len(),
            rejected,
            finished_at: chrono::Utc::now(),
        };

        if report.rejected.is_empty() {
            tracing::info!("✅ Placed {} store markers", report.accepted);
        } else {
            tracing::warn!(
                "✅ Placed {} store markers, skipped {} malformed record(s)",
                report.accepted,
                report.rejected.len()
            );
        }

        self.status = LoadStatus::Ready(report.clone());
        Ok(report)
    }

    /// Center the map on the store and show it in the shared info window.
    /// Marker clicks and list clicks both end up here.
    pub fn select_store(&mut self, id: StoreId) -> Result<()> {
        let store = self
            .stores
            .get(id.0)
            .ok_or_else(|| LocatorError::UnknownStore {
                reference: id.to_string(),
            })?;
        let marker = self.markers[id.0];

        self.provider.pan_to(self.map, store.location);
        // 只有一個資訊視窗，內容直接覆蓋
        self.provider
            .set_info_window_content(self.info_window, &view::info_window_html(store));
        self.provider
            .open_info_window(self.info_window, self.map, marker);
        self.selection = Selection::StoreSelected(id);

        tracing::debug!("📍 Selected '{}' at {}", store.name, store.location);
        Ok(())
    }

    /// List-click entry point; `row` is the 0-based position in the sidebar.
    pub fn select_row(&mut self, row: usize) -> Result<&Store> {
        if row >= self.stores.len() {
            return Err(LocatorError::UnknownStore {
                reference: format!("row {}", row + 1),
            });
        }
        let id = self.stores[row].id;
        self.select_store(id)?;
        Ok(&self.stores[row])
    }

    /// Pan and zoom to a place picked in the search box. Returns whether the
    /// map moved; places without geometry leave it untouched.
    pub fn on_place_chosen(&mut self, place: &Place) -> bool {
        let Some(location) = place.location else {
            tracing::debug!(
                "🔍 Place '{}' has no geometry, map unchanged",
                place.name.as_deref().unwrap_or("")
            );
            return false;
        };
        if !location.is_valid() {
            tracing::warn!("⚠️ Ignoring place with invalid location {}", location);
            return false;
        }

        self.provider.pan_to(self.map, location);
        self.provider.set_zoom(self.map, self.place_zoom);
        tracing::debug!("🔍 Centered on place at {} zoom {}", location, self.place_zoom);
        true
    }

    /// Close the info window and return to the unselected state.
    pub fn deselect(&mut self) -> bool {
        match self.selection {
            Selection::Idle => false,
            Selection::StoreSelected(_) => {
                self.provider.close_info_window(self.info_window);
                self.selection = Selection::Idle;
                true
            }
        }
    }

    pub fn handle_event(&mut self, event: MapEvent) -> Result<()> {
        match event {
            MapEvent::MarkerClicked { marker, .. } => match self.marker_lookup.get(&marker) {
                Some(&id) => self.select_store(id),
                None => {
                    tracing::warn!("⚠️ Click on unknown marker {:?} ignored", marker);
                    Ok(())
                }
            },
            MapEvent::PlaceChanged { listener, place } => {
                if listener != self.place_listener {
                    tracing::warn!("⚠️ Place event from unknown listener {:?} ignored", listener);
                    return Ok(());
                }
                self.on_place_chosen(&place);
                Ok(())
            }
        }
    }

    /// Drain queued provider notifications. Returns how many were handled.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.provider.poll_event() {
            if let Err(e) = self.handle_event(event) {
                tracing::warn!("⚠️ Event not handled: {}", e);
                continue;
            }
            handled += 1;
        }
        handled
    }

    /// Release the map widget and every listener registered on it.
    pub fn teardown(self) {
        drop(self);
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn sidebar(&self) -> Vec<SidebarRow> {
        self.stores
            .iter()
            .map(|store| SidebarRow {
                id: store.id,
                name: store.name.clone(),
                timing: store.timing.clone(),
                active: self.selection == Selection::StoreSelected(store.id),
            })
            .collect()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_store(&self) -> Option<&Store> {
        match self.selection {
            Selection::Idle => None,
            Selection::StoreSelected(id) => self.stores.get(id.0),
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn empty_state(&self) -> Option<String> {
        view::empty_state(&self.status, self.stores.len())
    }

    pub fn is_loaded(&self) -> bool {
        !self.stores.is_empty()
    }

    pub fn marker_for(&self, id: StoreId) -> Option<MarkerHandle> {
        self.markers.get(id.0).copied()
    }

    pub fn map_handle(&self) -> MapHandle {
        self.map
    }

    fn ensure_not_loaded(&self) -> Result<()> {
        if self.is_loaded() {
            return Err(LocatorError::AlreadyLoaded {
                count: self.stores.len(),
            });
        }
        Ok(())
    }
}

impl<M: MapProvider> Drop for StoreSyncController<M> {
    fn drop(&mut self) {
        for listener in self.marker_listeners.drain(..) {
            self.provider.remove_listener(listener);
        }
        self.provider.remove_listener(self.place_listener);
        self.provider.close_info_window(self.info_window);
        self.provider.release_autocomplete(self.autocomplete);
        self.provider.destroy_map(self.map);
        tracing::debug!("🧹 Map view released");
    }
}
