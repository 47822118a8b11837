use crate::domain::model::{LatLng, Place};
use crate::domain::ports::{
    AutocompleteHandle, InfoWindowHandle, ListenerHandle, ListenerTarget, MapEvent, MapHandle,
    MapOptions, MapProvider, MarkerHandle,
};
use crate::utils::error::{LocatorError, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub container: String,
    pub center: LatLng,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub handle: MarkerHandle,
    pub map: MapHandle,
    pub position: LatLng,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfoWindowView {
    pub content: String,
    pub map: Option<MapHandle>,
    pub anchor: Option<MarkerHandle>,
}

#[derive(Debug, Default)]
struct MapState {
    next_id: u64,
    maps: BTreeMap<MapHandle, MapView>,
    markers: BTreeMap<MarkerHandle, MarkerView>,
    info_windows: BTreeMap<InfoWindowHandle, InfoWindowView>,
    autocompletes: BTreeMap<AutocompleteHandle, String>,
    listeners: BTreeMap<ListenerHandle, ListenerTarget>,
    queue: VecDeque<MapEvent>,
    failing_titles: HashSet<String>,
}

impl MapState {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory map provider. It keeps the state a real map widget would show
/// and lets a driver simulate marker clicks and place choices.
///
/// Clones share the same state, so a caller can hand one clone to the
/// controller and keep another to inspect the map. Single-threaded only.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMap {
    state: Rc<RefCell<MapState>>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a click on a marker. Returns whether any listener heard it.
    pub fn click_marker(&self, marker: MarkerHandle) -> bool {
        let mut state = self.state.borrow_mut();
        let listeners: Vec<ListenerHandle> = state
            .listeners
            .iter()
            .filter(|(_, target)| **target == ListenerTarget::Marker(marker))
            .map(|(handle, _)| *handle)
            .collect();
        for listener in &listeners {
            state
                .queue
                .push_back(MapEvent::MarkerClicked { listener: *listener, marker });
        }
        !listeners.is_empty()
    }

    /// Simulate the user picking a suggestion in every autocomplete widget.
    pub fn choose_place(&self, place: Place) -> bool {
        let mut state = self.state.borrow_mut();
        let listeners: Vec<ListenerHandle> = state
            .listeners
            .iter()
            .filter(|(_, target)| matches!(target, ListenerTarget::Autocomplete(_)))
            .map(|(handle, _)| *handle)
            .collect();
        for listener in &listeners {
            state.queue.push_back(MapEvent::PlaceChanged {
                listener: *listener,
                place: place.clone(),
            });
        }
        !listeners.is_empty()
    }

    /// Make `create_marker` fail for markers with this title.
    pub fn fail_markers_titled(&self, title: &str) {
        self.state
            .borrow_mut()
            .failing_titles
            .insert(title.to_string());
    }

    pub fn center(&self, map: MapHandle) -> Option<LatLng> {
        self.state.borrow().maps.get(&map).map(|view| view.center)
    }

    pub fn zoom(&self, map: MapHandle) -> Option<u8> {
        self.state.borrow().maps.get(&map).map(|view| view.zoom)
    }

    pub fn map_count(&self) -> usize {
        self.state.borrow().maps.len()
    }

    pub fn markers(&self) -> Vec<MarkerView> {
        self.state.borrow().markers.values().cloned().collect()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn autocomplete_count(&self) -> usize {
        self.state.borrow().autocompletes.len()
    }

    /// Info windows currently open on a map.
    pub fn open_info_windows(&self) -> Vec<InfoWindowView> {
        self.state
            .borrow()
            .info_windows
            .values()
            .filter(|window| window.anchor.is_some())
            .cloned()
            .collect()
    }
}

impl MapProvider for HeadlessMap {
    fn create_map(&mut self, container: &str, options: &MapOptions) -> Result<MapHandle> {
        if container.trim().is_empty() {
            return Err(LocatorError::ProviderError {
                message: "map container element id is empty".to_string(),
            });
        }
        let mut state = self.state.borrow_mut();
        let handle = MapHandle(state.next());
        state.maps.insert(
            handle,
            MapView {
                container: container.to_string(),
                center: options.center,
                zoom: options.zoom,
            },
        );
        Ok(handle)
    }

    fn create_marker(
        &mut self,
        map: MapHandle,
        position: LatLng,
        title: &str,
    ) -> Result<MarkerHandle> {
        let mut state = self.state.borrow_mut();
        if !state.maps.contains_key(&map) {
            return Err(LocatorError::ProviderError {
                message: format!("map {:?} does not exist", map),
            });
        }
        if state.failing_titles.contains(title) {
            return Err(LocatorError::ProviderError {
                message: format!("marker '{}' could not be created", title),
            });
        }
        let handle = MarkerHandle(state.next());
        state.markers.insert(
            handle,
            MarkerView {
                handle,
                map,
                position,
                title: title.to_string(),
            },
        );
        Ok(handle)
    }

    fn create_info_window(&mut self) -> Result<InfoWindowHandle> {
        let mut state = self.state.borrow_mut();
        let handle = InfoWindowHandle(state.next());
        state.info_windows.insert(handle, InfoWindowView::default());
        Ok(handle)
    }

    fn set_info_window_content(&mut self, window: InfoWindowHandle, html: &str) {
        if let Some(view) = self.state.borrow_mut().info_windows.get_mut(&window) {
            view.content = html.to_string();
        }
    }

    fn open_info_window(&mut self, window: InfoWindowHandle, map: MapHandle, anchor: MarkerHandle) {
        if let Some(view) = self.state.borrow_mut().info_windows.get_mut(&window) {
            view.map = Some(map);
            view.anchor = Some(anchor);
        }
    }

    fn close_info_window(&mut self, window: InfoWindowHandle) {
        if let Some(view) = self.state.borrow_mut().info_windows.get_mut(&window) {
            view.map = None;
            view.anchor = None;
        }
    }

    fn pan_to(&mut self, map: MapHandle, position: LatLng) {
        if let Some(view) = self.state.borrow_mut().maps.get_mut(&map) {
            view.center = position;
        }
    }

    fn set_zoom(&mut self, map: MapHandle, level: u8) {
        if let Some(view) = self.state.borrow_mut().maps.get_mut(&map) {
            view.zoom = level;
        }
    }

    fn create_autocomplete(&mut self, input_element: &str) -> Result<AutocompleteHandle> {
        if input_element.trim().is_empty() {
            return Err(LocatorError::ProviderError {
                message: "search input element id is empty".to_string(),
            });
        }
        let mut state = self.state.borrow_mut();
        let handle = AutocompleteHandle(state.next());
        state
            .autocompletes
            .insert(handle, input_element.to_string());
        Ok(handle)
    }

    fn add_listener(&mut self, target: ListenerTarget) -> ListenerHandle {
        let mut state = self.state.borrow_mut();
        let handle = ListenerHandle(state.next());
        state.listeners.insert(handle, target);
        handle
    }

    fn remove_listener(&mut self, listener: ListenerHandle) {
        let mut state = self.state.borrow_mut();
        state.listeners.remove(&listener);
        // 已排隊但監聽器已移除的事件不再送出
        state.queue.retain(|event| match event {
            MapEvent::MarkerClicked { listener: l, .. } | MapEvent::PlaceChanged { listener: l, .. } => {
                *l != listener
            }
        });
    }

    fn poll_event(&mut self) -> Option<MapEvent> {
        self.state.borrow_mut().queue.pop_front()
    }

    fn release_autocomplete(&mut self, autocomplete: AutocompleteHandle) {
        self.state.borrow_mut().autocompletes.remove(&autocomplete);
    }

    fn destroy_map(&mut self, map: MapHandle) {
        let mut state = self.state.borrow_mut();
        state.maps.remove(&map);
        state.markers.retain(|_, marker| marker.map != map);
        for window in state.info_windows.values_mut() {
            if window.map == Some(map) {
                window.map = None;
                window.anchor = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_without_listener_is_not_delivered() {
        let mut map = HeadlessMap::new();
        let handle = map.create_map("google-map", &MapOptions::default()).unwrap();
        let marker = map
            .create_marker(handle, LatLng::new(1.0, 2.0), "A")
            .unwrap();

        assert!(!map.click_marker(marker));
        assert_eq!(map.poll_event(), None);

        let listener = map.add_listener(ListenerTarget::Marker(marker));
        assert!(map.click_marker(marker));
        map.remove_listener(listener);
        assert_eq!(map.poll_event(), None);
    }

    #[test]
    fn test_destroy_map_drops_markers() {
        let mut map = HeadlessMap::new();
        let handle = map.create_map("google-map", &MapOptions::default()).unwrap();
        map.create_marker(handle, LatLng::new(1.0, 2.0), "A").unwrap();
        map.destroy_map(handle);

        assert_eq!(map.map_count(), 0);
        assert!(map.markers().is_empty());
        assert!(map
            .create_marker(handle, LatLng::new(1.0, 2.0), "B")
            .is_err());
    }
}
