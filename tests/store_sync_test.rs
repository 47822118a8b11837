use serde_json::json;
use store_locator::core::view;
use store_locator::domain::model::{FeatureCollection, LatLng, Place, Selection, StoreId};
use store_locator::domain::ports::{MapOptions, STREET_ZOOM};
use store_locator::{HeadlessMap, StoreSyncController};

fn feed(features: serde_json::Value) -> FeatureCollection {
    serde_json::from_value(json!({ "type": "FeatureCollection", "features": features })).unwrap()
}

fn example_feed() -> FeatureCollection {
    feed(json!([
        {
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [10, 20]},
            "properties": {"name": "A", "description": "d1", "timing": "9-5"}
        },
        {
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [30, 40]},
            "properties": {"name": "B", "description": "d2", "timing": "10-6"}
        }
    ]))
}

fn mount() -> (StoreSyncController<HeadlessMap>, HeadlessMap) {
    let map = HeadlessMap::new();
    let controller = StoreSyncController::mount(map.clone(), &MapOptions::default()).unwrap();
    (controller, map)
}

#[test]
fn test_example_feed_places_markers_lat_lng() {
    let (mut controller, map) = mount();
    controller.load(&example_feed()).unwrap();

    let markers = map.markers();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].position, LatLng::new(20.0, 10.0));
    assert_eq!(markers[0].title, "A");
    assert_eq!(markers[1].position, LatLng::new(40.0, 30.0));
    assert_eq!(markers[1].title, "B");

    // 清單列數等於標記數，順序相同
    let rows = controller.sidebar();
    assert_eq!(rows.len(), markers.len());
    for (row, marker) in rows.iter().zip(markers.iter()) {
        assert_eq!(row.name, marker.title);
        assert_eq!(controller.marker_for(row.id), Some(marker.handle));
    }
}

#[test]
fn test_list_click_centers_and_fills_info_window() {
    let (mut controller, map) = mount();
    controller.load(&example_feed()).unwrap();

    controller.select_row(1).unwrap();

    assert_eq!(
        map.center(controller.map_handle()),
        Some(LatLng::new(40.0, 30.0))
    );
    let open = map.open_info_windows();
    assert_eq!(open.len(), 1);
    assert!(open[0].content.contains("B"));
    assert!(open[0].content.contains("d2"));
    assert!(open[0].content.contains("10-6"));
    assert_eq!(open[0].anchor, controller.marker_for(StoreId(1)));
    assert_eq!(controller.selection(), Selection::StoreSelected(StoreId(1)));
}

#[test]
fn test_marker_click_centers_and_fills_info_window() {
    let (mut controller, map) = mount();
    controller.load(&example_feed()).unwrap();

    let marker = controller.marker_for(StoreId(0)).unwrap();
    assert!(map.click_marker(marker));
    assert_eq!(controller.dispatch_pending(), 1);

    assert_eq!(
        map.center(controller.map_handle()),
        Some(LatLng::new(20.0, 10.0))
    );
    let open = map.open_info_windows();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].content, view::info_window_html(&controller.stores()[0]));
    assert!(open[0].content.contains("d1"));
    assert!(open[0].content.contains("9-5"));
}

#[test]
fn test_selecting_b_after_a_replaces_content() {
    let (mut controller, map) = mount();
    controller.load(&example_feed()).unwrap();

    controller.select_row(0).unwrap();
    let marker_b = controller.marker_for(StoreId(1)).unwrap();
    map.click_marker(marker_b);
    controller.dispatch_pending();

    let open = map.open_info_windows();
    assert_eq!(open.len(), 1);
    assert!(open[0].content.contains("d2"));
    assert!(!open[0].content.contains("d1"));
    assert!(!open[0].content.contains("9-5"));
    assert_eq!(open[0].anchor, Some(marker_b));
    assert_eq!(controller.selected_store().unwrap().name, "B");
}

#[test]
fn test_malformed_record_is_skipped() {
    let (mut controller, map) = mount();
    let report = controller
        .load(&feed(json!([
            {"geometry": {"coordinates": [1, 2]}, "properties": {"name": "First"}},
            {"geometry": {"type": "Point"}, "properties": {"name": "Broken"}},
            {"geometry": {"coordinates": [3, 4]}, "properties": {"name": "Third"}}
        ])))
        .unwrap();

    assert_eq!(report.accepted, 2);
    assert_eq!(report.total(), 3);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].index, 1);
    assert_eq!(map.markers().len(), 2);
    let names: Vec<String> = controller.sidebar().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["First", "Third"]);
}

#[test]
fn test_place_with_geometry_pans_and_zooms() {
    let (mut controller, map) = mount();
    assert!(map.choose_place(Place {
        name: Some("Somewhere".to_string()),
        location: Some(LatLng::new(5.0, 5.0)),
    }));
    controller.dispatch_pending();

    assert_eq!(map.center(controller.map_handle()), Some(LatLng::new(5.0, 5.0)));
    assert_eq!(map.zoom(controller.map_handle()), Some(STREET_ZOOM));
    assert_eq!(STREET_ZOOM, 15);
}

#[test]
fn test_place_without_geometry_leaves_map_alone() {
    let (mut controller, map) = mount();
    controller.load(&example_feed()).unwrap();
    controller.select_row(0).unwrap();
    let center = map.center(controller.map_handle());
    let zoom = map.zoom(controller.map_handle());

    assert!(!controller.on_place_chosen(&Place {
        name: Some("gibberish".to_string()),
        location: None,
    }));

    assert_eq!(map.center(controller.map_handle()), center);
    assert_eq!(map.zoom(controller.map_handle()), zoom);
    assert_eq!(controller.selection(), Selection::StoreSelected(StoreId(0)));
}

#[test]
fn test_duplicate_names_are_distinct_stores() {
    let (mut controller, map) = mount();
    controller
        .load(&feed(json!([
            {"geometry": {"coordinates": [1, 2]}, "properties": {"name": "Twin", "description": "north"}},
            {"geometry": {"coordinates": [3, 4]}, "properties": {"name": "Twin", "description": "south"}}
        ])))
        .unwrap();

    controller.select_row(1).unwrap();
    assert_eq!(map.center(controller.map_handle()), Some(LatLng::new(4.0, 3.0)));
    assert!(map.open_info_windows()[0].content.contains("south"));
}

#[test]
fn test_drop_releases_listeners_and_map() {
    let (mut controller, map) = mount();
    controller.load(&example_feed()).unwrap();
    let marker = controller.marker_for(StoreId(0)).unwrap();
    // 兩個標記 + 一個 autocomplete
    assert_eq!(map.listener_count(), 3);

    controller.teardown();

    assert_eq!(map.listener_count(), 0);
    assert_eq!(map.autocomplete_count(), 0);
    assert_eq!(map.map_count(), 0);
    assert!(!map.click_marker(marker));
}
