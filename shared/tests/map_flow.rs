mod common;

use common::{browser_requests, geofencing_requests, tester, Tester};
use endormap::capabilities::{BrowserOperation, GeofencingOperation, InitialTrigger, LocationFix};
use endormap::map::MapUiState;
use endormap::poi::{MOUNT_DOOM, USER_POI_TITLE};
use endormap::view::MarkerIcon;
use endormap::{Effect, Event, Model, Screen, GEOFENCE_CALLBACK_TARGET, GEOFENCE_ID_MORDOR};

fn map_screen(app: &Tester) -> Model {
    let mut model = Model::default();
    app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);
    app.update(Event::MapReady, &mut model);
    model
}

#[test]
fn test_first_fix_centers_camera_and_loads_pois() {
    let app = tester();
    let mut model = map_screen(&app);

    let update = app.update(Event::LocationFixReceived(LocationFix::new(51.5, -0.1)), &mut model);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));

    let view = app.view(&model);
    let camera = view.map.camera.expect("camera set on first fix");
    assert_eq!((camera.lat, camera.lon, camera.zoom), (51.5, -0.1, 9.0));

    let user = view.map.user_marker.expect("user marker");
    assert_eq!(user.title, USER_POI_TITLE);
    assert_eq!((user.lat, user.lon), (51.5, -0.1));
    assert_eq!(view.map.markers.len(), 7);
    assert!(!view.map.show_progress);
    assert!(view.map.toast.is_none());

    let doom = view
        .map
        .markers
        .iter()
        .find(|m| m.title == MOUNT_DOOM)
        .expect("special poi marker");
    assert_eq!(
        doom.icon,
        MarkerIcon::Resource {
            name: "mount_doom".into()
        }
    );
}

#[test]
fn test_ready_state_registers_the_special_geofence() {
    let app = tester();
    let mut model = map_screen(&app);

    let update = app.update(Event::LocationFixReceived(LocationFix::new(10.0, 20.0)), &mut model);
    let requests = geofencing_requests(update.effects);
    assert_eq!(requests.len(), 1);

    match &requests[0].operation {
        GeofencingOperation::AddGeofences { target, request } => {
            assert_eq!(target.0, GEOFENCE_CALLBACK_TARGET);
            assert_eq!(request.initial_trigger, InitialTrigger::Enter);
            assert_eq!(request.regions.len(), 1);
            let region = &request.regions[0];
            assert_eq!(region.request_id, GEOFENCE_ID_MORDOR);
            assert_eq!(region.radius_m, 10_000.0);
            assert_eq!(region.expiration_ms, 600_000);
            assert!(region.on_enter && region.on_exit);
            assert!((region.lat - 9.9).abs() < 1e-9);
            assert!((region.lon - 20.28).abs() < 1e-9);
        }
        other => panic!("expected AddGeofences, got {other:?}"),
    }
    assert_eq!(app.view(&model).geofence_count, 1);
}

#[test]
fn test_fix_before_map_ready_is_replayed_when_ready() {
    let app = tester();
    let mut model = Model::default();
    app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);
    app.update(Event::LocationFixReceived(LocationFix::new(5.0, 5.0)), &mut model);
    assert!(model.markers.is_empty());

    app.update(Event::MapReady, &mut model);
    assert_eq!(model.markers.len(), 7);
    assert!(!model.first_location);
}

#[test]
fn test_fix_on_main_screen_does_not_load_pois() {
    let app = tester();
    let mut model = Model::default();
    app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    app.update(Event::MapReady, &mut model);

    let update = app.update(Event::LocationFixReceived(LocationFix::new(5.0, 5.0)), &mut model);
    assert!(geofencing_requests(update.effects).is_empty());
    assert!(model.markers.is_empty());
    assert!(model.camera.is_none());
}

#[test]
fn test_invalid_coordinates_show_error_toast() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(Event::LoadPoisRequested { lat: 200.0, lon: 0.0 }, &mut model);
    assert!(geofencing_requests(update.effects).is_empty());

    assert_eq!(
        model.map.state(),
        MapUiState::Error {
            message: "Invalid coordinates: lat=200.0, long=0.0".into()
        }
    );
    let view = app.view(&model);
    assert_eq!(
        view.map.toast.as_deref(),
        Some("Error: Invalid coordinates: lat=200.0, long=0.0")
    );
    assert!(view.map.markers.is_empty());
}

#[test]
fn test_reload_after_error_reaches_ready() {
    let app = tester();
    let mut model = Model::default();

    app.update(Event::LoadPoisRequested { lat: 0.0, lon: -500.0 }, &mut model);
    app.update(Event::LoadPoisRequested { lat: 51.5, lon: -0.1 }, &mut model);

    match model.map.state() {
        MapUiState::Ready {
            user_poi: Some(user),
            pois: Some(pois),
        } => {
            assert_eq!((user.lat, user.lon), (51.5, -0.1));
            assert_eq!(pois.len(), 7);
        }
        other => panic!("expected Ready, got {other:?}"),
    }
    assert!(app.view(&model).map.toast.is_none());
}

#[test]
fn test_regenerate_replaces_geofence_and_markers() {
    let app = tester();
    let mut model = map_screen(&app);
    app.update(Event::LocationFixReceived(LocationFix::new(10.0, 10.0)), &mut model);
    app.update(Event::LocationFixReceived(LocationFix::new(12.0, 12.0)), &mut model);

    let update = app.update(Event::GeneratePoisRequested, &mut model);
    let ops: Vec<_> = geofencing_requests(update.effects)
        .into_iter()
        .map(|r| r.operation)
        .collect();

    assert_eq!(ops.len(), 2);
    assert!(matches!(ops[0], GeofencingOperation::RemoveGeofences { .. }));
    match &ops[1] {
        GeofencingOperation::AddGeofences { request, .. } => {
            assert_eq!(request.regions.len(), 1);
            assert!((request.regions[0].lat - 11.9).abs() < 1e-9);
        }
        other => panic!("expected AddGeofences, got {other:?}"),
    }

    let user = model.user_marker.as_ref().expect("user marker");
    assert_eq!((user.lat, user.lon), (12.0, 12.0));
    assert_eq!(model.markers.len(), 7);
    assert_eq!(model.geofences.regions().len(), 1);
}

#[test]
fn test_regenerate_without_position_is_ignored() {
    let app = tester();
    let mut model = map_screen(&app);

    let update = app.update(Event::GeneratePoisRequested, &mut model);
    assert!(update.effects.is_empty());
}

#[test]
fn test_info_window_opens_detail_url() {
    let app = tester();
    let mut model = Model::default();
    app.update(Event::LoadPoisRequested { lat: 0.0, lon: 0.0 }, &mut model);

    let update = app.update(
        Event::PoiInfoWindowTapped {
            title: MOUNT_DOOM.into(),
        },
        &mut model,
    );
    let requests = browser_requests(update.effects);
    assert_eq!(requests.len(), 1);
    let BrowserOperation::OpenUrl(url) = &requests[0].operation;
    assert_eq!(url.as_str(), "https://tolkiengateway.net/wiki/Mount_Doom");
}

#[test]
fn test_info_window_without_url_does_nothing() {
    let app = tester();
    let mut model = Model::default();
    app.update(Event::LoadPoisRequested { lat: 0.0, lon: 0.0 }, &mut model);

    for title in ["Moria", USER_POI_TITLE, "Nowhere"] {
        let update = app.update(
            Event::PoiInfoWindowTapped {
                title: title.into(),
            },
            &mut model,
        );
        assert!(browser_requests(update.effects).is_empty(), "{title}");
    }
}

#[test]
fn test_new_map_instance_recenters_when_ready() {
    let app = tester();
    let mut model = map_screen(&app);
    app.update(Event::LocationFixReceived(LocationFix::new(10.0, 10.0)), &mut model);
    assert!(!model.first_location);

    app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    app.update(Event::ScreenStopped { screen: Screen::Map }, &mut model);
    app.update(Event::ScreenDestroyed { screen: Screen::Map }, &mut model);
    assert!(model.first_location);
    assert!(!model.map_ready);

    app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);
    app.update(Event::MapReady, &mut model);
    let camera = model.camera.expect("camera");
    assert_eq!((camera.lat, camera.lon), (10.0, 10.0));
    assert!(!model.first_location);
}

#[test]
fn test_restarted_map_only_moves_user_marker() {
    let app = tester();
    let mut model = map_screen(&app);
    app.update(Event::LocationFixReceived(LocationFix::new(10.0, 10.0)), &mut model);
    let camera = model.camera;
    let markers = model.markers.clone();

    app.update(Event::ScreenStopped { screen: Screen::Map }, &mut model);
    app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);
    let update = app.update(Event::LocationFixReceived(LocationFix::new(10.5, 10.5)), &mut model);

    assert!(geofencing_requests(update.effects).is_empty());
    assert_eq!(model.camera, camera);
    assert_eq!(model.markers, markers);
    let user = model.user_marker.as_ref().expect("user marker");
    assert_eq!((user.lat, user.lon), (10.5, 10.5));
}

#[test]
fn test_new_map_instance_waits_for_its_own_map_ready() {
    let app = tester();
    let mut model = map_screen(&app);
    app.update(Event::LocationFixReceived(LocationFix::new(10.0, 10.0)), &mut model);

    app.update(Event::ScreenStopped { screen: Screen::Map }, &mut model);
    app.update(Event::ScreenDestroyed { screen: Screen::Map }, &mut model);
    app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);

    let update = app.update(Event::LocationFixReceived(LocationFix::new(30.0, 30.0)), &mut model);
    assert!(geofencing_requests(update.effects).is_empty());
    assert!(model.camera.is_none());

    let update = app.update(Event::MapReady, &mut model);
    assert_eq!(geofencing_requests(update.effects).len(), 1);
    let camera = model.camera.expect("camera after map ready");
    assert_eq!((camera.lat, camera.lon), (30.0, 30.0));
}

#[test]
fn test_error_toast_is_dismissible() {
    let app = tester();
    let mut model = Model::default();

    app.update(Event::LoadPoisRequested { lat: 200.0, lon: 0.0 }, &mut model);
    assert!(app.view(&model).map.toast.is_some());

    app.update(Event::DismissError, &mut model);
    assert!(app.view(&model).map.toast.is_none());
}

#[test]
fn test_progress_only_shows_on_map_screen() {
    let app = tester();
    let mut model = Model::default();
    app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    assert!(!app.view(&model).map.show_progress);

    app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);
    assert!(app.view(&model).map.show_progress);
}
