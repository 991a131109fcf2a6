mod common;

use common::{notification_requests, permission_requests, run_events, tester};
use endormap::capabilities::{
    Importance, NotificationOperation, NotificationOutput, PermissionKind, PermissionOperation,
    PermissionOutput, TargetScreen,
};
use endormap::geofence::{GeofenceTransition, GeofencingEvent};
use endormap::{
    Event, Model, PermissionState, GEOFENCE_ID_MORDOR, NOTIFICATION_CHANNEL_ID,
    NOTIFICATION_ID_MORDOR,
};

fn transition(transition: GeofenceTransition) -> Event {
    Event::GeofenceEventReceived(GeofencingEvent {
        error_code: None,
        transition,
        triggering_request_ids: Some(vec![GEOFENCE_ID_MORDOR.to_string()]),
    })
}

#[test]
fn test_enter_shows_entered_notification() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(transition(GeofenceTransition::Enter), &mut model);
    let requests = notification_requests(update.effects);
    assert_eq!(requests.len(), 1);

    match &requests[0].operation {
        NotificationOperation::Show(payload) => {
            assert_eq!(payload.id, NOTIFICATION_ID_MORDOR);
            assert_eq!(payload.channel_id, NOTIFICATION_CHANNEL_ID);
            assert_eq!(payload.title, "You entered the Mordor !");
            assert_eq!(payload.text, "Be careful... Sauron is always watching...");
            assert_eq!(payload.large_image, "sauroneye");
            assert_eq!(payload.tap_action.screen, TargetScreen::Map);
            assert!(payload.tap_action.clear_task);
        }
        other => panic!("expected Show, got {other:?}"),
    }
}

#[test]
fn test_exit_shows_exited_notification() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(transition(GeofenceTransition::Exit), &mut model);
    match &notification_requests(update.effects)[0].operation {
        NotificationOperation::Show(payload) => {
            assert_eq!(payload.title, "You left the Mordor");
            assert_eq!(
                payload.text,
                "You can breath now... But where is the One Ring?"
            );
            assert_eq!(payload.large_image, "mordorgate");
        }
        other => panic!("expected Show, got {other:?}"),
    }
}

#[test]
fn test_error_code_shows_nothing() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(
        Event::GeofenceEventReceived(GeofencingEvent {
            error_code: Some(1004),
            transition: GeofenceTransition::Enter,
            triggering_request_ids: Some(vec![GEOFENCE_ID_MORDOR.to_string()]),
        }),
        &mut model,
    );
    assert!(notification_requests(update.effects).is_empty());
}

#[test]
fn test_transitions_do_not_touch_map_state() {
    let app = tester();
    let mut model = Model::default();
    let before = model.map.state();

    app.update(transition(GeofenceTransition::Enter), &mut model);

    assert_eq!(model.map.state(), before);
    assert!(model.markers.is_empty());
}

#[test]
fn test_start_creates_channel_and_asks_for_notifications() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(Event::AppStarted, &mut model);
    let channel_requests = notification_requests(update.effects);
    assert_eq!(channel_requests.len(), 1);
    match &channel_requests[0].operation {
        NotificationOperation::CreateChannel(channel) => {
            assert_eq!(channel.id, "EndorMap");
            assert_eq!(channel.name, "Endor Map Notification");
            assert_eq!(
                channel.description,
                "Be notified when you enter Middle Earth special areas"
            );
            assert_eq!(channel.importance, Importance::Default);
        }
        other => panic!("expected CreateChannel, got {other:?}"),
    }
    assert_eq!(
        model.notification_permission_state,
        PermissionState::Requesting
    );
}

#[test]
fn test_channel_is_created_once() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(Event::AppStarted, &mut model);
    let mut requests = notification_requests(update.effects);
    let resolved = app
        .resolve(&mut requests[0], Ok(NotificationOutput::ChannelCreated))
        .expect("resolve channel");
    run_events(&app, resolved.events, &mut model);
    assert!(model.channel_created);

    let update = app.update(Event::AppStarted, &mut model);
    assert!(notification_requests(update.effects).is_empty());
}

#[test]
fn test_notification_permission_result_is_recorded() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(Event::AppStarted, &mut model);
    let mut prompts = permission_requests(update.effects);
    assert_eq!(
        prompts[0].operation,
        PermissionOperation::Request(PermissionKind::PostNotifications)
    );

    let resolved = app
        .resolve(&mut prompts[0], Ok(PermissionOutput::Denied))
        .expect("resolve notification permission");
    run_events(&app, resolved.events, &mut model);

    assert_eq!(model.notification_permission_state, PermissionState::Denied);
    assert_eq!(
        app.view(&model).notification_permission,
        PermissionState::Denied
    );
}
