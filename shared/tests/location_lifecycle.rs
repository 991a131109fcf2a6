mod common;

use common::{location_ops, location_requests, run_events, tester};
use endormap::capabilities::{LocationFix, LocationOperation, LocationOutput, LocationRequest};
use endormap::{Event, Model, Screen};

#[test]
fn test_activation_reads_last_fix_before_subscribing() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    let ops = location_ops(update.effects);

    assert_eq!(
        ops,
        vec![
            LocationOperation::LastKnown,
            LocationOperation::RequestUpdates(LocationRequest::default()),
        ]
    );
    assert!(model.location.is_active());
}

#[test]
fn test_second_activation_issues_nothing() {
    let app = tester();
    let mut model = Model::default();

    app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    let update = app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);

    assert!(location_ops(update.effects).is_empty());
    assert_eq!(model.screen, Some(Screen::Map));
}

#[test]
fn test_reactivation_rereads_last_fix_exactly_once() {
    let app = tester();
    let mut model = Model::default();

    app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);

    let update = app.update(Event::ScreenStopped { screen: Screen::Map }, &mut model);
    assert_eq!(
        location_ops(update.effects),
        vec![LocationOperation::RemoveUpdates]
    );
    assert!(!model.location.is_active());

    let update = app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);
    let ops = location_ops(update.effects);
    let last_known = ops
        .iter()
        .filter(|op| **op == LocationOperation::LastKnown)
        .count();
    assert_eq!(last_known, 1);
    assert_eq!(ops.first(), Some(&LocationOperation::LastKnown));
    assert!(matches!(ops.get(1), Some(LocationOperation::RequestUpdates(_))));
    assert_eq!(ops.len(), 2);
}

#[test]
fn test_stopping_a_stale_screen_keeps_subscription() {
    let app = tester();
    let mut model = Model::default();

    app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    app.update(Event::ScreenStarted { screen: Screen::Map }, &mut model);
    let update = app.update(Event::ScreenStopped { screen: Screen::Main }, &mut model);

    assert!(location_ops(update.effects).is_empty());
    assert!(model.location.is_active());
    assert_eq!(model.screen, Some(Screen::Map));
}

#[test]
fn test_last_known_fix_is_published() {
    let app = tester();
    let mut model = Model::default();

    let update = app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    let mut requests = location_requests(update.effects);
    let last_known = requests
        .iter_mut()
        .find(|r| r.operation == LocationOperation::LastKnown)
        .expect("last known request");

    let fix = LocationFix::new(48.85, 2.35).with_accuracy(12.0);
    let resolved = app
        .resolve(last_known, Ok(LocationOutput::LastKnown(Some(fix))))
        .expect("resolve last known");
    run_events(&app, resolved.events, &mut model);

    let view = app.view(&model);
    let location = view.location.expect("location in view");
    assert_eq!((location.lat, location.lon), (48.85, 2.35));
    assert_eq!(location.accuracy_m, Some(12.0));
}

#[test]
fn test_fixes_while_inactive_are_dropped() {
    let app = tester();
    let mut model = Model::default();

    app.update(Event::LocationFixReceived(LocationFix::new(1.0, 1.0)), &mut model);
    assert!(model.location.latest().is_none());

    app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    app.update(Event::ScreenStopped { screen: Screen::Main }, &mut model);
    app.update(Event::LocationFixReceived(LocationFix::new(2.0, 2.0)), &mut model);
    assert!(model.location.latest().is_none());
}

#[test]
fn test_latest_fix_wins() {
    let app = tester();
    let mut model = Model::default();
    app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);

    app.update(Event::LocationFixReceived(LocationFix::new(1.0, 1.0)), &mut model);
    app.update(Event::LocationFixReceived(LocationFix::new(3.0, 4.0)), &mut model);

    let location = app.view(&model).location.expect("location in view");
    assert_eq!((location.lat, location.lon), (3.0, 4.0));
}

#[test]
fn test_configured_intervals_are_used_on_next_activation() {
    let app = tester();
    let mut model = Model::default();

    let mut config = endormap::AppConfig::default();
    config.location.interval_ms = 60_000;
    config.location.fastest_interval_ms = 30_000;
    app.update(Event::ConfigLoaded(config), &mut model);

    let update = app.update(Event::ScreenStarted { screen: Screen::Main }, &mut model);
    let ops = location_ops(update.effects);
    match ops.get(1) {
        Some(LocationOperation::RequestUpdates(req)) => {
            assert_eq!(req.interval_ms, 60_000);
            assert_eq!(req.fastest_interval_ms, 30_000);
        }
        other => panic!("expected RequestUpdates, got {other:?}"),
    }
}
