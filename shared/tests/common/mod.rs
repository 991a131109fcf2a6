#![allow(dead_code)]

use crux_core::testing::AppTester;
use crux_core::Request;
use endormap::capabilities::{
    BrowserOperation, GeofencingOperation, LocationOperation, NotificationOperation,
    PermissionOperation,
};
use endormap::{App, Effect, Event, Model};

pub type Tester = AppTester<App, Effect>;

pub fn tester() -> Tester {
    AppTester::default()
}

/// Feeds the events produced by a resolved request back into the app and
/// returns every effect they emitted.
pub fn run_events(app: &Tester, events: Vec<Event>, model: &mut Model) -> Vec<Effect> {
    let mut effects = Vec::new();
    for event in events {
        effects.extend(app.update(event, model).effects);
    }
    effects
}

pub fn location_requests(effects: Vec<Effect>) -> Vec<Request<LocationOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Location(req) => Some(req),
            _ => None,
        })
        .collect()
}

pub fn permission_requests(effects: Vec<Effect>) -> Vec<Request<PermissionOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Permissions(req) => Some(req),
            _ => None,
        })
        .collect()
}

pub fn geofencing_requests(effects: Vec<Effect>) -> Vec<Request<GeofencingOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Geofencing(req) => Some(req),
            _ => None,
        })
        .collect()
}

pub fn notification_requests(effects: Vec<Effect>) -> Vec<Request<NotificationOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Notifications(req) => Some(req),
            _ => None,
        })
        .collect()
}

pub fn browser_requests(effects: Vec<Effect>) -> Vec<Request<BrowserOperation>> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Browser(req) => Some(req),
            _ => None,
        })
        .collect()
}

pub fn location_ops(effects: Vec<Effect>) -> Vec<LocationOperation> {
    location_requests(effects)
        .into_iter()
        .map(|r| r.operation)
        .collect()
}
