//! One circular geofence around the special POI, and turning its
//! transitions into a notification.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::capabilities::{
    CallbackTarget, Geofencing, GeofencingOutput, GeofencingRequest, GeofencingResult,
    InitialTrigger, NotificationPayload, RegionSpec, TapAction, TargetScreen,
};
use crate::event::Event;
use crate::poi::Poi;
use crate::{ValidatedCoordinate, GEOFENCE_EXPIRATION, NOTIFICATION_CHANNEL_ID, NOTIFICATION_ID_MORDOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triggers {
    pub enter: bool,
    pub exit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceRegion {
    pub request_id: String,
    pub center: ValidatedCoordinate,
    pub radius_m: f64,
    pub expires_after: Duration,
    pub triggers: Triggers,
}

impl GeofenceRegion {
    #[must_use]
    pub fn circle(request_id: impl Into<String>, center: ValidatedCoordinate, radius_m: f64) -> Self {
        Self {
            request_id: request_id.into(),
            center,
            radius_m,
            expires_after: GEOFENCE_EXPIRATION,
            triggers: Triggers {
                enter: true,
                exit: true,
            },
        }
    }

    #[must_use]
    pub fn with_expiration(mut self, expires_after: Duration) -> Self {
        self.expires_after = expires_after;
        self
    }

    #[must_use]
    pub fn to_region_spec(&self) -> RegionSpec {
        RegionSpec {
            request_id: self.request_id.clone(),
            lat: self.center.lat(),
            lon: self.center.lon(),
            radius_m: self.radius_m,
            expiration_ms: u64::try_from(self.expires_after.as_millis()).unwrap_or(u64::MAX),
            on_enter: self.triggers.enter,
            on_exit: self.triggers.exit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceController {
    target: CallbackTarget,
    expires_after: Duration,
    regions: Vec<GeofenceRegion>,
}

impl GeofenceController {
    #[must_use]
    pub fn new(target: CallbackTarget) -> Self {
        Self {
            target,
            expires_after: GEOFENCE_EXPIRATION,
            regions: Vec::new(),
        }
    }

    /// Applies to regions created from now on.
    pub fn set_expiration(&mut self, expires_after: Duration) {
        self.expires_after = expires_after;
    }

    #[must_use]
    pub fn regions(&self) -> &[GeofenceRegion] {
        &self.regions
    }

    /// Tracks `region`, replacing any region with the same request id, and
    /// returns the request covering every tracked region.
    pub fn upsert(&mut self, region: GeofenceRegion) -> GeofencingRequest {
        self.regions.retain(|r| r.request_id != region.request_id);
        self.regions.push(region);
        GeofencingRequest {
            initial_trigger: InitialTrigger::Enter,
            regions: self.regions.iter().map(GeofenceRegion::to_region_spec).collect(),
        }
    }

    pub fn create_geofence(
        &mut self,
        poi: &Poi,
        radius_m: f64,
        request_id: &str,
        geofencing: &Geofencing<Event>,
    ) {
        let Some(center) = poi.coordinate() else {
            error!(title = %poi.title, lat = poi.lat, lon = poi.lon, "cannot fence an invalid coordinate");
            return;
        };

        debug!(lat = center.lat(), lon = center.lon(), request_id, "creating geofence");
        let region =
            GeofenceRegion::circle(request_id, center, radius_m).with_expiration(self.expires_after);
        let request = self.upsert(region);
        geofencing.add_geofences(self.target.clone(), request, Event::GeofencesAdded);
    }

    pub fn remove_all_geofences(&mut self, geofencing: &Geofencing<Event>) {
        debug!(count = self.regions.len(), "removing all geofences");
        geofencing.remove_geofences(self.target.clone(), Event::GeofencesRemoved);
        self.regions.clear();
    }

    /// Registration outcomes are only logged; tracked regions stay as they are.
    pub fn on_registration_result(result: &GeofencingResult) {
        match result {
            Ok(GeofencingOutput::Added { count }) => info!(count, "geofence added"),
            Ok(GeofencingOutput::Removed) => info!("geofences removed"),
            Err(e) => error!(error = %e, "cannot register geofence"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceTransition {
    Enter,
    Exit,
    Dwell,
}

/// A transition as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeofencingEvent {
    #[serde(default)]
    pub error_code: Option<i32>,
    pub transition: GeofenceTransition,
    #[serde(default)]
    pub triggering_request_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub text: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplates {
    pub notification_id: i32,
    pub channel_id: String,
    pub entered: NotificationContent,
    pub exited: NotificationContent,
}

impl NotificationTemplates {
    #[must_use]
    pub fn mordor() -> Self {
        Self {
            notification_id: NOTIFICATION_ID_MORDOR,
            channel_id: NOTIFICATION_CHANNEL_ID.to_string(),
            entered: NotificationContent {
                title: "You entered the Mordor !".into(),
                text: "Be careful... Sauron is always watching...".into(),
                image: "sauroneye".into(),
            },
            exited: NotificationContent {
                title: "You left the Mordor".into(),
                text: "You can breath now... But where is the One Ring?".into(),
                image: "mordorgate".into(),
            },
        }
    }

    #[must_use]
    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }
}

/// Maps delivered transitions for one tracked region to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeofenceEventHandler {
    request_id: String,
    templates: NotificationTemplates,
}

impl GeofenceEventHandler {
    #[must_use]
    pub fn new(request_id: impl Into<String>, templates: NotificationTemplates) -> Self {
        Self {
            request_id: request_id.into(),
            templates,
        }
    }

    /// At most one payload per event; its fixed id makes a later firing
    /// replace an undismissed one.
    #[must_use]
    pub fn handle(&self, event: &GeofencingEvent) -> Option<NotificationPayload> {
        if let Some(code) = event.error_code {
            error!(code, "error in geofence event");
            return None;
        }

        if event.transition == GeofenceTransition::Dwell {
            error!(transition = ?event.transition, "unhandled geofencing transition");
        }

        let ids = match &event.triggering_request_ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                warn!("empty triggering geofences, nothing to do");
                return None;
            }
        };

        if !ids.iter().any(|id| *id == self.request_id) {
            debug!(request_id = %self.request_id, "event does not concern tracked region");
            return None;
        }

        let content = match event.transition {
            GeofenceTransition::Enter => &self.templates.entered,
            GeofenceTransition::Exit | GeofenceTransition::Dwell => &self.templates.exited,
        };

        Some(NotificationPayload {
            id: self.templates.notification_id,
            channel_id: self.templates.channel_id.clone(),
            title: content.title.clone(),
            text: content.text.clone(),
            large_image: content.image.clone(),
            big_picture: true,
            auto_cancel: true,
            tap_action: TapAction {
                screen: TargetScreen::Map,
                clear_task: true,
            },
        })
    }
}
