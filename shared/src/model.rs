use serde::{Deserialize, Serialize};

use crate::capabilities::{CallbackTarget, PermissionKind};
use crate::config::AppConfig;
use crate::event::Event;
use crate::geofence::{GeofenceController, GeofenceEventHandler};
use crate::location::LocationSource;
use crate::map::MapViewModel;
use crate::poi::Poi;
use crate::recovery::PermissionRecoveryFlow;
use crate::{AppError, PermissionState, ValidatedCoordinate, GEOFENCE_CALLBACK_TARGET};

/// Screens that own a location subscription while they are started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Main,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
}

impl CameraPosition {
    #[must_use]
    pub const fn new(center: ValidatedCoordinate, zoom: f64) -> Self {
        Self {
            lat: center.lat(),
            lon: center.lon(),
            zoom,
        }
    }
}

#[derive(Debug)]
pub struct Model {
    pub config: AppConfig,
    pub screen: Option<Screen>,
    pub location: LocationSource,
    pub recovery: PermissionRecoveryFlow<Event>,
    pub map: MapViewModel,
    pub geofences: GeofenceController,
    pub geofence_handler: GeofenceEventHandler,
    pub map_ready: bool,
    pub first_location: bool,
    /// Last failed load, shown until dismissed or the next load.
    pub map_toast: Option<String>,
    pub camera: Option<CameraPosition>,
    pub user_marker: Option<Poi>,
    pub markers: Vec<Poi>,
    pub active_error: Option<AppError>,
    pub location_permission_state: PermissionState,
    pub notification_permission_state: PermissionState,
    pub channel_created: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Model {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let mut geofences = GeofenceController::new(CallbackTarget::new(GEOFENCE_CALLBACK_TARGET));
        geofences.set_expiration(config.geofence_expiration());

        Self {
            location: LocationSource::new(config.location),
            recovery: PermissionRecoveryFlow::new(
                PermissionKind::FineLocation,
                Event::StartLocationRequest,
            ),
            map: MapViewModel::new(),
            geofences,
            geofence_handler: GeofenceEventHandler::new(
                config.geofence_request_id.clone(),
                config.notification_templates(),
            ),
            screen: None,
            map_ready: false,
            first_location: true,
            map_toast: None,
            camera: None,
            user_marker: None,
            markers: Vec::new(),
            active_error: None,
            location_permission_state: PermissionState::Unknown,
            notification_permission_state: PermissionState::Unknown,
            channel_created: false,
            config,
        }
    }

    /// Swaps in a validated config. Subscriptions already running keep
    /// their parameters until the next activation.
    pub fn apply_config(&mut self, config: AppConfig) {
        self.location.set_request(config.location);
        self.geofences.set_expiration(config.geofence_expiration());
        self.geofence_handler = GeofenceEventHandler::new(
            config.geofence_request_id.clone(),
            config.notification_templates(),
        );
        self.config = config;
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    /// Clears the active error only if the location pipeline raised it.
    pub fn clear_location_error(&mut self) {
        if self.active_error.as_ref().is_some_and(|e| e.kind.is_location()) {
            self.active_error = None;
        }
    }

    /// Forgets the torn-down map surface; the next one waits for its own
    /// `MapReady` and recenters on its first fix.
    pub fn reset_map_instance(&mut self) {
        self.map_ready = false;
        self.first_location = true;
        self.camera = None;
    }

    #[must_use]
    pub fn is_on_map(&self) -> bool {
        self.screen == Some(Screen::Map)
    }

    /// Drops every marker from the map surface, the user's included.
    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.user_marker = None;
    }

    #[must_use]
    pub fn find_marker(&self, title: &str) -> Option<&Poi> {
        self.markers
            .iter()
            .chain(self.user_marker.iter())
            .find(|p| p.is_titled(title))
    }
}
