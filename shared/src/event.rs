use serde::{Deserialize, Serialize};

use crate::capabilities::{
    BrowserResult, GeofencingResult, LocationFix, LocationResult, NotificationResult,
    PermissionResult,
};
use crate::config::AppConfig;
use crate::geofence::GeofencingEvent;
use crate::model::Screen;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Noop,

    // Lifecycle
    ConfigLoaded(AppConfig),
    AppStarted,
    ScreenStarted {
        screen: Screen,
    },
    ScreenStopped {
        screen: Screen,
    },
    /// The screen's surface is gone for good; a later start is a new one.
    ScreenDestroyed {
        screen: Screen,
    },

    // Map surface
    MapReady,
    LoadPoisRequested {
        lat: f64,
        lon: f64,
    },
    GeneratePoisRequested,
    PoiInfoWindowTapped {
        title: String,
    },
    DismissError,

    // Pushed by the shell
    StartLocationRequest,
    LocationFixReceived(LocationFix),
    GeofenceEventReceived(GeofencingEvent),

    // Capability responses
    #[serde(skip)]
    LastKnownLocationReceived(LocationResult),
    #[serde(skip)]
    LocationUpdatesRequested(LocationResult),
    #[serde(skip)]
    LocationUpdatesRemoved(LocationResult),
    #[serde(skip)]
    LocationSettingsChecked(LocationResult),
    #[serde(skip)]
    LocationPermissionResult(PermissionResult),
    #[serde(skip)]
    SettingsResolutionResult(PermissionResult),
    #[serde(skip)]
    NotificationPermissionResult(PermissionResult),
    #[serde(skip)]
    NotificationChannelCreated(NotificationResult),
    #[serde(skip)]
    NotificationShown(NotificationResult),
    #[serde(skip)]
    GeofencesAdded(GeofencingResult),
    #[serde(skip)]
    GeofencesRemoved(GeofencingResult),
    #[serde(skip)]
    UrlOpened(BrowserResult),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::ConfigLoaded(_) => "config_loaded",
            Self::AppStarted => "app_started",
            Self::ScreenStarted { .. } => "screen_started",
            Self::ScreenStopped { .. } => "screen_stopped",
            Self::ScreenDestroyed { .. } => "screen_destroyed",
            Self::MapReady => "map_ready",
            Self::LoadPoisRequested { .. } => "load_pois_requested",
            Self::GeneratePoisRequested => "generate_pois_requested",
            Self::PoiInfoWindowTapped { .. } => "poi_info_window_tapped",
            Self::DismissError => "dismiss_error",
            Self::StartLocationRequest => "start_location_request",
            Self::LocationFixReceived(_) => "location_fix_received",
            Self::GeofenceEventReceived(_) => "geofence_event_received",
            Self::LastKnownLocationReceived(_) => "last_known_location_received",
            Self::LocationUpdatesRequested(_) => "location_updates_requested",
            Self::LocationUpdatesRemoved(_) => "location_updates_removed",
            Self::LocationSettingsChecked(_) => "location_settings_checked",
            Self::LocationPermissionResult(_) => "location_permission_result",
            Self::SettingsResolutionResult(_) => "settings_resolution_result",
            Self::NotificationPermissionResult(_) => "notification_permission_result",
            Self::NotificationChannelCreated(_) => "notification_channel_created",
            Self::NotificationShown(_) => "notification_shown",
            Self::GeofencesAdded(_) => "geofences_added",
            Self::GeofencesRemoved(_) => "geofences_removed",
            Self::UrlOpened(_) => "url_opened",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::LoadPoisRequested { .. }
                | Self::GeneratePoisRequested
                | Self::PoiInfoWindowTapped { .. }
                | Self::DismissError
        )
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::Noop
    }
}
