//! Push location updates folded into a single latest-wins value.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::capabilities::{
    Location, LocationError, LocationFix, LocationOutput, LocationRequest, LocationResult,
};
use crate::event::Event;
use crate::live::LiveSlot;
use crate::{AppError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LocationData {
    Fix(LocationFix),
    Error(LocationError),
}

impl LocationData {
    #[must_use]
    pub fn fix(&self) -> Option<&LocationFix> {
        match self {
            Self::Fix(fix) => Some(fix),
            Self::Error(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&LocationError> {
        match self {
            Self::Error(e) => Some(e),
            Self::Fix(_) => None,
        }
    }
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        let kind = match &e {
            LocationError::PermissionDenied => ErrorKind::LocationPermissionDenied,
            LocationError::SettingsResolvable(_) => ErrorKind::LocationSettingsUnsatisfied,
            LocationError::Other { .. } => ErrorKind::Location,
        };
        AppError::new(kind, e.to_string())
    }
}

#[derive(Debug)]
pub struct LocationSource {
    request: LocationRequest,
    active: bool,
    // Set until the first activation after a deactivation; that activation
    // asks for the last known fix before live updates begin.
    first_subscriber: bool,
    data: LiveSlot<Option<LocationData>>,
}

impl Default for LocationSource {
    fn default() -> Self {
        Self::new(LocationRequest::default())
    }
}

impl LocationSource {
    #[must_use]
    pub fn new(request: LocationRequest) -> Self {
        Self {
            request,
            active: false,
            first_subscriber: true,
            data: LiveSlot::new(None),
        }
    }

    #[must_use]
    pub const fn request(&self) -> LocationRequest {
        self.request
    }

    /// Takes effect on the next subscription.
    pub fn set_request(&mut self, request: LocationRequest) {
        self.request = request;
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn latest(&self) -> Option<LocationData> {
        self.data.latest()
    }

    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<LocationData>> {
        self.data.subscribe()
    }

    pub fn activate(&mut self, location: &Location<Event>) {
        self.active = true;
        if !self.first_subscriber {
            debug!("location source already subscribed");
            return;
        }
        self.first_subscriber = false;

        info!(
            interval_ms = self.request.interval_ms,
            fastest_ms = self.request.fastest_interval_ms,
            "activating location source"
        );
        location.last_known(Event::LastKnownLocationReceived);
        location.request_updates(self.request, Event::LocationUpdatesRequested);
    }

    pub fn deactivate(&mut self, location: &Location<Event>) {
        if !self.active {
            return;
        }
        self.active = false;
        self.first_subscriber = true;
        info!("deactivating location source");
        location.remove_updates(Event::LocationUpdatesRemoved);
    }

    /// Verifies settings first; updates are requested once they pass.
    pub fn start_location_request(&self, location: &Location<Event>) {
        info!("checking location settings");
        location.check_settings(self.request, Event::LocationSettingsChecked);
    }

    pub fn on_settings_checked(
        &mut self,
        result: LocationResult,
        location: &Location<Event>,
    ) -> Option<LocationData> {
        match result {
            Ok(_) if !self.active => {
                debug!("location settings satisfied after deactivation, not subscribing");
                None
            }
            Ok(_) => {
                info!("location settings satisfied, requesting updates");
                location.request_updates(self.request, Event::LocationUpdatesRequested);
                None
            }
            Err(e) => {
                error!(error = %e, "location settings check failed");
                Some(self.publish(LocationData::Error(e)))
            }
        }
    }

    pub fn on_last_known(&mut self, result: LocationResult) -> Option<LocationData> {
        match result {
            Ok(LocationOutput::LastKnown(Some(fix))) => {
                if !self.active {
                    debug!("dropping last known fix delivered after deactivation");
                    return None;
                }
                Some(self.publish(LocationData::Fix(fix)))
            }
            Ok(LocationOutput::LastKnown(None)) => {
                debug!("no last known location");
                None
            }
            Ok(other) => {
                warn!(output = ?other, "unexpected output for last known location");
                None
            }
            Err(e) => {
                error!(error = %e, "last known location failed");
                Some(self.publish(LocationData::Error(e)))
            }
        }
    }

    pub fn on_updates_requested(&mut self, result: LocationResult) -> Option<LocationData> {
        match result {
            Ok(_) => {
                debug!("location updates started");
                None
            }
            Err(e) => {
                error!(error = %e, "location updates request failed");
                Some(self.publish(LocationData::Error(e)))
            }
        }
    }

    pub fn on_fix(&mut self, fix: LocationFix) -> Option<LocationData> {
        if !self.active {
            debug!("dropping fix delivered while inactive");
            return None;
        }
        Some(self.publish(LocationData::Fix(fix)))
    }

    fn publish(&mut self, data: LocationData) -> LocationData {
        self.data.publish(Some(data.clone()));
        data
    }
}
