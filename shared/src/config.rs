use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{Importance, LocationRequest, NotificationChannel};
use crate::geofence::NotificationTemplates;
use crate::poi::MOUNT_DOOM;
use crate::{
    AppError, AppResult, ErrorKind, FIRST_FIX_ZOOM, GEOFENCE_EXPIRATION, GEOFENCE_ID_MORDOR,
    GEOFENCE_RADIUS_M, MAX_ZOOM, MIN_ZOOM, NOTIFICATION_CHANNEL_DESCRIPTION,
    NOTIFICATION_CHANNEL_ID, NOTIFICATION_CHANNEL_NAME,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("location interval must be positive and not shorter than the fastest interval ({interval_ms} < {fastest_ms})")]
    LocationIntervals { interval_ms: u64, fastest_ms: u64 },

    #[error("geofence radius must be a positive finite number, got {0}")]
    GeofenceRadius(f64),

    #[error("geofence expiration must be positive")]
    GeofenceExpiration,

    #[error("first fix zoom {0} is outside the supported zoom range")]
    Zoom(f64),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

/// Runtime tunables. Every field falls back to the built-in constant when
/// absent from the JSON the shell provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub location: LocationRequest,
    pub geofence_request_id: String,
    pub geofence_radius_m: f64,
    pub geofence_expiration_secs: u64,
    pub special_poi_title: String,
    pub first_fix_zoom: f64,
    pub notification_channel: NotificationChannel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            location: LocationRequest::default(),
            geofence_request_id: GEOFENCE_ID_MORDOR.to_string(),
            geofence_radius_m: GEOFENCE_RADIUS_M,
            geofence_expiration_secs: GEOFENCE_EXPIRATION.as_secs(),
            special_poi_title: MOUNT_DOOM.to_string(),
            first_fix_zoom: FIRST_FIX_ZOOM,
            notification_channel: NotificationChannel {
                id: NOTIFICATION_CHANNEL_ID.to_string(),
                name: NOTIFICATION_CHANNEL_NAME.to_string(),
                description: NOTIFICATION_CHANNEL_DESCRIPTION.to_string(),
                importance: Importance::Default,
            },
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses and validates in one step.
    pub fn load(json: &str) -> AppResult<Self> {
        let config = Self::from_json(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let req = &self.location;
        if req.interval_ms == 0 || req.fastest_interval_ms > req.interval_ms {
            return Err(ConfigError::LocationIntervals {
                interval_ms: req.interval_ms,
                fastest_ms: req.fastest_interval_ms,
            });
        }
        if self.geofence_request_id.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "geofence_request_id",
            });
        }
        if !self.geofence_radius_m.is_finite() || self.geofence_radius_m <= 0.0 {
            return Err(ConfigError::GeofenceRadius(self.geofence_radius_m));
        }
        if self.geofence_expiration_secs == 0 {
            return Err(ConfigError::GeofenceExpiration);
        }
        if self.special_poi_title.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "special_poi_title",
            });
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.first_fix_zoom) {
            return Err(ConfigError::Zoom(self.first_fix_zoom));
        }
        if self.notification_channel.id.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "notification_channel.id",
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn geofence_expiration(&self) -> Duration {
        Duration::from_secs(self.geofence_expiration_secs)
    }

    #[must_use]
    pub fn notification_templates(&self) -> NotificationTemplates {
        NotificationTemplates::mordor().with_channel(self.notification_channel.id.clone())
    }
}
