use serde::{Deserialize, Serialize};

use crate::location::LocationData;
use crate::model::{CameraPosition, Screen};
use crate::poi::{Poi, PoiColor};
use crate::{AppError, ErrorSeverity, PermissionState};

pub const HUE_RED: f32 = 0.0;
pub const HUE_YELLOW: f32 = 60.0;
pub const HUE_GREEN: f32 = 120.0;
pub const HUE_AZURE: f32 = 210.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerIcon {
    Resource { name: String },
    Hue { hue: f32 },
    Default,
}

impl MarkerIcon {
    /// A bundled icon wins over a color; neither means the stock marker.
    #[must_use]
    pub fn for_poi(poi: &Poi) -> Self {
        if let Some(name) = poi.icon.as_deref().filter(|n| !n.is_empty()) {
            return Self::Resource {
                name: name.to_string(),
            };
        }
        match poi.icon_color {
            Some(color) => Self::Hue {
                hue: match color {
                    PoiColor::Blue => HUE_AZURE,
                    PoiColor::Green => HUE_GREEN,
                    PoiColor::Yellow => HUE_YELLOW,
                    PoiColor::Red | PoiColor::Custom(_) => HUE_RED,
                },
            },
            None => Self::Default,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MarkerView {
    pub title: String,
    pub snippet: String,
    pub lat: f64,
    pub lon: f64,
    pub icon: MarkerIcon,
    pub has_detail: bool,
}

impl From<&Poi> for MarkerView {
    fn from(poi: &Poi) -> Self {
        Self {
            title: poi.title.clone(),
            snippet: poi.description.clone(),
            lat: poi.lat,
            lon: poi.lon,
            icon: MarkerIcon::for_poi(poi),
            has_detail: poi.detail_url.as_deref().is_some_and(|u| !u.is_empty()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct MapView {
    pub show_progress: bool,
    pub toast: Option<String>,
    pub camera: Option<CameraPosition>,
    pub user_marker: Option<MarkerView>,
    pub markers: Vec<MarkerView>,
}

impl MapView {
    #[must_use]
    pub fn build(
        show_progress: bool,
        toast: Option<String>,
        camera: Option<CameraPosition>,
        user_marker: Option<&Poi>,
        markers: &[Poi],
    ) -> Self {
        Self {
            show_progress,
            toast,
            camera,
            user_marker: user_marker.map(MarkerView::from),
            markers: markers.iter().map(MarkerView::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LocationView {
    pub lat: f64,
    pub lon: f64,
    pub accuracy_m: Option<f32>,
}

impl LocationView {
    #[must_use]
    pub fn from_data(data: Option<&LocationData>) -> Option<Self> {
        data.and_then(LocationData::fix).map(|fix| Self {
            lat: fix.lat,
            lon: fix.lon,
            accuracy_m: fix.accuracy_m,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub screen: Option<Screen>,
    pub map: MapView,
    pub location: Option<LocationView>,
    pub location_permission: PermissionState,
    pub notification_permission: PermissionState,
    pub error: Option<UserFacingError>,
    pub geofence_count: usize,
}
