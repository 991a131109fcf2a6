//! Points of interest synthesized around the user.
//!
//! Everything here is a pure function of the input coordinate: the same
//! coordinate always yields the same list, with no randomness or clock.

use serde::{Deserialize, Serialize};

use crate::ValidatedCoordinate;

/// Title of the special POI whose surroundings are geofenced.
pub const MOUNT_DOOM: &str = "Mount Doom";

pub const USER_POI_TITLE: &str = "You";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiColor {
    Blue,
    Green,
    Yellow,
    Red,
    /// Any other ARGB color.
    Custom(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub title: String,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    pub icon: Option<String>,
    pub icon_color: Option<PoiColor>,
    pub detail_url: Option<String>,
}

impl Poi {
    #[must_use]
    pub fn coordinate(&self) -> Option<ValidatedCoordinate> {
        ValidatedCoordinate::new(self.lat, self.lon).ok()
    }

    /// Same POI at another position; `self` is left untouched.
    #[must_use]
    pub fn moved_to(&self, coord: ValidatedCoordinate) -> Self {
        Self {
            lat: coord.lat(),
            lon: coord.lon(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn is_titled(&self, title: &str) -> bool {
        self.title == title
    }
}

struct PoiTemplate {
    title: &'static str,
    description: &'static str,
    d_lat: f64,
    d_lon: f64,
    icon: Option<&'static str>,
    color: Option<PoiColor>,
    detail_url: Option<&'static str>,
}

const POI_TABLE: &[PoiTemplate] = &[
    PoiTemplate {
        title: "The Shire",
        description: "Home of the hobbits, quiet and green",
        d_lat: 0.15,
        d_lon: -0.30,
        icon: None,
        color: Some(PoiColor::Green),
        detail_url: Some("https://tolkiengateway.net/wiki/The_Shire"),
    },
    PoiTemplate {
        title: "Rivendell",
        description: "The Last Homely House East of the Sea",
        d_lat: 0.22,
        d_lon: -0.05,
        icon: None,
        color: Some(PoiColor::Blue),
        detail_url: Some("https://tolkiengateway.net/wiki/Rivendell"),
    },
    PoiTemplate {
        title: "Moria",
        description: "The long-dark halls of Khazad-dum",
        d_lat: 0.08,
        d_lon: 0.02,
        icon: None,
        color: None,
        detail_url: None,
    },
    PoiTemplate {
        title: "Isengard",
        description: "The fortress of Saruman",
        d_lat: 0.05,
        d_lon: -0.18,
        icon: None,
        color: Some(PoiColor::Red),
        detail_url: Some("https://tolkiengateway.net/wiki/Isengard"),
    },
    PoiTemplate {
        title: "Edoras",
        description: "Capital of Rohan, seat of Meduseld",
        d_lat: -0.06,
        d_lon: -0.12,
        icon: None,
        color: Some(PoiColor::Custom(0xFF8B_4513)),
        detail_url: Some("https://tolkiengateway.net/wiki/Edoras"),
    },
    PoiTemplate {
        title: "Minas Tirith",
        description: "The White City of Gondor",
        d_lat: -0.20,
        d_lon: 0.10,
        icon: None,
        color: Some(PoiColor::Yellow),
        detail_url: Some("https://tolkiengateway.net/wiki/Minas_Tirith"),
    },
    PoiTemplate {
        title: MOUNT_DOOM,
        description: "Where the One Ring was forged",
        d_lat: -0.10,
        d_lon: 0.28,
        icon: Some("mount_doom"),
        color: None,
        detail_url: Some("https://tolkiengateway.net/wiki/Mount_Doom"),
    },
];

#[must_use]
pub fn generate_user_poi(coord: ValidatedCoordinate) -> Poi {
    Poi {
        title: USER_POI_TITLE.to_string(),
        description: "Your current position".to_string(),
        lat: coord.lat(),
        lon: coord.lon(),
        icon: Some("user_marker".to_string()),
        icon_color: None,
        detail_url: None,
    }
}

#[must_use]
pub fn generate_pois(coord: ValidatedCoordinate) -> Vec<Poi> {
    POI_TABLE
        .iter()
        .map(|t| {
            let at = coord.offset(t.d_lat, t.d_lon);
            Poi {
                title: t.title.to_string(),
                description: t.description.to_string(),
                lat: at.lat(),
                lon: at.lon(),
                icon: t.icon.map(str::to_string),
                icon_color: t.color,
                detail_url: t.detail_url.map(str::to_string),
            }
        })
        .collect()
}

#[must_use]
pub fn generate(coord: ValidatedCoordinate) -> (Poi, Vec<Poi>) {
    (generate_user_poi(coord), generate_pois(coord))
}
