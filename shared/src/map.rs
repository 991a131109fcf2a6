use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::live::LiveSlot;
use crate::poi::{self, Poi};
use crate::ValidatedCoordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapUiState {
    #[default]
    Loading,
    Error {
        message: String,
    },
    Ready {
        user_poi: Option<Poi>,
        pois: Option<Vec<Poi>>,
    },
}

impl MapUiState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn pois(&self) -> &[Poi] {
        match self {
            Self::Ready {
                pois: Some(pois), ..
            } => pois,
            _ => &[],
        }
    }
}

/// Owns the map screen's UI state and publishes every transition.
#[derive(Debug, Default)]
pub struct MapViewModel {
    state: LiveSlot<MapUiState>,
}

impl MapViewModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> MapUiState {
        self.state.latest()
    }

    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<MapUiState> {
        self.state.subscribe()
    }

    /// Runs one load cycle, discarding whatever state came before.
    ///
    /// `Loading` and `Ready` are published back to back with nothing in
    /// between, so a reader that polls afterwards only sees `Ready`.
    pub fn load_pois(&mut self, lat: f64, lon: f64) {
        info!(lat, lon, "loading pois");

        let coord = match ValidatedCoordinate::new(lat, lon) {
            Ok(coord) => coord,
            Err(e) => {
                warn!(error = %e, "rejecting coordinates");
                self.state.publish(MapUiState::Error {
                    message: format!("Invalid coordinates: lat={lat:?}, long={lon:?}"),
                });
                return;
            }
        };

        self.state.publish(MapUiState::Loading);

        let (user_poi, pois) = poi::generate(coord);
        self.state.publish(MapUiState::Ready {
            user_poi: Some(user_poi),
            pois: Some(pois),
        });
    }
}
