use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{LOCATION_FASTEST_INTERVAL, LOCATION_UPDATE_INTERVAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationPriority {
    #[default]
    HighAccuracy,
    BalancedPowerAccuracy,
    LowPower,
    Passive,
}

/// Update subscription parameters handed to the platform location client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub interval_ms: u64,
    pub fastest_interval_ms: u64,
    pub priority: LocationPriority,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            interval_ms: duration_ms(LOCATION_UPDATE_INTERVAL),
            fastest_interval_ms: duration_ms(LOCATION_FASTEST_INTERVAL),
            priority: LocationPriority::HighAccuracy,
        }
    }
}

fn duration_ms(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Opaque token the platform hands out with an unsatisfied-settings failure.
/// The core never inspects it; it is passed back to the resolution dialog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionHandle(pub String);

impl ResolutionHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub accuracy_m: Option<f32>,
}

impl LocationFix {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            accuracy_m: None,
        }
    }

    #[must_use]
    pub const fn with_accuracy(mut self, accuracy_m: f32) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum LocationOperation {
    LastKnown,
    RequestUpdates(LocationRequest),
    RemoveUpdates,
    CheckSettings(LocationRequest),
}

impl Operation for LocationOperation {
    type Output = LocationResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location settings unsatisfied, resolvable via {}", .0.as_str())]
    SettingsResolvable(ResolutionHandle),

    #[error("location error: {message}")]
    Other {
        message: String,
        #[serde(default)]
        platform_code: Option<i32>,
    },
}

impl LocationError {
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            platform_code: None,
        }
    }

    /// Permission and settings failures can be fixed by prompting the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::SettingsResolvable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LocationOutput {
    LastKnown(Option<LocationFix>),
    UpdatesStarted,
    UpdatesRemoved,
    SettingsSatisfied,
}

pub type LocationResult = Result<LocationOutput, LocationError>;

#[derive(Clone)]
pub struct Location<E> {
    context: CapabilityContext<LocationOperation, E>,
}

impl<Ev> Capability<Ev> for Location<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = Location<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Location::new(self.context.map_event(f))
    }
}

impl<E> Location<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, E>) -> Self {
        Self { context }
    }

    pub fn last_known<F>(&self, callback: F)
    where
        F: FnOnce(LocationResult) -> E + Send + 'static,
    {
        self.request(LocationOperation::LastKnown, callback);
    }

    pub fn request_updates<F>(&self, request: LocationRequest, callback: F)
    where
        F: FnOnce(LocationResult) -> E + Send + 'static,
    {
        self.request(LocationOperation::RequestUpdates(request), callback);
    }

    pub fn remove_updates<F>(&self, callback: F)
    where
        F: FnOnce(LocationResult) -> E + Send + 'static,
    {
        self.request(LocationOperation::RemoveUpdates, callback);
    }

    pub fn check_settings<F>(&self, request: LocationRequest, callback: F)
    where
        F: FnOnce(LocationResult) -> E + Send + 'static,
    {
        self.request(LocationOperation::CheckSettings(request), callback);
    }

    fn request<F>(&self, operation: LocationOperation, callback: F)
    where
        F: FnOnce(LocationResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}
