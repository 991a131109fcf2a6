use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Circular region as the platform geofencing client expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub request_id: String,
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
    pub expiration_ms: u64,
    pub on_enter: bool,
    pub on_exit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitialTrigger {
    #[default]
    Enter,
    Exit,
    Dwell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofencingRequest {
    pub initial_trigger: InitialTrigger,
    pub regions: Vec<RegionSpec>,
}

/// Stable identifier of the receiver transitions are delivered to.
/// Every add and remove is scoped to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackTarget(pub String);

impl CallbackTarget {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum GeofencingOperation {
    AddGeofences {
        target: CallbackTarget,
        request: GeofencingRequest,
    },
    RemoveGeofences {
        target: CallbackTarget,
    },
}

impl Operation for GeofencingOperation {
    type Output = GeofencingResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeofencingError {
    #[error("geofencing not available on this device")]
    NotAvailable,

    #[error("too many geofences registered")]
    TooManyGeofences,

    #[error("location permission missing for geofencing")]
    PermissionDenied,

    #[error("geofencing failed with platform code {code}: {message}")]
    Platform { code: i32, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GeofencingOutput {
    Added { count: usize },
    Removed,
}

pub type GeofencingResult = Result<GeofencingOutput, GeofencingError>;

#[derive(Clone)]
pub struct Geofencing<E> {
    context: CapabilityContext<GeofencingOperation, E>,
}

impl<Ev> Capability<Ev> for Geofencing<Ev> {
    type Operation = GeofencingOperation;
    type MappedSelf<MappedEv> = Geofencing<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Geofencing::new(self.context.map_event(f))
    }
}

impl<E> Geofencing<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<GeofencingOperation, E>) -> Self {
        Self { context }
    }

    pub fn add_geofences<F>(&self, target: CallbackTarget, request: GeofencingRequest, callback: F)
    where
        F: FnOnce(GeofencingResult) -> E + Send + 'static,
    {
        self.request(GeofencingOperation::AddGeofences { target, request }, callback);
    }

    pub fn remove_geofences<F>(&self, target: CallbackTarget, callback: F)
    where
        F: FnOnce(GeofencingResult) -> E + Send + 'static,
    {
        self.request(GeofencingOperation::RemoveGeofences { target }, callback);
    }

    fn request<F>(&self, operation: GeofencingOperation, callback: F)
    where
        F: FnOnce(GeofencingResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_trigger_defaults_to_enter() {
        assert_eq!(InitialTrigger::default(), InitialTrigger::Enter);
    }

    #[test]
    fn test_remove_operation_serialization() {
        let op = GeofencingOperation::RemoveGeofences {
            target: CallbackTarget::new("t"),
        };
        let json = serde_json::to_string(&op).unwrap();
        let deserialized: GeofencingOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, deserialized);
    }
}
