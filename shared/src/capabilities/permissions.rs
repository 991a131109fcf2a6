use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::location::ResolutionHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    FineLocation,
    PostNotifications,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum PermissionOperation {
    Request(PermissionKind),
    ResolveSettings(ResolutionHandle),
}

impl Operation for PermissionOperation {
    type Output = PermissionResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PermissionError {
    #[error("permission prompt unavailable: {0}")]
    Unavailable(String),

    #[error("resolution handle {0} is no longer valid")]
    StaleResolution(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PermissionOutput {
    Granted,
    Denied,
    SettingsApproved,
    SettingsCancelled,
}

impl PermissionOutput {
    /// Grant or approval; anything else leaves the caller where it was.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Granted | Self::SettingsApproved)
    }
}

pub type PermissionResult = Result<PermissionOutput, PermissionError>;

#[derive(Clone)]
pub struct Permissions<E> {
    context: CapabilityContext<PermissionOperation, E>,
}

impl<Ev> Capability<Ev> for Permissions<Ev> {
    type Operation = PermissionOperation;
    type MappedSelf<MappedEv> = Permissions<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Permissions::new(self.context.map_event(f))
    }
}

impl<E> Permissions<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<PermissionOperation, E>) -> Self {
        Self { context }
    }

    pub fn request<F>(&self, kind: PermissionKind, callback: F)
    where
        F: FnOnce(PermissionResult) -> E + Send + 'static,
    {
        self.send(PermissionOperation::Request(kind), callback);
    }

    pub fn resolve_settings<F>(&self, handle: ResolutionHandle, callback: F)
    where
        F: FnOnce(PermissionResult) -> E + Send + 'static,
    {
        self.send(PermissionOperation::ResolveSettings(handle), callback);
    }

    fn send<F>(&self, operation: PermissionOperation, callback: F)
    where
        F: FnOnce(PermissionResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}
