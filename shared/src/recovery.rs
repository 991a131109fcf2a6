//! Turning location errors into a single user prompt, then resuming.
//!
//! A flow is built with the permission it asks for and the value to hand
//! back once the user fixes the problem. Every prompt is one-shot: a denial
//! or cancellation ends the attempt, and nothing is retried until the user
//! triggers the action again.

use tracing::{debug, info, warn};

use crate::capabilities::{
    LocationError, PermissionKind, PermissionOutput, PermissionResult, Permissions,
    ResolutionHandle,
};
use crate::event::Event;
use crate::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecoveryState {
    #[default]
    Idle,
    AwaitingPermission,
    AwaitingSettingsResolution(ResolutionHandle),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryPrompt {
    Permission(PermissionKind),
    Settings(ResolutionHandle),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryOutcome<R> {
    /// The user fixed the problem; continue with the resumption value.
    Resume(R),
    /// The user declined; the error stays visible.
    GaveUp(AppError),
    /// No prompt was outstanding.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct PermissionRecoveryFlow<R> {
    capability: PermissionKind,
    resume: R,
    state: RecoveryState,
}

impl<R: Clone> PermissionRecoveryFlow<R> {
    #[must_use]
    pub fn new(capability: PermissionKind, resume: R) -> Self {
        Self {
            capability,
            resume,
            state: RecoveryState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &RecoveryState {
        &self.state
    }

    #[must_use]
    pub fn is_prompting(&self) -> bool {
        self.state != RecoveryState::Idle
    }

    /// Abandons any outstanding prompt; a late result is then ignored.
    pub fn reset(&mut self) {
        if self.is_prompting() {
            debug!(state = ?self.state, "dropping outstanding recovery prompt");
        }
        self.state = RecoveryState::Idle;
    }

    /// Decides which prompt, if any, an error calls for.
    pub fn plan(&mut self, error: &LocationError) -> Option<RecoveryPrompt> {
        if self.is_prompting() {
            debug!(state = ?self.state, "recovery prompt already outstanding");
            return None;
        }

        match error {
            LocationError::PermissionDenied => {
                self.state = RecoveryState::AwaitingPermission;
                Some(RecoveryPrompt::Permission(self.capability))
            }
            LocationError::SettingsResolvable(handle) => {
                self.state = RecoveryState::AwaitingSettingsResolution(handle.clone());
                Some(RecoveryPrompt::Settings(handle.clone()))
            }
            LocationError::Other { .. } => {
                warn!(error = %error, "location error has no recovery path");
                None
            }
        }
    }

    /// Issues the prompt for `error`. Returns whether one was shown.
    pub fn handle_error(&mut self, error: &LocationError, permissions: &Permissions<Event>) -> bool {
        match self.plan(error) {
            Some(RecoveryPrompt::Permission(kind)) => {
                info!(permission = ?kind, "requesting runtime permission");
                permissions.request(kind, Event::LocationPermissionResult);
                true
            }
            Some(RecoveryPrompt::Settings(handle)) => {
                info!(handle = handle.as_str(), "starting settings resolution");
                permissions.resolve_settings(handle, Event::SettingsResolutionResult);
                true
            }
            None => false,
        }
    }

    pub fn on_permission_result(&mut self, result: PermissionResult) -> RecoveryOutcome<R> {
        if self.state != RecoveryState::AwaitingPermission {
            warn!("permission result without an outstanding request");
            return RecoveryOutcome::Ignored;
        }
        self.state = RecoveryState::Idle;

        match result {
            Ok(PermissionOutput::Granted) => {
                info!(permission = ?self.capability, "permission granted");
                RecoveryOutcome::Resume(self.resume.clone())
            }
            Ok(other) => {
                info!(permission = ?self.capability, output = ?other, "permission not granted");
                RecoveryOutcome::GaveUp(LocationError::PermissionDenied.into())
            }
            Err(e) => {
                warn!(error = %e, "permission prompt failed");
                RecoveryOutcome::GaveUp(
                    AppError::from(LocationError::PermissionDenied).with_internal(e.to_string()),
                )
            }
        }
    }

    pub fn on_settings_resolution(&mut self, result: PermissionResult) -> RecoveryOutcome<R> {
        let handle = match &self.state {
            RecoveryState::AwaitingSettingsResolution(handle) => handle.clone(),
            _ => {
                warn!("settings resolution result without an outstanding request");
                return RecoveryOutcome::Ignored;
            }
        };
        self.state = RecoveryState::Idle;

        let unresolved = AppError::from(LocationError::SettingsResolvable(handle));
        match result {
            Ok(PermissionOutput::SettingsApproved) => {
                info!("location settings approved");
                RecoveryOutcome::Resume(self.resume.clone())
            }
            Ok(other) => {
                info!(output = ?other, "location settings not approved");
                RecoveryOutcome::GaveUp(unresolved)
            }
            Err(e) => {
                warn!(error = %e, "settings resolution failed");
                RecoveryOutcome::GaveUp(unresolved.with_internal(e.to_string()))
            }
        }
    }
}
