mod browser;
mod geofencing;
mod location;
mod notifications;
mod permissions;

pub use self::browser::{Browser, BrowserError, BrowserOperation, BrowserResult, ExternalUrl};
pub use self::geofencing::{
    CallbackTarget, Geofencing, GeofencingError, GeofencingOperation, GeofencingOutput,
    GeofencingRequest, GeofencingResult, InitialTrigger, RegionSpec,
};
pub use self::location::{
    Location, LocationError, LocationFix, LocationOperation, LocationOutput, LocationPriority,
    LocationRequest, LocationResult, ResolutionHandle,
};
pub use self::notifications::{
    Importance, NotificationChannel, NotificationError, NotificationOperation, NotificationOutput,
    NotificationPayload, NotificationResult, Notifications, TapAction, TargetScreen,
};
pub use self::permissions::{
    PermissionError, PermissionKind, PermissionOperation, PermissionOutput, PermissionResult,
    Permissions,
};

pub use crux_core::render::Render;

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "crate::App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub location: Location<Event>,
    pub geofencing: Geofencing<Event>,
    pub notifications: Notifications<Event>,
    pub permissions: Permissions<Event>,
    pub browser: Browser<Event>,
}
