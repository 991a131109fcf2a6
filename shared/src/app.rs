use tracing::{debug, error, info, warn};

use crux_core::App as CruxApp;

use crate::capabilities::{
    BrowserResult, Capabilities, ExternalUrl, LocationError, LocationResult, NotificationOutput,
    NotificationResult, PermissionKind, PermissionOutput, PermissionResult,
};
use crate::event::Event;
use crate::geofence::{GeofenceController, GeofencingEvent};
use crate::location::LocationData;
use crate::map::MapUiState;
use crate::model::{CameraPosition, Model, Screen};
use crate::recovery::RecoveryOutcome;
use crate::view::{LocationView, MapView, UserFacingError, ViewModel};
use crate::{AppError, PermissionState, ValidatedCoordinate};

#[derive(Default)]
pub struct App;

impl App {
    fn dispatch(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::Noop => {}

            Event::ConfigLoaded(config) => {
                match config.validate() {
                    Ok(()) => {
                        info!("config applied");
                        model.apply_config(config);
                    }
                    Err(e) => {
                        error!(error = %e, "rejecting config");
                        model.set_error(AppError::from(e).with_context("event", "config_loaded"));
                    }
                }
                caps.render.render();
            }

            Event::AppStarted => {
                if !model.channel_created {
                    caps.notifications.create_channel(
                        model.config.notification_channel.clone(),
                        Event::NotificationChannelCreated,
                    );
                }
                if model.notification_permission_state.is_unknown() {
                    model.notification_permission_state = PermissionState::Requesting;
                    caps.permissions.request(
                        PermissionKind::PostNotifications,
                        Event::NotificationPermissionResult,
                    );
                }
                caps.render.render();
            }

            Event::ScreenStarted { screen } => {
                info!(?screen, "screen started");
                model.screen = Some(screen);
                model.location.activate(&caps.location);
                caps.render.render();
            }

            Event::ScreenStopped { screen } => {
                // Another screen may already have taken over the subscription.
                if model.screen != Some(screen) {
                    debug!(?screen, current = ?model.screen, "stopped screen is not current");
                    return;
                }
                info!(?screen, "screen stopped");
                model.location.deactivate(&caps.location);
                model.recovery.reset();
                model.screen = None;
                caps.render.render();
            }

            Event::ScreenDestroyed { screen } => {
                info!(?screen, "screen destroyed");
                if screen == Screen::Map {
                    model.reset_map_instance();
                }
            }

            Event::MapReady => {
                model.map_ready = true;
                if let Some(LocationData::Fix(fix)) = model.location.latest() {
                    Self::handle_location_data(LocationData::Fix(fix), model, caps);
                }
                caps.render.render();
            }

            Event::StartLocationRequest => {
                model.location.start_location_request(&caps.location);
            }

            Event::LoadPoisRequested { lat, lon } => {
                Self::load_pois(lat, lon, model, caps);
            }

            Event::GeneratePoisRequested => {
                let Some(user) = model.user_marker.clone() else {
                    warn!("no user position yet, cannot regenerate pois");
                    return;
                };
                model.geofences.remove_all_geofences(&caps.geofencing);
                model.clear_markers();
                Self::load_pois(user.lat, user.lon, model, caps);
            }

            Event::PoiInfoWindowTapped { title } => {
                Self::show_poi_detail(&title, model, caps);
            }

            Event::DismissError => {
                model.clear_error();
                model.map_toast = None;
                caps.render.render();
            }

            Event::LocationFixReceived(fix) => {
                if let Some(data) = model.location.on_fix(fix) {
                    Self::handle_location_data(data, model, caps);
                    caps.render.render();
                }
            }

            Event::GeofenceEventReceived(event) => {
                Self::handle_geofence_event(&event, model, caps);
            }

            Event::LastKnownLocationReceived(result) => {
                let data = model.location.on_last_known(result);
                Self::publish_location(data, model, caps);
            }

            Event::LocationUpdatesRequested(result) => {
                let data = model.location.on_updates_requested(result);
                Self::publish_location(data, model, caps);
            }

            Event::LocationSettingsChecked(result) => {
                let data = model.location.on_settings_checked(result, &caps.location);
                Self::publish_location(data, model, caps);
            }

            Event::LocationUpdatesRemoved(result) => Self::log_updates_removed(&result),

            Event::LocationPermissionResult(result) => {
                let outcome = model.recovery.on_permission_result(result);
                model.location_permission_state = match &outcome {
                    RecoveryOutcome::Resume(_) => PermissionState::Granted,
                    RecoveryOutcome::GaveUp(_) => PermissionState::Denied,
                    RecoveryOutcome::Ignored => model.location_permission_state,
                };
                self.apply_recovery(outcome, model, caps);
            }

            Event::SettingsResolutionResult(result) => {
                let outcome = model.recovery.on_settings_resolution(result);
                self.apply_recovery(outcome, model, caps);
            }

            Event::NotificationPermissionResult(result) => {
                model.notification_permission_state = Self::permission_state(&result);
                info!(state = ?model.notification_permission_state, "notification permission");
                caps.render.render();
            }

            Event::NotificationChannelCreated(result) => match result {
                Ok(_) => {
                    debug!(id = %model.config.notification_channel.id, "notification channel ready");
                    model.channel_created = true;
                }
                Err(e) => error!(error = %e, "cannot create notification channel"),
            },

            Event::NotificationShown(result) => Self::log_notification(&result),

            Event::GeofencesAdded(result) | Event::GeofencesRemoved(result) => {
                GeofenceController::on_registration_result(&result);
            }

            Event::UrlOpened(result) => Self::log_url_opened(&result),
        }
    }

    fn publish_location(data: Option<LocationData>, model: &mut Model, caps: &Capabilities) {
        if let Some(data) = data {
            Self::handle_location_data(data, model, caps);
            caps.render.render();
        }
    }

    fn handle_location_data(data: LocationData, model: &mut Model, caps: &Capabilities) {
        let fix = match data {
            LocationData::Error(e) => {
                warn!(error = %e, "location error");
                let prompted = model.recovery.handle_error(&e, &caps.permissions);
                if prompted && e == LocationError::PermissionDenied {
                    model.location_permission_state = PermissionState::Requesting;
                }
                model.set_error(e.into());
                return;
            }
            LocationData::Fix(fix) => fix,
        };

        model.clear_location_error();
        model.location_permission_state = PermissionState::Granted;
        let coord = ValidatedCoordinate::new(fix.lat, fix.lon);

        if model.is_on_map() && model.map_ready && model.first_location {
            model.first_location = false;
            if let Ok(center) = coord {
                model.camera = Some(CameraPosition::new(center, model.config.first_fix_zoom));
            }
            Self::load_pois(fix.lat, fix.lon, model, caps);
        }

        match coord {
            Ok(center) => {
                if let Some(marker) = model.user_marker.as_mut() {
                    *marker = marker.moved_to(center);
                }
            }
            Err(e) => warn!(error = %e, "fix outside valid range"),
        }
    }

    fn load_pois(lat: f64, lon: f64, model: &mut Model, caps: &Capabilities) {
        model.map.load_pois(lat, lon);
        model.map_toast = None;

        match model.map.state() {
            MapUiState::Ready { user_poi, pois } => {
                if let Some(user) = user_poi {
                    model.user_marker = Some(user);
                }
                let pois = pois.unwrap_or_default();
                for poi in &pois {
                    if poi.is_titled(&model.config.special_poi_title) {
                        model.geofences.create_geofence(
                            poi,
                            model.config.geofence_radius_m,
                            &model.config.geofence_request_id,
                            &caps.geofencing,
                        );
                    }
                }
                info!(count = pois.len(), "pois ready");
                model.markers = pois;
            }
            MapUiState::Error { message } => {
                warn!(%message, "pois not loaded");
                model.map_toast = Some(format!("Error: {message}"));
            }
            MapUiState::Loading => debug!("pois still loading"),
        }

        caps.render.render();
    }

    fn show_poi_detail(title: &str, model: &Model, caps: &Capabilities) {
        let Some(poi) = model.find_marker(title) else {
            warn!(title, "tapped marker is not on the map");
            return;
        };
        let raw = match poi.detail_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                debug!(title, "poi has no detail url");
                return;
            }
        };
        match ExternalUrl::parse(raw) {
            Ok(url) => caps.browser.open_url(url, Event::UrlOpened),
            Err(e) => warn!(error = %e, title, "ignoring poi detail url"),
        }
    }

    fn handle_geofence_event(event: &GeofencingEvent, model: &Model, caps: &Capabilities) {
        if let Some(payload) = model.geofence_handler.handle(event) {
            info!(title = %payload.title, "showing geofence notification");
            caps.notifications.show(payload, Event::NotificationShown);
        }
    }

    fn apply_recovery(&self, outcome: RecoveryOutcome<Event>, model: &mut Model, caps: &Capabilities) {
        match outcome {
            RecoveryOutcome::Resume(next) => {
                model.clear_location_error();
                self.dispatch(next, model, caps);
            }
            RecoveryOutcome::GaveUp(err) => {
                info!(code = err.code(), "location recovery abandoned");
                model.set_error(err);
            }
            RecoveryOutcome::Ignored => return,
        }
        caps.render.render();
    }

    fn permission_state(result: &PermissionResult) -> PermissionState {
        match result {
            Ok(PermissionOutput::Granted) => PermissionState::Granted,
            Ok(_) => PermissionState::Denied,
            Err(e) => {
                warn!(error = %e, "permission request failed");
                PermissionState::Denied
            }
        }
    }

    fn log_updates_removed(result: &LocationResult) {
        match result {
            Ok(_) => debug!("location updates removed"),
            Err(e) => warn!(error = %e, "cannot remove location updates"),
        }
    }

    fn log_notification(result: &NotificationResult) {
        match result {
            Ok(NotificationOutput::Shown { id }) => debug!(id, "notification shown"),
            Ok(other) => debug!(output = ?other, "notification output"),
            Err(e) => error!(error = %e, "cannot show notification"),
        }
    }

    fn log_url_opened(result: &BrowserResult) {
        if let Err(e) = result {
            warn!(error = %e, "cannot open url");
        }
    }
}

impl CruxApp for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        debug!(event = event_name, "update");
        if event.is_user_initiated() {
            info!(event = event_name, "user action");
        }

        self.dispatch(event, model, caps);
    }

    fn view(&self, model: &Model) -> ViewModel {
        let latest = model.location.latest();
        ViewModel {
            screen: model.screen,
            map: MapView::build(
                model.is_on_map() && model.map.state().is_loading(),
                model.map_toast.clone(),
                model.camera,
                model.user_marker.as_ref(),
                &model.markers,
            ),
            location: LocationView::from_data(latest.as_ref()),
            location_permission: model.location_permission_state,
            notification_permission: model.notification_permission_state,
            error: model.active_error.as_ref().map(UserFacingError::from),
            geofence_count: model.geofences.regions().len(),
        }
    }
}
