//! The map of saved places: annotations, location permission, local search
//! and directions to the selected annotation.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{MapMessage, PlaceFinderDelegate};
use crate::location::{self, AuthorizationEffect, AuthorizationStatus, LocationProvider};
use crate::map::{Camera, MapSurface, OverlayLevel, Region, RouteOverlay, StrokeStyle};
use crate::models::{
    format_address, Annotation, AnnotationId, AnnotationKind, Coordinate, Place,
};
use crate::request::{RequestOrdering, RequestSequencer, RequestToken};
use crate::services::{
    Directions, DirectionsRequest, LocalSearch, MapItem, Route, SearchRequest, ServiceError,
    TravelMode,
};

const COLLECTION_TITLE: &str = "Meus lugares";

#[derive(Debug, Clone, Copy)]
pub struct MapSettings {
    pub camera_pitch: f64,
    pub camera_altitude: f64,
    /// Growth factor applied when fitting the viewport to annotations
    pub viewport_padding: f64,
    pub travel_mode: TravelMode,
    pub ordering: RequestOrdering,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            camera_pitch: 80.0,
            camera_altitude: 100.0,
            viewport_padding: 1.2,
            travel_mode: TravelMode::default(),
            ordering: RequestOrdering::default(),
        }
    }
}

/// Why a route could not be shown
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no place selected")]
    NoSelection,
    #[error("location permission is {0:?}")]
    Unauthorized(AuthorizationStatus),
    #[error("current location unknown")]
    LocationUnavailable,
    #[error("no route found")]
    NoRoute,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl RouteError {
    /// Alert shown for this failure
    pub fn message(&self) -> MapMessage {
        match self {
            RouteError::NoSelection | RouteError::Unauthorized(_) => {
                MapMessage::AuthorizationWarning
            }
            RouteError::LocationUnavailable | RouteError::NoRoute | RouteError::Service(_) => {
                MapMessage::RouteError
            }
        }
    }
}

/// Name and address of the selected annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    pub name: String,
    pub address: String,
}

/// A search issued by `begin_search`
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSearch {
    pub token: RequestToken,
    pub request: SearchRequest,
}

/// A directions call issued by `begin_route`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRoute {
    pub token: RequestToken,
    pub request: DirectionsRequest,
}

/// Controller of the map screen.
///
/// Owns the map surface; everything else reads it through accessors.
/// Asynchronous work comes in two halves (`begin_*` issues, `complete_*`
/// applies) so hosts can drive completions in whatever order they arrive;
/// `search_places` and `show_route` run both halves with the configured
/// services.
pub struct MapController<L, S, D> {
    location: L,
    search: S,
    directions: D,
    settings: MapSettings,
    title: String,
    surface: MapSurface,
    places: Vec<Place>,
    points_of_interest: Vec<AnnotationId>,
    selected: Option<AnnotationId>,
    info: Option<InfoPanel>,
    authorization: AuthorizationStatus,
    tracking_control_visible: bool,
    updating_location: bool,
    search_field_visible: bool,
    searching: bool,
    message: Option<MapMessage>,
    route: Option<Route>,
    search_requests: RequestSequencer,
    route_requests: RequestSequencer,
}

impl<L, S, D> MapController<L, S, D>
where
    L: LocationProvider,
    S: LocalSearch,
    D: Directions,
{
    /// Set up the screen for `places`: one annotation each, viewport fitted
    /// to all of them, then the location permission check.
    pub fn new(
        places: Vec<Place>,
        location: L,
        search: S,
        directions: D,
        settings: MapSettings,
    ) -> Self {
        let title = match places.as_slice() {
            [only] => only.name().to_string(),
            _ => COLLECTION_TITLE.to_string(),
        };

        let mut controller = Self {
            location,
            search,
            directions,
            settings,
            title,
            surface: MapSurface::new(),
            places: Vec::new(),
            points_of_interest: Vec::new(),
            selected: None,
            info: None,
            authorization: AuthorizationStatus::NotDetermined,
            tracking_control_visible: false,
            updating_location: false,
            search_field_visible: false,
            searching: false,
            message: None,
            route: None,
            search_requests: RequestSequencer::new(settings.ordering),
            route_requests: RequestSequencer::new(settings.ordering),
        };

        for place in places {
            controller.push_place(place);
        }
        controller.show_places();
        controller.check_authorization();
        controller
    }

    fn push_place(&mut self, place: Place) {
        self.surface.add_annotation(Annotation::for_place(&place));
        self.places.push(place);
    }

    /// Add a confirmed place and refit the viewport. Places already on the
    /// map (same coordinate) are ignored.
    pub fn add_place(&mut self, place: Place) -> bool {
        if self.places.contains(&place) {
            debug!("Place at {} already on the map", place.coordinate());
            return false;
        }
        info!("Adding place {}", place.name());
        self.push_place(place);
        self.show_places();
        true
    }

    /// Fit the viewport to every annotation on the map
    pub fn show_places(&mut self) {
        let ids: Vec<AnnotationId> = self.surface.annotations().map(|(id, _)| id).collect();
        self.surface
            .show_annotations(&ids, self.settings.viewport_padding);
    }

    fn check_authorization(&mut self) {
        if !self.location.services_enabled() {
            debug!("Location services disabled");
            return;
        }
        self.authorization = self.location.authorization_status();
        let effects = location::effects_for(self.authorization);
        self.apply_effects(&effects);
    }

    /// Platform callback: the user answered the permission dialog or changed
    /// the permission in the settings.
    pub fn on_authorization_changed(&mut self, status: AuthorizationStatus) {
        let effects = location::transition(self.authorization, status);
        info!(
            "Location authorization {:?} -> {:?}",
            self.authorization, status
        );
        self.authorization = status;
        self.apply_effects(&effects);
    }

    fn apply_effects(&mut self, effects: &[AuthorizationEffect]) {
        for effect in effects {
            match effect {
                AuthorizationEffect::ShowUserTrackingControl => {
                    self.tracking_control_visible = true;
                    self.surface.set_shows_user_location(true);
                }
                AuthorizationEffect::StartLocationUpdates => {
                    self.location.start_updating_location();
                    self.updating_location = true;
                }
                AuthorizationEffect::ShowSettingsWarning => {
                    self.message = Some(MapMessage::AuthorizationWarning);
                }
                AuthorizationEffect::RequestWhenInUseAuthorization => {
                    self.location.request_when_in_use_authorization();
                }
            }
        }
    }

    /// Platform callback with fresh device locations, oldest first
    pub fn on_location_updated(&mut self, locations: &[Coordinate]) {
        if let Some(latest) = locations.last() {
            self.surface.set_user_location(*latest);
        }
    }

    /// Tap on an annotation: select it, fly the camera to it and show the
    /// info panel. Returns false for unknown ids.
    pub fn select_annotation(&mut self, id: AnnotationId) -> bool {
        let Some(annotation) = self.surface.annotation(id) else {
            return false;
        };

        let camera = Camera {
            center: annotation.coordinate,
            pitch: self.settings.camera_pitch,
            altitude: self.settings.camera_altitude,
        };
        self.info = Some(InfoPanel {
            name: annotation.title.clone().unwrap_or_default(),
            address: annotation.address.clone().unwrap_or_default(),
        });
        self.surface.set_camera(camera);
        self.selected = Some(id);
        true
    }

    pub fn deselect_annotation(&mut self) {
        self.selected = None;
        self.info = None;
    }

    /// Show or hide the search field
    pub fn toggle_search_field(&mut self) {
        self.search_field_visible = !self.search_field_visible;
    }

    /// Issue a local search around the visible region
    pub fn begin_search(&mut self, query: &str) -> PendingSearch {
        self.search_field_visible = false;
        self.searching = true;

        let region = self
            .surface
            .region()
            .unwrap_or_else(|| Region::new(Coordinate::new(0.0, 0.0), 180.0, 360.0));
        let token = self.search_requests.issue();
        info!("Searching '{}' ({})", query, token);

        PendingSearch {
            token,
            request: SearchRequest {
                query: query.to_string(),
                region,
            },
        }
    }

    /// Apply search results: previous points of interest are replaced by the
    /// new ones and the viewport is fitted to them.
    pub fn complete_search(
        &mut self,
        pending: &PendingSearch,
        result: Result<Vec<MapItem>, ServiceError>,
    ) {
        if !self.search_requests.accept(pending.token) {
            debug!("Discarding stale search result ({})", pending.token);
            return;
        }

        match result {
            Ok(items) => {
                let stale = std::mem::take(&mut self.points_of_interest);
                if self.selected.is_some_and(|id| stale.contains(&id)) {
                    self.deselect_annotation();
                }
                self.surface.remove_annotations(&stale);

                let annotations = items.into_iter().map(|item| Annotation {
                    title: item.name,
                    subtitle: item.phone_number,
                    address: Some(format_address(&item.placemark)),
                    ..Annotation::new(item.coordinate, AnnotationKind::PointOfInterest)
                });
                self.points_of_interest = self.surface.add_annotations(annotations);
                self.surface
                    .show_annotations(&self.points_of_interest, self.settings.viewport_padding);
                debug!(
                    "Search {} produced {} points of interest",
                    pending.token,
                    self.points_of_interest.len()
                );
            }
            Err(e) => warn!("Search failed ({}): {}", pending.token, e),
        }

        self.searching = false;
    }

    /// Search and apply the results in one go
    pub async fn search_places(&mut self, query: &str) {
        let pending = self.begin_search(query);
        let result = self.search.search(&pending.request).await;
        self.complete_search(&pending, result);
    }

    /// Issue a directions request from the device to the selected annotation.
    ///
    /// Requires a selection, location permission and a known device location.
    /// On failure the matching alert is raised and nothing is requested.
    pub fn begin_route(&mut self) -> Result<PendingRoute, RouteError> {
        let result = self.route_preconditions().map(|request| PendingRoute {
            token: self.route_requests.issue(),
            request,
        });
        match &result {
            Ok(pending) => info!(
                "Requesting directions to {} ({})",
                pending.request.destination, pending.token
            ),
            Err(e) => {
                warn!("Cannot request directions: {}", e);
                self.message = Some(e.message());
            }
        }
        result
    }

    fn route_preconditions(&self) -> Result<DirectionsRequest, RouteError> {
        let destination = self
            .selected
            .and_then(|id| self.surface.annotation(id))
            .map(|a| a.coordinate)
            .ok_or(RouteError::NoSelection)?;
        if !self.authorization.is_authorized() {
            return Err(RouteError::Unauthorized(self.authorization));
        }
        let source = self
            .location
            .location()
            .or(self.surface.user_location())
            .ok_or(RouteError::LocationUnavailable)?;

        Ok(DirectionsRequest {
            source,
            destination,
            mode: self.settings.travel_mode,
        })
    }

    /// Draw the first route and fit the viewport to its two ends. Stale
    /// completions are ignored.
    pub fn complete_route(
        &mut self,
        pending: &PendingRoute,
        result: Result<Vec<Route>, ServiceError>,
    ) -> Result<(), RouteError> {
        if !self.route_requests.accept(pending.token) {
            debug!("Discarding stale directions result ({})", pending.token);
            return Ok(());
        }

        let route = result
            .map_err(RouteError::from)
            .and_then(|routes| routes.into_iter().next().ok_or(RouteError::NoRoute));
        let route = match route {
            Ok(route) => route,
            Err(e) => {
                warn!("Directions failed ({}): {}", pending.token, e);
                self.message = Some(e.message());
                return Err(e);
            }
        };

        self.surface.remove_overlays();
        self.surface.add_overlay(RouteOverlay {
            polyline: route.polyline.clone(),
            level: OverlayLevel::AboveRoads,
            style: StrokeStyle::default(),
        });
        self.route = Some(route);

        self.surface.show_coordinates(
            &[pending.request.source, pending.request.destination],
            self.settings.viewport_padding,
        );
        Ok(())
    }

    /// Request directions and draw the result in one go
    pub async fn show_route(&mut self) -> Result<(), RouteError> {
        let pending = self.begin_route()?;
        let result = self.directions.calculate(&pending.request).await;
        self.complete_route(&pending, result)
    }

    /// Dismiss the current alert. Accepting the authorization warning opens
    /// the system settings.
    pub fn dismiss_message(&mut self, open_settings: bool) {
        if let Some(message) = self.message.take() {
            if open_settings && message == MapMessage::AuthorizationWarning {
                self.location.open_settings();
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    pub fn points_of_interest(&self) -> impl Iterator<Item = &Annotation> {
        self.points_of_interest
            .iter()
            .filter_map(|id| self.surface.annotation(*id))
    }

    /// Route currently drawn on the map
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn info_panel(&self) -> Option<&InfoPanel> {
        self.info.as_ref()
    }

    pub fn authorization(&self) -> AuthorizationStatus {
        self.authorization
    }

    pub fn is_tracking_control_visible(&self) -> bool {
        self.tracking_control_visible
    }

    pub fn is_updating_location(&self) -> bool {
        self.updating_location
    }

    pub fn is_search_field_visible(&self) -> bool {
        self.search_field_visible
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn message(&self) -> Option<MapMessage> {
        self.message
    }

    pub fn location_provider(&self) -> &L {
        &self.location
    }

    pub fn search_service(&self) -> &S {
        &self.search
    }

    pub fn directions_service(&self) -> &D {
        &self.directions
    }
}

impl<L, S, D> PlaceFinderDelegate for MapController<L, S, D>
where
    L: LocationProvider,
    S: LocalSearch,
    D: Directions,
{
    fn notify_place_added(&mut self, place: Place) {
        self.add_place(place);
    }
}
