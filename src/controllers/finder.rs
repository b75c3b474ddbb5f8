//! The place finder flow: resolve a long-press or a typed address into a
//! single candidate place, confirm it with the user and hand it to the host.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::{FinderError, FinderPrompt};
use crate::map::{MapSurface, Region};
use crate::models::{format_address, Coordinate, Place, Placemark};
use crate::request::{RequestOrdering, RequestSequencer, RequestToken};
use crate::services::{Geocoder, ServiceError};

/// Receives places confirmed in the finder flow
pub trait PlaceFinderDelegate {
    fn notify_place_added(&mut self, place: Place);
}

impl<T: PlaceFinderDelegate + ?Sized> PlaceFinderDelegate for &mut T {
    fn notify_place_added(&mut self, place: Place) {
        (**self).notify_place_added(place);
    }
}

impl PlaceFinderDelegate for UnboundedSender<Place> {
    fn notify_place_added(&mut self, place: Place) {
        if let Err(e) = self.send(place) {
            warn!("Dropping confirmed place, receiver is gone: {}", e.0.name());
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FinderSettings {
    /// Shortest long-press that starts a reverse geocode
    pub min_press_duration: Duration,
    /// Span of the region shown around a found place
    pub region_span_m: f64,
    pub ordering: RequestOrdering,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            min_press_duration: Duration::from_secs(2),
            region_span_m: 3500.0,
            ordering: RequestOrdering::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeQuery {
    Reverse(Coordinate),
    Forward(String),
}

/// A geocode call issued by the finder
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeRequest {
    pub token: RequestToken,
    pub query: GeocodeQuery,
}

/// Modal place finder.
///
/// Requests are split into `handle_long_press`/`submit_address` (issue) and
/// `complete_geocode` (apply); `find_at` and `find_address` run both halves
/// against the configured geocoder.
pub struct PlaceFinder<G, D> {
    geocoder: G,
    delegate: D,
    settings: FinderSettings,
    surface: MapSurface,
    sequencer: RequestSequencer,
    loading: bool,
    prompt: Option<FinderPrompt>,
    candidate: Option<Place>,
    closed: bool,
}

impl<G: Geocoder, D: PlaceFinderDelegate> PlaceFinder<G, D> {
    pub fn new(geocoder: G, delegate: D, settings: FinderSettings) -> Self {
        Self {
            geocoder,
            delegate,
            settings,
            surface: MapSurface::new(),
            sequencer: RequestSequencer::new(settings.ordering),
            loading: false,
            prompt: None,
            candidate: None,
            closed: false,
        }
    }

    /// A press on the finder map held for `held`. Presses shorter than the
    /// configured minimum are ignored.
    pub fn handle_long_press(
        &mut self,
        coordinate: Coordinate,
        held: Duration,
    ) -> Option<GeocodeRequest> {
        if held < self.settings.min_press_duration {
            debug!(
                "Ignoring press of {:?} (minimum {:?})",
                held, self.settings.min_press_duration
            );
            return None;
        }
        self.begin(GeocodeQuery::Reverse(coordinate))
    }

    /// Typed city or address. Empty text is still sent to the geocoder.
    pub fn submit_address(&mut self, text: &str) -> Option<GeocodeRequest> {
        self.begin(GeocodeQuery::Forward(text.to_string()))
    }

    fn begin(&mut self, query: GeocodeQuery) -> Option<GeocodeRequest> {
        if self.closed {
            debug!("Finder is closed, not geocoding {:?}", query);
            return None;
        }
        let token = self.sequencer.issue();
        self.loading = true;
        info!("Geocoding {:?} ({})", query, token);
        Some(GeocodeRequest { token, query })
    }

    /// Run a request against the geocoder
    pub async fn execute(
        &self,
        request: &GeocodeRequest,
    ) -> Result<Vec<Placemark>, ServiceError> {
        match &request.query {
            GeocodeQuery::Reverse(coordinate) => {
                self.geocoder.reverse_geocode(*coordinate).await
            }
            GeocodeQuery::Forward(text) => self.geocoder.geocode_address(text).await,
        }
    }

    /// Apply a geocoder answer. Answers to superseded requests are dropped.
    pub fn complete_geocode(
        &mut self,
        request: &GeocodeRequest,
        result: Result<Vec<Placemark>, ServiceError>,
    ) {
        if !self.sequencer.accept(request.token) {
            debug!("Discarding stale geocode result ({})", request.token);
            return;
        }
        self.loading = false;
        if self.closed {
            debug!("Finder closed, ignoring geocode result ({})", request.token);
            return;
        }

        let placemarks = match result {
            Ok(placemarks) => placemarks,
            Err(e) => {
                warn!("Geocoding failed ({}): {}", request.token, e);
                self.prompt = Some(FinderPrompt::Error(FinderError::Unknown));
                return;
            }
        };

        match placemarks.into_iter().next() {
            Some(placemark) => {
                if !self.save_place(&placemark) {
                    self.prompt = Some(FinderPrompt::Error(FinderError::NotFound));
                }
            }
            None => self.prompt = Some(FinderPrompt::Error(FinderError::NotFound)),
        }
    }

    fn save_place(&mut self, placemark: &Placemark) -> bool {
        let Some(coordinate) = placemark.location else {
            return false;
        };

        let place = Place::new(
            placemark.display_name(),
            coordinate.latitude,
            coordinate.longitude,
            format_address(placemark),
        );
        self.surface.set_region(Region::with_distance(
            coordinate,
            self.settings.region_span_m,
            self.settings.region_span_m,
        ));
        self.prompt = Some(FinderPrompt::Confirmation {
            name: place.name().to_string(),
        });
        self.candidate = Some(place);
        true
    }

    /// Confirm the found place: notify the delegate and close the flow.
    pub fn confirm(&mut self) -> Option<Place> {
        if !matches!(self.prompt, Some(FinderPrompt::Confirmation { .. })) {
            return None;
        }
        self.prompt = None;
        let place = self.candidate.take()?;

        info!("Place confirmed: {}", place.name());
        self.delegate.notify_place_added(place.clone());
        self.closed = true;
        Some(place)
    }

    /// Dismiss the current prompt; the flow stays open.
    pub fn cancel(&mut self) {
        self.prompt = None;
        self.candidate = None;
    }

    /// Leave the flow without adding anything
    pub fn close(&mut self) {
        self.closed = true;
        self.prompt = None;
    }

    /// Long-press and geocode in one go
    pub async fn find_at(
        &mut self,
        coordinate: Coordinate,
        held: Duration,
    ) -> Option<&FinderPrompt> {
        let request = self.handle_long_press(coordinate, held)?;
        let result = self.execute(&request).await;
        self.complete_geocode(&request, result);
        self.prompt.as_ref()
    }

    /// Submit an address and geocode it in one go
    pub async fn find_address(&mut self, text: &str) -> Option<&FinderPrompt> {
        let request = self.submit_address(text)?;
        let result = self.execute(&request).await;
        self.complete_geocode(&request, result);
        self.prompt.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn prompt(&self) -> Option<&FinderPrompt> {
        self.prompt.as_ref()
    }

    pub fn candidate(&self) -> Option<&Place> {
        self.candidate.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }
}
