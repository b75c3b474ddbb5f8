//! Fake platform services for controller tests.

use std::sync::Mutex;

use super::{GeocodeQuery, PlaceFinderDelegate};
use crate::location::{AuthorizationStatus, LocationProvider};
use crate::models::{Coordinate, Place, Placemark};
use crate::services::{
    Directions, DirectionsRequest, Geocoder, LocalSearch, MapItem, Route, SearchRequest,
    ServiceError,
};

#[derive(Default)]
pub struct FakeGeocoder {
    pub placemarks: Vec<Placemark>,
    pub fail: bool,
    pub calls: Mutex<Vec<GeocodeQuery>>,
}

impl FakeGeocoder {
    pub fn returning(placemarks: Vec<Placemark>) -> Self {
        Self {
            placemarks,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(&self, query: GeocodeQuery) -> Result<Vec<Placemark>, ServiceError> {
        self.calls.lock().unwrap().push(query);
        if self.fail {
            Err(ServiceError::Unavailable("geocoder offline".to_string()))
        } else {
            Ok(self.placemarks.clone())
        }
    }
}

impl Geocoder for FakeGeocoder {
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<Placemark>, ServiceError> {
        self.answer(GeocodeQuery::Reverse(coordinate))
    }

    async fn geocode_address(&self, address: &str) -> Result<Vec<Placemark>, ServiceError> {
        self.answer(GeocodeQuery::Forward(address.to_string()))
    }
}

#[derive(Default)]
pub struct FakeSearch {
    pub items: Vec<MapItem>,
    pub calls: Mutex<Vec<SearchRequest>>,
}

impl LocalSearch for FakeSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<MapItem>, ServiceError> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(self.items.clone())
    }
}

#[derive(Default)]
pub struct FakeDirections {
    pub routes: Vec<Route>,
    pub fail: bool,
    pub calls: Mutex<Vec<DirectionsRequest>>,
}

impl FakeDirections {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Directions for FakeDirections {
    async fn calculate(&self, request: &DirectionsRequest) -> Result<Vec<Route>, ServiceError> {
        self.calls.lock().unwrap().push(*request);
        if self.fail {
            Err(ServiceError::Unavailable("router offline".to_string()))
        } else {
            Ok(self.routes.clone())
        }
    }
}

pub struct FakeLocation {
    pub enabled: bool,
    pub status: AuthorizationStatus,
    pub location: Option<Coordinate>,
    pub permission_requests: usize,
    pub updating: bool,
    pub settings_opened: usize,
}

impl FakeLocation {
    pub fn with_status(status: AuthorizationStatus) -> Self {
        Self {
            enabled: true,
            status,
            location: Some(Coordinate::new(-23.5505, -46.6333)),
            permission_requests: 0,
            updating: false,
            settings_opened: 0,
        }
    }
}

impl LocationProvider for FakeLocation {
    fn services_enabled(&self) -> bool {
        self.enabled
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn request_when_in_use_authorization(&mut self) {
        self.permission_requests += 1;
    }

    fn start_updating_location(&mut self) {
        self.updating = true;
    }

    fn location(&self) -> Option<Coordinate> {
        self.location
    }

    fn open_settings(&mut self) {
        self.settings_opened += 1;
    }
}

#[derive(Default)]
pub struct RecordingDelegate {
    pub added: Vec<Place>,
}

impl PlaceFinderDelegate for RecordingDelegate {
    fn notify_place_added(&mut self, place: Place) {
        self.added.push(place);
    }
}

pub fn placemark(name: &str, lat: f64, lon: f64) -> Placemark {
    Placemark {
        name: Some(name.to_string()),
        city: Some("São Paulo".to_string()),
        state: Some("SP".to_string()),
        country: Some("Brazil".to_string()),
        location: Some(Coordinate::new(lat, lon)),
        ..Default::default()
    }
}

pub fn map_item(name: &str, lat: f64, lon: f64) -> MapItem {
    MapItem {
        coordinate: Coordinate::new(lat, lon),
        name: Some(name.to_string()),
        phone_number: None,
        placemark: placemark(name, lat, lon),
    }
}
