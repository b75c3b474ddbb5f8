//! Geocoding, local search and directions services.
//!
//! Controllers only see the traits below; `pelias` and `osrm` provide HTTP
//! implementations against a cypress/Pelias geocoder and an OSRM router.

mod osrm;
mod pelias;

use std::future::Future;
use std::time::Duration;

use geo_types::LineString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::Region;
use crate::models::{Coordinate, Placemark};

pub use osrm::OsrmClient;
pub use pelias::PeliasClient;

/// Errors returned by the backing services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid service URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Forward and reverse geocoding
pub trait Geocoder: Send + Sync {
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<Vec<Placemark>, ServiceError>> + Send;

    fn geocode_address(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Vec<Placemark>, ServiceError>> + Send;
}

/// Natural-language query scoped to a map region
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub region: Region,
}

/// One local search hit
#[derive(Debug, Clone, PartialEq)]
pub struct MapItem {
    pub coordinate: Coordinate,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub placemark: Placemark,
}

pub trait LocalSearch: Send + Sync {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<MapItem>, ServiceError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionsRequest {
    pub source: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
}

/// Candidate route between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub polyline: LineString<f64>,
    pub distance_m: f64,
    pub expected_travel_time: Duration,
}

pub trait Directions: Send + Sync {
    /// Candidate routes, best first
    fn calculate(
        &self,
        request: &DirectionsRequest,
    ) -> impl Future<Output = Result<Vec<Route>, ServiceError>> + Send;
}
