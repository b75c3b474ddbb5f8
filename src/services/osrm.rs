//! HTTP directions client for the OSRM route service.

use std::time::Duration;

use geo_types::LineString;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{Directions, DirectionsRequest, Route, ServiceError, TravelMode};

const USER_AGENT: &str = "quero-conhecer/0.1";

#[derive(Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
    geometry: LineGeometry,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    /// [lon, lat] pairs
    coordinates: Vec<[f64; 2]>,
}

fn profile(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Driving => "driving",
        TravelMode::Walking => "foot",
    }
}

impl OsrmClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    fn route_url(&self, request: &DirectionsRequest) -> Result<Url, ServiceError> {
        let path = format!(
            "route/v1/{}/{},{};{},{}",
            profile(request.mode),
            request.source.longitude,
            request.source.latitude,
            request.destination.longitude,
            request.destination.latitude
        );
        let mut url = self.base_url.join(&path)?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson")
            .append_pair("alternatives", "true");
        Ok(url)
    }
}

impl Directions for OsrmClient {
    async fn calculate(&self, request: &DirectionsRequest) -> Result<Vec<Route>, ServiceError> {
        let url = self.route_url(request)?;
        debug!("Directions request: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // OSRM reports routing failures as JSON with a non-2xx status
        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(parsed) => routes_from_response(parsed),
            Err(_) if !status.is_success() => Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(ServiceError::InvalidResponse(e.to_string())),
        }
    }
}

fn routes_from_response(response: RouteResponse) -> Result<Vec<Route>, ServiceError> {
    match response.code.as_str() {
        "Ok" => Ok(response
            .routes
            .into_iter()
            .map(|r| Route {
                polyline: LineString::from(
                    r.geometry
                        .coordinates
                        .into_iter()
                        .map(|[lon, lat]| (lon, lat))
                        .collect::<Vec<_>>(),
                ),
                distance_m: r.distance,
                expected_travel_time: Duration::try_from_secs_f64(r.duration)
                    .unwrap_or_default(),
            })
            .collect()),
        "NoRoute" => Ok(Vec::new()),
        code => Err(ServiceError::InvalidResponse(format!(
            "{}: {}",
            code,
            response.message.unwrap_or_default()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use serde_json::json;

    fn response(value: serde_json::Value) -> RouteResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_routes_in_order() {
        let parsed = response(json!({
            "code": "Ok",
            "routes": [
                {
                    "distance": 1200.5,
                    "duration": 300.0,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-46.65, -23.56], [-46.64, -23.55], [-46.63, -23.55]]
                    }
                },
                {
                    "distance": 1500.0,
                    "duration": 360.0,
                    "geometry": { "type": "LineString", "coordinates": [[-46.65, -23.56], [-46.63, -23.55]] }
                }
            ]
        }));

        let routes = routes_from_response(parsed).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].polyline.0.len(), 3);
        assert_eq!(routes[0].polyline.0[0].x, -46.65);
        assert_eq!(routes[0].polyline.0[0].y, -23.56);
        assert_eq!(routes[0].expected_travel_time, Duration::from_secs(300));
        assert_eq!(routes[1].distance_m, 1500.0);
    }

    #[test]
    fn test_no_route_is_empty() {
        let parsed = response(json!({ "code": "NoRoute", "message": "Impossible route" }));
        assert!(routes_from_response(parsed).unwrap().is_empty());
    }

    #[test]
    fn test_other_codes_are_errors() {
        let parsed = response(json!({ "code": "InvalidQuery", "message": "bad coordinates" }));
        let err = routes_from_response(parsed).unwrap_err();
        assert!(err.to_string().contains("InvalidQuery"));
    }

    #[test]
    fn test_route_url() {
        let client = OsrmClient::new("http://router.local:5000/", Duration::from_secs(5)).unwrap();
        let url = client
            .route_url(&DirectionsRequest {
                source: Coordinate::new(-23.56, -46.65),
                destination: Coordinate::new(-23.55, -46.63),
                mode: TravelMode::Walking,
            })
            .unwrap();

        assert_eq!(url.path(), "/route/v1/foot/-46.65,-23.56;-46.63,-23.55");
        assert_eq!(
            url.query(),
            Some("overview=full&geometries=geojson&alternatives=true")
        );
    }
}
