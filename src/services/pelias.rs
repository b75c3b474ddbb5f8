//! HTTP geocoder for the cypress / Pelias query API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{Geocoder, LocalSearch, MapItem, SearchRequest, ServiceError};
use crate::models::{Coordinate, Placemark};

const USER_AGENT: &str = "quero-conhecer/0.1";

/// Geocoding client speaking the `/v1/search` and `/v1/reverse` endpoints
#[derive(Clone)]
pub struct PeliasClient {
    client: Client,
    base_url: Url,
    search_size: usize,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// [lon, lat]
    coordinates: [f64; 2],
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    name: Option<String>,
    housenumber: Option<String>,
    street: Option<String>,
    #[serde(alias = "postalcode")]
    postcode: Option<String>,
    neighbourhood: Option<String>,
    borough: Option<String>,
    locality: Option<String>,
    region: Option<String>,
    region_a: Option<String>,
    country: Option<String>,
    phone: Option<String>,
    addendum: Option<Addendum>,
}

#[derive(Debug, Default, Deserialize)]
struct Addendum {
    osm: Option<OsmAddendum>,
}

#[derive(Debug, Default, Deserialize)]
struct OsmAddendum {
    phone: Option<String>,
}

impl PeliasClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        search_size: usize,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            search_size,
        })
    }

    async fn fetch(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<FeatureCollection, ServiceError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));

        debug!("Geocoder request: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<FeatureCollection>().await?)
    }
}

impl Geocoder for PeliasClient {
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<Placemark>, ServiceError> {
        let params = [
            ("point.lat", coordinate.latitude.to_string()),
            ("point.lon", coordinate.longitude.to_string()),
            ("size", "1".to_string()),
        ];
        let collection = self.fetch("v1/reverse", &params).await?;
        Ok(collection
            .features
            .into_iter()
            .map(placemark_from_feature)
            .collect())
    }

    async fn geocode_address(&self, address: &str) -> Result<Vec<Placemark>, ServiceError> {
        let params = [("text", address.to_string()), ("size", "1".to_string())];
        let collection = self.fetch("v1/search", &params).await?;
        Ok(collection
            .features
            .into_iter()
            .map(placemark_from_feature)
            .collect())
    }
}

impl LocalSearch for PeliasClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<MapItem>, ServiceError> {
        let [min_lon, min_lat, max_lon, max_lat] = request.region.bbox();
        let params = [
            ("text", request.query.clone()),
            ("bbox", format!("{},{},{},{}", min_lon, min_lat, max_lon, max_lat)),
            ("focus.point.lat", request.region.center.latitude.to_string()),
            ("focus.point.lon", request.region.center.longitude.to_string()),
            ("size", self.search_size.to_string()),
        ];
        let collection = self.fetch("v1/search", &params).await?;
        Ok(collection
            .features
            .into_iter()
            .filter_map(map_item_from_feature)
            .collect())
    }
}

fn placemark_from_feature(feature: Feature) -> Placemark {
    let p = feature.properties;
    Placemark {
        name: p.name,
        street: p.street,
        house_number: p.housenumber,
        sub_locality: p.neighbourhood.or(p.borough),
        city: p.locality,
        // Short state codes ("SP") read better in a postal address
        state: p.region_a.or(p.region),
        postal_code: p.postcode,
        country: p.country,
        location: feature
            .geometry
            .map(|g| Coordinate::new(g.coordinates[1], g.coordinates[0])),
    }
}

/// Search hits without a location cannot be placed on the map
fn map_item_from_feature(mut feature: Feature) -> Option<MapItem> {
    let phone_number = feature.properties.phone.take().or_else(|| {
        feature
            .properties
            .addendum
            .take()
            .and_then(|a| a.osm)
            .and_then(|o| o.phone)
    });
    let placemark = placemark_from_feature(feature);
    let coordinate = placemark.location?;

    Some(MapItem {
        coordinate,
        name: placemark.name.clone(),
        phone_number,
        placemark,
    })
}
