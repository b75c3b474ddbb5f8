//! TOML configuration for the services, the two screens and the initial
//! list of places.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::controllers::{FinderSettings, MapSettings};
use crate::models::Place;
use crate::request::RequestOrdering;
use crate::services::{OsrmClient, PeliasClient, TravelMode};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub services: ServicesConfig,
    pub finder: FinderConfig,
    pub map: MapConfig,
    pub places: Vec<Place>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServicesConfig {
    /// Base URL of a cypress/Pelias query server
    pub geocoder_url: String,
    /// Base URL of an OSRM server
    pub directions_url: String,
    pub timeout_secs: u64,
    pub search_size: usize,
    pub travel_mode: TravelMode,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            geocoder_url: "http://localhost:3000/".to_string(),
            directions_url: "http://localhost:5000/".to_string(),
            timeout_secs: 30,
            search_size: 10,
            travel_mode: TravelMode::Driving,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FinderConfig {
    pub min_press_secs: f64,
    pub region_span_m: f64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            min_press_secs: 2.0,
            region_span_m: 3500.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub camera_pitch: f64,
    pub camera_altitude: f64,
    pub viewport_padding: f64,
    pub ordering: RequestOrdering,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            camera_pitch: 80.0,
            camera_altitude: 100.0,
            viewport_padding: 1.2,
            ordering: RequestOrdering::LatestIssued,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        Duration::try_from_secs_f64(self.finder.min_press_secs).with_context(|| {
            format!(
                "finder.min_press_secs must be a non-negative number of seconds, got {}",
                self.finder.min_press_secs
            )
        })?;
        for place in &self.places {
            if !place.coordinate().is_valid() {
                anyhow::bail!(
                    "place '{}' has an invalid coordinate {}",
                    place.name(),
                    place.coordinate()
                );
            }
        }
        Ok(())
    }

    pub fn finder_settings(&self) -> FinderSettings {
        FinderSettings {
            min_press_duration: Duration::try_from_secs_f64(self.finder.min_press_secs)
                .unwrap_or_else(|_| FinderSettings::default().min_press_duration),
            region_span_m: self.finder.region_span_m,
            ordering: self.map.ordering,
        }
    }

    pub fn map_settings(&self) -> MapSettings {
        MapSettings {
            camera_pitch: self.map.camera_pitch,
            camera_altitude: self.map.camera_altitude,
            viewport_padding: self.map.viewport_padding,
            travel_mode: self.services.travel_mode,
            ordering: self.map.ordering,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.services.timeout_secs)
    }

    pub fn geocoder(&self) -> Result<PeliasClient> {
        PeliasClient::new(
            &self.services.geocoder_url,
            self.timeout(),
            self.services.search_size,
        )
        .context("Failed to create geocoder client")
    }

    pub fn directions(&self) -> Result<OsrmClient> {
        OsrmClient::new(&self.services.directions_url, self.timeout())
            .context("Failed to create directions client")
    }
}
