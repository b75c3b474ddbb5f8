//! Visible map regions (center plus span in degrees).

use geo::BoundingRect;
use geo_types::{MultiPoint, Point};
use serde::Serialize;

use crate::models::Coordinate;

/// Mean earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Smallest span used when fitting a single point (roughly 550 m)
const MIN_SPAN_DEGREES: f64 = 0.005;

/// Rectangular map region
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn new(center: Coordinate, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            center,
            latitude_delta,
            longitude_delta,
        }
    }

    /// Region centered on `center` spanning the given distances in meters
    pub fn with_distance(center: Coordinate, latitudinal_m: f64, longitudinal_m: f64) -> Self {
        let meters_per_degree = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        let latitude_delta = (latitudinal_m / meters_per_degree).min(180.0);

        let parallel_scale = center.latitude.to_radians().cos().abs();
        let longitude_delta = if parallel_scale < f64::EPSILON {
            360.0
        } else {
            (longitudinal_m / (meters_per_degree * parallel_scale)).min(360.0)
        };

        Self::new(center, latitude_delta, longitude_delta)
    }

    /// Smallest region containing every coordinate, grown by `padding`
    /// (1.0 = tight fit). Returns `None` for an empty input.
    pub fn fitting(coordinates: &[Coordinate], padding: f64) -> Option<Self> {
        let points: MultiPoint<f64> = coordinates
            .iter()
            .map(|c| Point::from(*c))
            .collect::<Vec<_>>()
            .into();
        let rect = points.bounding_rect()?;

        let center = Coordinate::new(
            (rect.min().y + rect.max().y) / 2.0,
            (rect.min().x + rect.max().x) / 2.0,
        );
        let padding = padding.max(1.0);
        let latitude_delta = (rect.height() * padding).max(MIN_SPAN_DEGREES);
        let longitude_delta = (rect.width() * padding).max(MIN_SPAN_DEGREES);

        Some(Self::new(center, latitude_delta, longitude_delta))
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (coordinate.latitude - self.center.latitude).abs() <= self.latitude_delta / 2.0
            && (coordinate.longitude - self.center.longitude).abs() <= self.longitude_delta / 2.0
    }

    /// Bounding box as [min_lon, min_lat, max_lon, max_lat]
    pub fn bbox(&self) -> [f64; 4] {
        let half_lat = self.latitude_delta / 2.0;
        let half_lon = self.longitude_delta / 2.0;
        [
            (self.center.longitude - half_lon).max(-180.0),
            (self.center.latitude - half_lat).max(-90.0),
            (self.center.longitude + half_lon).min(180.0),
            (self.center.latitude + half_lat).min(90.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_distance_at_equator() {
        let region = Region::with_distance(Coordinate::new(0.0, 0.0), 3500.0, 3500.0);
        // ~111.2 km per degree
        assert!((region.latitude_delta - 0.03148).abs() < 1e-4);
        assert!((region.longitude_delta - region.latitude_delta).abs() < 1e-9);
    }

    #[test]
    fn test_with_distance_widens_longitude_away_from_equator() {
        let region = Region::with_distance(Coordinate::new(-60.0, 0.0), 3500.0, 3500.0);
        assert!((region.longitude_delta - 2.0 * region.latitude_delta).abs() < 1e-6);
    }

    #[test]
    fn test_fitting_contains_all_points() {
        let coords = vec![
            Coordinate::new(-23.5614, -46.6559),
            Coordinate::new(-22.9519, -43.2105),
            Coordinate::new(-15.7998, -47.8645),
        ];
        let region = Region::fitting(&coords, 1.2).unwrap();
        for c in &coords {
            assert!(region.contains(*c), "{} not in {:?}", c, region);
        }
    }

    #[test]
    fn test_fitting_single_point_uses_minimum_span() {
        let region = Region::fitting(&[Coordinate::new(1.0, 2.0)], 1.2).unwrap();
        assert_eq!(region.center, Coordinate::new(1.0, 2.0));
        assert_eq!(region.latitude_delta, MIN_SPAN_DEGREES);
        assert_eq!(region.longitude_delta, MIN_SPAN_DEGREES);
    }

    #[test]
    fn test_fitting_empty() {
        assert!(Region::fitting(&[], 1.2).is_none());
    }

    #[test]
    fn test_bbox() {
        let region = Region::new(Coordinate::new(10.0, 20.0), 2.0, 4.0);
        assert_eq!(region.bbox(), [18.0, 9.0, 22.0, 11.0]);
    }
}
