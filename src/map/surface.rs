//! The map surface owned by a controller.

use std::collections::BTreeMap;

use geo_types::LineString;
use serde::Serialize;

use super::Region;
use crate::models::{Annotation, AnnotationId, AnnotationKind, Coordinate, MarkerTint};

/// 3D camera looking at a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub center: Coordinate,
    /// Degrees from straight down
    pub pitch: f64,
    /// Meters above the ground
    pub altitude: f64,
}

/// Where an overlay is drawn relative to the base map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayLevel {
    AboveRoads,
    AboveLabels,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub tint: MarkerTint,
    pub alpha: f64,
    pub line_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            tint: MarkerTint::Main,
            alpha: 0.8,
            line_width: 5.0,
        }
    }
}

/// A drawn route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOverlay {
    pub polyline: LineString<f64>,
    pub level: OverlayLevel,
    pub style: StrokeStyle,
}

/// Live map state: annotations keyed by id, viewport, camera and overlays.
#[derive(Debug, Default)]
pub struct MapSurface {
    annotations: BTreeMap<AnnotationId, Annotation>,
    next_id: u64,
    region: Option<Region>,
    camera: Option<Camera>,
    overlays: Vec<RouteOverlay>,
    shows_user_location: bool,
    user_location: Option<Coordinate>,
}

impl MapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_annotation(&mut self, annotation: Annotation) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        self.annotations.insert(id, annotation);
        id
    }

    pub fn add_annotations<I>(&mut self, annotations: I) -> Vec<AnnotationId>
    where
        I: IntoIterator<Item = Annotation>,
    {
        annotations
            .into_iter()
            .map(|a| self.add_annotation(a))
            .collect()
    }

    pub fn remove_annotations(&mut self, ids: &[AnnotationId]) {
        for id in ids {
            self.annotations.remove(id);
        }
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    /// All annotations in insertion order
    pub fn annotations(&self) -> impl Iterator<Item = (AnnotationId, &Annotation)> {
        self.annotations.iter().map(|(id, a)| (*id, a))
    }

    pub fn annotations_of_kind(
        &self,
        kind: AnnotationKind,
    ) -> impl Iterator<Item = (AnnotationId, &Annotation)> {
        self.annotations().filter(move |(_, a)| a.kind == kind)
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Fit the viewport around the given annotations (and nothing else).
    /// Unknown ids are skipped; an empty selection leaves the viewport alone.
    pub fn show_annotations(&mut self, ids: &[AnnotationId], padding: f64) {
        let coordinates: Vec<Coordinate> = ids
            .iter()
            .filter_map(|id| self.annotations.get(id))
            .map(|a| a.coordinate)
            .collect();
        self.show_coordinates(&coordinates, padding);
    }

    pub fn show_coordinates(&mut self, coordinates: &[Coordinate], padding: f64) {
        if let Some(region) = Region::fitting(coordinates, padding) {
            self.region = Some(region);
        }
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = Some(region);
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.region = Some(Region::with_distance(
            camera.center,
            camera.altitude,
            camera.altitude,
        ));
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<Camera> {
        self.camera
    }

    pub fn add_overlay(&mut self, overlay: RouteOverlay) {
        self.overlays.push(overlay);
    }

    pub fn remove_overlays(&mut self) {
        self.overlays.clear();
    }

    pub fn overlays(&self) -> &[RouteOverlay] {
        &self.overlays
    }

    pub fn set_shows_user_location(&mut self, shows: bool) {
        self.shows_user_location = shows;
    }

    pub fn shows_user_location(&self) -> bool {
        self.shows_user_location
    }

    pub fn set_user_location(&mut self, location: Coordinate) {
        self.user_location = Some(location);
    }

    /// Device location marker, if the surface is showing one
    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location.filter(|_| self.shows_user_location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(lat: f64, lon: f64) -> Annotation {
        Annotation::new(Coordinate::new(lat, lon), AnnotationKind::PointOfInterest)
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut surface = MapSurface::new();
        let a = surface.add_annotation(poi(0.0, 0.0));
        let b = surface.add_annotation(poi(1.0, 1.0));
        surface.remove_annotations(&[a]);
        let c = surface.add_annotation(poi(2.0, 2.0));

        assert!(a < b && b < c);
        let ids: Vec<_> = surface.annotations().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![b, c]);
    }

    #[test]
    fn test_show_annotations_fits_only_selection() {
        let mut surface = MapSurface::new();
        let near = surface.add_annotation(poi(0.0, 0.0));
        let far = surface.add_annotation(poi(40.0, 40.0));

        surface.show_annotations(&[near], 1.2);
        let region = surface.region().unwrap();
        assert!(region.contains(Coordinate::new(0.0, 0.0)));
        assert!(!region.contains(Coordinate::new(40.0, 40.0)));

        surface.show_annotations(&[near, far], 1.2);
        assert!(surface.region().unwrap().contains(Coordinate::new(40.0, 40.0)));
    }

    #[test]
    fn test_show_nothing_keeps_region() {
        let mut surface = MapSurface::new();
        let region = Region::new(Coordinate::new(1.0, 1.0), 1.0, 1.0);
        surface.set_region(region);
        surface.show_annotations(&[AnnotationId(99)], 1.2);
        assert_eq!(surface.region(), Some(region));
    }

    #[test]
    fn test_user_location_hidden_until_shown() {
        let mut surface = MapSurface::new();
        surface.set_user_location(Coordinate::new(1.0, 2.0));
        assert_eq!(surface.user_location(), None);
        surface.set_shows_user_location(true);
        assert_eq!(surface.user_location(), Some(Coordinate::new(1.0, 2.0)));
    }
}
