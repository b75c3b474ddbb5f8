//! Map annotations (markers) shown on the map surface.

use serde::Serialize;

use super::{Coordinate, Place};

/// Handle to an annotation owned by a map surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AnnotationId(pub u64);

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an annotation stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// One of the user's places
    Place,
    /// A transient local search result
    PointOfInterest,
}

/// How hard the renderer must try to keep a marker visible when crowded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPriority {
    /// May be clustered or hidden
    High,
    /// Always drawn
    Required,
}

/// Named colors of the app's palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerTint {
    Main,
    Poi,
}

impl AnnotationKind {
    pub fn display_priority(self) -> DisplayPriority {
        match self {
            AnnotationKind::Place => DisplayPriority::Required,
            AnnotationKind::PointOfInterest => DisplayPriority::High,
        }
    }

    pub fn tint(self) -> MarkerTint {
        match self {
            AnnotationKind::Place => MarkerTint::Main,
            AnnotationKind::PointOfInterest => MarkerTint::Poi,
        }
    }
}

/// A marker on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub coordinate: Coordinate,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub kind: AnnotationKind,
    pub address: Option<String>,
}

impl Annotation {
    pub fn new(coordinate: Coordinate, kind: AnnotationKind) -> Self {
        Self {
            coordinate,
            title: None,
            subtitle: None,
            kind,
            address: None,
        }
    }

    /// Place-kind annotation titled with the place's name
    pub fn for_place(place: &Place) -> Self {
        Self {
            title: Some(place.name().to_string()),
            address: Some(place.address().to_string()),
            ..Self::new(place.coordinate(), AnnotationKind::Place)
        }
    }

    pub fn is_place(&self) -> bool {
        self.kind == AnnotationKind::Place
    }
}
