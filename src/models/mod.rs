//! Core data models: places, placemarks and map annotations.

pub mod annotation;
pub mod place;
pub mod placemark;

pub use annotation::{Annotation, AnnotationId, AnnotationKind, DisplayPriority, MarkerTint};
pub use place::{Coordinate, Place};
pub use placemark::{format_address, Placemark};
