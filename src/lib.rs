//! Quero Conhecer - mark, browse and route to personal places on a map.
//!
//! This library holds the application core: the place model and address
//! formatting, the map surface state, the map and place finder controllers,
//! and the geocoding/search/directions services they talk to.

pub mod config;
pub mod controllers;
pub mod location;
pub mod map;
pub mod models;
pub mod request;
pub mod services;

pub use controllers::{MapController, PlaceFinder, PlaceFinderDelegate};
pub use models::{format_address, Annotation, AnnotationKind, Coordinate, Place, Placemark};
