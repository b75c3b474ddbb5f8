//! Screen controllers: the map of saved places and the place finder flow.

mod finder;
mod map;
mod messages;

#[cfg(test)]
mod testing;

pub use finder::{
    FinderSettings, GeocodeQuery, GeocodeRequest, PlaceFinder, PlaceFinderDelegate,
};
pub use map::{InfoPanel, MapController, MapSettings, PendingRoute, PendingSearch, RouteError};
pub use messages::{AlertAction, FinderError, FinderPrompt, MapMessage};
