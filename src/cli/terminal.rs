//! Terminal host: a location provider fed from the command line and plain
//! text rendering of the controllers' state.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::info;

use quero_conhecer::controllers::{FinderPrompt, MapController, MapMessage};
use quero_conhecer::location::{AuthorizationStatus, LocationProvider, SETTINGS_URL};
use quero_conhecer::models::{AnnotationKind, Coordinate};
use quero_conhecer::services::{Directions, LocalSearch};

/// Location provider backed by a fixed `--from` coordinate.
///
/// With a coordinate the app behaves as if when-in-use permission had been
/// granted; without one it behaves as if permission had been denied.
pub struct TerminalLocation {
    location: Option<Coordinate>,
}

impl TerminalLocation {
    pub fn new(location: Option<Coordinate>) -> Self {
        Self { location }
    }
}

impl LocationProvider for TerminalLocation {
    fn services_enabled(&self) -> bool {
        true
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        if self.location.is_some() {
            AuthorizationStatus::AuthorizedWhenInUse
        } else {
            AuthorizationStatus::Denied
        }
    }

    fn request_when_in_use_authorization(&mut self) {
        info!("Pass --from <lat,lon> to share a location");
    }

    fn start_updating_location(&mut self) {}

    fn location(&self) -> Option<Coordinate> {
        self.location
    }

    fn open_settings(&mut self) {
        println!("Open {} to change the location permission", SETTINGS_URL);
    }
}

pub fn print_map<L, S, D>(controller: &MapController<L, S, D>)
where
    L: LocationProvider,
    S: LocalSearch,
    D: Directions,
{
    println!("{}", controller.title());
    println!("{}", "=".repeat(controller.title().chars().count()));

    for (index, (id, annotation)) in controller
        .surface()
        .annotations_of_kind(AnnotationKind::Place)
        .enumerate()
    {
        println!(
            "[{}] {} {} ({})",
            index,
            annotation.title.as_deref().unwrap_or("-"),
            annotation.coordinate,
            id
        );
        print_address(annotation.address.as_deref());
    }

    let poi: Vec<_> = controller.points_of_interest().collect();
    if !poi.is_empty() {
        println!();
        println!("Points of interest:");
        for annotation in poi {
            match &annotation.subtitle {
                Some(phone) => println!(
                    "  * {} {} tel. {}",
                    annotation.title.as_deref().unwrap_or("-"),
                    annotation.coordinate,
                    phone
                ),
                None => println!(
                    "  * {} {}",
                    annotation.title.as_deref().unwrap_or("-"),
                    annotation.coordinate
                ),
            }
            print_address(annotation.address.as_deref());
        }
    }

    if let Some(route) = controller.route() {
        println!();
        println!(
            "Route: {:.1} km, about {} min, {} points",
            route.distance_m / 1000.0,
            route.expected_travel_time.as_secs().div_ceil(60),
            route.polyline.0.len()
        );
    }

    if let Some(region) = controller.surface().region() {
        println!();
        println!(
            "Viewport: center {} span {:.4} x {:.4}",
            region.center, region.latitude_delta, region.longitude_delta
        );
    }

    if let Some(message) = controller.message() {
        print_message(message);
    }
}

fn print_address(address: Option<&str>) {
    if let Some(address) = address {
        for line in address.lines().filter(|l| !l.trim().is_empty()) {
            println!("      {}", line.trim());
        }
    }
}

pub fn print_message(message: MapMessage) {
    println!();
    println!("{}: {}", message.title(), message.text());
}

/// Show a finder prompt and, for confirmations, ask the user.
/// Returns whether the user confirmed.
pub fn ask(prompt: &FinderPrompt, assume_yes: bool) -> Result<bool> {
    println!("{}: {}", prompt.title(), prompt.text());

    if !matches!(prompt, FinderPrompt::Confirmation { .. }) {
        return Ok(false);
    }
    if assume_yes {
        return Ok(true);
    }

    print!("[s/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    ))
}
