//! Command-line host for the places map.
//!
//! Builds the map controller from the configured places and drives the place
//! finder, local search and directions against HTTP geocoding and routing
//! services.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use quero_conhecer::config::Config;
use quero_conhecer::controllers::{MapController, PlaceFinder};
use quero_conhecer::models::{AnnotationKind, Coordinate};
use quero_conhecer::services::{OsrmClient, PeliasClient};

mod terminal;
use terminal::{ask, print_map, TerminalLocation};

type Map = MapController<TerminalLocation, PeliasClient, OsrmClient>;

#[derive(Parser, Debug)]
#[command(name = "places")]
#[command(about = "Mark, search and route to your places")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "places.toml")]
    config: PathBuf,

    /// Current device location as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    from: Option<Coordinate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the configured places
    List,
    /// Find a new place by name or by pressing on the map
    Find {
        /// City or address to look up
        #[arg(long, conflicts_with = "at", required_unless_present = "at")]
        city: Option<String>,
        /// Point pressed on the map as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        at: Option<Coordinate>,
        /// How long the press is held, in seconds
        #[arg(long, default_value_t = 2.0)]
        hold: f64,
        /// Add the found place without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Search points of interest around the places
    Search { query: String },
    /// Route from --from to one of the places
    Route {
        /// Index of the place as shown by `list`
        #[arg(long)]
        to: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = if args.config.exists() {
        info!("Loading configuration from {}", args.config.display());
        Config::load_from_file(&args.config)?
    } else {
        warn!(
            "{} not found, using default configuration",
            args.config.display()
        );
        Config::default()
    };

    let mut map: Map = MapController::new(
        config.places.clone(),
        TerminalLocation::new(args.from),
        config.geocoder()?,
        config.directions()?,
        config.map_settings(),
    );

    match args.command {
        Command::List => {}
        Command::Find {
            city,
            at,
            hold,
            yes,
        } => find(&config, &mut map, city, at, hold, yes).await?,
        Command::Search { query } => map.search_places(&query).await,
        Command::Route { to } => route(&mut map, to).await?,
    }

    print_map(&map);
    Ok(())
}

async fn find(
    config: &Config,
    map: &mut Map,
    city: Option<String>,
    at: Option<Coordinate>,
    hold: f64,
    assume_yes: bool,
) -> Result<()> {
    let mut finder = PlaceFinder::new(config.geocoder()?, map, config.finder_settings());

    let prompt = match (city, at) {
        (Some(city), _) => finder.find_address(&city).await.cloned(),
        (None, Some(at)) => {
            let held = Duration::try_from_secs_f64(hold).context("Invalid --hold")?;
            finder.find_at(at, held).await.cloned()
        }
        (None, None) => None,
    };

    let Some(prompt) = prompt else {
        println!(
            "Press too short, hold for at least {:?}",
            config.finder_settings().min_press_duration
        );
        return Ok(());
    };

    if ask(&prompt, assume_yes)? {
        if let Some(place) = finder.confirm() {
            println!("Added {}", place.name());
            println!();
        }
    } else {
        finder.cancel();
        finder.close();
    }
    Ok(())
}

async fn route(map: &mut Map, to: usize) -> Result<()> {
    let id = map
        .surface()
        .annotations_of_kind(AnnotationKind::Place)
        .nth(to)
        .map(|(id, _)| id)
        .with_context(|| format!("No place with index {}", to))?;

    map.dismiss_message(false);
    map.select_annotation(id);
    if let Err(e) = map.show_route().await {
        warn!("Route failed: {}", e);
    }
    Ok(())
}
