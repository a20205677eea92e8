mod feed;
mod nearby;
mod origin;
mod render;
mod search;
mod watch;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use localpin_core::{AppConfig, CategoryFilter, DiscoveryQuery, Position};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "localpin")]
#[command(about = "Find nearby vendors and see who is online")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// One-shot discovery over a vendor snapshot file
    Nearby {
        /// JSON file holding an array of vendor documents
        #[arg(long)]
        vendors: PathBuf,
        /// Resolve the origin by place name instead of --lat/--lng
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        place: Option<String>,
        #[command(flatten)]
        query: QueryArgs,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read a JSON-lines vendor feed from stdin and print every recomputed view
    Watch {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Search for a place by name
    Search {
        /// Place name; at least four characters
        text: String,
    },
}

/// Origin, radius and category options shared by `nearby` and `watch`.
#[derive(Debug, Clone, Args)]
pub(crate) struct QueryArgs {
    /// Origin latitude in degrees
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Origin longitude in degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
    /// Search radius in kilometres [default: LOCALPIN_DEFAULT_RADIUS_KM]
    #[arg(long)]
    pub radius_km: Option<f64>,
    /// Vendor category, or "all"
    #[arg(long, default_value = "all")]
    pub category: CategoryFilter,
}

impl QueryArgs {
    /// Explicit `--lat`/`--lng`, if both were given.
    pub(crate) fn position(&self) -> Option<Position> {
        self.lat.zip(self.lng).map(|(lat, lng)| Position::new(lat, lng))
    }

    /// The discovery query around `origin`. Not validated here; discovery
    /// reports bad input itself.
    pub(crate) fn query(&self, origin: Position, config: &AppConfig) -> DiscoveryQuery {
        DiscoveryQuery {
            origin,
            radius_km: self.radius_km.unwrap_or(config.default_radius_km),
            category: self.category,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = localpin_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Nearby {
            vendors,
            place,
            query,
            json,
        } => nearby::run_nearby(&config, &vendors, place.as_deref(), &query, json).await,
        Commands::Watch { query } => watch::run_watch(&config, &query).await,
        Commands::Search { text } => search::run_search(&config, &text).await,
    }
}
