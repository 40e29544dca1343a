//! bax-geo: geospatial utilities for Book-Ax operators and scripts.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Outcome, OutputFormat};

/// Distance, bounding-box and PostGIS point utilities
#[derive(Parser)]
#[command(name = "bax-geo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Path to a bookax-geo.toml configuration file
    #[arg(short, long, global = true, env = "BOOKAX_GEO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance between two points in kilometers
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lng1: f64,
        lat2: f64,
        lng2: f64,
    },

    /// Check whether a point lies within a radius of a center (exit 1 if not)
    #[command(allow_negative_numbers = true)]
    Within {
        center_lat: f64,
        center_lng: f64,
        lat: f64,
        lng: f64,
        /// Radius in kilometers
        #[arg(short, long)]
        radius: f64,
    },

    /// Check whether a coordinate is in WGS84 range (exit 1 if not)
    #[command(allow_negative_numbers = true)]
    Validate { lat: f64, lng: f64 },

    /// Format a coordinate as a PostGIS EWKT point
    #[command(allow_negative_numbers = true)]
    Wkt {
        lat: f64,
        lng: f64,
        /// Decimal digits, 0-15 (defaults to the configured precision)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(..=15))]
        precision: Option<u8>,
    },

    /// Parse a WKT string or GeoJSON geometry (exit 1 if no point)
    Parse {
        /// `POINT(lng lat)` text or a JSON geometry object
        input: String,
    },

    /// Bounding box around a center for a radius
    #[command(allow_negative_numbers = true)]
    Bbox {
        lat: f64,
        lng: f64,
        /// Radius in kilometers (defaults to the configured radius)
        #[arg(short, long)]
        radius: Option<f64>,
    },

    /// Rows within a radius of a center, closest first
    #[command(allow_negative_numbers = true)]
    Nearby {
        /// JSON file with an array of {"id", "location"} rows ("-" for stdin)
        items: PathBuf,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        /// Radius in kilometers (defaults to the configured radius)
        #[arg(short, long)]
        radius: Option<f64>,
        /// Maximum rows to return (defaults to the configured limit, 0 for all)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "bookax_geo=debug,bax_geo=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match bookax_geo::GeoConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::from(2);
        }
    };

    let format = cli.format;
    let result = match cli.command {
        Commands::Distance { lat1, lng1, lat2, lng2 } => {
            commands::distance(lat1, lng1, lat2, lng2, format)
        }
        Commands::Within { center_lat, center_lng, lat, lng, radius } => {
            commands::within(center_lat, center_lng, lat, lng, radius, format)
        }
        Commands::Validate { lat, lng } => commands::validate(lat, lng, format),
        Commands::Wkt { lat, lng, precision } => {
            commands::wkt(lat, lng, precision.map_or(config.wkt.precision, usize::from), format)
        }
        Commands::Parse { input } => commands::parse(&input, format),
        Commands::Bbox { lat, lng, radius } => {
            commands::bbox(lat, lng, radius.unwrap_or(config.search.default_radius_km), format)
        }
        Commands::Nearby { items, lat, lng, radius, limit } => commands::nearby(
            &items,
            lat,
            lng,
            radius.unwrap_or(config.search.default_radius_km),
            limit.unwrap_or(config.search.default_limit),
            format,
        ),
    };

    match result {
        Ok(Outcome::Pass) => ExitCode::SUCCESS,
        Ok(Outcome::Fail) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}
