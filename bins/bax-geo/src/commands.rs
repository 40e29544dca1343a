//! Subcommand implementations.

use anyhow::{Context, Result};
use bookax_geo::proximity::search_with_stats;
use bookax_geo::{
    bounding_box, distance_km, is_valid_coordinate, is_within_radius, parse_postgis_value,
    to_point_wkt_with_precision, GeoPoint, LocatedItem, ProximityQuery,
};
use owo_colors::{OwoColorize, Stream};
use serde_json::json;
use std::io::Read;
use std::path::Path;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Whether a check-style command passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed { Outcome::Pass } else { Outcome::Fail }
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn verdict(passed: bool, yes: &str, no: &str) -> String {
    if passed {
        yes.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    } else {
        no.if_supports_color(Stream::Stdout, |t| t.red()).to_string()
    }
}

pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64, format: OutputFormat) -> Result<Outcome> {
    let km = distance_km(&GeoPoint::new(lat1, lng1), &GeoPoint::new(lat2, lng2));

    match format {
        OutputFormat::Json => print_json(&json!({ "distance_km": km }))?,
        OutputFormat::Text => println!("{:.3} km", km),
    }
    Ok(Outcome::Pass)
}

pub fn within(
    center_lat: f64,
    center_lng: f64,
    lat: f64,
    lng: f64,
    radius_km: f64,
    format: OutputFormat,
) -> Result<Outcome> {
    let center = GeoPoint::new(center_lat, center_lng);
    let point = GeoPoint::new(lat, lng);
    let inside = is_within_radius(&center, &point, radius_km);
    let km = distance_km(&center, &point);

    match format {
        OutputFormat::Json => print_json(&json!({
            "within": inside,
            "distance_km": km,
            "radius_km": radius_km,
        }))?,
        OutputFormat::Text => println!(
            "{} ({:.3} km of {} km)",
            verdict(inside, "within", "outside"),
            km,
            radius_km
        ),
    }
    Ok(inside.into())
}

pub fn validate(lat: f64, lng: f64, format: OutputFormat) -> Result<Outcome> {
    let valid = is_valid_coordinate(lat, lng);

    match format {
        OutputFormat::Json => print_json(&json!({ "valid": valid }))?,
        OutputFormat::Text => println!("{}", verdict(valid, "valid", "invalid")),
    }
    Ok(valid.into())
}

pub fn wkt(lat: f64, lng: f64, precision: usize, format: OutputFormat) -> Result<Outcome> {
    let text = to_point_wkt_with_precision(lat, lng, precision);

    match format {
        OutputFormat::Json => print_json(&json!({ "wkt": text }))?,
        OutputFormat::Text => println!("{}", text),
    }
    Ok(Outcome::Pass)
}

pub fn parse(input: &str, format: OutputFormat) -> Result<Outcome> {
    // JSON geometry first, then fall back to raw WKT text.
    let value = serde_json::from_str::<serde_json::Value>(input)
        .unwrap_or_else(|_| serde_json::Value::String(input.to_string()));
    let point = parse_postgis_value(&value);

    match (format, point) {
        (OutputFormat::Json, _) => print_json(&serde_json::to_value(point)?)?,
        (OutputFormat::Text, Some(p)) => println!("latitude={} longitude={}", p.latitude, p.longitude),
        (OutputFormat::Text, None) => println!("{}", verdict(false, "", "no point")),
    }
    Ok(point.is_some().into())
}

pub fn bbox(lat: f64, lng: f64, radius_km: f64, format: OutputFormat) -> Result<Outcome> {
    let bbox = bounding_box(&GeoPoint::new(lat, lng), radius_km);

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(bbox)?)?,
        OutputFormat::Text => {
            println!("lat: {:.6} .. {:.6}", bbox.min_lat, bbox.max_lat);
            if bbox.spans_all_longitudes() {
                println!("lng: all (circle reaches a pole)");
            } else {
                println!("lng: {:.6} .. {:.6}", bbox.min_lng, bbox.max_lng);
            }
        }
    }
    Ok(Outcome::Pass)
}

fn read_items(path: &Path) -> Result<Vec<LocatedItem>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read rows from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid rows JSON in {}", path.display()))
}

pub fn nearby(
    items_path: &Path,
    lat: f64,
    lng: f64,
    radius_km: f64,
    limit: usize,
    format: OutputFormat,
) -> Result<Outcome> {
    let items = read_items(items_path)?;

    let mut query = ProximityQuery::new(GeoPoint::new(lat, lng)).with_radius_km(radius_km);
    if limit > 0 {
        query = query.with_limit(limit);
    }

    let (matches, stats) = search_with_stats(&query, &items)?;

    match format {
        OutputFormat::Json => print_json(&json!({ "matches": matches, "stats": stats }))?,
        OutputFormat::Text => {
            for m in &matches {
                println!("{:>8}  {:>10.3} km", m.id, m.distance_km);
            }
            println!(
                "{} of {} rows within {} km ({} unparseable, {} passed bounding box)",
                matches.len(),
                stats.scanned,
                radius_km,
                stats.scanned - stats.parsed,
                stats.in_box
            );
        }
    }
    Ok(Outcome::Pass)
}
