//! Proximity search over located rows.
//!
//! A search computes the query's [`BoundingBox`] once, drops rows outside it,
//! then applies the exact Haversine check to the survivors. With the
//! `parallel` feature (default) rows are evaluated on the rayon pool.

use crate::{bounding_box, distance_km, parse_postgis_value, BoundingBox, GeoError, GeoPoint, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Radius used when a query does not give one.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// A radius query around a center point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
    /// Maximum number of matches to return (None for all)
    pub limit: Option<usize>,
}

impl ProximityQuery {
    /// Creates a query with [`DEFAULT_RADIUS_KM`] and no limit.
    pub fn new(center: GeoPoint) -> Self {
        Self {
            center,
            radius_km: DEFAULT_RADIUS_KM,
            limit: None,
        }
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks the center and radius before any row is scanned.
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_valid() {
            return Err(GeoError::InvalidCoordinate(format!(
                "center ({}, {}) is out of range",
                self.center.latitude, self.center.longitude
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km < 0.0 {
            return Err(GeoError::InvalidRadius(self.radius_km));
        }
        Ok(())
    }
}

/// A row with its stored location, as returned by the database driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatedItem {
    pub id: i64,
    /// Location in PostGIS format (GeoJSON or WKT)
    pub location: serde_json::Value,
}

/// A row that matched, with its exact distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityMatch {
    pub id: i64,
    pub distance_km: f64,
}

/// Counters describing how a search narrowed its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProximityStats {
    /// Rows handed to the search
    pub scanned: usize,
    /// Rows whose location parsed
    pub parsed: usize,
    /// Rows that passed the bounding box
    pub in_box: usize,
    /// Rows within the exact radius
    pub in_radius: usize,
}

/// Per-row outcome of the filter pipeline.
enum Stage {
    Unparsed,
    OutsideBox,
    OutsideRadius,
    Matched(ProximityMatch),
}

/// Finds rows within the query radius, closest first.
///
/// Ties in distance are ordered by `id`. Rows whose location cannot be
/// parsed are skipped.
///
/// # Example
/// ```
/// use bookax_geo::{search, GeoPoint, LocatedItem, ProximityQuery};
/// use serde_json::json;
///
/// let items = vec![
///     LocatedItem { id: 1, location: json!({"coordinates": [13.4050, 52.5200]}) },
///     LocatedItem { id: 2, location: json!("SRID=4326;POINT(11.5820 48.1351)") },
/// ];
///
/// let query = ProximityQuery::new(GeoPoint::new(52.5, 13.4)).with_radius_km(100.0);
/// let matches = search(&query, &items).unwrap();
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].id, 1);
/// ```
pub fn search(query: &ProximityQuery, items: &[LocatedItem]) -> Result<Vec<ProximityMatch>> {
    search_with_stats(query, items).map(|(matches, _)| matches)
}

/// Like [`search`], also returning filter statistics.
pub fn search_with_stats(
    query: &ProximityQuery,
    items: &[LocatedItem],
) -> Result<(Vec<ProximityMatch>, ProximityStats)> {
    query.validate()?;

    let bbox = bounding_box(&query.center, query.radius_km);
    let stages = evaluate(items, |item| classify(query, &bbox, item));

    let mut stats = ProximityStats {
        scanned: items.len(),
        ..ProximityStats::default()
    };
    let mut matches = Vec::new();
    for stage in stages {
        match stage {
            Stage::Unparsed => {}
            Stage::OutsideBox => stats.parsed += 1,
            Stage::OutsideRadius => {
                stats.parsed += 1;
                stats.in_box += 1;
            }
            Stage::Matched(m) => {
                stats.parsed += 1;
                stats.in_box += 1;
                stats.in_radius += 1;
                matches.push(m);
            }
        }
    }

    sort_matches(&mut matches);
    if let Some(limit) = query.limit {
        matches.truncate(limit);
    }

    tracing::debug!(
        scanned = stats.scanned,
        parsed = stats.parsed,
        in_box = stats.in_box,
        in_radius = stats.in_radius,
        returned = matches.len(),
        radius_km = query.radius_km,
        "proximity search completed"
    );

    Ok((matches, stats))
}

/// Distance from `center` to every row, in input order.
///
/// Rows whose location cannot be parsed get `f64::INFINITY`.
pub fn distances(center: &GeoPoint, items: &[LocatedItem]) -> Vec<ProximityMatch> {
    evaluate(items, |item| ProximityMatch {
        id: item.id,
        distance_km: parse_postgis_value(&item.location)
            .map(|point| distance_km(center, &point))
            .unwrap_or(f64::INFINITY),
    })
}

fn classify(query: &ProximityQuery, bbox: &BoundingBox, item: &LocatedItem) -> Stage {
    let Some(point) = parse_postgis_value(&item.location) else {
        return Stage::Unparsed;
    };
    if !bbox.contains(&point) {
        return Stage::OutsideBox;
    }
    let distance = distance_km(&query.center, &point);
    if distance > query.radius_km {
        return Stage::OutsideRadius;
    }
    Stage::Matched(ProximityMatch {
        id: item.id,
        distance_km: distance,
    })
}

/// Maps every row, in order, on the rayon pool when `parallel` is enabled.
fn evaluate<T, F>(items: &[LocatedItem], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&LocatedItem) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).collect()
    }
}

fn sort_matches(matches: &mut [ProximityMatch]) {
    matches.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
}
