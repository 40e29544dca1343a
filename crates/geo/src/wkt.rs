//! PostGIS WKT point formatting and parsing.
//!
//! Output is always the EWKT form stored in `geometry(Point, 4326)` columns:
//! `SRID=4326;POINT(lng lat)` (longitude first).
//!
//! Input may be:
//! - GeoJSON-like geometry: `{"type": "Point", "coordinates": [lng, lat]}`
//! - WKT string: `POINT(lng lat)`, with or without an `SRID=…;` prefix

use crate::{GeoError, GeoPoint, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

/// Decimal digits used by [`to_point_wkt`] (~11 m at the equator).
pub const DEFAULT_WKT_PRECISION: usize = 4;

/// Highest precision honoured by the formatters; larger values are capped.
pub const MAX_WKT_PRECISION: usize = 15;

/// Spatial reference id for WGS84.
const SRID_WGS84: u32 = 4326;

static POINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)POINT\s*\(([^)]+)\)").expect("POINT regex is valid"));

/// Location input as it arrives from the database driver or a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WktInput<'a> {
    /// Structured geometry coordinates, `[longitude, latitude]`.
    Structured([f64; 2]),
    /// Raw WKT text containing a `POINT(lng lat)` clause.
    Raw(&'a str),
    /// No location stored.
    Absent,
}

impl<'a> From<&'a str> for WktInput<'a> {
    fn from(raw: &'a str) -> Self {
        WktInput::Raw(raw)
    }
}

impl From<[f64; 2]> for WktInput<'_> {
    fn from(coordinates: [f64; 2]) -> Self {
        WktInput::Structured(coordinates)
    }
}

impl<'a, T: Into<WktInput<'a>>> From<Option<T>> for WktInput<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(WktInput::Absent, Into::into)
    }
}

impl<'a> WktInput<'a> {
    /// Classifies a JSON value returned by the driver.
    ///
    /// Returns `None` for shapes that can never hold a point (numbers,
    /// booleans, arrays, objects without numeric `coordinates`).
    pub fn from_json(value: &'a serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(WktInput::Absent),
            serde_json::Value::String(raw) => Some(WktInput::Raw(raw.as_str())),
            serde_json::Value::Object(map) => {
                let coords = map.get("coordinates")?.as_array()?;
                if coords.len() < 2 {
                    return None;
                }
                Some(WktInput::Structured([coords[0].as_f64()?, coords[1].as_f64()?]))
            }
            _ => None,
        }
    }
}

/// Formats a point as `SRID=4326;POINT(lng lat)` with [`DEFAULT_WKT_PRECISION`] digits.
///
/// # Example
/// ```
/// use bookax_geo::to_point_wkt;
///
/// assert_eq!(to_point_wkt(52.5200, 13.4050), "SRID=4326;POINT(13.4050 52.5200)");
/// ```
#[inline]
pub fn to_point_wkt(latitude: f64, longitude: f64) -> String {
    to_point_wkt_with_precision(latitude, longitude, DEFAULT_WKT_PRECISION)
}

/// Formats a point as `SRID=4326;POINT(lng lat)` with exactly `precision` decimal digits.
///
/// Values are rounded half away from zero; trailing zeros are kept.
/// `precision` is capped at [`MAX_WKT_PRECISION`].
///
/// # Example
/// ```
/// use bookax_geo::to_point_wkt_with_precision;
///
/// assert_eq!(
///     to_point_wkt_with_precision(52.5200123, 13.4050456, 6),
///     "SRID=4326;POINT(13.405046 52.520012)"
/// );
/// assert_eq!(
///     to_point_wkt_with_precision(52.5200123, 13.4050456, 2),
///     "SRID=4326;POINT(13.41 52.52)"
/// );
/// ```
pub fn to_point_wkt_with_precision(latitude: f64, longitude: f64, precision: usize) -> String {
    let precision = precision.min(MAX_WKT_PRECISION);
    format!(
        "SRID={};POINT({} {})",
        SRID_WGS84,
        format_fixed(longitude, precision),
        format_fixed(latitude, precision)
    )
}

impl GeoPoint {
    /// Formats this point as EWKT, see [`to_point_wkt_with_precision`].
    pub fn to_wkt(&self, precision: usize) -> String {
        to_point_wkt_with_precision(self.latitude, self.longitude, precision)
    }
}

/// Parses a point from any supported input shape.
///
/// Returns `None` for absent input and for text without a usable
/// `POINT(lng lat)` clause. Malformed input is an expected outcome, never a panic.
///
/// # Example
/// ```
/// use bookax_geo::{parse_point_wkt, GeoPoint, WktInput};
///
/// let point = parse_point_wkt(WktInput::Structured([13.4050, 52.5200]));
/// assert_eq!(point, Some(GeoPoint::new(52.5200, 13.4050)));
///
/// assert_eq!(parse_point_wkt("SRID=4326;point( -74.006  40.7128 )".into()),
///            Some(GeoPoint::new(40.7128, -74.006)));
/// assert_eq!(parse_point_wkt("not a point".into()), None);
/// assert_eq!(parse_point_wkt(WktInput::Absent), None);
/// ```
pub fn parse_point_wkt(input: WktInput<'_>) -> Option<GeoPoint> {
    match input {
        WktInput::Structured([lng, lat]) => Some(GeoPoint::new(lat, lng)),
        WktInput::Raw(raw) => match raw.parse::<GeoPoint>() {
            Ok(point) => Some(point),
            Err(e) => {
                tracing::trace!(error = %e, "rejected WKT input");
                None
            }
        },
        WktInput::Absent => None,
    }
}

/// Parses a point from a driver's JSON value (GeoJSON object, WKT string, or null).
///
/// # Example
/// ```
/// use bookax_geo::parse_postgis_value;
/// use serde_json::json;
///
/// let point = parse_postgis_value(&json!({"type": "Point", "coordinates": [13.4050, 52.5200]})).unwrap();
/// assert_eq!(point.latitude, 52.5200);
///
/// let point = parse_postgis_value(&json!("POINT(13.4050 52.5200)")).unwrap();
/// assert_eq!(point.longitude, 13.4050);
///
/// assert!(parse_postgis_value(&json!(null)).is_none());
/// ```
pub fn parse_postgis_value(value: &serde_json::Value) -> Option<GeoPoint> {
    WktInput::from_json(value).and_then(parse_point_wkt)
}

impl FromStr for GeoPoint {
    type Err = GeoError;

    /// Parses the first `POINT(lng lat)` clause in `s`, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let caps = POINT_RE
            .captures(s)
            .ok_or_else(|| GeoError::InvalidWkt(format!("Expected POINT, got: {}", s)))?;

        let parts: Vec<&str> = caps[1].split_whitespace().collect();
        if parts.len() != 2 {
            return Err(GeoError::InvalidWkt(format!(
                "Expected 2 coordinates, got {}",
                parts.len()
            )));
        }

        let lng = parse_component(parts[0], "longitude")?;
        let lat = parse_component(parts[1], "latitude")?;

        Ok(GeoPoint::new(lat, lng))
    }
}

fn parse_component(raw: &str, name: &str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeoError::InvalidWkt(format!("Invalid {}: {}", name, raw)))
}

/// Fixed-point formatting with half-away-from-zero rounding.
///
/// `{:.N}` rounds exact binary ties to even, so a tie is nudged one ulp
/// away from zero first.
fn format_fixed(value: f64, precision: usize) -> String {
    // Normalize -0.0 so it never prints as "-0.0000".
    let value = if value == 0.0 { 0.0 } else { value };
    let value = if is_decimal_tie(value, precision) {
        f64::from_bits(value.to_bits() + 1)
    } else {
        value
    };
    format!("{:.*}", precision, value)
}

/// True when `value` lies exactly halfway between two `precision`-digit decimals.
///
/// Such values are `k / 2^(precision + 1)` with `k` odd.
fn is_decimal_tie(value: f64, precision: usize) -> bool {
    if !value.is_finite() {
        return false;
    }
    let Some(exp) = precision.checked_add(1).and_then(|p| i32::try_from(p).ok()) else {
        return false;
    };
    let scaled = value * 2f64.powi(exp);
    scaled.is_finite() && scaled.fract() == 0.0 && (scaled % 2.0).abs() == 1.0
}
