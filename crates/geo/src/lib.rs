//! Geospatial primitives for Book-Ax proximity search.
//!
//! This crate provides:
//! - Haversine great-circle distance and radius containment
//! - Coordinate validity checks (WGS84 decimal degrees)
//! - PostGIS WKT point formatting and parsing (`SRID=4326;POINT(lng lat)`)
//! - Bounding boxes for cheap index-range pre-filtering
//! - A proximity search over driver rows, with optional parallelism
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use bookax_geo::{bounding_box, distance_km, is_within_radius, GeoPoint};
//!
//! let berlin = GeoPoint::new(52.5200, 13.4050);
//! let munich = GeoPoint::new(48.1351, 11.5820);
//!
//! let km = distance_km(&berlin, &munich);
//! assert!(km > 500.0 && km < 600.0);
//! assert!(!is_within_radius(&berlin, &munich, 100.0));
//!
//! let bbox = bounding_box(&berlin, 50.0);
//! assert!(bbox.contains(&berlin));
//! ```

mod bbox;
mod config;
mod error;
mod haversine;
pub mod proximity;
mod wkt;

#[cfg(feature = "wasm")]
mod wasm;

pub use bbox::{bounding_box, BoundingBox};
pub use config::{GeoConfig, SearchConfig, WktConfig};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{
    distance_km, distance_m, is_within_radius, to_degrees, EARTH_RADIUS_KM, EARTH_RADIUS_M,
};
pub use proximity::{search, LocatedItem, ProximityMatch, ProximityQuery, DEFAULT_RADIUS_KM};
pub use wkt::{
    parse_point_wkt, parse_postgis_value, to_point_wkt, to_point_wkt_with_precision, WktInput,
    DEFAULT_WKT_PRECISION, MAX_WKT_PRECISION,
};

/// A position in WGS84 decimal degrees.
///
/// Construction never clamps or normalizes; use [`GeoPoint::is_valid`] (or
/// [`is_valid_coordinate`]) before trusting caller-supplied values.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if both components are inside the WGS84 range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.latitude, self.longitude)
    }

    /// Latitude in radians.
    #[inline]
    pub(crate) fn lat_radians(&self) -> f64 {
        self.latitude.to_radians()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Returns true iff `latitude` is in `[-90, 90]` and `longitude` in `[-180, 180]`.
///
/// Bounds are inclusive. `NaN` in either component is invalid.
#[inline]
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let point = GeoPoint::new(52.5200, 13.4050);
        assert_eq!(point.latitude, 52.5200);
        assert_eq!(point.longitude, 13.4050);
    }

    #[test]
    fn test_point_from_tuple() {
        let point: GeoPoint = (52.5200, 13.4050).into();
        assert_eq!(point.latitude, 52.5200);
        assert_eq!(point.longitude, 13.4050);
    }

    #[test]
    fn test_valid_coordinates() {
        assert!(is_valid_coordinate(52.5200, 13.4050));
        assert!(is_valid_coordinate(0.0, 0.0));
        assert!(is_valid_coordinate(90.0, 180.0));
        assert!(is_valid_coordinate(-90.0, -180.0));
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(!is_valid_coordinate(90.0001, 0.0));
        assert!(!is_valid_coordinate(0.0, 180.0001));
        assert!(!is_valid_coordinate(-90.0001, 0.0));
        assert!(!is_valid_coordinate(0.0, -180.0001));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::INFINITY));
    }

    #[test]
    fn test_point_is_not_clamped() {
        let point = GeoPoint::new(120.0, -200.0);
        assert_eq!(point.latitude, 120.0);
        assert_eq!(point.longitude, -200.0);
        assert!(!point.is_valid());
    }

    #[test]
    fn test_point_serde_shape() {
        let json = serde_json::to_value(GeoPoint::new(52.52, 13.405)).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": 52.52, "longitude": 13.405}));
    }
}
