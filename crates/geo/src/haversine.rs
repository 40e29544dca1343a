//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes. Earth is modelled as a
//! sphere of radius [`EARTH_RADIUS_KM`]; against the WGS84 ellipsoid this is
//! off by up to ~0.5%, which is accepted for search filtering.

use crate::GeoPoint;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = EARTH_RADIUS_KM * 1000.0;

/// Calculates the great-circle distance between two points in kilometers.
///
/// No validation is performed; out-of-range input yields whatever the
/// trigonometry produces. Call [`crate::is_valid_coordinate`] first for
/// untrusted input.
///
/// # Example
/// ```
/// use bookax_geo::{distance_km, GeoPoint};
///
/// let new_york = GeoPoint::new(40.7128, -74.0060);
/// let los_angeles = GeoPoint::new(34.0522, -118.2437);
///
/// let distance = distance_km(&new_york, &los_angeles);
/// assert!(distance > 3900.0 && distance < 4000.0);
/// ```
#[inline]
pub fn distance_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two points in meters.
#[inline]
pub fn distance_m(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance_with_radius(from, to, EARTH_RADIUS_M)
}

/// Returns true if `point` lies within `radius_km` of `center`.
///
/// The boundary is inclusive: a point exactly `radius_km` away is within.
#[inline]
pub fn is_within_radius(center: &GeoPoint, point: &GeoPoint, radius_km: f64) -> bool {
    distance_km(center, point) <= radius_km
}

/// Converts radians to degrees.
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * (180.0 / std::f64::consts::PI)
}

// Deltas are taken in degrees before conversion, so identical points give
// a == 0.0 exactly and the distance is exactly zero.
#[inline]
fn distance_with_radius(from: &GeoPoint, to: &GeoPoint, radius: f64) -> f64 {
    let lat1 = from.lat_radians();
    let lat2 = to.lat_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}
