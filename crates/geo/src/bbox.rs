//! Bounding boxes for radius pre-filtering.
//!
//! A box is a cheap index-range filter: rows outside it can be discarded
//! before the exact Haversine check. Boxes are never wrapped at the ±180°
//! seam nor clamped at ±90°, so bounds may fall outside the valid
//! coordinate range and range queries built from them must tolerate that.

use crate::haversine::{to_degrees, EARTH_RADIUS_KM};
use crate::GeoPoint;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Longitude half-width used once the search circle covers a pole.
const FULL_LNG_DELTA: f64 = 180.0;

/// An axis-aligned rectangle in latitude/longitude space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Returns true if `point` lies inside the box, edges included.
    ///
    /// Bounds past the ±180° seam are honoured: with `max_lng = 180.35`, a
    /// point stored at `-179.9` is tested as `180.1`.
    #[inline]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.contains_latitude(point.latitude) && self.contains_longitude(point.longitude)
    }

    fn contains_longitude(&self, longitude: f64) -> bool {
        let inside = |lng: f64| lng >= self.min_lng && lng <= self.max_lng;
        self.spans_all_longitudes()
            || inside(longitude)
            || (self.max_lng > 180.0 && inside(longitude + 360.0))
            || (self.min_lng < -180.0 && inside(longitude - 360.0))
    }

    #[inline]
    pub(crate) fn contains_latitude(&self, latitude: f64) -> bool {
        latitude >= self.min_lat && latitude <= self.max_lat
    }

    /// Returns true when the longitude range covers the whole globe.
    ///
    /// This happens when the circle reaches over a pole; callers should then
    /// drop the longitude predicate from their range query.
    #[inline]
    pub fn spans_all_longitudes(&self) -> bool {
        self.max_lng - self.min_lng >= 360.0
    }
}

/// Computes a box that fully contains the circle of `radius_km` around `center`.
///
/// The latitude half-width is `radius_km / EARTH_RADIUS_KM` converted to
/// degrees. The longitude half-width is the longitude of the circle's
/// tangent meridian, `asin(sin δ / cos φ)`. It equals `lat_delta` at the
/// equator and widens toward the poles. It is never narrower than the
/// linear estimate `lat_delta / cos φ`, so the box stays a superset of the
/// circle at every latitude.
///
/// # Poles
///
/// When the circle reaches a pole (including any query centred exactly on
/// ±90°) no meridian is tangent to it and the longitude half-width is 180°,
/// so [`BoundingBox::spans_all_longitudes`] holds. No epsilon clamping of
/// `cos φ` is done, and the result is never `NaN` or infinite for finite input.
///
/// No input validation is performed.
pub fn bounding_box(center: &GeoPoint, radius_km: f64) -> BoundingBox {
    let angular_radius = radius_km / EARTH_RADIUS_KM;
    let lat_delta = to_degrees(angular_radius);
    let lng_delta = longitude_delta(center.lat_radians(), angular_radius);

    BoundingBox {
        min_lat: center.latitude - lat_delta,
        max_lat: center.latitude + lat_delta,
        min_lng: center.longitude - lng_delta,
        max_lng: center.longitude + lng_delta,
    }
}

fn longitude_delta(lat_rad: f64, angular_radius: f64) -> f64 {
    if angular_radius >= FRAC_PI_2 - lat_rad.abs() {
        return FULL_LNG_DELTA;
    }
    to_degrees((angular_radius.sin() / lat_rad.cos()).asin())
}
