//! WASM bindings for the geo crate.
//!
//! These bindings let the web and mobile clients run the same distance and
//! proximity logic as the server, from JavaScript/TypeScript.

use crate::proximity::{search, LocatedItem, ProximityQuery};
use crate::{
    bounding_box, distance_km, is_valid_coordinate, is_within_radius, parse_postgis_value,
    to_point_wkt_with_precision, GeoPoint, DEFAULT_WKT_PRECISION,
};
use wasm_bindgen::prelude::*;

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

/// Distance in kilometers between two coordinates.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    distance_km(&GeoPoint::new(lat1, lng1), &GeoPoint::new(lat2, lng2))
}

#[wasm_bindgen(js_name = isWithinRadius)]
pub fn within_radius(center_lat: f64, center_lng: f64, lat: f64, lng: f64, radius_km: f64) -> bool {
    is_within_radius(
        &GeoPoint::new(center_lat, center_lng),
        &GeoPoint::new(lat, lng),
        radius_km,
    )
}

#[wasm_bindgen(js_name = isValidCoordinate)]
pub fn valid_coordinate(latitude: f64, longitude: f64) -> bool {
    is_valid_coordinate(latitude, longitude)
}

/// EWKT point string; `precision` defaults to 4 when omitted.
#[wasm_bindgen(js_name = toPointWkt)]
pub fn point_wkt(latitude: f64, longitude: f64, precision: Option<u32>) -> String {
    let precision = precision.map_or(DEFAULT_WKT_PRECISION, |p| p as usize);
    to_point_wkt_with_precision(latitude, longitude, precision)
}

/// Parse a PostGIS location and return coordinates.
///
/// # Arguments
/// * `location_json` - JSON string of location (GeoJSON or WKT string)
///
/// # Returns
/// JSON string with latitude/longitude, or `null` if parsing fails
#[wasm_bindgen(js_name = parseLocation)]
pub fn parse_location(location_json: &str) -> Result<String, JsValue> {
    let value: serde_json::Value =
        serde_json::from_str(location_json).map_err(|e| js_error("JSON parse error", e))?;

    match parse_postgis_value(&value) {
        Some(point) => serde_json::to_string(&point).map_err(|e| js_error("JSON serialize error", e)),
        None => Ok("null".to_string()),
    }
}

/// Bounding box as a JSON object with `minLat`, `maxLat`, `minLng`, `maxLng`.
#[wasm_bindgen(js_name = boundingBox)]
pub fn bbox(latitude: f64, longitude: f64, radius_km: f64) -> Result<String, JsValue> {
    serde_json::to_string(&bounding_box(&GeoPoint::new(latitude, longitude), radius_km))
        .map_err(|e| js_error("JSON serialize error", e))
}

/// Rows within `radius_km`, closest first.
///
/// # Arguments
/// * `items_json` - JSON array of `{id, location}` rows
/// * `max_results` - Maximum results to return (0 for all)
///
/// # Returns
/// JSON array of `{id, distance_km}`
#[wasm_bindgen]
pub fn nearby(
    user_lat: f64,
    user_lng: f64,
    items_json: &str,
    radius_km: f64,
    max_results: u32,
) -> Result<String, JsValue> {
    let items: Vec<LocatedItem> =
        serde_json::from_str(items_json).map_err(|e| js_error("JSON parse error", e))?;

    let mut query = ProximityQuery::new(GeoPoint::new(user_lat, user_lng)).with_radius_km(radius_km);
    if max_results > 0 {
        query = query.with_limit(max_results as usize);
    }

    let matches = search(&query, &items).map_err(|e| js_error("Search error", e))?;

    serde_json::to_string(&matches).map_err(|e| js_error("JSON serialize error", e))
}
