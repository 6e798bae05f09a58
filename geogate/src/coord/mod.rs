//! Coordinate types and great-circle math
//!
//! Provides the geographic primitives shared by the asset cache, the spatial
//! query engine and the proximity gate: points, bounding boxes, the dataset's
//! admissible region, and haversine distances on a spherical Earth.

mod types;


pub use types::{
    AdmissibleRegion, BoundingBox, CoordError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude in kilometers.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Validates that coordinates are inside the world range.
///
/// NaN fails both checks and is reported as an invalid latitude first.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    Ok(())
}

/// Great-circle distance between two points, in kilometers.
///
/// Haversine formula:
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)`,
/// `d = 2R·atan2(√a, √(1−a))` with `R` = [`EARTH_RADIUS_KM`].
///
/// # Example
///
/// ```
/// use geogate::coord::calculate_distance;
///
/// // One degree of latitude is ~111.2 km
/// let d = calculate_distance(40.0, -74.0, 41.0, -74.0);
/// assert!((d - 111.19).abs() < 0.1);
/// ```
#[inline]
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two points, in meters.
#[inline]
pub fn distance_meters(from: GeoPoint, to: GeoPoint) -> f64 {
    calculate_distance(from.latitude, from.longitude, to.latitude, to.longitude) * 1000.0
}

/// Derives the coarse bounding box that encloses a circle of `radius_km`.
///
/// Uses the flat approximation `lat_delta = r / 111` and
/// `lon_delta = r / (111 · cos(lat))`. The box over-includes its corners
/// relative to the true circle, so callers must still filter by distance.
pub fn bounds_around(center: GeoPoint, radius_km: f64) -> Result<BoundingBox, CoordError> {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let lon_delta = radius_km / (KM_PER_DEGREE * (center.latitude * DEG_TO_RAD).cos());

    BoundingBox::new(
        center.latitude + lat_delta,
        center.latitude - lat_delta,
        center.longitude + lon_delta,
        center.longitude - lon_delta,
    )
}
