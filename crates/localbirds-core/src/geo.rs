//! Great-circle distance on a spherical earth.
//!
//! Every distance in the workspace goes through [`distance_miles`] so that
//! relative orderings stay stable across query points.

use thiserror::Error;

/// Mean earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3_958.761_3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    #[error("invalid coordinate ({lat}, {lon}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Checks that `(lat, lon)` is a finite, in-range decimal-degree pair.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinate`] when either component is out of
/// range or not finite.
pub fn validate_coordinate(lat: f64, lon: f64) -> Result<(), GeoError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinate { lat, lon })
    }
}

/// Haversine distance in miles between two `(lat, lon)` pairs.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinate`] if either point is out of range.
pub fn distance_miles(a: (f64, f64), b: (f64, f64)) -> Result<f64, GeoError> {
    validate_coordinate(a.0, a.1)?;
    validate_coordinate(b.0, b.1)?;

    let (lat1, lat2) = (a.0.to_radians(), b.0.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.1 - a.1).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Clamp guards asin against rounding just above 1.0 for antipodal points.
    let central_angle = 2.0 * h.sqrt().min(1.0).asin();

    Ok(EARTH_RADIUS_MILES * central_angle)
}
