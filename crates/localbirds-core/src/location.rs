//! Query origins and the `LOCALBIRDS_LOCATIONS` list format.

use serde::{Deserialize, Serialize};

use crate::geo::{validate_coordinate, GeoError};

/// Label used for a point resolved from the host's network location.
pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

/// A labelled coordinate used as the origin for one batch of queries.
///
/// The label is carried into every result derived from this point, and all
/// distances for those results are measured from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

impl QueryPoint {
    /// Creates a validated query point.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinate`] if the coordinate is out of range.
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Result<Self, GeoError> {
        validate_coordinate(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
            label: label.into(),
        })
    }

    #[must_use]
    pub fn coordinate(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl std::fmt::Display for QueryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.label, self.latitude, self.longitude)
    }
}

/// Parses a `/`-separated list of `Label: lat, lng` entries.
///
/// Blank segments are ignored, so a trailing `/` is tolerated.
///
/// ```
/// let points = localbirds_core::parse_locations("Home: 37.77, -122.42 / Lake: 37.80, -122.27").unwrap();
/// assert_eq!(points.len(), 2);
/// assert_eq!(points[1].label, "Lake");
/// ```
///
/// # Errors
///
/// Returns a human-readable reason naming the offending entry.
pub fn parse_locations(raw: &str) -> Result<Vec<QueryPoint>, String> {
    raw.split('/')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_location_entry)
        .collect()
}

fn parse_location_entry(entry: &str) -> Result<QueryPoint, String> {
    let (label, coords) = entry
        .split_once(':')
        .ok_or_else(|| format!("'{entry}' is not in 'Label: lat, lng' form"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("'{entry}' has an empty label"));
    }

    let (lat, lng) = coords
        .split_once(',')
        .ok_or_else(|| format!("'{entry}' is missing a ',' between latitude and longitude"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("'{entry}' has an invalid latitude: {e}"))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("'{entry}' has an invalid longitude: {e}"))?;

    QueryPoint::new(lat, lng, label).map_err(|e| format!("'{entry}': {e}"))
}
