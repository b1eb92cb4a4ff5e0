//! eBird API response types.
//!
//! Observation endpoints return a bare JSON array of observation objects; the
//! checklist endpoint returns one object with an `obs` array. Every field is
//! optional here because eBird omits fields freely (notably `howMany` for
//! "X" counts). Presence is enforced later by [`crate::normalize`].
//!
//! Observation arrays are decoded one element at a time through
//! [`ObservationBatch::from_values`], so a single mistyped entry is rejected
//! on its own instead of failing the whole response.

use std::collections::HashMap;

use localbirds_core::QueryPoint;
use serde::Deserialize;
use serde_json::Value;

use crate::normalize::NormalizeError;

/// Media-count key eBird uses for photos.
pub const PHOTO_MEDIA_KEY: &str = "P";

/// One observation from `data/obs/...` or `data/nearest/...`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    #[serde(default)]
    pub species_code: Option<String>,
    #[serde(default)]
    pub com_name: Option<String>,
    #[serde(default)]
    pub sci_name: Option<String>,
    #[serde(default)]
    pub loc_id: Option<String>,
    #[serde(default)]
    pub loc_name: Option<String>,
    /// `"YYYY-MM-DD HH:MM"`, or just `"YYYY-MM-DD"` when no time was recorded.
    #[serde(default)]
    pub obs_dt: Option<String>,
    #[serde(default)]
    pub how_many: Option<u32>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub obs_valid: Option<bool>,
    #[serde(default)]
    pub obs_reviewed: Option<bool>,
    #[serde(default)]
    pub location_private: Option<bool>,
    #[serde(default)]
    pub sub_id: Option<String>,
    #[serde(default)]
    pub media_counts: Option<HashMap<String, u64>>,
}

/// Decoded elements of one observation array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationBatch {
    pub observations: Vec<RawObservation>,
    /// Elements that were not observation objects, in response order.
    pub rejected: Vec<NormalizeError>,
}

impl ObservationBatch {
    /// Decodes each array element independently.
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut batch = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            let sub_id = value
                .get("subId")
                .and_then(Value::as_str)
                .unwrap_or("<unknown>")
                .to_string();
            match serde_json::from_value::<RawObservation>(value) {
                Ok(raw) => batch.observations.push(raw),
                Err(e) => batch.rejected.push(NormalizeError::Undecodable {
                    index,
                    sub_id,
                    reason: e.to_string(),
                }),
            }
        }
        batch
    }
}

/// Observations paired with the query point they were fetched around.
///
/// Distances for these observations must be measured from `origin`.
/// `rejected` holds array elements that could not be decoded.
#[derive(Debug, Clone)]
pub struct SourcedObservations {
    pub origin: QueryPoint,
    pub observations: Vec<RawObservation>,
    pub rejected: Vec<NormalizeError>,
}

impl SourcedObservations {
    #[must_use]
    pub fn new(origin: QueryPoint, batch: ObservationBatch) -> Self {
        Self {
            origin,
            observations: batch.observations,
            rejected: batch.rejected,
        }
    }
}

/// Response of `product/checklist/view/{subId}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDetail {
    #[serde(default)]
    pub sub_id: Option<String>,
    #[serde(default)]
    pub loc_id: Option<String>,
    #[serde(default)]
    pub obs_dt: Option<String>,
    #[serde(default)]
    pub obs: Vec<ChecklistEntry>,
}

/// A single species line on a checklist.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistEntry {
    #[serde(default)]
    pub species_code: Option<String>,
    #[serde(default)]
    pub how_many_str: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub media_counts: Option<HashMap<String, u64>>,
}
