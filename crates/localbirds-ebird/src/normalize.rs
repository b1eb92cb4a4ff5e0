//! Normalization of eBird observations into [`ObservationResult`]s.

use chrono::{NaiveDate, NaiveDateTime};
use localbirds_core::{distance_miles, GeoError, ObservationResult, QueryPoint};
use thiserror::Error;

use crate::checklist::{extract_comment, has_photo};
use crate::species::SpeciesTable;
use crate::types::{ChecklistDetail, RawObservation};

/// Public checklist page; the submission id is appended.
pub const CHECKLIST_URL_PREFIX: &str = "https://ebird.org/checklist/";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("observation {sub_id} is missing required field '{field}'")]
    MissingField { sub_id: String, field: &'static str },

    #[error("observation {sub_id} has unparsable obsDt '{value}'")]
    InvalidTimestamp { sub_id: String, value: String },

    #[error("observation {sub_id}: {source}")]
    Geo {
        sub_id: String,
        #[source]
        source: GeoError,
    },

    #[error("observation #{index} ({sub_id}) could not be decoded: {reason}")]
    Undecodable {
        index: usize,
        sub_id: String,
        reason: String,
    },
}

/// Parses eBird's `obsDt`, which is `"YYYY-MM-DD HH:MM"` or a bare date.
///
/// A bare date maps to midnight.
#[must_use]
pub fn parse_observation_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Builds the canonical record for one observation.
///
/// Distance is measured from `origin` and truncated to whole miles. The
/// display name comes from `comName` when present, otherwise from `species`,
/// otherwise the bare species code. Count defaults to 1 when eBird omits
/// `howMany`.
///
/// # Errors
///
/// - [`NormalizeError::MissingField`] when `subId`, `speciesCode`, `lat`,
///   `lng`, `obsDt`, or `locName` is absent.
/// - [`NormalizeError::InvalidTimestamp`] when `obsDt` does not parse.
/// - [`NormalizeError::Geo`] when the coordinates are out of range.
pub fn normalize(
    raw: &RawObservation,
    origin: &QueryPoint,
    checklist: &ChecklistDetail,
    species: &SpeciesTable,
) -> Result<ObservationResult, NormalizeError> {
    let sub_id = raw.sub_id.as_deref().ok_or(NormalizeError::MissingField {
        sub_id: "<unknown>".to_string(),
        field: "subId",
    })?;
    let missing = |field: &'static str| NormalizeError::MissingField {
        sub_id: sub_id.to_string(),
        field,
    };

    let species_code = raw.species_code.as_deref().ok_or_else(|| missing("speciesCode"))?;
    let lat = raw.lat.ok_or_else(|| missing("lat"))?;
    let lng = raw.lng.ok_or_else(|| missing("lng"))?;
    let obs_dt = raw.obs_dt.as_deref().ok_or_else(|| missing("obsDt"))?;
    let location_name = raw.loc_name.as_deref().ok_or_else(|| missing("locName"))?;

    let observed_at =
        parse_observation_date(obs_dt).ok_or_else(|| NormalizeError::InvalidTimestamp {
            sub_id: sub_id.to_string(),
            value: obs_dt.to_string(),
        })?;

    let distance = distance_miles(origin.coordinate(), (lat, lng)).map_err(|source| {
        NormalizeError::Geo {
            sub_id: sub_id.to_string(),
            source,
        }
    })?;
    // Truncation, not rounding; haversine never returns a negative value.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let distance_miles = distance as u32;

    let species_name = raw
        .com_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| species.name(species_code))
        .unwrap_or(species_code)
        .to_string();

    Ok(ObservationResult {
        origin: origin.label.clone(),
        species: species_name,
        distance_miles,
        count: raw.how_many.unwrap_or(1),
        observed_at,
        location_name: location_name.to_string(),
        comment: extract_comment(checklist, species_code).map(str::to_string),
        has_photo: has_photo(checklist, species_code),
        checklist_url: format!("{CHECKLIST_URL_PREFIX}{sub_id}"),
    })
}
