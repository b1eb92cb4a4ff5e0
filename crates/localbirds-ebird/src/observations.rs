//! Recent-observation endpoints for the eBird API client.

use localbirds_core::QueryPoint;

use crate::client::EbirdClient;
use crate::error::EbirdError;
use serde_json::Value;

use crate::types::{ObservationBatch, SourcedObservations};

impl EbirdClient {
    /// Nearest recent sightings of one species around a point.
    ///
    /// Calls `data/nearest/geo/recent/{speciesCode}`. The result is tagged
    /// with `point` so callers measure distances from the right origin.
    ///
    /// # Errors
    ///
    /// - [`EbirdError::Http`] on network failure.
    /// - [`EbirdError::UnexpectedStatus`] on a non-2xx response.
    /// - [`EbirdError::Deserialize`] if the response is not a JSON array.
    ///
    /// Array elements that do not decode are returned in `rejected`.
    pub async fn fetch_by_species_near_point(
        &self,
        species_code: &str,
        point: &QueryPoint,
        radius_km: u32,
        days_back: u32,
        max_results: u32,
        include_provisional: bool,
    ) -> Result<SourcedObservations, EbirdError> {
        let url = self.build_url(
            &["data", "nearest", "geo", "recent", species_code],
            &[
                ("lat", point.latitude.to_string()),
                ("lng", point.longitude.to_string()),
                ("dist", radius_km.to_string()),
                ("back", days_back.to_string()),
                ("maxResults", max_results.to_string()),
                ("includeProvisional", include_provisional.to_string()),
            ],
        );
        let values: Vec<Value> = self
            .request_json(&url, &format!("nearest {species_code} near {}", point.label))
            .await?;
        let batch = ObservationBatch::from_values(values);

        tracing::debug!(
            species = species_code,
            origin = %point.label,
            count = batch.observations.len(),
            rejected = batch.rejected.len(),
            "fetched nearest observations"
        );
        Ok(SourcedObservations::new(point.clone(), batch))
    }

    /// Recent sightings of one species anywhere in a region (e.g. `US-CA-085`).
    ///
    /// Calls `data/obs/{regionCode}/recent/{speciesCode}`. There is no query
    /// point here; the caller decides which point distances are measured from.
    ///
    /// # Errors
    ///
    /// - [`EbirdError::Http`] on network failure.
    /// - [`EbirdError::UnexpectedStatus`] on a non-2xx response.
    /// - [`EbirdError::Deserialize`] if the response is not a JSON array.
    ///
    /// Array elements that do not decode are returned in `rejected`.
    pub async fn fetch_by_region_and_species(
        &self,
        region_code: &str,
        species_code: &str,
        days_back: u32,
        max_results: u32,
        include_provisional: bool,
    ) -> Result<ObservationBatch, EbirdError> {
        let url = self.build_url(
            &["data", "obs", region_code, "recent", species_code],
            &[
                ("back", days_back.to_string()),
                ("maxResults", max_results.to_string()),
                ("includeProvisional", include_provisional.to_string()),
            ],
        );
        let values: Vec<Value> = self
            .request_json(&url, &format!("recent {species_code} in {region_code}"))
            .await?;
        let batch = ObservationBatch::from_values(values);

        tracing::debug!(
            species = species_code,
            region = region_code,
            count = batch.observations.len(),
            rejected = batch.rejected.len(),
            "fetched regional observations"
        );
        Ok(batch)
    }

    /// Recent notable sightings around a point, regardless of species.
    ///
    /// Calls `data/obs/geo/recent/notable`.
    ///
    /// # Errors
    ///
    /// - [`EbirdError::Http`] on network failure.
    /// - [`EbirdError::UnexpectedStatus`] on a non-2xx response.
    /// - [`EbirdError::Deserialize`] if the response is not a JSON array.
    ///
    /// Array elements that do not decode are returned in `rejected`.
    pub async fn fetch_notable_near_point(
        &self,
        point: &QueryPoint,
        radius_km: u32,
        days_back: u32,
        max_results: u32,
    ) -> Result<SourcedObservations, EbirdError> {
        let url = self.build_url(
            &["data", "obs", "geo", "recent", "notable"],
            &[
                ("lat", point.latitude.to_string()),
                ("lng", point.longitude.to_string()),
                ("dist", radius_km.to_string()),
                ("back", days_back.to_string()),
                ("maxResults", max_results.to_string()),
            ],
        );
        let values: Vec<Value> = self
            .request_json(&url, &format!("notable near {}", point.label))
            .await?;
        let batch = ObservationBatch::from_values(values);

        tracing::debug!(
            origin = %point.label,
            count = batch.observations.len(),
            rejected = batch.rejected.len(),
            "fetched notable observations"
        );
        Ok(SourcedObservations::new(point.clone(), batch))
    }
}
