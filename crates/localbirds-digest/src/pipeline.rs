//! Aggregation pipeline: plan, fetch, enrich, normalize, sort.
//!
//! Queries and checklist fetches share one concurrency cap
//! (`max_concurrent_requests`). Each unit of work yields its own `Result`, so
//! one failure never cancels its siblings; the configured [`FailurePolicy`]
//! decides whether a failure ends the run or is recorded and skipped.

use std::pin::pin;

use futures::stream::{self, StreamExt};
use localbirds_core::{sort_results, AppConfig, FailurePolicy, ObservationResult, QueryPoint};
use localbirds_ebird::{
    normalize, EbirdClient, NormalizeError, RawObservation, SourcedObservations, SpeciesTable,
};

use crate::error::PipelineError;
use crate::plan::{build_query_plan, PlannedQuery};

/// Outcome of one digest run.
#[derive(Debug)]
pub struct DigestRun {
    /// Sorted by species, then origin label, then distance.
    pub results: Vec<ObservationResult>,
    pub planned_queries: usize,
    /// Failures skipped under [`FailurePolicy::SkipAndContinue`].
    pub failures: Vec<PipelineError>,
}

impl DigestRun {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Runs every planned query and returns the combined, sorted result set.
///
/// Every raw observation gets its checklist fetched so the comment and photo
/// flag can be filled in. The same sighting reached from two query points
/// yields two results, each measured from its own origin. Zero results is a
/// successful, empty run.
///
/// # Errors
///
/// Under [`FailurePolicy::Abort`] the first failing query, checklist fetch,
/// or malformed observation is returned as a [`PipelineError`]. Under
/// [`FailurePolicy::SkipAndContinue`] this function does not fail; failures
/// are logged and collected in [`DigestRun::failures`].
pub async fn run(
    client: &EbirdClient,
    config: &AppConfig,
    points: &[QueryPoint],
    species: &SpeciesTable,
) -> Result<DigestRun, PipelineError> {
    let plan = build_query_plan(config, points);
    let max_concurrent = config.max_concurrent_requests.max(1);
    let mut failures: Vec<PipelineError> = Vec::new();

    tracing::info!(
        queries = plan.len(),
        mode = %config.filter_mode,
        max_concurrent,
        "starting digest run"
    );

    let mut fetched: Vec<(usize, SourcedObservations)> = Vec::with_capacity(plan.len());
    {
        let mut queries = pin!(stream::iter(plan.iter().cloned().enumerate())
            .map(|(idx, query)| async move {
                let outcome = execute_query(client, config, &query).await;
                (idx, outcome)
            })
            .buffer_unordered(max_concurrent));

        while let Some((idx, outcome)) = queries.next().await {
            match outcome {
                Ok(mut sourced) => {
                    for rejected in std::mem::take(&mut sourced.rejected) {
                        record_failure(config.on_error, rejected.into(), &mut failures)?;
                    }
                    fetched.push((idx, sourced));
                }
                Err(err) => record_failure(config.on_error, err, &mut failures)?,
            }
        }
    }

    let pending = fetched.into_iter().flat_map(|(query_idx, sourced)| {
        let origin = sourced.origin;
        sourced
            .observations
            .into_iter()
            .enumerate()
            .map(move |(obs_idx, raw)| ((query_idx, obs_idx), origin.clone(), raw))
    });

    let mut keyed: Vec<((usize, usize), ObservationResult)> = Vec::new();
    {
        let mut enriched = pin!(stream::iter(pending)
            .map(|(key, origin, raw)| async move {
                let outcome = enrich(client, &origin, &raw, species).await;
                (key, outcome)
            })
            .buffer_unordered(max_concurrent));

        while let Some((key, outcome)) = enriched.next().await {
            match outcome {
                Ok(result) => keyed.push((key, result)),
                Err(err) => record_failure(config.on_error, err, &mut failures)?,
            }
        }
    }

    // Completion order is arbitrary; restore plan order before the stable sort.
    keyed.sort_by_key(|(key, _)| *key);
    let mut results: Vec<ObservationResult> = keyed.into_iter().map(|(_, r)| r).collect();
    sort_results(&mut results);

    if !failures.is_empty() {
        tracing::warn!(
            failed = failures.len(),
            results = results.len(),
            "digest run finished with skipped failures"
        );
    }
    tracing::info!(
        results = results.len(),
        queries = plan.len(),
        "digest run complete"
    );

    Ok(DigestRun {
        results,
        planned_queries: plan.len(),
        failures,
    })
}

async fn execute_query(
    client: &EbirdClient,
    config: &AppConfig,
    query: &PlannedQuery,
) -> Result<SourcedObservations, PipelineError> {
    let radius_km = config.max_distance_km();
    let outcome = match query {
        PlannedQuery::NearestBySpecies {
            species_code,
            point,
            max_results,
        } => {
            client
                .fetch_by_species_near_point(
                    species_code,
                    point,
                    radius_km,
                    config.days_back,
                    *max_results,
                    config.include_provisional,
                )
                .await
        }
        PlannedQuery::RegionBySpecies {
            region_code,
            species_code,
            reference,
        } => client
            .fetch_by_region_and_species(
                region_code,
                species_code,
                config.days_back,
                config.max_results,
                config.include_provisional,
            )
            .await
            .map(|batch| SourcedObservations::new(reference.clone(), batch)),
        PlannedQuery::NotableNearPoint { point } => {
            client
                .fetch_notable_near_point(point, radius_km, config.days_back, config.max_results)
                .await
        }
    };

    outcome.map_err(|source| PipelineError::SourceFetch {
        query: query.clone(),
        source,
    })
}

async fn enrich(
    client: &EbirdClient,
    origin: &QueryPoint,
    raw: &RawObservation,
    species: &SpeciesTable,
) -> Result<ObservationResult, PipelineError> {
    let Some(sub_id) = raw.sub_id.as_deref() else {
        return Err(NormalizeError::MissingField {
            sub_id: "<unknown>".to_string(),
            field: "subId",
        }
        .into());
    };

    let checklist = client
        .fetch_checklist(sub_id)
        .await
        .map_err(|source| PipelineError::Checklist {
            sub_id: sub_id.to_string(),
            source,
        })?;

    Ok(normalize(raw, origin, &checklist, species)?)
}

fn record_failure(
    policy: FailurePolicy,
    err: PipelineError,
    failures: &mut Vec<PipelineError>,
) -> Result<(), PipelineError> {
    match policy {
        FailurePolicy::Abort => {
            tracing::error!(error = %err, "aborting digest run");
            Err(err)
        }
        FailurePolicy::SkipAndContinue => {
            tracing::warn!(error = %err, "skipping failed work item");
            failures.push(err);
            Ok(())
        }
    }
}
