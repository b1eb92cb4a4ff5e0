//! Query planning: which eBird requests a run issues.

use localbirds_core::{AppConfig, FilterMode, QueryPoint};
use serde::Serialize;

/// One eBird request the pipeline will issue, with the point its results are
/// measured from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannedQuery {
    /// `data/nearest/geo/recent/{species}` around `point`.
    NearestBySpecies {
        species_code: String,
        point: QueryPoint,
        max_results: u32,
    },
    /// `data/obs/{region}/recent/{species}`; distances use `reference`.
    RegionBySpecies {
        region_code: String,
        species_code: String,
        reference: QueryPoint,
    },
    /// `data/obs/geo/recent/notable` around `point`.
    NotableNearPoint { point: QueryPoint },
}

impl PlannedQuery {
    /// The point every result of this query is measured from and labelled with.
    #[must_use]
    pub fn origin(&self) -> &QueryPoint {
        match self {
            PlannedQuery::NearestBySpecies { point, .. }
            | PlannedQuery::NotableNearPoint { point } => point,
            PlannedQuery::RegionBySpecies { reference, .. } => reference,
        }
    }
}

impl std::fmt::Display for PlannedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlannedQuery::NearestBySpecies {
                species_code,
                point,
                ..
            } => write!(f, "nearest {species_code} near {point}"),
            PlannedQuery::RegionBySpecies {
                region_code,
                species_code,
                reference,
            } => write!(
                f,
                "recent {species_code} in {region_code} (distances from {})",
                reference.label
            ),
            PlannedQuery::NotableNearPoint { point } => write!(f, "notable near {point}"),
        }
    }
}

/// Expands configuration and resolved points into the list of queries.
///
/// Species mode issues one nearest-sighting query per species and point, in
/// species-major order. With a region code configured it issues one regional
/// query per species instead, measured from the first point. Notable mode
/// issues one notable query per point followed by nearest-sighting queries for
/// the supplementary species, capped at `supplementary_max_results`.
///
/// No points means no queries.
#[must_use]
pub fn build_query_plan(config: &AppConfig, points: &[QueryPoint]) -> Vec<PlannedQuery> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    match config.filter_mode {
        FilterMode::Species => match &config.region_code {
            Some(region_code) => config
                .species_codes
                .iter()
                .map(|code| PlannedQuery::RegionBySpecies {
                    region_code: region_code.clone(),
                    species_code: code.clone(),
                    reference: first.clone(),
                })
                .collect(),
            None => nearest_queries(&config.species_codes, points, config.max_results),
        },
        FilterMode::Notable => {
            let mut plan: Vec<PlannedQuery> = points
                .iter()
                .map(|point| PlannedQuery::NotableNearPoint {
                    point: point.clone(),
                })
                .collect();
            plan.extend(nearest_queries(
                &config.additional_species_codes,
                points,
                config.supplementary_max_results,
            ));
            plan
        }
    }
}

fn nearest_queries(codes: &[String], points: &[QueryPoint], max_results: u32) -> Vec<PlannedQuery> {
    codes
        .iter()
        .flat_map(|code| {
            points.iter().map(move |point| PlannedQuery::NearestBySpecies {
                species_code: code.clone(),
                point: point.clone(),
                max_results,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
