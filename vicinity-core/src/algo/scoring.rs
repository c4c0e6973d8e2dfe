//! Amenity scores for every neighborhood of a city.
//!
//! Each neighborhood is an independent task: its centroid is snapped to the
//! street network, an isochrone is built for the travel-time budget and the
//! selected POIs inside it are counted. A failing neighborhood is logged and
//! scored 0 without affecting the others. Only cancellation aborts the run.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use super::containment::{PoiIndex, count_by_category};
use super::isochrone::Isochrone;
use crate::routing::Cancellation;
use crate::{
    AnalysisParameters, Category, Error, Neighborhood, NodeId, PointOfInterest, StreetGraph,
    TransportMode,
};

/// Result for a single neighborhood
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodScore {
    pub id: String,
    pub name: Option<String>,
    /// Number of selected POIs inside the isochrone
    pub raw_score: usize,
    /// `raw_score` divided by the best raw score of the run
    pub normalized_score: f64,
    pub by_category: BTreeMap<Category, usize>,
    /// Street node the centroid was snapped to
    pub origin: Option<NodeId>,
    pub reachable_nodes: usize,
    /// Cause of a failed computation; the score is 0 in that case
    pub failure: Option<String>,
}

impl NeighborhoodScore {
    fn empty(neighborhood: &Neighborhood, categories: &BTreeSet<Category>) -> Self {
        Self {
            id: neighborhood.id.clone(),
            name: neighborhood.name.clone(),
            raw_score: 0,
            normalized_score: 0.0,
            by_category: categories.iter().map(|&category| (category, 0)).collect(),
            origin: None,
            reachable_nodes: 0,
            failure: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Ranked scores of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub mode: TransportMode,
    pub max_time_seconds: f64,
    pub categories: BTreeSet<Category>,
    pub max_raw_score: usize,
    /// Sorted by raw score descending, then by id
    pub entries: Vec<NeighborhoodScore>,
}

impl ScoreReport {
    /// Keeps only the best `n` neighborhoods
    #[must_use]
    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    pub fn get(&self, id: &str) -> Option<&NeighborhoodScore> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn failures(&self) -> impl Iterator<Item = &NeighborhoodScore> {
        self.entries.iter().filter(|entry| entry.is_failed())
    }
}

/// Scores every neighborhood against the POIs of the selected categories.
///
/// `graph` must be the network matching `params.mode()`.
///
/// # Errors
///
/// Per-neighborhood failures never escape, so this currently always
/// succeeds; see [`score_all_with`] for the cancellable variant.
pub fn score_all(
    graph: &StreetGraph,
    neighborhoods: &[Neighborhood],
    pois: &[PointOfInterest],
    params: &AnalysisParameters,
) -> Result<ScoreReport, Error> {
    score_all_with(graph, neighborhoods, pois, params, &Cancellation::new())
}

/// Same as [`score_all`], observing `cancellation`.
///
/// # Errors
///
/// `Cancelled` when the handle trips before every neighborhood is done.
pub fn score_all_with(
    graph: &StreetGraph,
    neighborhoods: &[Neighborhood],
    pois: &[PointOfInterest],
    params: &AnalysisParameters,
    cancellation: &Cancellation,
) -> Result<ScoreReport, Error> {
    let started = Instant::now();
    let categories = params.categories();

    let entries: Vec<NeighborhoodScore> = if categories.is_empty() {
        info!("No POI categories selected, every neighborhood scores 0");
        neighborhoods
            .iter()
            .map(|neighborhood| NeighborhoodScore::empty(neighborhood, categories))
            .collect()
    } else {
        let index = PoiIndex::for_categories(pois, categories);
        info!(
            "Scoring {} neighborhoods against {} POIs ({} within {} min)",
            neighborhoods.len(),
            index.len(),
            params.mode(),
            params.max_time().as_secs() / 60
        );

        neighborhoods
            .par_iter()
            .map(|neighborhood| {
                match score_neighborhood(graph, neighborhood, &index, params, cancellation) {
                    Ok(score) => Ok(score),
                    Err(Error::Cancelled) => Err(Error::Cancelled),
                    Err(err) => {
                        warn!("Scoring neighborhood {} failed: {err}", neighborhood.id);
                        let mut score = NeighborhoodScore::empty(neighborhood, categories);
                        score.failure = Some(err.to_string());
                        Ok(score)
                    }
                }
            })
            .collect::<Result<Vec<_>, Error>>()?
    };

    let (max_raw_score, entries) = rank(entries);

    info!(
        "Scored {} neighborhoods in {:.2?}, best raw score {max_raw_score}",
        entries.len(),
        started.elapsed()
    );

    Ok(ScoreReport {
        mode: params.mode(),
        max_time_seconds: params.max_time().as_secs_f64(),
        categories: categories.clone(),
        max_raw_score,
        entries,
    })
}

fn score_neighborhood(
    graph: &StreetGraph,
    neighborhood: &Neighborhood,
    index: &PoiIndex,
    params: &AnalysisParameters,
    cancellation: &Cancellation,
) -> Result<NeighborhoodScore, Error> {
    if cancellation.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let centroid = neighborhood.centroid().ok_or_else(|| {
        Error::InvalidData(format!("Neighborhood {} has no centroid", neighborhood.id))
    })?;

    let origin = graph.nearest_node(&centroid)?;
    let origin_id = graph.node(origin).map_or_else(NodeId::default, |node| node.id);
    if graph.out_degree(origin) == 0 {
        return Err(Error::DisconnectedOrigin(origin_id));
    }

    let isochrone = Isochrone::from_origin(graph, origin, params.max_distance(), cancellation)?;
    let matches = index.contained(&isochrone.region);

    let mut score = NeighborhoodScore::empty(neighborhood, params.categories());
    score.raw_score = matches.len();
    score.by_category.extend(count_by_category(matches));
    score.origin = Some(origin_id);
    score.reachable_nodes = isochrone.reachable.len();

    Ok(score)
}

/// Normalizes against the best raw score and sorts the entries
#[allow(clippy::cast_precision_loss)]
fn rank(mut entries: Vec<NeighborhoodScore>) -> (usize, Vec<NeighborhoodScore>) {
    let max_raw_score = entries
        .iter()
        .map(|entry| entry.raw_score)
        .max()
        .unwrap_or(0);

    for entry in &mut entries {
        entry.normalized_score = if max_raw_score == 0 {
            0.0
        } else {
            entry.raw_score as f64 / max_raw_score as f64
        };
    }

    entries.sort_by(|a, b| {
        b.raw_score
            .cmp(&a.raw_score)
            .then_with(|| a.id.cmp(&b.id))
    });

    (max_raw_score, entries)
}
