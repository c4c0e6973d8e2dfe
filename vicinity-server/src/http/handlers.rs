//! HTTP handlers for the REST API.
//!
//! Analyses are CPU bound, so they run on the blocking pool and fan out
//! over rayon from there.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
};
use geo::Point;
use geojson::FeatureCollection;
use tracing::info;
use vicinity_core::{Cancellation, ScoreReport, isochrone_with, score_all_with};

use super::dto::{
    HealthResponse, IsochroneRequest, IsochroneResponse, NeighborhoodDto,
    NeighborhoodListResponse, PoiQuery, ScoreRequest, poi_feature,
};
use super::error::AppError;
use super::state::AppState;

pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        neighborhoods: state.dataset.neighborhoods.len(),
        pois: state.dataset.pois.len(),
        running_analyses: state.running_analyses(),
    }))
}

/// GET /v1/neighborhoods
pub async fn list_neighborhoods(
    State(state): State<AppState>,
) -> HandlerResult<NeighborhoodListResponse> {
    let neighborhoods: Vec<NeighborhoodDto> = state
        .dataset
        .neighborhoods
        .iter()
        .map(NeighborhoodDto::from)
        .collect();
    let total = neighborhoods.len();

    Ok(Json(NeighborhoodListResponse {
        neighborhoods,
        total,
    }))
}

/// GET /v1/pois
///
/// Every POI as a `GeoJSON` feature, optionally limited to some categories.
pub async fn list_pois(
    State(state): State<AppState>,
    query: Result<Query<PoiQuery>, QueryRejection>,
) -> HandlerResult<FeatureCollection> {
    let Query(query) = query?;
    let categories = query.categories()?;

    let features = state
        .dataset
        .pois
        .iter()
        .filter(|poi| {
            categories
                .as_ref()
                .is_none_or(|selected| selected.contains(&poi.category))
        })
        .map(poi_feature)
        .collect();

    Ok(Json(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }))
}

/// POST /v1/scores
///
/// Scores every neighborhood and returns them ranked.
pub async fn score_neighborhoods(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> HandlerResult<ScoreReport> {
    let Json(request) = payload?;
    let params = state.defaults.resolve(
        request.categories,
        request.mode,
        request.max_time_minutes,
    )?;
    info!(
        mode = %params.mode(),
        max_time_secs = params.max_time().as_secs(),
        categories = params.categories().len(),
        "Scoring neighborhoods"
    );

    let cancellation = Cancellation::with_timeout(state.analysis_timeout);
    // Dropped with this future when the request times out or the client leaves
    let _guard = cancellation.drop_guard();
    let running = state.start_analysis();
    let dataset = state.dataset.clone();
    let report = tokio::task::spawn_blocking(move || {
        let _running = running;
        score_all_with(
            dataset.graph(params.mode()),
            &dataset.neighborhoods,
            &dataset.pois,
            &params,
            &cancellation,
        )
    })
    .await??;

    Ok(Json(match request.top {
        Some(top) => report.top(top),
        None => report,
    }))
}

/// POST /v1/isochrone
///
/// Reachable region around an arbitrary point, for map overlays.
pub async fn point_isochrone(
    State(state): State<AppState>,
    payload: Result<Json<IsochroneRequest>, JsonRejection>,
) -> HandlerResult<IsochroneResponse> {
    let Json(request) = payload?;
    if !request.x.is_finite() || !request.y.is_finite() {
        return Err(AppError::BadRequest(
            "Coordinates must be finite numbers".to_string(),
        ));
    }
    let params = state
        .defaults
        .resolve(None, request.mode, request.max_time_minutes)?;

    let cancellation = Cancellation::with_timeout(state.analysis_timeout);
    let _guard = cancellation.drop_guard();
    let running = state.start_analysis();
    let dataset = state.dataset.clone();
    let response = tokio::task::spawn_blocking(move || {
        let _running = running;
        let graph = dataset.graph(params.mode());
        let isochrone = isochrone_with(
            graph,
            &Point::new(request.x, request.y),
            &params,
            &cancellation,
        )?;
        let origin = graph.node(isochrone.origin).ok_or_else(|| {
            vicinity_core::Error::UnknownNode(format!("graph index {}", isochrone.origin.index()))
        })?;

        Ok::<_, vicinity_core::Error>(IsochroneResponse {
            origin: origin.id,
            origin_coordinates: [origin.geometry.x(), origin.geometry.y()],
            mode: params.mode(),
            max_distance: params.max_distance(),
            reachable_nodes: isochrone.reachable.len(),
            region: isochrone.region.to_geojson(),
        })
    })
    .await??;

    Ok(Json(response))
}
