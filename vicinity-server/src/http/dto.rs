//! Request and response bodies of the REST API

use std::collections::BTreeSet;

use geojson::{Feature, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::json;
use vicinity_core::{Category, Meters, Neighborhood, NodeId, PointOfInterest, TransportMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub neighborhoods: usize,
    pub pois: usize,
    pub running_analyses: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodDto {
    pub id: String,
    pub name: Option<String>,
    /// `[x, y]` of the analysis origin before snapping
    pub centroid: Option<[f64; 2]>,
    pub boundary: geojson::Geometry,
}

impl From<&Neighborhood> for NeighborhoodDto {
    fn from(neighborhood: &Neighborhood) -> Self {
        Self {
            id: neighborhood.id.clone(),
            name: neighborhood.name.clone(),
            centroid: neighborhood.centroid().map(|point| [point.x(), point.y()]),
            boundary: geojson::Geometry::new(geojson::Value::from(&neighborhood.boundary)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodListResponse {
    pub neighborhoods: Vec<NeighborhoodDto>,
    pub total: usize,
}

/// Query of `GET /v1/pois`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoiQuery {
    /// Comma separated categories, all of them when absent
    #[serde(default)]
    pub categories: Option<String>,
}

impl PoiQuery {
    /// # Errors
    ///
    /// Returns an error for an unknown category name
    pub fn categories(&self) -> Result<Option<BTreeSet<Category>>, vicinity_core::Error> {
        self.categories
            .as_deref()
            .map(|list| {
                list.split(',')
                    .filter(|name| !name.trim().is_empty())
                    .map(str::parse::<Category>)
                    .collect::<Result<BTreeSet<_>, _>>()
            })
            .transpose()
    }
}

/// POI as a map feature with its category and name as properties
pub fn poi_feature(poi: &PointOfInterest) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("category".to_string(), json!(poi.category));
    properties.insert("name".to_string(), json!(poi.name));

    Feature {
        bbox: None,
        geometry: Some(poi.geometry.to_geojson()),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Body of `POST /v1/scores`. Missing fields use the configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreRequest {
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[serde(default)]
    pub mode: Option<TransportMode>,
    #[serde(default)]
    pub max_time_minutes: Option<f64>,
    /// Only return the best `top` neighborhoods
    #[serde(default)]
    pub top: Option<usize>,
}

/// Body of `POST /v1/isochrone`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IsochroneRequest {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub mode: Option<TransportMode>,
    #[serde(default)]
    pub max_time_minutes: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsochroneResponse {
    /// Street node the point was snapped to
    pub origin: NodeId,
    pub origin_coordinates: [f64; 2],
    pub mode: TransportMode,
    pub max_distance: Meters,
    pub reachable_nodes: usize,
    pub region: geojson::Geometry,
}
