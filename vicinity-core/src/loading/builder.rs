use std::collections::BTreeSet;

use geo::{ConvexHull, MultiPoint};
use log::info;

use super::config::DatasetConfig;
use super::geojson::{read_neighborhoods, read_pois};
use super::network::load_network;
use crate::{Category, Error, Neighborhood, PointOfInterest, StreetGraph, TransportMode};

/// Everything needed to score a city, loaded once and shared read-only
#[derive(Debug, Clone)]
pub struct Dataset {
    pub walk: StreetGraph,
    pub drive: StreetGraph,
    pub neighborhoods: Vec<Neighborhood>,
    pub pois: Vec<PointOfInterest>,
}

impl Dataset {
    /// Loads networks, boundaries and POIs of every category
    ///
    /// # Errors
    ///
    /// Returns an error if a path is missing or a file is invalid
    pub fn load(config: &DatasetConfig) -> Result<Self, Error> {
        validate_config(config)?;

        info!("Loading street networks");
        let (walk, drive) = rayon::join(
            || load_network(&config.walk),
            || load_network(&config.drive),
        );
        let (walk, drive) = (walk?, drive?);

        let neighborhoods = read_neighborhoods(
            &config.neighborhoods_path,
            &config.id_property,
            config.name_property.as_deref(),
        )?;
        let pois = read_pois(
            &config.pois_path,
            &config.category_property,
            &BTreeSet::from(Category::ALL),
        )?;

        validate_poi_coverage(&walk, &pois);

        info!("Dataset loaded successfully");
        Ok(Self {
            walk,
            drive,
            neighborhoods,
            pois,
        })
    }

    /// Street network travelled by `mode`
    pub fn graph(&self, mode: TransportMode) -> &StreetGraph {
        match mode {
            TransportMode::Walking => &self.walk,
            TransportMode::Driving => &self.drive,
        }
    }

    pub fn neighborhood(&self, id: &str) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|n| n.id == id)
    }
}

fn validate_config(config: &DatasetConfig) -> Result<(), Error> {
    let files = [
        &config.neighborhoods_path,
        &config.pois_path,
        &config.walk.nodes,
        &config.walk.edges,
        &config.drive.nodes,
        &config.drive.edges,
    ];

    for path in files {
        if !path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input file not found: {}", path.display()),
            )));
        }
    }

    if config.id_property.trim().is_empty() {
        return Err(Error::InvalidData(
            "Neighborhood id property must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Warns about POIs that no street node can lead to
#[allow(clippy::cast_precision_loss)]
fn validate_poi_coverage(streets: &StreetGraph, pois: &[PointOfInterest]) -> usize {
    if streets.is_empty() || pois.is_empty() {
        return 0;
    }

    let graph_nodes: MultiPoint = streets.node_points();
    let graph_hull = graph_nodes.convex_hull();

    let outside_hull = pois
        .iter()
        .filter(|poi| !poi.geometry.intersects(&graph_hull))
        .count();

    let total = pois.len();
    let percentage = (outside_hull as f64 / total as f64) * 100.0;
    if outside_hull > 0 {
        log::warn!(
            "{outside_hull} of {total} POIs ({percentage:.1}%) are outside the street network \
            coverage area. They can never be inside an isochrone. Consider using a larger \
            network extract."
        );
    }
    outside_hull
}
