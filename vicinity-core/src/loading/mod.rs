//! This module is responsible for loading street networks, neighborhood
//! boundaries and points of interest, and for exposing them to the
//! analysis through provider traits.

mod builder;
mod config;
pub mod geojson;
pub mod network;

use std::collections::BTreeSet;

pub use builder::Dataset;
pub use config::{DatasetConfig, NetworkFiles};

use crate::{Category, Error, Neighborhood, PointOfInterest, StreetGraph, TransportMode};

/// Source of the street network variant for a transport mode
pub trait GraphProvider {
    /// # Errors
    ///
    /// Returns an error if the network cannot be produced
    fn graph(&self, mode: TransportMode) -> Result<StreetGraph, Error>;
}

/// Source of neighborhood boundaries
pub trait BoundaryProvider {
    /// # Errors
    ///
    /// Returns an error if the boundaries cannot be produced
    fn neighborhoods(&self) -> Result<Vec<Neighborhood>, Error>;
}

/// Source of points of interest
pub trait PoiProvider {
    /// POIs belonging to any of `categories`
    ///
    /// # Errors
    ///
    /// Returns an error if the POIs cannot be produced
    fn pois(&self, categories: &BTreeSet<Category>) -> Result<Vec<PointOfInterest>, Error>;
}

/// Reads the files on every call
impl GraphProvider for DatasetConfig {
    fn graph(&self, mode: TransportMode) -> Result<StreetGraph, Error> {
        network::load_network(self.network(mode))
    }
}

impl BoundaryProvider for DatasetConfig {
    fn neighborhoods(&self) -> Result<Vec<Neighborhood>, Error> {
        geojson::read_neighborhoods(
            &self.neighborhoods_path,
            &self.id_property,
            self.name_property.as_deref(),
        )
    }
}

impl PoiProvider for DatasetConfig {
    fn pois(&self, categories: &BTreeSet<Category>) -> Result<Vec<PointOfInterest>, Error> {
        geojson::read_pois(&self.pois_path, &self.category_property, categories)
    }
}

impl GraphProvider for Dataset {
    fn graph(&self, mode: TransportMode) -> Result<StreetGraph, Error> {
        Ok(Dataset::graph(self, mode).clone())
    }
}

impl BoundaryProvider for Dataset {
    fn neighborhoods(&self) -> Result<Vec<Neighborhood>, Error> {
        Ok(self.neighborhoods.clone())
    }
}

impl PoiProvider for Dataset {
    fn pois(&self, categories: &BTreeSet<Category>) -> Result<Vec<PointOfInterest>, Error> {
        Ok(self
            .pois
            .iter()
            .filter(|poi| categories.contains(&poi.category))
            .cloned()
            .collect())
    }
}
