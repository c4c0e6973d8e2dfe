//! Amenity reachability model for city neighborhoods.
//!
//! For every neighborhood the centroid is snapped to the street network,
//! a travel-time bounded search collects the reachable nodes, their convex
//! hull becomes the isochrone, and the points of interest inside it are
//! counted. Counts are normalized across the city and ranked.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;

pub use algo::containment::{PoiIndex, count_by_category, filter_contained};
pub use algo::isochrone::{Isochrone, isochrone, isochrone_with};
pub use algo::region::{Region, build_region};
pub use algo::scoring::{NeighborhoodScore, ScoreReport, score_all, score_all_with};
pub use loading::{Dataset, DatasetConfig};
pub use model::{
    AnalysisParameters, Category, Neighborhood, PoiGeometry, PointOfInterest, StreetGraph,
    TransportMode,
};
pub use routing::{CancelOnDrop, Cancellation, ReachableSet, reachable_set};

/// Identifier of a street node as supplied by the network provider
pub type NodeId = u64;

/// Network distance in meters
pub type Meters = f64;
