// Re-export key components
pub use crate::algo::containment::{PoiIndex, count_by_category, filter_contained};
pub use crate::algo::isochrone::{Isochrone, isochrone, isochrone_with};
pub use crate::algo::region::{Region, build_region};
pub use crate::algo::scoring::{NeighborhoodScore, ScoreReport, score_all, score_all_with};
pub use crate::loading::{
    BoundaryProvider, Dataset, DatasetConfig, GraphProvider, NetworkFiles, PoiProvider,
};
pub use crate::model::{
    AnalysisParameters, Category, Neighborhood, PoiGeometry, PointOfInterest, StreetEdge,
    StreetGraph, StreetNode, TransportMode,
};
pub use crate::routing::{CancelOnDrop, Cancellation, ReachableSet, reachable_set};

pub use crate::Error;

// Core types for the street network
pub use crate::Meters;
pub use crate::NodeId;
