//! Data model for neighborhood reachability analysis
//!
//! Contains the street network, points of interest, neighborhoods and
//! the parameters of a single analysis run.

pub mod neighborhood;
pub mod params;
pub mod poi;
pub mod streets;

pub use neighborhood::Neighborhood;
pub use params::{AnalysisParameters, TransportMode};
pub use poi::{Category, PoiGeometry, PointOfInterest};
pub use streets::{StreetEdge, StreetGraph, StreetNode};
