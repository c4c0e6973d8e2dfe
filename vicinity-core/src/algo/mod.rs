//! Isochrone construction and amenity scoring on top of the routing engine

pub mod containment;
pub mod isochrone;
pub mod region;
pub mod scoring;
