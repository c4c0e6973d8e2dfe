//! Isochrone of a single origin: snapped node, reachable set and hull

use geo::Point;
use petgraph::graph::NodeIndex;

use super::region::{Region, build_region};
use crate::routing::{Cancellation, ReachableSet, reachable_set_with};
use crate::{AnalysisParameters, Error, Meters, NodeId, StreetGraph};

#[derive(Debug, Clone)]
pub struct Isochrone {
    pub origin: NodeIndex,
    pub reachable: ReachableSet,
    pub region: Region,
}

impl Isochrone {
    /// Expands from an already snapped origin node
    ///
    /// # Errors
    ///
    /// Propagates routing errors and `Cancelled`.
    pub fn from_origin(
        graph: &StreetGraph,
        origin: NodeIndex,
        max_distance: Meters,
        cancellation: &Cancellation,
    ) -> Result<Self, Error> {
        let reachable = reachable_set_with(graph, origin, max_distance, cancellation)?;
        let region = build_region(&reachable.coordinates(graph))?;

        Ok(Self {
            origin,
            reachable,
            region,
        })
    }

    /// Provider id of the origin node
    pub fn origin_id(&self, graph: &StreetGraph) -> Option<NodeId> {
        graph.node(self.origin).map(|node| node.id)
    }
}

/// Isochrone around an arbitrary point, snapped to the closest street node.
///
/// # Errors
///
/// `NoNodes` on an empty graph, otherwise see [`Isochrone::from_origin`].
pub fn isochrone(
    graph: &StreetGraph,
    point: &Point<f64>,
    params: &AnalysisParameters,
) -> Result<Isochrone, Error> {
    isochrone_with(graph, point, params, &Cancellation::new())
}

/// Same as [`isochrone`], observing `cancellation`.
///
/// # Errors
///
/// See [`isochrone`]; also `Cancelled`.
pub fn isochrone_with(
    graph: &StreetGraph,
    point: &Point<f64>,
    params: &AnalysisParameters,
    cancellation: &Cancellation,
) -> Result<Isochrone, Error> {
    let origin = graph.nearest_node(point)?;
    Isochrone::from_origin(graph, origin, params.max_distance(), cancellation)
}
