//! Street network components - nodes and edges

use geo::Point;

use crate::{Meters, NodeId};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// Provider ID of the node
    pub id: NodeId,
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Street graph edge (street segment)
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// Segment length in meters
    pub length: Meters,
}
