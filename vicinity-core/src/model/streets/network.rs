//! Street graph with a spatial index over its nodes

use geo::{MultiPoint, Point};
use hashbrown::HashMap;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeReference, NodeIndex},
};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{StreetEdge, StreetNode};
use crate::{Error, Meters, NodeId};

/// R-tree entry: node coordinates with the graph index as payload
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Directed street network. Undirected segments are stored as two edges.
///
/// The graph is immutable once built, so it can be shared between
/// threads without locking. Use [`StreetGraph::builder`] to create one.
#[derive(Debug, Clone)]
pub struct StreetGraph {
    pub(crate) graph: DiGraph<StreetNode, StreetEdge>,
    rtree: RTree<IndexedPoint>,
    node_lookup: HashMap<NodeId, NodeIndex>,
}

impl StreetGraph {
    pub fn builder() -> StreetGraphBuilder {
        StreetGraphBuilder::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, index: NodeIndex) -> Option<&StreetNode> {
        self.graph.node_weight(index)
    }

    /// Graph index of the node with the given provider id
    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(&id).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StreetNode> {
        self.graph.node_weights()
    }

    /// Outgoing edges of `node`
    pub fn edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, StreetEdge>> {
        self.graph.edges_directed(node, Direction::Outgoing)
    }

    pub fn out_degree(&self, node: NodeIndex) -> usize {
        self.edges(node).count()
    }

    /// All node coordinates, used for coverage checks
    pub fn node_points(&self) -> MultiPoint<f64> {
        self.graph.node_weights().map(|node| node.geometry).collect()
    }

    /// Finds the node closest to `point` in planar distance.
    ///
    /// Equidistant candidates are resolved in favour of the lowest node id,
    /// so the answer does not depend on the R-tree layout.
    pub fn nearest_node(&self, point: &Point<f64>) -> Result<NodeIndex, Error> {
        let query = [point.x(), point.y()];
        let mut candidates = self.rtree.nearest_neighbor_iter_with_distance_2(&query);

        let (first, best_distance) = candidates.next().ok_or(Error::NoNodes)?;
        let mut winner = first.data;

        for (candidate, distance_2) in candidates {
            if distance_2 > best_distance {
                break;
            }
            if self.graph[candidate.data].id < self.graph[winner].id {
                winner = candidate.data;
            }
        }

        Ok(winner)
    }
}

/// Collects nodes and edges, validating them, before the spatial index is built
#[derive(Debug, Default)]
pub struct StreetGraphBuilder {
    graph: DiGraph<StreetNode, StreetEdge>,
    node_lookup: HashMap<NodeId, NodeIndex>,
}

impl StreetGraphBuilder {
    pub fn add_node(&mut self, id: NodeId, geometry: Point<f64>) -> Result<NodeIndex, Error> {
        if !geometry.x().is_finite() || !geometry.y().is_finite() {
            return Err(Error::InvalidData(format!(
                "Node {id} has non-finite coordinates"
            )));
        }
        if self.node_lookup.contains_key(&id) {
            return Err(Error::DuplicateNode(id));
        }

        let index = self.graph.add_node(StreetNode { id, geometry });
        self.node_lookup.insert(id, index);
        Ok(index)
    }

    /// Adds a one-way segment from `source` to `target`
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, length: Meters) -> Result<(), Error> {
        if !length.is_finite() || length < 0.0 {
            return Err(Error::InvalidWeight {
                source_node: source,
                target_node: target,
                weight: length,
            });
        }

        let from = self.lookup(source)?;
        let to = self.lookup(target)?;
        self.graph.add_edge(from, to, StreetEdge { length });
        Ok(())
    }

    /// Adds a two-way segment as a pair of directed edges
    pub fn add_undirected_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        length: Meters,
    ) -> Result<(), Error> {
        self.add_edge(a, b, length)?;
        self.add_edge(b, a, length)
    }

    /// Coordinates of an already added node
    pub fn node_geometry(&self, id: NodeId) -> Option<Point<f64>> {
        self.node_lookup
            .get(&id)
            .map(|&index| self.graph[index].geometry)
    }

    pub fn build(self) -> StreetGraph {
        let entries: Vec<IndexedPoint> = self
            .graph
            .node_indices()
            .map(|index| {
                let geometry = self.graph[index].geometry;
                GeomWithData::new([geometry.x(), geometry.y()], index)
            })
            .collect();

        StreetGraph {
            graph: self.graph,
            rtree: RTree::bulk_load(entries),
            node_lookup: self.node_lookup,
        }
    }

    fn lookup(&self, id: NodeId) -> Result<NodeIndex, Error> {
        self.node_lookup
            .get(&id)
            .copied()
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }
}
