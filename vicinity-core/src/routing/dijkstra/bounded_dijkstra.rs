use std::collections::{BTreeSet, BinaryHeap};

use fixedbitset::FixedBitSet;
use geo::Coord;
use hashbrown::HashMap;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use super::state::State;
use crate::routing::Cancellation;
use crate::{Error, Meters, NodeId, StreetGraph};

/// How many heap pops happen between two cancellation checks
const CANCELLATION_CHECK_INTERVAL: usize = 256;

/// Nodes reachable from an origin within a distance budget, with the
/// shortest network distance to each of them
#[derive(Debug, Clone)]
pub struct ReachableSet {
    origin: NodeIndex,
    costs: HashMap<NodeIndex, Meters>,
}

impl ReachableSet {
    pub fn origin(&self) -> NodeIndex {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Always false: the origin itself is reachable
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.costs.contains_key(&node)
    }

    /// Shortest network distance from the origin
    pub fn cost(&self, node: NodeIndex) -> Option<Meters> {
        self.costs.get(&node).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, Meters)> + '_ {
        self.costs.iter().map(|(&node, &cost)| (node, cost))
    }

    pub fn nodes(&self) -> BTreeSet<NodeIndex> {
        self.costs.keys().copied().collect()
    }

    /// Provider ids of the reachable nodes
    pub fn node_ids(&self, graph: &StreetGraph) -> BTreeSet<NodeId> {
        self.costs
            .keys()
            .filter_map(|&node| graph.node(node))
            .map(|node| node.id)
            .collect()
    }

    /// Coordinates of the reachable nodes ordered by graph index
    pub fn coordinates(&self, graph: &StreetGraph) -> Vec<Coord<f64>> {
        self.nodes()
            .into_iter()
            .filter_map(|node| graph.node(node))
            .map(|node| node.geometry.into())
            .collect()
    }
}

/// Dijkstra's algorithm bounded by `max_cost` meters.
///
/// A node is included when its shortest distance from `origin` is at most
/// `max_cost` (closed interval). A zero budget yields only the origin, even
/// across zero-length edges.
///
/// # Errors
///
/// `UnknownNode` if `origin` is not part of the graph, `InvalidParameters`
/// for a negative or NaN budget.
pub fn reachable_set(
    graph: &StreetGraph,
    origin: NodeIndex,
    max_cost: Meters,
) -> Result<ReachableSet, Error> {
    reachable_set_with(graph, origin, max_cost, &Cancellation::new())
}

/// Same as [`reachable_set`], polling `cancellation` while expanding.
///
/// # Errors
///
/// Additionally returns `Cancelled` once `cancellation` trips.
pub fn reachable_set_with(
    graph: &StreetGraph,
    origin: NodeIndex,
    max_cost: Meters,
    cancellation: &Cancellation,
) -> Result<ReachableSet, Error> {
    if graph.node(origin).is_none() {
        return Err(Error::UnknownNode(format!("graph index {}", origin.index())));
    }
    if max_cost.is_nan() || max_cost < 0.0 {
        return Err(Error::InvalidParameters(format!(
            "Distance budget must be non-negative, got {max_cost}"
        )));
    }

    let mut costs: HashMap<NodeIndex, Meters> = HashMap::new();
    costs.insert(origin, 0.0);

    if max_cost == 0.0 {
        return Ok(ReachableSet { origin, costs });
    }

    let mut settled = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::new();
    heap.push(State {
        cost: 0.0,
        node: origin,
    });

    let mut pops = 0usize;
    while let Some(State { cost, node }) = heap.pop() {
        pops += 1;
        if pops % CANCELLATION_CHECK_INTERVAL == 0 && cancellation.is_cancelled() {
            return Err(Error::Cancelled);
        }

        // Stale heap entry, a shorter path was already settled
        if settled.put(node.index()) {
            continue;
        }

        for edge in graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }

            let next_cost = cost + edge.weight().length;
            if next_cost > max_cost {
                continue;
            }

            match costs.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    Ok(ReachableSet { origin, costs })
}
