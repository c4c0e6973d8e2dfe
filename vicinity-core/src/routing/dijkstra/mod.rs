mod bounded_dijkstra;
mod state;

pub use bounded_dijkstra::{ReachableSet, reachable_set, reachable_set_with};
