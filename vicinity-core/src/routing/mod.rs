//! Bounded shortest-path search over the street network

pub mod cancel;
pub mod dijkstra;

pub use cancel::{CancelOnDrop, Cancellation};
pub use dijkstra::{ReachableSet, reachable_set, reachable_set_with};
