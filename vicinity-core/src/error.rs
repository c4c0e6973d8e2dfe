use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Street graph has no nodes")]
    NoNodes,
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    #[error("Cannot build a region from zero coordinates")]
    EmptyInput,
    #[error("Origin node {0} has no outgoing edges")]
    DisconnectedOrigin(NodeId),
    #[error("Invalid weight {weight} on edge {source_node} -> {target_node}")]
    InvalidWeight {
        source_node: NodeId,
        target_node: NodeId,
        weight: f64,
    },
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Computation cancelled")]
    Cancelled,
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(#[from] geojson::Error),
}
