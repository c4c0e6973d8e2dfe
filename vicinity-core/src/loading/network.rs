//! Street networks stored as node and edge CSV files

use std::fs::File;
use std::io::Read;
use std::path::Path;

use geo::{Distance, Euclidean, Point};
use log::info;
use serde::Deserialize;

use super::config::NetworkFiles;
use crate::{Error, Meters, NodeId, StreetGraph};

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: NodeId,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: NodeId,
    target: NodeId,
    #[serde(default)]
    length: Option<Meters>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    oneway: bool,
}

/// Accepts `true/false`, `yes/no`, `1/0` and an empty field (false)
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "0" => Ok(false),
        "true" | "yes" | "1" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "Invalid oneway flag: {other}"
        ))),
    }
}

/// Loads a street network from its node and edge files
///
/// # Errors
///
/// Returns an error if a file cannot be read or holds invalid rows
pub fn load_network(files: &NetworkFiles) -> Result<StreetGraph, Error> {
    let graph = read_network(open(&files.nodes)?, open(&files.edges)?)?;
    info!(
        "Loaded street network {}: {} nodes, {} edges",
        files.edges.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Builds a street graph from CSV readers.
///
/// Edges without a length get the straight-line distance between their
/// endpoints. Edges are two-way unless `oneway` is set.
///
/// # Errors
///
/// Malformed rows, duplicate node ids and edges that reference unknown
/// nodes or carry negative lengths are rejected.
pub fn read_network<N: Read, E: Read>(nodes: N, edges: E) -> Result<StreetGraph, Error> {
    let mut builder = StreetGraph::builder();

    for record in csv::Reader::from_reader(nodes).deserialize() {
        let NodeRecord { id, x, y } = record?;
        builder.add_node(id, Point::new(x, y))?;
    }

    for record in csv::Reader::from_reader(edges).deserialize() {
        let edge: EdgeRecord = record?;
        let (Some(from), Some(to)) = (
            builder.node_geometry(edge.source),
            builder.node_geometry(edge.target),
        ) else {
            return Err(Error::InvalidData(format!(
                "Edge {} -> {} references an unknown node",
                edge.source, edge.target
            )));
        };

        let length = edge
            .length
            .unwrap_or_else(|| Euclidean.distance(from, to));
        if edge.oneway {
            builder.add_edge(edge.source, edge.target, length)?;
        } else {
            builder.add_undirected_edge(edge.source, edge.target, length)?;
        }
    }

    Ok(builder.build())
}

fn open(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        ))
    })
}
