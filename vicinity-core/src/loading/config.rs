use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Street network of one mode as a pair of CSV files
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkFiles {
    /// `id,x,y`
    pub nodes: PathBuf,
    /// `source,target[,length][,oneway]`
    pub edges: PathBuf,
}

/// Where the input data of a city lives and how to read it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetConfig {
    pub neighborhoods_path: PathBuf,
    #[serde(default = "default_id_property")]
    pub id_property: String,
    #[serde(default)]
    pub name_property: Option<String>,
    pub pois_path: PathBuf,
    #[serde(default = "default_category_property")]
    pub category_property: String,
    pub walk: NetworkFiles,
    pub drive: NetworkFiles,
}

impl DatasetConfig {
    /// Resolves relative paths against `base`, usually the directory of
    /// the file the configuration was read from
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.neighborhoods_path);
        resolve(&mut self.pois_path);
        for files in [&mut self.walk, &mut self.drive] {
            resolve(&mut files.nodes);
            resolve(&mut files.edges);
        }
        self
    }

    pub fn network(&self, mode: crate::TransportMode) -> &NetworkFiles {
        match mode {
            crate::TransportMode::Walking => &self.walk,
            crate::TransportMode::Driving => &self.drive,
        }
    }
}

fn default_id_property() -> String {
    "NIL".to_string()
}

fn default_category_property() -> String {
    "amenity".to_string()
}
