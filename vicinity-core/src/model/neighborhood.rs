//! Administrative neighborhoods

use geo::{Centroid, MultiPolygon, Point, Polygon};

/// A named area whose centroid is used as the analysis origin
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    pub id: String,
    pub name: Option<String>,
    pub boundary: MultiPolygon<f64>,
}

impl Neighborhood {
    pub fn new(id: impl Into<String>, boundary: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            id: id.into(),
            name: None,
            boundary: boundary.into(),
        }
    }

    pub fn from_polygon(id: impl Into<String>, boundary: Polygon<f64>) -> Self {
        Self::new(id, MultiPolygon::new(vec![boundary]))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Area-weighted centroid of the boundary, `None` for an empty boundary
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.boundary.centroid()
    }
}
