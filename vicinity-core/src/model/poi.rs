//! Points of interest and their categories

use std::fmt;
use std::str::FromStr;

use geo::{BoundingRect, Geometry, Intersects, MultiPoint, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Amenity categories that can be selected for an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Supermarket,
    Gym,
    School,
    Hospital,
    Pharmacy,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Supermarket,
        Category::Gym,
        Category::School,
        Category::Hospital,
        Category::Pharmacy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Supermarket => "supermarket",
            Category::Gym => "gym",
            Category::School => "school",
            Category::Hospital => "hospital",
            Category::Pharmacy => "pharmacy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidData(format!("Unknown POI category: {s}")))
    }
}

/// Location of a POI. Amenities mapped as buildings keep their footprint.
#[derive(Debug, Clone, PartialEq)]
pub enum PoiGeometry {
    Point(Point<f64>),
    MultiPoint(MultiPoint<f64>),
    Polygon(Polygon<f64>),
}

impl PoiGeometry {
    /// Whether any part of the POI touches or lies inside `geometry`
    pub fn intersects<G>(&self, geometry: &G) -> bool
    where
        G: Intersects<Point<f64>> + Intersects<Polygon<f64>>,
    {
        match self {
            PoiGeometry::Point(point) => geometry.intersects(point),
            PoiGeometry::MultiPoint(points) => points.iter().any(|p| geometry.intersects(p)),
            PoiGeometry::Polygon(polygon) => geometry.intersects(polygon),
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            PoiGeometry::Point(point) => Some(point.bounding_rect()),
            PoiGeometry::MultiPoint(points) => points.bounding_rect(),
            PoiGeometry::Polygon(polygon) => polygon.bounding_rect(),
        }
    }

    /// `GeoJSON` geometry for map layers; a multipoint keeps every member
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&Geometry::from(self.clone())))
    }
}

impl From<PoiGeometry> for Geometry<f64> {
    fn from(geometry: PoiGeometry) -> Self {
        match geometry {
            PoiGeometry::Point(point) => Geometry::Point(point),
            PoiGeometry::MultiPoint(points) => Geometry::MultiPoint(points),
            PoiGeometry::Polygon(polygon) => Geometry::Polygon(polygon),
        }
    }
}

impl TryFrom<Geometry<f64>> for PoiGeometry {
    type Error = Error;

    fn try_from(geometry: Geometry<f64>) -> Result<Self, Self::Error> {
        match geometry {
            Geometry::Point(point) => Ok(PoiGeometry::Point(point)),
            Geometry::MultiPoint(points) if !points.0.is_empty() => {
                Ok(PoiGeometry::MultiPoint(points))
            }
            Geometry::Polygon(polygon) => Ok(PoiGeometry::Polygon(polygon)),
            other => Err(Error::InvalidData(format!(
                "Unsupported POI geometry: {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub category: Category,
    pub name: Option<String>,
    pub geometry: PoiGeometry,
}

impl PointOfInterest {
    pub fn new(category: Category, geometry: PoiGeometry) -> Self {
        Self {
            category,
            name: None,
            geometry,
        }
    }

    pub fn at(category: Category, point: Point<f64>) -> Self {
        Self::new(category, PoiGeometry::Point(point))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
