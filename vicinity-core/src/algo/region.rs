//! Isochrone regions built from reached node coordinates

use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo::{BoundingRect, ConvexHull, Coord, Geometry, Line, MultiPoint, Point, Polygon, Rect};
use itertools::{Itertools, MinMaxResult};

use crate::{Error, PoiGeometry};

/// Convex region covering a set of reached coordinates.
///
/// With fewer than three non-collinear coordinates the hull has no area,
/// so it is kept as a point or a segment and containment becomes an exact
/// lie-on test.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Point(Point<f64>),
    Segment(Line<f64>),
    Polygon(Polygon<f64>),
}

impl Region {
    /// Whether the POI touches or lies inside the region
    pub fn intersects(&self, poi: &PoiGeometry) -> bool {
        match self {
            Region::Point(point) => poi.intersects(point),
            Region::Segment(line) => poi.intersects(line),
            Region::Polygon(polygon) => poi.intersects(polygon),
        }
    }

    pub fn contains_coord(&self, coord: Coord<f64>) -> bool {
        self.intersects(&PoiGeometry::Point(coord.into()))
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Region::Point(point) => Some(point.bounding_rect()),
            Region::Segment(line) => Some(line.bounding_rect()),
            Region::Polygon(polygon) => polygon.bounding_rect(),
        }
    }

    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            Region::Point(point) => Geometry::Point(*point),
            Region::Segment(line) => Geometry::Line(*line),
            Region::Polygon(polygon) => Geometry::Polygon(polygon.clone()),
        }
    }

    /// `GeoJSON` geometry for map overlays
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.to_geometry()))
    }
}

/// Builds the convex hull of `coordinates`.
///
/// # Errors
///
/// `EmptyInput` when no coordinates are given.
pub fn build_region(coordinates: &[Coord<f64>]) -> Result<Region, Error> {
    let (start, end) = match coordinates
        .iter()
        .copied()
        .minmax_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
    {
        MinMaxResult::NoElements => return Err(Error::EmptyInput),
        MinMaxResult::OneElement(coord) => return Ok(Region::Point(coord.into())),
        MinMaxResult::MinMax(start, end) => (start, end),
    };

    if start == end {
        return Ok(Region::Point(start.into()));
    }

    // The lexicographic extremes are the segment ends when everything is collinear
    let collinear = coordinates
        .iter()
        .all(|&coord| RobustKernel::orient2d(start, end, coord) == Orientation::Collinear);
    if collinear {
        return Ok(Region::Segment(Line::new(start, end)));
    }

    let points: MultiPoint<f64> = coordinates.iter().copied().map(Point::from).collect();
    Ok(Region::Polygon(points.convex_hull()))
}

#[cfg(test)]
mod tests {
    use geo::{Area, coord};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(build_region(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn single_and_repeated_coordinates_make_a_point() {
        let c = coord! { x: 3.0, y: 4.0 };
        assert_eq!(build_region(&[c]).unwrap(), Region::Point(c.into()));
        assert_eq!(build_region(&[c, c, c]).unwrap(), Region::Point(c.into()));
    }

    #[test]
    fn collinear_coordinates_make_a_segment() {
        let coords = [
            coord! { x: 2.0, y: 2.0 },
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 5.0, y: 5.0 },
        ];
        let region = build_region(&coords).unwrap();
        assert_eq!(
            region,
            Region::Segment(Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 5.0, y: 5.0 }))
        );
        assert!(region.contains_coord(coord! { x: 1.0, y: 1.0 }));
        assert!(!region.contains_coord(coord! { x: 1.0, y: 2.0 }));
        assert!(!region.contains_coord(coord! { x: 6.0, y: 6.0 }));
    }

    #[test]
    fn vertical_segment() {
        let coords = [coord! { x: 1.0, y: 9.0 }, coord! { x: 1.0, y: -3.0 }];
        assert_eq!(
            build_region(&coords).unwrap(),
            Region::Segment(Line::new(coord! { x: 1.0, y: -3.0 }, coord! { x: 1.0, y: 9.0 }))
        );
    }

    #[test]
    fn triangle_hull_drops_interior_points() {
        let coords = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 4.0, y: 0.0 },
            coord! { x: 0.0, y: 4.0 },
            coord! { x: 1.0, y: 1.0 },
        ];
        let Region::Polygon(hull) = build_region(&coords).unwrap() else {
            panic!("expected a polygon");
        };
        assert_eq!(hull.unsigned_area(), 8.0);
        // three corners plus the closing coordinate
        assert_eq!(hull.exterior().0.len(), 4);
    }

    #[test]
    fn region_geojson_is_a_polygon() {
        let coords = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 0.0, y: 1.0 },
        ];
        let geometry = build_region(&coords).unwrap().to_geojson();
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "Polygon");
    }

    proptest! {
        #[test]
        fn prop_region_contains_every_input(
            raw in prop::collection::vec((-50i32..50, -50i32..50), 1..40)
        ) {
            let coords: Vec<Coord<f64>> = raw
                .iter()
                .map(|&(x, y)| coord! { x: f64::from(x), y: f64::from(y) })
                .collect();
            let region = build_region(&coords).unwrap();
            for coord in &coords {
                prop_assert!(region.contains_coord(*coord), "{coord:?} outside {region:?}");
            }
        }

        #[test]
        fn prop_collinear_inputs_never_produce_a_polygon(
            steps in prop::collection::vec(-20i32..20, 1..20),
            dx in -3i32..3,
            dy in -3i32..3,
        ) {
            let coords: Vec<Coord<f64>> = steps
                .iter()
                .map(|&t| coord! { x: f64::from(t * dx), y: f64::from(t * dy) })
                .collect();
            let region = build_region(&coords).unwrap();
            prop_assert!(!matches!(region, Region::Polygon(_)));
        }
    }
}
