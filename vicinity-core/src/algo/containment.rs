//! Selecting points of interest that fall inside a region

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use rstar::{
    AABB, RTree,
    primitives::{GeomWithData, Rectangle},
};

use super::region::Region;
use crate::{Category, PointOfInterest};

/// Keeps the POIs that touch or lie inside `region`, in their original order.
///
/// Accepts any sequence of references, so the output can be filtered again.
pub fn filter_contained<'a, I>(region: &Region, pois: I) -> Vec<&'a PointOfInterest>
where
    I: IntoIterator<Item = &'a PointOfInterest>,
{
    pois.into_iter()
        .filter(|poi| region.intersects(&poi.geometry))
        .collect()
}

/// Number of POIs per category
pub fn count_by_category<'a, I>(pois: I) -> BTreeMap<Category, usize>
where
    I: IntoIterator<Item = &'a PointOfInterest>,
{
    pois.into_iter()
        .map(|poi| poi.category)
        .counts()
        .into_iter()
        .collect()
}

type IndexedPoi = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// POIs with an R-tree over their bounding boxes.
///
/// Candidates are taken from the region's bounding rectangle and then
/// tested exactly, giving the same result as [`filter_contained`].
#[derive(Debug, Clone)]
pub struct PoiIndex {
    pois: Vec<PointOfInterest>,
    rtree: RTree<IndexedPoi>,
}

impl PoiIndex {
    pub fn new(pois: Vec<PointOfInterest>) -> Self {
        let entries = pois
            .iter()
            .enumerate()
            .filter_map(|(index, poi)| {
                let rect = poi.geometry.bounding_rect()?;
                let envelope = Rectangle::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                );
                Some(GeomWithData::new(envelope, index))
            })
            .collect();

        Self {
            pois,
            rtree: RTree::bulk_load(entries),
        }
    }

    /// Index over the POIs of the given categories only
    pub fn for_categories(pois: &[PointOfInterest], categories: &BTreeSet<Category>) -> Self {
        Self::new(
            pois.iter()
                .filter(|poi| categories.contains(&poi.category))
                .cloned()
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    pub fn pois(&self) -> &[PointOfInterest] {
        &self.pois
    }

    /// POIs inside `region`, in insertion order
    pub fn contained(&self, region: &Region) -> Vec<&PointOfInterest> {
        let Some(rect) = region.bounding_rect() else {
            return Vec::new();
        };
        let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

        let mut hits: Vec<usize> = self
            .rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .filter(|&index| region.intersects(&self.pois[index].geometry))
            .collect();
        hits.sort_unstable();

        hits.into_iter().map(|index| &self.pois[index]).collect()
    }
}

#[cfg(test)]
mod tests {
    use geo::{Coord, MultiPoint, Point, coord, polygon};
    use proptest::prelude::*;

    use super::*;
    use crate::{PoiGeometry, algo::region::build_region};

    fn square_region() -> Region {
        build_region(&[
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 10.0, y: 0.0 },
            coord! { x: 10.0, y: 10.0 },
            coord! { x: 0.0, y: 10.0 },
        ])
        .unwrap()
    }

    #[test]
    fn keeps_inside_drops_outside() {
        let region = square_region();
        let pois = vec![
            PointOfInterest::at(Category::Pharmacy, Point::new(5.0, 5.0)).with_name("P1"),
            PointOfInterest::at(Category::Pharmacy, Point::new(15.0, 5.0)).with_name("P2"),
        ];
        let matched = filter_contained(&region, &pois);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name.as_deref(), Some("P1"));
    }

    #[test]
    fn boundary_and_partial_geometries_count() {
        let region = square_region();
        let pois = vec![
            PointOfInterest::at(Category::Gym, Point::new(10.0, 3.0)),
            PointOfInterest::new(
                Category::School,
                PoiGeometry::MultiPoint(MultiPoint::from(vec![(20.0, 20.0), (9.0, 9.0)])),
            ),
            PointOfInterest::new(
                Category::Hospital,
                PoiGeometry::Polygon(polygon![
                    (x: 9.0, y: 9.0),
                    (x: 12.0, y: 9.0),
                    (x: 12.0, y: 12.0),
                    (x: 9.0, y: 12.0),
                ]),
            ),
        ];
        assert_eq!(filter_contained(&region, &pois).len(), 3);
    }

    #[test]
    fn counts_by_category() {
        let pois = vec![
            PointOfInterest::at(Category::Gym, Point::new(1.0, 1.0)),
            PointOfInterest::at(Category::Pharmacy, Point::new(2.0, 2.0)),
            PointOfInterest::at(Category::Gym, Point::new(3.0, 3.0)),
        ];
        let counts = count_by_category(&pois);
        assert_eq!(
            counts,
            BTreeMap::from([(Category::Gym, 2), (Category::Pharmacy, 1)])
        );
    }

    #[test]
    fn index_respects_categories() {
        let pois = vec![
            PointOfInterest::at(Category::Gym, Point::new(1.0, 1.0)),
            PointOfInterest::at(Category::Pharmacy, Point::new(2.0, 2.0)),
        ];
        let index = PoiIndex::for_categories(&pois, &BTreeSet::from([Category::Pharmacy]));
        assert_eq!(index.len(), 1);
        let matched = index.contained(&square_region());
        assert_eq!(matched[0].category, Category::Pharmacy);
    }

    fn poi_strategy() -> impl Strategy<Value = Vec<PointOfInterest>> {
        prop::collection::vec((-5i32..15, -5i32..15, 0usize..5), 0..50).prop_map(|raw| {
            raw.into_iter()
                .map(|(x, y, category)| {
                    PointOfInterest::at(
                        Category::ALL[category],
                        Point::new(f64::from(x), f64::from(y)),
                    )
                })
                .collect()
        })
    }

    fn region_strategy() -> impl Strategy<Value = Region> {
        prop::collection::vec((0i32..10, 0i32..10), 1..8).prop_map(|raw| {
            let coords: Vec<Coord<f64>> = raw
                .into_iter()
                .map(|(x, y)| coord! { x: f64::from(x), y: f64::from(y) })
                .collect();
            build_region(&coords).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_filter_is_ordered_and_idempotent(
            pois in poi_strategy(),
            region in region_strategy(),
        ) {
            let once = filter_contained(&region, &pois);
            let twice = filter_contained(&region, once.iter().copied());
            prop_assert_eq!(&once, &twice);

            // original relative order is preserved
            let positions: Vec<usize> = once
                .iter()
                .map(|matched| pois.iter().position(|poi| std::ptr::eq(poi, *matched)).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        }

        #[test]
        fn prop_index_matches_linear_filter(
            pois in poi_strategy(),
            region in region_strategy(),
        ) {
            let index = PoiIndex::new(pois.clone());
            let linear = filter_contained(&region, &pois);
            let indexed = index.contained(&region);
            prop_assert_eq!(linear, indexed);
        }
    }
}
