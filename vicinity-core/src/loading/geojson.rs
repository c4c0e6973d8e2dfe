//! Neighborhood boundaries and POIs from `GeoJSON` feature collections

use std::collections::BTreeSet;
use std::path::Path;

use geo::{Geometry, MultiPolygon};
use geojson::{Feature, FeatureCollection, GeoJson};
use log::{debug, info};
use serde_json::Value as JsonValue;

use crate::{Category, Error, Neighborhood, PoiGeometry, PointOfInterest};

fn read_collection(path: &Path) -> Result<FeatureCollection, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        ))
    })?;
    parse_collection(&text)
}

fn parse_collection(text: &str) -> Result<FeatureCollection, Error> {
    let geojson: GeoJson = text.parse()?;
    Ok(FeatureCollection::try_from(geojson)?)
}

/// String form of a property. Numeric ids are common in boundary datasets.
fn property_string(feature: &Feature, name: &str) -> Option<String> {
    match feature.property(name)? {
        JsonValue::String(value) => Some(value.clone()),
        JsonValue::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn feature_geometry(feature: &Feature) -> Result<Geometry<f64>, Error> {
    let geometry = feature
        .geometry
        .clone()
        .ok_or_else(|| Error::InvalidData("Feature without geometry".to_string()))?;
    Ok(Geometry::<f64>::try_from(geometry)?)
}

/// Reads neighborhoods from a collection of polygon or multipolygon features.
///
/// # Errors
///
/// Every boundary is required: a feature without the id property or with
/// a non-areal geometry fails the whole file.
pub fn read_neighborhoods(
    path: &Path,
    id_property: &str,
    name_property: Option<&str>,
) -> Result<Vec<Neighborhood>, Error> {
    let neighborhoods = parse_neighborhoods(&read_collection(path)?, id_property, name_property)?;
    info!(
        "Loaded {} neighborhoods from {}",
        neighborhoods.len(),
        path.display()
    );
    Ok(neighborhoods)
}

fn parse_neighborhoods(
    collection: &FeatureCollection,
    id_property: &str,
    name_property: Option<&str>,
) -> Result<Vec<Neighborhood>, Error> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(position, feature)| {
            let id = property_string(feature, id_property).ok_or_else(|| {
                Error::InvalidData(format!(
                    "Neighborhood feature {position} has no '{id_property}' property"
                ))
            })?;

            let boundary: MultiPolygon<f64> = match feature_geometry(feature)? {
                Geometry::Polygon(polygon) => polygon.into(),
                Geometry::MultiPolygon(multi) => multi,
                other => {
                    return Err(Error::InvalidData(format!(
                        "Neighborhood {id} has a non-areal boundary: {other:?}"
                    )));
                }
            };

            let mut neighborhood = Neighborhood::new(id, boundary);
            neighborhood.name = name_property.and_then(|name| property_string(feature, name));
            Ok(neighborhood)
        })
        .collect()
}

/// Reads POIs of the requested categories.
///
/// Features of other or unknown categories, and features whose geometry is
/// not a point, multipoint or polygon, are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a feature collection
pub fn read_pois(
    path: &Path,
    category_property: &str,
    categories: &BTreeSet<Category>,
) -> Result<Vec<PointOfInterest>, Error> {
    let collection = read_collection(path)?;
    let total = collection.features.len();
    let pois = parse_pois(&collection, category_property, categories);
    info!(
        "Loaded {} of {total} POI features from {}",
        pois.len(),
        path.display()
    );
    Ok(pois)
}

fn parse_pois(
    collection: &FeatureCollection,
    category_property: &str,
    categories: &BTreeSet<Category>,
) -> Vec<PointOfInterest> {
    collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(position, feature)| {
            let tag = property_string(feature, category_property)?;
            let category = match tag.parse::<Category>() {
                Ok(category) if categories.contains(&category) => category,
                Ok(_) => return None,
                Err(err) => {
                    debug!("Skipping POI feature {position}: {err}");
                    return None;
                }
            };

            let geometry = match feature_geometry(feature).and_then(PoiGeometry::try_from) {
                Ok(geometry) => geometry,
                Err(err) => {
                    debug!("Skipping POI feature {position}: {err}");
                    return None;
                }
            };

            let mut poi = PointOfInterest::new(category, geometry);
            poi.name = property_string(feature, "name");
            Some(poi)
        })
        .collect()
}
