use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context};

use super::feature::{Feature, FeatureCollection};
use crate::crs::crs_utils::WGS84_EPSG;

fn to_feature(feature: geojson::Feature) -> anyhow::Result<Option<Feature>> {
    let geometry = match feature.geometry {
        Some(geometry) => geo::Geometry::<f64>::try_from(geometry)
            .map_err(|err| anyhow!("Could not convert GeoJSON geometry, {}", err))?,
        None => return Ok(None),
    };
    let attributes: HashMap<String, String> = feature
        .properties
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| match value.as_str() {
            Some(text) => (key, text.to_owned()),
            None => (key, value.to_string()),
        })
        .collect();
    Ok(Some(Feature {
        geometry,
        attributes: Some(attributes),
    }))
}

/// Read features from a GeoJSON document. RFC 7946 fixes the CRS to WGS84 longitude/latitude.
pub fn read_features_from_geojson_str(contents: &str) -> anyhow::Result<FeatureCollection> {
    let geojson: geojson::GeoJson = contents.parse()?;
    let geojson_features = match geojson {
        geojson::GeoJson::FeatureCollection(collection) => collection.features,
        geojson::GeoJson::Feature(feature) => vec![feature],
        geojson::GeoJson::Geometry(geometry) => vec![geojson::Feature::from(geometry)],
    };
    let num_features = geojson_features.len();
    let features: Vec<Feature> = geojson_features
        .into_iter()
        .map(to_feature)
        .collect::<anyhow::Result<Vec<Option<Feature>>>>()?
        .into_iter()
        .flatten()
        .collect();
    if features.len() != num_features {
        log::warn!(
            "Skipped {} GeoJSON features without geometry",
            num_features - features.len()
        );
    }
    Ok(FeatureCollection::new(features, WGS84_EPSG))
}

pub fn read_features_from_geojson(filepath: &Path) -> anyhow::Result<FeatureCollection> {
    let contents =
        fs::read_to_string(filepath).with_context(|| format!("Reading GeoJSON {:?}", filepath))?;
    let collection = read_features_from_geojson_str(&contents)
        .with_context(|| format!("Parsing GeoJSON {:?}", filepath))?;
    log::info!("Read {} features from {:?}", collection.len(), filepath);
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::read_features_from_geojson_str;
    use crate::geofile::feature::GeometryType;

    const MIXED_COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "well", "depth": 12},
             "geometry": {"type": "Point", "coordinates": [-58.8, -27.5]}},
            {"type": "Feature", "properties": {"name": "field", "owner": null},
             "geometry": {"type": "Polygon", "coordinates": [[[-58.8, -27.5], [-58.7, -27.5], [-58.7, -27.4], [-58.8, -27.5]]]}},
            {"type": "Feature", "properties": {}, "geometry": null}
        ]
    }"#;

    #[rstest]
    fn test_read_mixed_collection() {
        let collection = read_features_from_geojson_str(MIXED_COLLECTION).unwrap();
        assert_eq!(collection.epsg, 4326);
        assert_eq!(
            collection.geometry_types(),
            vec![GeometryType::Point, GeometryType::Polygon]
        );
        let well = collection.features[0].attributes.as_ref().unwrap();
        assert_eq!(well.get("name").map(String::as_str), Some("well"));
        assert_eq!(well.get("depth").map(String::as_str), Some("12"));
        let field = collection.features[1].attributes.as_ref().unwrap();
        assert!(!field.contains_key("owner"));
    }

    #[rstest]
    fn test_read_bare_geometry() {
        let collection = read_features_from_geojson_str(
            r#"{"type": "MultiPolygon", "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]]]}"#,
        )
        .unwrap();
        assert_eq!(collection.geometry_types(), vec![GeometryType::MultiPolygon]);
    }

    #[rstest]
    fn test_invalid_geojson_is_rejected() {
        assert!(read_features_from_geojson_str(r#"{"type": "Nonsense"}"#).is_err());
    }
}
