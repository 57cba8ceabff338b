use crate::{error::ValidationError, geofile::feature::FeatureCollection};

/// Keep only the Polygon and MultiPolygon features, in their original order.
///
/// Fails with [`ValidationError::NoPolygonGeometry`] when there is nothing to keep.
pub fn filter_polygons(collection: FeatureCollection) -> anyhow::Result<FeatureCollection> {
    let num_features = collection.len();
    let features: Vec<_> = collection
        .features
        .into_iter()
        .filter(|feature| feature.geometry_type().is_polygonal())
        .collect();
    if features.is_empty() {
        return Err(ValidationError::NoPolygonGeometry.into());
    }
    if features.len() != num_features {
        log::warn!(
            "Out of {} features read, only {} were Polygons or MultiPolygons. The rest were dropped.",
            num_features,
            features.len()
        )
    }
    Ok(FeatureCollection::new(features, collection.epsg))
}
