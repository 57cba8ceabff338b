use std::path::Path;

use crate::error::ValidationError;

use self::{
    feature::FeatureCollection,
    gdal_geofile::{read_features_from_geofile, GdalDriverType},
    geojson::read_features_from_geojson,
};

pub mod feature;
pub mod gdal_geofile;
pub mod geojson;

/// Load a dataset, inferring its format from the file extension. GeoJSON is parsed natively, everything
/// else goes through GDAL.
pub fn read_dataset(filepath: &Path) -> anyhow::Result<FeatureCollection> {
    if filepath.to_str().is_none() {
        return Err(ValidationError::InvalidInputType(filepath.to_path_buf()).into());
    }
    match GdalDriverType::from_path(filepath) {
        Some(GdalDriverType::GeoJson) => read_features_from_geojson(filepath),
        _ => read_features_from_geofile(filepath),
    }
}
