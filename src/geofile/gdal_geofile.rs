use anyhow::{anyhow, Context};
use gdal::vector::LayerAccess;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use super::feature::{Feature, FeatureCollection};
use crate::{
    crs::crs_utils::{spatial_ref_to_epsg, EpsgCode, WGS84_EPSG},
    error::ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdalDriverType {
    GeoParquet,
    Shapefile,
    GeoJson,
    Kml,
    GeoPackage,
}

impl GdalDriverType {
    pub fn name(&self) -> &'static str {
        match self {
            GdalDriverType::GeoParquet => "Parquet",
            GdalDriverType::Shapefile => "ESRI Shapefile",
            GdalDriverType::GeoJson => "GeoJSON",
            GdalDriverType::Kml => "LIBKML",
            GdalDriverType::GeoPackage => "GPKG",
        }
    }

    /// Drivers GDAL may try when opening a file of this type, in order of preference. KML falls back to the
    /// read-only KML driver when GDAL was built without libkml.
    pub fn read_driver_names(&self) -> Vec<&'static str> {
        match self {
            GdalDriverType::Kml => vec!["LIBKML", "KML"],
            _ => vec![self.name()],
        }
    }

    /// Infer the driver from the file extension, case insensitively.
    pub fn from_path(filepath: &Path) -> Option<Self> {
        let extension = filepath.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "parquet" => Some(GdalDriverType::GeoParquet),
            "shp" => Some(GdalDriverType::Shapefile),
            "geojson" | "json" => Some(GdalDriverType::GeoJson),
            "kml" => Some(GdalDriverType::Kml),
            "gpkg" => Some(GdalDriverType::GeoPackage),
            _ => None,
        }
    }
}

pub fn write_features_to_geofile(
    features: &Vec<Feature>,
    output_filepath: &Path,
    epsg: EpsgCode,
    driver_type: GdalDriverType,
) -> anyhow::Result<()> {
    let driver = gdal::DriverManager::get_driver_by_name(driver_type.name())
        .context("Getting GDAL driver")?;

    if features.is_empty() {
        return Err(anyhow!("No features to write to {:?}", output_filepath));
    }
    let layer_type = layer_type_for_features(features)?;

    let crs = gdal::spatial_ref::SpatialRef::from_epsg(epsg)?;
    log::debug!("Using spatial ref {} for writing geofile", crs.name()?);

    let layer_name = output_filepath
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("");
    let mut dataset = driver.create_vector_only(output_filepath)?;
    let layer_options = gdal::LayerOptions {
        name: layer_name,
        srs: Some(&crs),
        ty: layer_type,
        options: None,
    };

    let mut layer = dataset.create_layer(layer_options)?;

    // Create the fields based on all attributes of all features.
    let field_names = get_field_names(features);
    let field_definitions: Vec<(&str, gdal::vector::OGRFieldType::Type)> = field_names
        .iter()
        .map(|field_name| (field_name as &str, gdal::vector::OGRFieldType::OFTString))
        .collect();
    layer.create_defn_fields(&field_definitions)?;

    log::info!(
        "Writing {} features to {:?}",
        features.len(),
        output_filepath
    );
    // Committing all features at once is much faster for drivers with transactions, e.g. GeoPackage.
    // Drivers without transactions, e.g. Shapefile, write each feature directly.
    let in_transaction = unsafe { gdal_sys::OGR_L_StartTransaction(layer.c_layer()) }
        == gdal_sys::OGRErr::OGRERR_NONE;
    let bar = ProgressBar::new(features.len() as u64);
    for feature in features {
        let geometry = match &feature.geometry {
            geo::Geometry::Polygon(polygon) => {
                geo::Geometry::MultiPolygon(geo::MultiPolygon::new(vec![polygon.clone()]))
            }
            other => other.clone(),
        };
        let wkb = wkb::geom_to_wkb(&geometry)
            .map_err(|err| anyhow!("Could not write geometry to WKB, {:?}", err))?;
        let geometry = gdal::vector::Geometry::from_wkb(&wkb)?;

        match &feature.attributes {
            Some(attributes) => {
                let mut field_names = Vec::new();
                let mut values = Vec::new();
                for (key, value) in attributes {
                    field_names.push(key);
                    values.push(gdal::vector::FieldValue::StringValue(value.to_owned()))
                }
                let field_names: Vec<&str> = field_names.iter().map(|name| name as &str).collect();
                layer.create_feature_fields(geometry, &field_names, &values)?;
            }
            None => layer.create_feature(geometry)?,
        }

        bar.inc(1);
    }
    bar.finish_and_clear();
    if in_transaction {
        let err = unsafe { gdal_sys::OGR_L_CommitTransaction(layer.c_layer()) };
        check_ogr_err(err, "OGR_L_CommitTransaction")
            .with_context(|| format!("Writing features to {:?}", output_filepath))?;
    }
    Ok(())
}

fn layer_type_for_geometry(
    geometry: &geo::Geometry,
) -> anyhow::Result<gdal::vector::OGRwkbGeometryType::Type> {
    use gdal::vector::OGRwkbGeometryType::*;
    // Polygons are written as MultiPolygons so both fit in one layer.
    match geometry {
        geo::Geometry::Point(_) => Ok(wkbPoint),
        geo::Geometry::LineString(_) => Ok(wkbLineString),
        geo::Geometry::Polygon(_) | geo::Geometry::MultiPolygon(_) => Ok(wkbMultiPolygon),
        geo::Geometry::MultiPoint(_) => Ok(wkbMultiPoint),
        geo::Geometry::MultiLineString(_) => Ok(wkbMultiLineString),
        _ => Err(anyhow!("Cannot write geometry type {:?} to file.", geometry)),
    }
}

/// The single layer type all features fit in. Mixed geometry types are rejected.
fn layer_type_for_features(
    features: &[Feature],
) -> anyhow::Result<gdal::vector::OGRwkbGeometryType::Type> {
    let layer_type = layer_type_for_geometry(&features[0].geometry)?;
    for feature in &features[1..] {
        if layer_type_for_geometry(&feature.geometry)? != layer_type {
            return Err(anyhow!(
                "Cannot write {:?} and {:?} features to the same layer",
                features[0].geometry_type(),
                feature.geometry_type()
            ));
        }
    }
    Ok(layer_type)
}

fn check_ogr_err(err: gdal_sys::OGRErr::Type, method_name: &str) -> anyhow::Result<()> {
    if err != gdal_sys::OGRErr::OGRERR_NONE {
        return Err(anyhow!("{} failed with OGR error code {}", method_name, err));
    }
    Ok(())
}

fn get_field_names(features: &Vec<Feature>) -> Vec<String> {
    let fields: HashSet<String> = features
        .par_iter()
        .filter_map(|feature| {
            feature
                .attributes
                .as_ref()
                .map(|attributes| attributes.keys().cloned().collect::<Vec<String>>())
        })
        .flatten()
        .collect();
    let mut fields: Vec<String> = fields.into_iter().collect();
    fields.sort();
    fields
}

/// Convert to a `geo` geometry, dropping any Z coordinate. `to_geo` only knows the 2D OGR types.
fn to_geo_2d(gdal_geometry: &gdal::vector::Geometry) -> anyhow::Result<geo::Geometry> {
    let flat_geometry = gdal_geometry.clone();
    unsafe {
        gdal_sys::OGR_G_FlattenTo2D(flat_geometry.c_geometry());
    }
    flat_geometry
        .to_geo()
        .map_err(|err| anyhow!("Could not convert GDAL geometry, {}", err))
}

fn open_vector_dataset(
    filepath: &Path,
    allowed_drivers: Option<&[&str]>,
) -> gdal::errors::Result<gdal::Dataset> {
    let open_options = gdal::DatasetOptions {
        open_flags: gdal::GdalOpenFlags::GDAL_OF_VECTOR,
        allowed_drivers,
        ..Default::default()
    };
    gdal::Dataset::open_ex(filepath, open_options)
}

/// Read all features of a geofile with GDAL.
///
/// The driver is picked from the file extension. Files with an unknown extension are handed to GDAL's
/// generic opener, which fails with [`ValidationError::UnsupportedFormat`] if no driver recognizes them.
/// Only the first layer is read. The CRS is taken from the layer and defaults to EPSG:4326. Geometries with
/// Z coordinates, as in KML, are flattened to 2D.
pub fn read_features_from_geofile(filepath: &Path) -> anyhow::Result<FeatureCollection> {
    gdal::DriverManager::register_all();
    let dataset = match GdalDriverType::from_path(filepath) {
        Some(driver_type) => {
            let driver_names = driver_type.read_driver_names();
            log::debug!("Opening {:?} with drivers {:?}", filepath, driver_names);
            open_vector_dataset(filepath, Some(driver_names.as_slice()))
                .with_context(|| format!("Opening {:?} as {}", filepath, driver_type.name()))?
        }
        None => open_vector_dataset(filepath, None).map_err(|err| {
            ValidationError::UnsupportedFormat {
                path: filepath.to_path_buf(),
                reason: err.to_string(),
            }
        })?,
    };

    let layer_count = dataset.layer_count();
    if 0 == layer_count {
        return Err(anyhow!("Found no layers in {:?}", filepath));
    }
    if 1 < layer_count {
        log::warn!(
            "Found {} layers in {:?}, only the first one is read.",
            layer_count,
            filepath
        );
    }
    let mut layer = dataset.layer(0)?;

    let epsg = match layer.spatial_ref().ok() {
        Some(spatial_ref) => spatial_ref_to_epsg(&spatial_ref)
            .with_context(|| format!("Reading the CRS of {:?}", filepath))?,
        None => {
            log::warn!("No CRS found for {:?}, assuming EPSG:{}", filepath, WGS84_EPSG);
            WGS84_EPSG
        }
    };

    let mut features = Vec::new();
    let mut num_without_geometry = 0;
    for gdal_feature in layer.features() {
        let gdal_geometry = gdal_feature.geometry();
        if !gdal_geometry.has_gdal_ptr() {
            num_without_geometry += 1;
            continue;
        }
        let geometry = to_geo_2d(gdal_geometry)?;

        let attributes: HashMap<String, String> = gdal_feature
            .fields()
            .filter_map(|(name, value)| {
                value
                    .and_then(|value| value.into_string())
                    .map(|value| (name, value))
            })
            .collect();
        features.push(Feature {
            geometry,
            attributes: Some(attributes),
        });
    }
    if num_without_geometry > 0 {
        log::warn!(
            "Skipped {} features without geometry in {:?}",
            num_without_geometry,
            filepath
        );
    }

    log::info!("Read {} features from {:?}", features.len(), filepath);
    Ok(FeatureCollection::new(features, epsg))
}
