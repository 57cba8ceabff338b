use std::path::Path;

use geo::MultiPolygon;

use crate::{
    crs::crs_utils::EpsgCode,
    error::ValidationError,
    geofile::{feature::FeatureCollection, gdal_geofile::read_features_from_geofile},
};

/// The administrative boundary areas of interest are checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRegion {
    pub geometry: MultiPolygon,
    pub epsg: EpsgCode,
}

impl ReferenceRegion {
    pub fn new(geometry: MultiPolygon, epsg: EpsgCode) -> Self {
        Self { geometry, epsg }
    }

    /// Load the boundary from a geofile, merging the polygons of every feature into one multi-polygon.
    ///
    /// Nothing is cached, every call reads the file again.
    pub fn load_from_geofile(filepath: &Path) -> anyhow::Result<Self> {
        let load_error = |reason: String| ValidationError::ReferenceLoadError {
            path: filepath.to_path_buf(),
            reason,
        };
        if !filepath.exists() {
            return Err(load_error("file not found".to_string()).into());
        }
        let collection =
            read_features_from_geofile(filepath).map_err(|err| load_error(format!("{:#}", err)))?;
        let region = Self::from_feature_collection(&collection)
            .ok_or_else(|| load_error("no polygonal geometry found".to_string()))?;
        log::info!(
            "Loaded reference region from {:?} in EPSG:{}",
            filepath,
            collection.epsg
        );
        Ok(region)
    }

    /// Merge the polygonal features of a collection into one region. Other features are dropped with a
    /// warning. `None` when no feature is polygonal.
    pub fn from_feature_collection(collection: &FeatureCollection) -> Option<Self> {
        let polygonal_features = collection.polygons();
        if polygonal_features.is_empty() {
            return None;
        }
        if polygonal_features.len() != collection.len() {
            log::warn!(
                "Out of {} reference boundary features, only {} were Polygons or MultiPolygons.",
                collection.len(),
                polygonal_features.len()
            );
        }
        let polygons: Vec<geo::Polygon> = polygonal_features
            .into_iter()
            .flat_map(|multi_polygon| multi_polygon.0)
            .collect();
        Some(Self::new(MultiPolygon::new(polygons), collection.epsg))
    }
}

#[cfg(test)]
mod tests {
    use geo::{point, polygon};
    use rstest::rstest;
    use testdir::testdir;

    use super::ReferenceRegion;
    use crate::{
        error::ValidationError,
        geofile::{
            feature::{Feature, FeatureCollection},
            gdal_geofile::{write_features_to_geofile, GdalDriverType},
        },
    };

    #[rstest]
    fn test_load_twice_yields_equal_regions() {
        let boundary = vec![Feature::from(geo::Geometry::Polygon(polygon![
            (x: -59.6, y: -30.7),
            (x: -56.0, y: -30.7),
            (x: -56.0, y: -27.2),
            (x: -59.6, y: -27.2),
            (x: -59.6, y: -30.7),
        ]))];
        let filepath = testdir!().join("boundary.shp");
        write_features_to_geofile(&boundary, &filepath, 4326, GdalDriverType::Shapefile).unwrap();

        let first = ReferenceRegion::load_from_geofile(&filepath).unwrap();
        let second = ReferenceRegion::load_from_geofile(&filepath).unwrap();
        assert_eq!(first.epsg, 4326);
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_missing_file_is_reference_load_error() {
        let filepath = testdir!().join("missing.shp");
        let err = ReferenceRegion::load_from_geofile(&filepath).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::ReferenceLoadError { .. })
        ));
    }

    #[rstest]
    fn test_corrupt_file_is_reference_load_error() {
        let filepath = testdir!().join("corrupt.shp");
        std::fs::write(&filepath, "not a shapefile").unwrap();
        let err = ReferenceRegion::load_from_geofile(&filepath).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::ReferenceLoadError { .. })
        ));
    }

    #[rstest]
    fn test_multipart_boundary_keeps_every_part() {
        let collection = FeatureCollection::new(
            vec![
                Feature::from(geo::Geometry::MultiPolygon(
                    vec![
                        polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
                        polygon![(x: 2.0, y: 0.0), (x: 3.0, y: 0.0), (x: 3.0, y: 1.0)],
                    ]
                    .into(),
                )),
                Feature::from(geo::Geometry::Point(point!(x: 0.5, y: 0.5))),
            ],
            22195,
        );
        let region = ReferenceRegion::from_feature_collection(&collection).unwrap();
        assert_eq!(region.geometry.0.len(), 2);
        assert_eq!(region.epsg, 22195);
    }

    #[rstest]
    fn test_boundary_without_polygons_is_rejected() {
        let collection = FeatureCollection::new(
            vec![Feature::from(geo::Geometry::Point(point!(x: 0.5, y: 0.5)))],
            22195,
        );
        assert!(ReferenceRegion::from_feature_collection(&collection).is_none());
    }
}
