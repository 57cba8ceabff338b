use std::collections::HashMap;

use geo::MultiPolygon;

use crate::crs::crs_utils::EpsgCode;

/// Geometry type tag of a feature, named the way OGR names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    Line,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Rect,
    Triangle,
}

impl GeometryType {
    pub fn is_polygonal(&self) -> bool {
        matches!(self, GeometryType::Polygon | GeometryType::MultiPolygon)
    }
}

impl From<&geo::Geometry> for GeometryType {
    fn from(geometry: &geo::Geometry) -> Self {
        match geometry {
            geo::Geometry::Point(_) => GeometryType::Point,
            geo::Geometry::Line(_) => GeometryType::Line,
            geo::Geometry::LineString(_) => GeometryType::LineString,
            geo::Geometry::Polygon(_) => GeometryType::Polygon,
            geo::Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            geo::Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            geo::Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            geo::Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
            geo::Geometry::Rect(_) => GeometryType::Rect,
            geo::Geometry::Triangle(_) => GeometryType::Triangle,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: geo::Geometry,
    // TODO support different value types besides String. See gdal::vector::OGRFieldType for types
    // supported by GDAL.
    pub attributes: Option<HashMap<String, String>>,
}

impl Feature {
    pub fn geometry_type(&self) -> GeometryType {
        GeometryType::from(&self.geometry)
    }

    /// The polygonal parts of the feature, `None` for anything but Polygon and MultiPolygon.
    pub fn polygons(&self) -> Option<MultiPolygon> {
        match &self.geometry {
            geo::Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon.clone()])),
            geo::Geometry::MultiPolygon(multi_polygon) => Some(multi_polygon.clone()),
            _ => None,
        }
    }
}

impl From<geo::Geometry> for Feature {
    fn from(value: geo::Geometry) -> Self {
        Self {
            geometry: value,
            attributes: None,
        }
    }
}

/// Ordered features read from a single geofile layer, with the EPSG code of their CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub epsg: EpsgCode,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>, epsg: EpsgCode) -> Self {
        Self { features, epsg }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn geometry_types(&self) -> Vec<GeometryType> {
        self.features.iter().map(Feature::geometry_type).collect()
    }

    /// Polygonal parts of every feature, in feature order. Non-polygonal features are skipped.
    pub fn polygons(&self) -> Vec<MultiPolygon> {
        self.features.iter().filter_map(Feature::polygons).collect()
    }
}
