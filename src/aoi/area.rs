use geo::{Area, MultiPolygon};

use crate::{
    config::DEFAULT_AREA_EPSG,
    crs::crs_utils::{project_multipolygon, EpsgCode},
};

pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Measures polygon areas in hectares after projecting them into a fixed metric CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaReporter {
    pub target_epsg: EpsgCode,
}

impl Default for AreaReporter {
    fn default() -> Self {
        Self::new(DEFAULT_AREA_EPSG)
    }
}

impl AreaReporter {
    pub fn new(target_epsg: EpsgCode) -> Self {
        Self { target_epsg }
    }

    /// Sum of the areas of all polygons, in hectares. Overlapping polygons are counted once per polygon.
    pub fn area_ha(&self, polygons: &[MultiPolygon], from_epsg: EpsgCode) -> anyhow::Result<f64> {
        let mut area_m2 = 0.0;
        for multi_polygon in polygons {
            let projected = project_multipolygon(multi_polygon, from_epsg, self.target_epsg)?;
            area_m2 += projected.unsigned_area();
        }
        Ok(area_m2 / SQUARE_METERS_PER_HECTARE)
    }
}
