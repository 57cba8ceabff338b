use anyhow::anyhow;
use geo::MultiPolygon;
use proj::Transform;

pub type EpsgCode = u32;

pub const WGS84_EPSG: EpsgCode = 4326;

pub fn epsg_code_to_authority_string(code: EpsgCode) -> String {
    format!("EPSG:{}", code)
}

/// Derive the EPSG code of a GDAL spatial reference.
///
/// Shapefile `.prj` files usually carry ESRI WKT without an authority node, so GDAL is first asked to
/// identify the matching EPSG entry.
pub fn spatial_ref_to_epsg(spatial_ref: &gdal::spatial_ref::SpatialRef) -> anyhow::Result<EpsgCode> {
    let mut spatial_ref = spatial_ref.clone();
    if let Err(err) = spatial_ref.auto_identify_epsg() {
        log::debug!("GDAL could not identify an EPSG code: {}", err);
    }
    let code = spatial_ref
        .auth_code()
        .map_err(|err| anyhow!("Spatial reference has no EPSG authority code. {}", err))?;
    Ok(code as EpsgCode)
}

/// Project polygons between two EPSG coordinate reference systems. Identical codes return a copy.
pub fn project_multipolygon(
    polygons: &MultiPolygon,
    from_epsg: EpsgCode,
    to_epsg: EpsgCode,
) -> anyhow::Result<MultiPolygon> {
    if from_epsg == to_epsg {
        return Ok(polygons.clone());
    }
    let projection = proj::Proj::new_known_crs(
        &epsg_code_to_authority_string(from_epsg),
        &epsg_code_to_authority_string(to_epsg),
        None,
    )?;
    polygons
        .transformed(&projection)
        .map_err(|err| anyhow!("Could not project polygons, {}", err))
}
