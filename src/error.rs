use std::path::PathBuf;

/// Failures that abort a validation run.
///
/// Containment and area range findings are never reported through this type, see
/// [`crate::aoi::report::Advisory`] for those.
#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Expected the dataset path as a UTF-8 string, got {0:?}")]
    InvalidInputType(PathBuf),

    #[error(
        "Could not read {path:?}: the format is unknown and the generic GDAL reader failed ({reason}). \
         Check the GDAL vector drivers for the supported formats."
    )]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("The input dataset does not contain any polygonal geometry representing the area of interest")]
    NoPolygonGeometry,

    #[error("Could not load the reference boundary from {path:?}: {reason}")]
    ReferenceLoadError { path: PathBuf, reason: String },
}
