use std::path::Path;

use super::{
    area::AreaReporter,
    containment::{classify, Containment},
    polygon_filter::filter_polygons,
    reference::ReferenceRegion,
    report::{self, AcceptableRange, Advisory},
};
use crate::{
    config::Config,
    geofile::{feature::FeatureCollection, read_dataset},
};

/// Outcome of a validation run that did not abort.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// The area of interest, reduced to its polygonal features.
    pub aoi: FeatureCollection,
    pub containment: Containment,
    pub advisories: Vec<Advisory>,
}

/// Checks areas of interest against a reference region.
pub struct Validator {
    pub reference: ReferenceRegion,
    pub area_reporter: AreaReporter,
    pub acceptable_range: AcceptableRange,
}

impl Validator {
    pub fn new(
        reference: ReferenceRegion,
        area_reporter: AreaReporter,
        acceptable_range: AcceptableRange,
    ) -> Self {
        Self {
            reference,
            area_reporter,
            acceptable_range,
        }
    }

    /// Build a validator from a config, loading the reference region from disk.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let reference = ReferenceRegion::load_from_geofile(&config.reference_boundary_path)?;
        Ok(Self::new(
            reference,
            AreaReporter::new(config.area_epsg),
            config.acceptable_range_ha,
        ))
    }

    /// Filter, classify and report on an already loaded area of interest. Advisories are logged and
    /// returned, only a missing polygon or a failed projection aborts.
    pub fn validate(&self, aoi: FeatureCollection) -> anyhow::Result<ValidationReport> {
        let aoi = filter_polygons(aoi)?;
        let containment = classify(&aoi, &self.reference, &self.area_reporter)?;
        let advisories = report::advisories(&containment, &self.acceptable_range);
        report::emit(&containment, &advisories);
        Ok(ValidationReport {
            aoi,
            containment,
            advisories,
        })
    }

    pub fn validate_dataset(&self, filepath: &Path) -> anyhow::Result<ValidationReport> {
        let aoi = read_dataset(filepath)?;
        self.validate(aoi)
    }
}
