use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::{aoi::report::AcceptableRange, crs::crs_utils::EpsgCode};

/// Shapefile holding the province of Corrientes, as published by the Argentinian IGN.
pub const DEFAULT_REFERENCE_BOUNDARY_PATH: &str = "data/Layers/Raw/corrientes/corrientes.shp";

/// Campo Inchauspe / Argentina 5, the projected CRS covering Corrientes.
pub const DEFAULT_AREA_EPSG: EpsgCode = 22195;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub reference_boundary_path: PathBuf,
    /// Projected CRS used for every area measurement.
    pub area_epsg: EpsgCode,
    pub acceptable_range_ha: AcceptableRange,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_boundary_path: PathBuf::from(DEFAULT_REFERENCE_BOUNDARY_PATH),
            area_epsg: DEFAULT_AREA_EPSG,
            acceptable_range_ha: AcceptableRange::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        if config.acceptable_range_ha.min >= config.acceptable_range_ha.max {
            return Err(anyhow!(
                "Acceptable range minimum ({}) must be below its maximum ({})",
                config.acceptable_range_ha.min,
                config.acceptable_range_ha.max
            ));
        }
        Ok(config)
    }

    pub fn load(filepath: &Path) -> anyhow::Result<Self> {
        if !filepath.exists() {
            return Err(anyhow!("Config file {:?} not found", filepath));
        }
        let contents = read_to_string(filepath)
            .with_context(|| format!("Reading config file {:?}", filepath))?;
        Self::from_yaml_str(&contents)
    }
}
