extern crate log;
pub mod aoi;
pub mod config;
pub mod crs;
pub mod error;
pub mod geofile;
pub mod tiles;
