use std::path::{Path, PathBuf};

use anyhow::anyhow;
use aoi_check::{
    aoi::validation::Validator,
    config::Config,
    geofile::{
        feature::FeatureCollection,
        gdal_geofile::{write_features_to_geofile, GdalDriverType},
        read_dataset,
    },
    tiles::base_tiles,
};
use clap::{Parser, Subcommand};

/// Check that an area of interest is polygonal and lies within the reference region.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a dataset and validate it against the reference region.
    Validate {
        /// Path to the area of interest (GeoParquet, Shapefile, GeoJSON, KML or any GDAL vector format).
        #[arg(short, long)]
        dataset: PathBuf,

        /// Path to a YAML config file. Defaults apply when omitted.
        #[arg(short, long)]
        config_filepath: Option<PathBuf>,

        /// Write the validated area of interest to this geofile.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only load the dataset, for datasets that are not meant to hold polygons.
        #[arg(long)]
        no_polygon_checks: bool,
    },
    /// Print the base map tile layers as YAML.
    Tiles,
}

fn write_output(collection: &FeatureCollection, output_filepath: &Path) -> anyhow::Result<()> {
    let driver_type = GdalDriverType::from_path(output_filepath)
        .filter(|driver_type| *driver_type != GdalDriverType::Kml)
        .ok_or_else(|| {
            anyhow!(
                "Cannot infer an output driver for {:?}, use .gpkg, .geojson, .shp or .parquet",
                output_filepath
            )
        })?;
    write_features_to_geofile(
        &collection.features,
        output_filepath,
        collection.epsg,
        driver_type,
    )
}

fn validate(
    dataset: &Path,
    config_filepath: Option<&Path>,
    output: Option<&Path>,
    no_polygon_checks: bool,
) -> anyhow::Result<()> {
    let config = match config_filepath {
        Some(filepath) => Config::load(filepath)?,
        None => Config::default(),
    };
    log::debug!("{:?}", config);

    let collection = if no_polygon_checks {
        log::info!("Skipping polygon and containment checks");
        read_dataset(dataset)?
    } else {
        let validator = Validator::from_config(&config)?;
        let report = validator.validate_dataset(dataset)?;
        log::info!(
            "{} with {} advisories",
            report.containment.name(),
            report.advisories.len()
        );
        report.aoi
    };

    if let Some(output_filepath) = output {
        write_output(&collection, output_filepath)?;
    }
    Ok(())
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    match args.command {
        Command::Validate {
            dataset,
            config_filepath,
            output,
            no_polygon_checks,
        } => validate(
            &dataset,
            config_filepath.as_deref(),
            output.as_deref(),
            no_polygon_checks,
        ),
        Command::Tiles => {
            print!("{}", serde_yaml::to_string(&base_tiles())?);
            Ok(())
        }
    }
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
