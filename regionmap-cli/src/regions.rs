//! Regions command implementation for the regionmap CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use regionmap_core::{PolygonIndex, Region};
use regionmap_data::load_region_index;
use serde::{Deserialize, Serialize};

use crate::{ARG_REGIONS, CliError, ENV_REGIONS_REGIONS, require_existing, write_json};

/// CLI arguments for the `regions` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Validate the region boundary configuration and print each \
                 region's name, vertex count and label centre as JSON, in \
                 configuration order.",
    about = "List configured regions"
)]
#[ortho_config(prefix = "REGIONMAP")]
pub(crate) struct RegionsArgs {
    /// Path to the region boundary configuration (JSON).
    #[arg(long = ARG_REGIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) regions: Option<Utf8PathBuf>,
}

impl RegionsArgs {
    fn into_regions_path(self) -> Result<Utf8PathBuf, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        merged.regions.ok_or(CliError::MissingArgument {
            field: ARG_REGIONS,
            env: ENV_REGIONS_REGIONS,
        })
    }
}

/// One line of `regions` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RegionListing {
    pub(crate) name: String,
    pub(crate) vertex_count: usize,
    pub(crate) center: Coord<f64>,
}

impl From<&Region> for RegionListing {
    fn from(region: &Region) -> Self {
        Self {
            name: region.name().to_owned(),
            vertex_count: region.boundary().0.len(),
            center: region.center(),
        }
    }
}

pub(crate) fn list_regions(index: &PolygonIndex) -> Vec<RegionListing> {
    index.regions().iter().map(RegionListing::from).collect()
}

pub(super) fn run_regions(args: RegionsArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_regions_with(args, &mut stdout)
}

pub(super) fn run_regions_with(args: RegionsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let path = args.into_regions_path()?;
    require_existing(&path, ARG_REGIONS)?;
    let index = load_region_index(&path)?;
    write_json(writer, &list_regions(&index))
}
