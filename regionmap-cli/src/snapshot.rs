//! Snapshot command implementation for the regionmap CLI.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use regionmap_core::{MapSnapshot, PolygonIndex, SourceKind, Viewer};
use regionmap_data::{
    FileRecordSource, MapDataService, MemoryRecordSource, PageSizes, RecordSource, ServiceConfig,
    SourceSet, load_region_index,
};
use regionmap_fs::write_json_file;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BUSINESSES, ARG_EVENTS, ARG_LIMIT, ARG_OUTPUT, ARG_POSTS, ARG_REGIONS, ARG_VERIFIED,
    CliError, ENV_SNAPSHOT_REGIONS, require_existing, write_json,
};

/// CLI arguments for the `snapshot` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load region boundaries and record files, run visibility \
                 filtering, normalisation, classification and aggregation \
                 once, and print the resulting snapshot as JSON. Record files \
                 hold JSON arrays of kind-tagged records; collections without \
                 a file are treated as empty.",
    about = "Build a map snapshot from record files"
)]
#[ortho_config(prefix = "REGIONMAP")]
pub(crate) struct SnapshotArgs {
    /// Path to the region boundary configuration (JSON).
    #[arg(long = ARG_REGIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) regions: Option<Utf8PathBuf>,
    /// Path to a JSON file of post records.
    #[arg(long = ARG_POSTS, value_name = "path")]
    #[serde(default)]
    pub(crate) posts: Option<Utf8PathBuf>,
    /// Path to a JSON file of business records.
    #[arg(long = ARG_BUSINESSES, value_name = "path")]
    #[serde(default)]
    pub(crate) businesses: Option<Utf8PathBuf>,
    /// Path to a JSON file of event records.
    #[arg(long = ARG_EVENTS, value_name = "path")]
    #[serde(default)]
    pub(crate) events: Option<Utf8PathBuf>,
    /// View the map as a signed-in, verified member.
    #[arg(long = ARG_VERIFIED)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) verified: bool,
    /// Maximum records read from each collection (default 200).
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Write the snapshot to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SnapshotArgs {
    pub(crate) fn into_config(self) -> Result<SnapshotConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SnapshotConfig::try_from(merged)
    }
}

/// Resolved `snapshot` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SnapshotConfig {
    /// Region boundary configuration.
    pub(crate) regions: Utf8PathBuf,
    pub(crate) posts: Option<Utf8PathBuf>,
    pub(crate) businesses: Option<Utf8PathBuf>,
    pub(crate) events: Option<Utf8PathBuf>,
    /// Viewer applied to the run; `None` is an anonymous visitor.
    pub(crate) viewer: Option<Viewer>,
    pub(crate) page_sizes: PageSizes,
    /// Destination file; stdout when absent.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SnapshotConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.regions, ARG_REGIONS)?;
        let record_files = [
            (&self.posts, ARG_POSTS),
            (&self.businesses, ARG_BUSINESSES),
            (&self.events, ARG_EVENTS),
        ];
        for (path, field) in record_files {
            if let Some(path) = path {
                require_existing(path, field)?;
            }
        }
        Ok(())
    }

    fn source_set(&self) -> SourceSet {
        SourceSet::new(
            record_source(self.posts.as_ref(), SourceKind::Post),
            record_source(self.businesses.as_ref(), SourceKind::Business),
            record_source(self.events.as_ref(), SourceKind::Event),
        )
    }

    fn service_config(&self) -> ServiceConfig {
        ServiceConfig::default().with_page_sizes(self.page_sizes)
    }
}

fn record_source(path: Option<&Utf8PathBuf>, kind: SourceKind) -> Arc<dyn RecordSource> {
    match path {
        Some(path) => Arc::new(FileRecordSource::new(path.clone(), kind)),
        None => Arc::new(MemoryRecordSource::empty(kind)),
    }
}

impl TryFrom<SnapshotArgs> for SnapshotConfig {
    type Error = CliError;

    fn try_from(args: SnapshotArgs) -> Result<Self, Self::Error> {
        let regions = args.regions.ok_or(CliError::MissingArgument {
            field: ARG_REGIONS,
            env: ENV_SNAPSHOT_REGIONS,
        })?;
        let page_sizes = match args.limit {
            None => PageSizes::default(),
            Some(0) => return Err(CliError::ZeroLimit),
            Some(limit) => PageSizes::uniform(limit),
        };
        let viewer = args.verified.then(Viewer::verified);

        Ok(Self {
            regions,
            posts: args.posts,
            businesses: args.businesses,
            events: args.events,
            viewer,
            page_sizes,
            output: args.output,
        })
    }
}

pub(super) fn run_snapshot(args: SnapshotArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_snapshot_with(args, &mut stdout)
}

pub(super) fn run_snapshot_with(
    args: SnapshotArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_snapshot_config(args)?;
    let index = load_region_index(&config.regions)?;
    let snapshot = build_map_snapshot(&config, index)?;
    match &config.output {
        Some(path) => write_json_file(path, snapshot.as_ref())?,
        None => write_json(writer, snapshot.as_ref())?,
    }
    Ok(())
}

fn resolve_snapshot_config(args: SnapshotArgs) -> Result<SnapshotConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Run the map data service once and return what it published.
pub(super) fn build_map_snapshot(
    config: &SnapshotConfig,
    index: PolygonIndex,
) -> Result<Arc<MapSnapshot>, CliError> {
    let service = MapDataService::new(config.source_set(), index, config.service_config());
    service.set_viewer(config.viewer);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(service.run())?;
    Ok(service.snapshot())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SnapshotConfig, CliError> {
    let merged = SnapshotArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SnapshotConfig::try_from(merged)
}
