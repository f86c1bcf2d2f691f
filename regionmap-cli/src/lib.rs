//! Command-line interface for one-shot regionmap runs.
//!
//! `snapshot` runs the classification pipeline once over record files and
//! prints the resulting map snapshot; `regions` lists the configured region
//! boundaries with their label centres. Options come from CLI flags,
//! configuration files or `REGIONMAP_*` environment variables.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

mod error;
mod regions;
mod snapshot;

pub use error::CliError;

use regions::{RegionsArgs, run_regions};
use snapshot::{SnapshotArgs, run_snapshot};

pub(crate) const ARG_REGIONS: &str = "regions";
pub(crate) const ARG_POSTS: &str = "posts";
pub(crate) const ARG_BUSINESSES: &str = "businesses";
pub(crate) const ARG_EVENTS: &str = "events";
pub(crate) const ARG_VERIFIED: &str = "verified";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_SNAPSHOT_REGIONS: &str = "REGIONMAP_CMDS_SNAPSHOT_REGIONS";
pub(crate) const ENV_REGIONS_REGIONS: &str = "REGIONMAP_CMDS_REGIONS_REGIONS";

/// Run the regionmap CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, inputs
/// cannot be loaded, a fetch fails or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Snapshot(args) => run_snapshot(args),
        Command::Regions(args) => run_regions(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "regionmap",
    about = "Classify map content into named regions and summarise it",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the pipeline once over record files and print the snapshot.
    Snapshot(SnapshotArgs),
    /// List configured regions with their label centres.
    Regions(RegionsArgs),
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match regionmap_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` to `writer` as pretty JSON followed by a newline.
pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
