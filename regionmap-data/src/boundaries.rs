//! Region boundary configuration loading.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use regionmap_core::{PolygonIndex, RegionBoundary, RegionIndexError};
use regionmap_fs::{JsonFileError, read_json_file};
use thiserror::Error;

/// Errors raised while loading boundary configuration.
///
/// All of them are fatal at startup: the service never runs without a valid
/// index.
#[derive(Debug, Error)]
pub enum BoundaryConfigError {
    /// The configuration file could not be read.
    #[error("failed to read region boundaries from {path}: {source}")]
    Read {
        /// Configuration path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file was not a JSON array of `{name, ring}` objects.
    #[error("failed to parse region boundaries in {path}: {source}")]
    Parse {
        /// Configuration path.
        path: Utf8PathBuf,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A boundary failed validation.
    #[error("invalid region boundaries in {path}: {source}")]
    Index {
        /// Configuration path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: RegionIndexError,
    },
}

impl From<JsonFileError> for BoundaryConfigError {
    fn from(error: JsonFileError) -> Self {
        match error {
            JsonFileError::Open { path, source } => Self::Read { path, source },
            JsonFileError::Parse { path, source } => Self::Parse { path, source },
            JsonFileError::Write { path, source } => Self::Read {
                path,
                source: source.into(),
            },
        }
    }
}

/// Load a [`PolygonIndex`] from a JSON boundary file.
///
/// The file holds an array of `{ "name": "...", "ring": [[lng, lat], ...] }`
/// objects; array order becomes index order.
///
/// # Errors
///
/// Returns [`BoundaryConfigError`] when the file cannot be read, does not
/// parse, or contains an invalid boundary.
pub fn load_region_index(path: &Utf8Path) -> Result<PolygonIndex, BoundaryConfigError> {
    let boundaries: Vec<RegionBoundary> = read_json_file(path)?;
    let index = PolygonIndex::new(boundaries).map_err(|source| BoundaryConfigError::Index {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loaded {} regions from {path}", index.len());
    Ok(index)
}
