//! Error types emitted by the regionmap CLI.
//!
//! Many helpers return `Result<_, CliError>`, so large payloads are boxed or
//! kept behind `Arc` to stay clear of `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use regionmap_data::{BoundaryConfigError, FetchError};
use regionmap_fs::JsonFileError;
use thiserror::Error;

/// Errors emitted by the regionmap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A page size of zero was requested.
    #[error("--limit must be at least 1")]
    ZeroLimit,
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Region boundaries could not be loaded.
    #[error(transparent)]
    Boundaries(#[from] Box<BoundaryConfigError>),
    /// At least one record source failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output to stdout failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing command output to a file failed.
    #[error(transparent)]
    OutputFile(#[from] Box<JsonFileError>),
}

impl From<BoundaryConfigError> for CliError {
    fn from(source: BoundaryConfigError) -> Self {
        Self::Boundaries(Box::new(source))
    }
}

impl From<JsonFileError> for CliError {
    fn from(source: JsonFileError) -> Self {
        Self::OutputFile(Box::new(source))
    }
}
