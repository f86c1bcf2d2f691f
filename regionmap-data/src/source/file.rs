//! Record source backed by a local JSON file.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use regionmap_core::{SourceKind, SourceRecord};
use regionmap_fs::{JsonFileError, read_json_file};
use serde_json::Value;

use super::decode::decode_tagged;
use super::{RecordSource, SourceError, SourceQuery};

/// Reads one collection from a JSON array of `kind`-tagged records.
///
/// The file may mix collections; only records of the configured kind are
/// returned. Elements that fail to decode are returned without a position so
/// the pipeline counts them as malformed. Files carry no activity flag, so
/// `active_only` is ignored.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: Utf8PathBuf,
    kind: SourceKind,
}

impl FileRecordSource {
    /// Serve `kind` records from the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, kind: SourceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn convert_file_error(error: JsonFileError) -> SourceError {
    match error {
        JsonFileError::Parse { path, source } => SourceError::Parse {
            origin: path.into_string(),
            message: source.to_string(),
        },
        JsonFileError::Open { path, source } => SourceError::Io {
            path: path.into_string(),
            message: source.to_string(),
        },
        JsonFileError::Write { path, source } => SourceError::Io {
            path: path.into_string(),
            message: source.to_string(),
        },
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn query(&self, query: &SourceQuery) -> Result<Vec<SourceRecord>, SourceError> {
        let path = self.path.clone();
        let values = tokio::task::spawn_blocking(move || read_json_file::<Vec<Value>>(&path))
            .await
            .map_err(|err| SourceError::Io {
                path: self.path.to_string(),
                message: err.to_string(),
            })?
            .map_err(convert_file_error)?;
        let mut records = decode_tagged(self.kind, values);
        records.truncate(query.limit);
        Ok(records)
    }
}
