//! Record source serving a fixed in-memory collection.

use async_trait::async_trait;
use regionmap_core::{SourceKind, SourceRecord};

use super::{RecordSource, SourceError, SourceQuery};

/// Serves records held in memory, such as seed data or an unconfigured
/// collection.
///
/// Records of other kinds are skipped and `active_only` is ignored.
///
/// # Examples
/// ```
/// use regionmap_core::SourceKind;
/// use regionmap_data::{MemoryRecordSource, RecordSource};
///
/// let events = MemoryRecordSource::empty(SourceKind::Event);
/// assert_eq!(events.kind(), SourceKind::Event);
/// assert!(events.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryRecordSource {
    kind: SourceKind,
    records: Vec<SourceRecord>,
}

impl MemoryRecordSource {
    /// Serve the `kind` records among `records`.
    #[must_use]
    pub fn new(kind: SourceKind, records: Vec<SourceRecord>) -> Self {
        let records = records
            .into_iter()
            .filter(|record| record.kind() == kind)
            .collect();
        Self { kind, records }
    }

    /// A source with nothing to serve.
    #[must_use]
    pub const fn empty(kind: SourceKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Whether the source holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn query(&self, query: &SourceQuery) -> Result<Vec<SourceRecord>, SourceError> {
        Ok(self.records.iter().take(query.limit).cloned().collect())
    }
}
