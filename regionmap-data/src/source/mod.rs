//! Record sources for the three content collections.
//!
//! Every collection is reached through the async [`RecordSource`] trait so the
//! service can fetch them concurrently and tests can swap in scripted stubs.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use regionmap_core::SourceKind;
//! use regionmap_data::{HttpRecordSource, HttpRecordSourceConfig, SourceSet};
//!
//! # fn main() -> Result<(), regionmap_data::SourceBuildError> {
//! let http = |kind| {
//!     HttpRecordSource::with_config(HttpRecordSourceConfig::new("http://localhost:8080/api", kind))
//! };
//! let sources = SourceSet::new(
//!     Arc::new(http(SourceKind::Post)?),
//!     Arc::new(http(SourceKind::Business)?),
//!     Arc::new(http(SourceKind::Event)?),
//! );
//! # let _ = sources;
//! # Ok(())
//! # }
//! ```

mod decode;
mod file;
mod http;
mod memory;

#[doc(hidden)]
pub mod test_support;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join3;
use log::warn;
use regionmap_core::{SourceKind, SourceRecord};
use thiserror::Error;

pub use file::FileRecordSource;
pub use http::{DEFAULT_USER_AGENT, HttpRecordSource, HttpRecordSourceConfig, SourceBuildError};
pub use memory::MemoryRecordSource;

/// Bounds applied to a single collection query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceQuery {
    /// Maximum number of records to return.
    pub limit: usize,
    /// Restrict the query to records the source marks as active.
    pub active_only: bool,
}

impl SourceQuery {
    /// Query at most `limit` records, active or not.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            active_only: false,
        }
    }

    /// Restrict the query to active records.
    #[must_use]
    pub const fn active(mut self) -> Self {
        self.active_only = true;
        self
    }
}

/// Errors raised by a single record source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The request could not reach the service.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request did not complete in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with an error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response or file did not decode as records.
    #[error("failed to decode records from {origin}: {message}")]
    Parse {
        /// URL or path the records came from.
        origin: String,
        /// Decoder error description.
        message: String,
    },
    /// Reading a local record file failed.
    #[error("failed to read records from {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// I/O error description.
        message: String,
    },
}

/// Async seam over one content collection.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Collection served by this source.
    fn kind(&self) -> SourceKind;

    /// Fetch at most `query.limit` records.
    async fn query(&self, query: &SourceQuery) -> Result<Vec<SourceRecord>, SourceError>;
}

/// One failed collection within a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Collection that failed.
    pub kind: SourceKind,
    /// What went wrong.
    pub error: SourceError,
}

/// Aggregate error for a fetch where at least one collection failed.
///
/// Records from the collections that did succeed are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch {}", describe_failures(.failures))]
pub struct FetchError {
    failures: Vec<SourceFailure>,
}

impl FetchError {
    /// Build an aggregate error from individual failures.
    #[must_use]
    pub const fn new(failures: Vec<SourceFailure>) -> Self {
        Self { failures }
    }

    /// Every collection that failed, in fetch order.
    #[must_use]
    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }
}

fn describe_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("{}: {}", failure.kind, failure.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The three collections the map draws from.
#[derive(Clone)]
pub struct SourceSet {
    posts: Arc<dyn RecordSource>,
    businesses: Arc<dyn RecordSource>,
    events: Arc<dyn RecordSource>,
}

impl std::fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSet")
            .field("posts", &self.posts.kind())
            .field("businesses", &self.businesses.kind())
            .field("events", &self.events.kind())
            .finish()
    }
}

/// Per-collection queries for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceQueries {
    /// Query for posts.
    pub posts: SourceQuery,
    /// Query for businesses.
    pub businesses: SourceQuery,
    /// Query for events.
    pub events: SourceQuery,
}

impl SourceSet {
    /// Group the three collection sources.
    #[must_use]
    pub fn new(
        posts: Arc<dyn RecordSource>,
        businesses: Arc<dyn RecordSource>,
        events: Arc<dyn RecordSource>,
    ) -> Self {
        Self {
            posts,
            businesses,
            events,
        }
    }

    /// Fetch all three collections concurrently.
    ///
    /// Every collection is awaited even when another fails, so the error
    /// lists each failing source.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any collection fails; no records are
    /// returned in that case.
    pub async fn fetch_all(
        &self,
        queries: &SourceQueries,
    ) -> Result<Vec<SourceRecord>, FetchError> {
        let (posts, businesses, events) = join3(
            self.posts.query(&queries.posts),
            self.businesses.query(&queries.businesses),
            self.events.query(&queries.events),
        )
        .await;

        let mut records = Vec::new();
        let mut failures = Vec::new();
        let results = [
            (self.posts.kind(), posts),
            (self.businesses.kind(), businesses),
            (self.events.kind(), events),
        ];
        for (kind, result) in results {
            match result {
                Ok(batch) => records.extend(batch),
                Err(error) => {
                    warn!("fetching {kind} records failed: {error}");
                    failures.push(SourceFailure { kind, error });
                }
            }
        }
        if failures.is_empty() {
            Ok(records)
        } else {
            Err(FetchError::new(failures))
        }
    }
}
