//! Test utilities for record sources.
//!
//! This module provides [`StubRecordSource`], a scripted test double for
//! [`RecordSource`] that returns pre-configured responses after an optional
//! delay, without touching the network or filesystem.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use regionmap_core::{SourceKind, SourceRecord};

use super::{RecordSource, SourceError, SourceQuery};

/// Outcome returned by a single stubbed query.
type StubResult = Result<Vec<SourceRecord>, SourceError>;

#[derive(Debug, Clone)]
struct StubResponse {
    result: StubResult,
    delay: Duration,
}

/// Stub `RecordSource` for testing.
///
/// Queued responses are consumed one per query in order; once the queue is
/// empty every query receives the default response.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use regionmap_core::SourceKind;
/// use regionmap_data::source::test_support::StubRecordSource;
///
/// let stub = StubRecordSource::new(SourceKind::Post).with_delay(Duration::from_millis(5));
/// stub.enqueue(Ok(Vec::new()), Duration::from_millis(50));
/// assert_eq!(stub.calls(), 0);
/// ```
#[derive(Debug)]
pub struct StubRecordSource {
    kind: SourceKind,
    default: StubResponse,
    queued: Mutex<VecDeque<StubResponse>>,
    last_query: Mutex<Option<SourceQuery>>,
    calls: AtomicUsize,
}

impl StubRecordSource {
    /// A source that returns no records.
    #[must_use]
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            default: StubResponse {
                result: Ok(Vec::new()),
                delay: Duration::ZERO,
            },
            queued: Mutex::new(VecDeque::new()),
            last_query: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Return `records` by default.
    #[must_use]
    pub fn with_records(mut self, records: Vec<SourceRecord>) -> Self {
        self.default.result = Ok(records);
        self
    }

    /// Fail with `error` by default.
    #[must_use]
    pub fn with_error(mut self, error: SourceError) -> Self {
        self.default.result = Err(error);
        self
    }

    /// Wait `delay` before answering by default.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.default.delay = delay;
        self
    }

    /// Queue a one-off response for the next unanswered query.
    pub fn enqueue(&self, result: StubResult, delay: Duration) {
        self.queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(StubResponse { result, delay });
    }

    /// Number of queries received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent query, if any.
    #[must_use]
    pub fn last_query(&self) -> Option<SourceQuery> {
        *self.last_query.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordSource for StubRecordSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn query(&self, query: &SourceQuery) -> Result<Vec<SourceRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap_or_else(PoisonError::into_inner) = Some(*query);
        let response = self
            .queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        let mut records = response.result?;
        records.truncate(query.limit);
        Ok(records)
    }
}
