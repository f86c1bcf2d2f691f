//! Record sources and the map data service for regionmap.
//!
//! Responsibilities:
//! - Define the [`RecordSource`] seam and its HTTP, file, in-memory and stub
//!   adapters.
//! - Load region boundary configuration into a [`PolygonIndex`].
//! - Orchestrate fetch → filter → normalise → classify → aggregate and
//!   publish the result atomically through [`MapDataService`].
//!
//! Boundaries:
//! - Do not encode classification rules (live in `regionmap-core`).
//! - Keep blocking I/O off async executors.
//!
//! Invariants:
//! - Published points and summaries always come from the same run.
//! - A run that was superseded by a later refresh never publishes.
//!
//! [`PolygonIndex`]: regionmap_core::PolygonIndex

#![forbid(unsafe_code)]

mod boundaries;
pub mod service;
pub mod source;

pub use boundaries::{BoundaryConfigError, load_region_index};
pub use service::{MapDataService, PageSizes, Phase, RunOutcome, ServiceConfig, ServiceStatus};
pub use source::{
    FetchError, FileRecordSource, HttpRecordSource, HttpRecordSourceConfig, MemoryRecordSource,
    RecordSource, SourceBuildError, SourceError, SourceFailure, SourceQueries, SourceQuery,
    SourceSet,
};
