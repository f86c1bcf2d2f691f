//! Facade crate for the regionmap classification engine.
//!
//! This crate re-exports the core domain types and, behind the `data`
//! feature, the record sources and the map data service.

#![forbid(unsafe_code)]

pub use regionmap_core::{
    Category, MapPoint, MapSnapshot, PipelineStats, PolygonIndex, Region, RegionBoundary,
    RegionIndexError, RegionSummary, SourceKind, SourceRecord, Viewer, Visibility,
    build_snapshot, classify, is_visible, normalise_record, summarise,
};

#[cfg(feature = "data")]
pub use regionmap_data::{
    FetchError, FileRecordSource, HttpRecordSource, HttpRecordSourceConfig, MapDataService,
    MemoryRecordSource, Phase, RecordSource, RunOutcome, ServiceConfig, ServiceStatus,
    SourceError, SourceSet, load_region_index,
};
