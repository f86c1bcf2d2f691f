//! Core domain types and the pure classification pipeline for regionmap.
//!
//! Records from the three content collections are filtered by viewer,
//! normalised into [`MapPoint`] values, assigned to named regions by ray
//! casting, and rolled up into per-region category counts. Nothing in this
//! crate performs I/O or holds mutable state; orchestration lives in
//! `regionmap-data`.
//!
//! Geometry follows the `geo` convention throughout: `x` is longitude and
//! `y` is latitude.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod category;
mod classify;
mod normalise;
mod pipeline;
mod point;
mod record;
mod region;
mod visibility;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use aggregate::{RegionSummary, summarise};
pub use category::Category;
pub use classify::{classify, classify_position, ring_contains};
pub use normalise::{
    DEFAULT_BUSINESS_CATEGORY, DEFAULT_POST_CATEGORY, business_category, normalise_business,
    normalise_event, normalise_post, normalise_record, post_category,
};
pub use pipeline::{MapSnapshot, PipelineStats, build_snapshot};
pub use point::MapPoint;
pub use record::{
    BusinessRecord, EventRecord, PostLocation, PostRecord, SourceKind, SourceRecord, Venue,
    VenueCoordinates, Visibility,
};
pub use region::{
    MIN_RING_VERTICES, PolygonIndex, Region, RegionBoundary, RegionIndexError, vertex_mean,
};
pub use visibility::{Viewer, filter_visible, is_visible};
