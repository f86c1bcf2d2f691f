//! Pure filter → normalise → classify → aggregate pipeline.
//!
//! [`build_snapshot`] holds no state; callers own the records and the index
//! and receive a complete [`MapSnapshot`] that replaces any previous one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Category, MapPoint, PolygonIndex, RegionSummary, SourceRecord, Viewer, classify_position,
    is_visible, normalise_record, summarise,
};

/// Record counts observed while building a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineStats {
    /// Records received from the sources.
    pub fetched: usize,
    /// Records removed by the visibility filter.
    pub hidden: usize,
    /// Visible records dropped for lacking a usable position.
    pub malformed: usize,
    /// Points that fell outside every region.
    pub unassigned: usize,
}

/// The two read models published together.
///
/// Every point is either counted in exactly one summary or unassigned, so
/// the summary totals plus `stats.unassigned` equal `points.len()`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapSnapshot {
    /// Every visible, well-formed point.
    pub points: Vec<MapPoint>,
    /// Regions holding at least one point, in index order.
    pub summaries: Vec<RegionSummary>,
    /// Counts gathered while building the snapshot.
    pub stats: PipelineStats,
}

impl MapSnapshot {
    /// A snapshot with no points and no summaries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Points classified into the named region.
    pub fn points_in_region<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MapPoint> {
        self.points
            .iter()
            .filter(move |point| point.region.as_deref() == Some(name))
    }

    /// Points in a single category, for layer toggles.
    pub fn points_in_category(&self, category: Category) -> impl Iterator<Item = &MapPoint> {
        self.points
            .iter()
            .filter(move |point| point.category == category)
    }

    /// Summary for the named region, if it has any points.
    pub fn summary(&self, name: &str) -> Option<&RegionSummary> {
        self.summaries.iter().find(|summary| summary.name == name)
    }
}

/// Run the full pipeline over `records` for `viewer`.
///
/// Visibility is checked before normalisation, so hidden records never reach
/// the geometry stage. Malformed records are counted and dropped.
///
/// # Examples
/// ```
/// use regionmap_core::{
///     PolygonIndex, PostLocation, PostRecord, RegionBoundary, SourceRecord, build_snapshot,
/// };
///
/// # fn main() -> Result<(), regionmap_core::RegionIndexError> {
/// let index = PolygonIndex::new([RegionBoundary::new(
///     "Square",
///     vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
/// )])?;
/// let records = vec![SourceRecord::Post(PostRecord {
///     id: "1".into(),
///     category: "deals".into(),
///     location: Some(PostLocation { latitude: Some(1.0), longitude: Some(1.0) }),
///     ..PostRecord::default()
/// })];
/// let snapshot = build_snapshot(&records, None, &index);
/// assert_eq!(snapshot.points.len(), 1);
/// assert_eq!(snapshot.points[0].region.as_deref(), Some("Square"));
/// assert_eq!(snapshot.summaries[0].total_count, 1);
/// # Ok(())
/// # }
/// ```
pub fn build_snapshot<'a, I>(
    records: I,
    viewer: Option<&Viewer>,
    index: &PolygonIndex,
) -> MapSnapshot
where
    I: IntoIterator<Item = &'a SourceRecord>,
{
    let mut stats = PipelineStats::default();
    let mut classified = Vec::new();
    for record in records {
        stats.fetched += 1;
        if !is_visible(record.visibility(), viewer) {
            stats.hidden += 1;
            continue;
        }
        let Some(mut point) = normalise_record(record) else {
            stats.malformed += 1;
            continue;
        };
        let position = classify_position(index, point.location);
        match position.and_then(|at| index.regions().get(at)) {
            Some(region) => point.region = Some(region.name().to_owned()),
            None => stats.unassigned += 1,
        }
        classified.push((point, position));
    }
    let summaries = summarise(
        index,
        classified.iter().map(|(point, position)| (point, *position)),
    );
    let points = classified.into_iter().map(|(point, _)| point).collect();
    MapSnapshot {
        points,
        summaries,
        stats,
    }
}
