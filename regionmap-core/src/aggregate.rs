//! Per-region category roll-ups.

use std::collections::BTreeMap;

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Category, MapPoint, PolygonIndex};

/// Point counts for one region, broken down by category.
///
/// `total_count` always equals the sum of `category_counts`, and only
/// categories with at least one point are listed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionSummary {
    /// Region name.
    pub name: String,
    /// Label position copied from the region.
    pub center: Coord<f64>,
    /// Number of points classified into the region.
    pub total_count: usize,
    /// Non-zero counts per category.
    pub category_counts: BTreeMap<Category, usize>,
}

impl RegionSummary {
    fn empty(name: &str, center: Coord<f64>) -> Self {
        Self {
            name: name.to_owned(),
            center,
            total_count: 0,
            category_counts: BTreeMap::new(),
        }
    }

    fn record(&mut self, category: Category) {
        self.total_count += 1;
        *self.category_counts.entry(category).or_default() += 1;
    }

    /// Count for a single category, zero when absent.
    pub fn count_for(&self, category: Category) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }
}

/// Roll classified points up into per-region summaries.
///
/// `assignments` pairs each point with the position of its region in
/// `index`, as returned by [`classify_position`](crate::classify_position).
/// Unassigned points and positions outside the index are skipped. Regions
/// without points are left out; the rest keep index order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use regionmap_core::{Category, MapPoint, PolygonIndex, RegionBoundary, SourceKind, summarise};
///
/// # fn main() -> Result<(), regionmap_core::RegionIndexError> {
/// let index = PolygonIndex::new([RegionBoundary::new(
///     "Square",
///     vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
/// )])?;
/// let point = MapPoint::new("post:1", Coord { x: 1.0, y: 1.0 }, "Chair", Category::Deals, SourceKind::Post);
/// let summaries = summarise(&index, [(&point, Some(0))]);
/// assert_eq!(summaries.len(), 1);
/// assert_eq!(summaries[0].count_for(Category::Deals), 1);
/// # Ok(())
/// # }
/// ```
pub fn summarise<'a, I>(index: &PolygonIndex, assignments: I) -> Vec<RegionSummary>
where
    I: IntoIterator<Item = (&'a MapPoint, Option<usize>)>,
{
    let mut summaries: Vec<RegionSummary> = index
        .regions()
        .iter()
        .map(|region| RegionSummary::empty(region.name(), region.center()))
        .collect();
    for (point, position) in assignments {
        if let Some(summary) = position.and_then(|at| summaries.get_mut(at)) {
            summary.record(point.category);
        }
    }
    summaries.retain(|summary| summary.total_count > 0);
    summaries
}
