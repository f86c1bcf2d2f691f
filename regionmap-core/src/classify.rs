//! Point-in-polygon classification by ray casting.
//!
//! A horizontal ray is cast from the point towards increasing longitude and
//! the boundary edges it crosses are counted; an odd count means the point is
//! inside. Edges are treated as half-open in latitude, so a vertex touched by
//! the ray is counted once. Points lying exactly on an edge may land on either
//! side.

use geo::{Coord, LineString};

use crate::{PolygonIndex, Region};

/// Whether `ring` contains `point` under the even-odd rule.
///
/// The ring is closed implicitly: the last vertex connects back to the first.
///
/// # Examples
/// ```
/// use geo::{Coord, LineString};
/// use regionmap_core::ring_contains;
///
/// let square: LineString<f64> = vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)].into();
/// assert!(ring_contains(&square, Coord { x: 1.0, y: 1.0 }));
/// assert!(!ring_contains(&square, Coord { x: 3.0, y: 1.0 }));
/// ```
pub fn ring_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let vertices = &ring.0;
    let successors = vertices.iter().cycle().skip(1);
    vertices
        .iter()
        .zip(successors)
        .filter(|(a, b)| crosses_ray(**a, **b, point))
        .count()
        % 2
        == 1
}

fn crosses_ray(a: Coord<f64>, b: Coord<f64>, point: Coord<f64>) -> bool {
    if (a.y > point.y) == (b.y > point.y) {
        return false;
    }
    let crossing_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
    point.x < crossing_x
}

/// Position of the first region in `index` containing `point`.
pub fn classify_position(index: &PolygonIndex, point: Coord<f64>) -> Option<usize> {
    index
        .regions()
        .iter()
        .position(|region| ring_contains(region.boundary(), point))
}

/// First region in `index` containing `point`, or `None` when unassigned.
///
/// Regions are expected not to overlap; if they do, configuration order
/// decides. Classification is deterministic for a given index.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use regionmap_core::{PolygonIndex, RegionBoundary, classify};
///
/// # fn main() -> Result<(), regionmap_core::RegionIndexError> {
/// let index = PolygonIndex::new([RegionBoundary::new(
///     "Square",
///     vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
/// )])?;
/// let region = classify(&index, Coord { x: 0.5, y: 0.5 });
/// assert_eq!(region.map(|r| r.name()), Some("Square"));
/// assert!(classify(&index, Coord { x: 9.0, y: 9.0 }).is_none());
/// # Ok(())
/// # }
/// ```
pub fn classify(index: &PolygonIndex, point: Coord<f64>) -> Option<&Region> {
    classify_position(index, point).and_then(|position| index.regions().get(position))
}
