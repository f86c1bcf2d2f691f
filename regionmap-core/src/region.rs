//! Named region boundaries and their label centres.
//!
//! A [`PolygonIndex`] is built once from static configuration and never
//! mutated. Lookups scan regions linearly in configuration order; that is
//! fine for tens of regions but costs O(regions × vertices) per point, so a
//! bounding-box or grid pre-filter is the next step if the region count grows.

use std::collections::HashSet;

use geo::{Coord, LineString};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum number of vertices a boundary ring must have.
pub const MIN_RING_VERTICES: usize = 3;

/// Region boundary as written in configuration.
///
/// Ring vertices are `[longitude, latitude]` pairs in order. Closing the ring
/// by repeating the first vertex is allowed but not required.
///
/// # Examples
/// ```
/// use regionmap_core::RegionBoundary;
///
/// let boundary = RegionBoundary::new(
///     "Ocean Grove",
///     vec![[144.50, -38.28], [144.55, -38.28], [144.55, -38.24], [144.50, -38.24]],
/// );
/// assert_eq!(boundary.ring.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionBoundary {
    /// Display name of the region.
    pub name: String,
    /// Ordered `[lng, lat]` vertices.
    pub ring: Vec<[f64; 2]>,
}

impl RegionBoundary {
    /// Construct a boundary from a name and `[lng, lat]` ring.
    pub fn new(name: impl Into<String>, ring: Vec<[f64; 2]>) -> Self {
        Self {
            name: name.into(),
            ring,
        }
    }
}

/// A validated region with its precomputed centre.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Region {
    name: String,
    boundary: LineString<f64>,
    center: Coord<f64>,
}

impl Region {
    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Boundary ring with `x = longitude` and `y = latitude`.
    pub fn boundary(&self) -> &LineString<f64> {
        &self.boundary
    }

    /// Label position: the arithmetic mean of the boundary vertices.
    ///
    /// This is not the area centroid and can drift towards densely sampled
    /// edges of irregular shapes.
    pub fn center(&self) -> Coord<f64> {
        self.center
    }
}

/// Errors raised while building a [`PolygonIndex`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionIndexError {
    /// A ring had fewer than [`MIN_RING_VERTICES`] vertices.
    #[error("region '{name}' has {count} vertices; at least 3 are required")]
    TooFewVertices {
        /// Offending region name.
        name: String,
        /// Number of vertices supplied.
        count: usize,
    },
    /// A vertex contained NaN or an infinite component.
    #[error("region '{name}' has a non-finite vertex at position {position}")]
    NonFiniteVertex {
        /// Offending region name.
        name: String,
        /// Zero-based vertex position within the ring.
        position: usize,
    },
    /// Two regions shared a name.
    #[error("region '{name}' is defined more than once")]
    DuplicateName {
        /// Repeated region name.
        name: String,
    },
}

/// Immutable, ordered set of regions.
///
/// # Examples
/// ```
/// use regionmap_core::{PolygonIndex, RegionBoundary};
/// use geo::Coord;
///
/// # fn main() -> Result<(), regionmap_core::RegionIndexError> {
/// let index = PolygonIndex::new([RegionBoundary::new(
///     "Square",
///     vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
/// )])?;
/// assert_eq!(index.center_of("Square"), Some(Coord { x: 1.0, y: 1.0 }));
/// assert_eq!(index.center_of("Elsewhere"), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonIndex {
    regions: Vec<Region>,
}

impl PolygonIndex {
    /// Validate boundaries and precompute every region centre.
    ///
    /// Configuration order is preserved; it decides which region wins if
    /// boundaries overlap.
    pub fn new<I>(boundaries: I) -> Result<Self, RegionIndexError>
    where
        I: IntoIterator<Item = RegionBoundary>,
    {
        let mut seen = HashSet::new();
        let mut regions = Vec::new();
        for boundary in boundaries {
            let region = build_region(boundary)?;
            if !seen.insert(region.name.clone()) {
                return Err(RegionIndexError::DuplicateName { name: region.name });
            }
            regions.push(region);
        }
        Ok(Self { regions })
    }

    /// Regions in configuration order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Look up a region by name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.name == name)
    }

    /// Centre of the named region, if it exists.
    pub fn center_of(&self, name: &str) -> Option<Coord<f64>> {
        self.region(name).map(Region::center)
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the index holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn build_region(boundary: RegionBoundary) -> Result<Region, RegionIndexError> {
    let RegionBoundary { name, ring } = boundary;
    if ring.len() < MIN_RING_VERTICES {
        return Err(RegionIndexError::TooFewVertices {
            name,
            count: ring.len(),
        });
    }
    if let Some(position) = ring
        .iter()
        .position(|[lng, lat]| !(lng.is_finite() && lat.is_finite()))
    {
        return Err(RegionIndexError::NonFiniteVertex { name, position });
    }
    let boundary: LineString<f64> = ring.into_iter().map(|[x, y]| Coord { x, y }).collect();
    let center = vertex_mean(&boundary);
    Ok(Region {
        name,
        boundary,
        center,
    })
}

/// Arithmetic mean of every vertex in `ring`, as configured.
///
/// A repeated closing vertex is counted like any other vertex.
pub fn vertex_mean(ring: &LineString<f64>) -> Coord<f64> {
    let count = ring.0.len() as f64;
    let sum_x: f64 = ring.coords().map(|c| c.x).sum();
    let sum_y: f64 = ring.coords().map(|c| c.y).sum();
    Coord {
        x: sum_x / count,
        y: sum_y / count,
    }
}
