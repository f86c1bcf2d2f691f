//! The canonical map point produced by normalisation.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Category, SourceKind};

/// Canonical, geo-located record ready for rendering.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`; both are
/// finite for every point produced by the normaliser.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use regionmap_core::{Category, MapPoint, SourceKind};
///
/// let point = MapPoint::new(
///     "post:1",
///     Coord { x: 144.3, y: -38.1 },
///     "Lawn mower",
///     Category::Marketplace,
///     SourceKind::Post,
/// );
/// assert_eq!(point.latitude(), -38.1);
/// assert!(point.region.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapPoint {
    /// Identifier namespaced by source kind, e.g. `event:12`.
    pub id: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Canonical category.
    pub category: Category,
    /// Collection the point was derived from.
    pub source_kind: SourceKind,
    /// Event date, when the source carries one.
    pub date: Option<String>,
    /// Event time, when the source carries one.
    pub time: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Contact details.
    pub contact: Option<String>,
    /// Name of the containing region; `None` while unassigned.
    pub region: Option<String>,
}

impl MapPoint {
    /// Construct a point with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        location: Coord<f64>,
        title: impl Into<String>,
        category: Category,
        source_kind: SourceKind,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            title: title.into(),
            description: String::new(),
            category,
            source_kind,
            date: None,
            time: None,
            address: None,
            contact: None,
            region: None,
        }
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.location.x
    }
}
