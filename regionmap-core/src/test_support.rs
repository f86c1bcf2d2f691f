//! Fixtures shared by unit, behaviour and downstream crate tests.

use crate::{
    BusinessRecord, EventRecord, PolygonIndex, PostLocation, PostRecord, RegionBoundary,
    SourceRecord, Venue, VenueCoordinates, Visibility,
};

/// Name of the coastal fixture region.
pub const OCEAN_GROVE: &str = "Ocean Grove";

/// Name of the inland fixture region.
pub const BARWON_HEADS: &str = "Barwon Heads";

/// A `(lat, lng)` pair inside [`OCEAN_GROVE`].
pub const INSIDE_OCEAN_GROVE: (f64, f64) = (-38.26, 144.52);

/// A `(lat, lng)` pair inside [`BARWON_HEADS`].
pub const INSIDE_BARWON_HEADS: (f64, f64) = (-38.28, 144.48);

/// A `(lat, lng)` pair outside every fixture region.
pub const OFFSHORE: (f64, f64) = (-38.50, 145.00);

/// Boundaries for two adjacent, non-overlapping rectangular regions.
pub fn fixture_boundaries() -> Vec<RegionBoundary> {
    vec![
        RegionBoundary::new(
            OCEAN_GROVE,
            vec![
                [144.50, -38.28],
                [144.55, -38.28],
                [144.55, -38.24],
                [144.50, -38.24],
            ],
        ),
        RegionBoundary::new(
            BARWON_HEADS,
            vec![
                [144.45, -38.30],
                [144.50, -38.30],
                [144.50, -38.26],
                [144.45, -38.26],
            ],
        ),
    ]
}

/// Index built from [`fixture_boundaries`].
pub fn fixture_index() -> PolygonIndex {
    PolygonIndex::new(fixture_boundaries()).unwrap_or_default()
}

/// A public post pinned at `(lat, lng)` with the given native category.
pub fn post_at(id: &str, category: &str, (lat, lng): (f64, f64)) -> SourceRecord {
    SourceRecord::Post(PostRecord {
        id: id.into(),
        title: format!("Post {id}"),
        category: category.into(),
        location: Some(PostLocation {
            latitude: Some(lat),
            longitude: Some(lng),
        }),
        ..PostRecord::default()
    })
}

/// A public business listing at `(lat, lng)`.
pub fn business_at(id: &str, business_type: &str, (lat, lng): (f64, f64)) -> SourceRecord {
    SourceRecord::Business(BusinessRecord {
        id: id.into(),
        name: format!("Business {id}"),
        business_type: business_type.into(),
        latitude: Some(lat),
        longitude: Some(lng),
        ..BusinessRecord::default()
    })
}

/// A public event held at `(lat, lng)`.
pub fn event_at(id: &str, (lat, lng): (f64, f64)) -> SourceRecord {
    SourceRecord::Event(EventRecord {
        id: id.into(),
        title: format!("Event {id}"),
        venue: Some(Venue {
            address: None,
            coordinates: Some(VenueCoordinates {
                lat: Some(lat),
                lng: Some(lng),
            }),
        }),
        ..EventRecord::default()
    })
}

/// Copy of `record` restricted to verified viewers.
pub fn verified_only(record: SourceRecord) -> SourceRecord {
    match record {
        SourceRecord::Post(post) => SourceRecord::Post(PostRecord {
            visibility: Visibility::VerifiedOnly,
            ..post
        }),
        SourceRecord::Business(business) => SourceRecord::Business(BusinessRecord {
            visibility: Visibility::VerifiedOnly,
            ..business
        }),
        SourceRecord::Event(event) => SourceRecord::Event(EventRecord {
            visibility: Visibility::VerifiedOnly,
            ..event
        }),
    }
}
