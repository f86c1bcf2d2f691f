//! Property-based tests for the classification pipeline.
//!
//! # Invariants tested
//!
//! - **Normalisation:** any record yields a point iff both coordinates are finite.
//! - **Centres:** every region centre is the mean of its configured vertices.
//! - **Determinism:** classifying the same point twice gives the same region.
//! - **Conservation:** summary totals plus unassigned points equal all points.
//! - **Visibility:** verified-only records never reach anonymous viewers.

use geo::Coord;
use proptest::prelude::*;
use regionmap_core::{
    BusinessRecord, Category, EventRecord, PolygonIndex, PostLocation, PostRecord,
    RegionBoundary, SourceKind, SourceRecord, Venue, VenueCoordinates, Viewer, Visibility,
    build_snapshot, classify_position, normalise_record,
};

fn grid_index() -> PolygonIndex {
    let cells = (0..3).flat_map(|row| (0..3).map(move |col| (row, col)));
    PolygonIndex::new(cells.map(|(row, col)| {
        let (x, y) = (f64::from(col), f64::from(row));
        RegionBoundary::new(
            format!("cell-{row}-{col}"),
            vec![[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0]],
        )
    }))
    .expect("grid cells are valid")
}

fn coordinate() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        4 => (-1.0..4.0f64).prop_map(Some),
        1 => Just(None),
        1 => Just(Some(f64::NAN)),
        1 => Just(Some(f64::INFINITY)),
    ]
}

fn source_kind() -> impl Strategy<Value = SourceKind> {
    prop::sample::select(vec![SourceKind::Post, SourceKind::Business, SourceKind::Event])
}

/// Build a record of `kind` with its coordinates in the variant's own shape.
fn record_at(
    kind: SourceKind,
    latitude: Option<f64>,
    longitude: Option<f64>,
    category: Category,
    visibility: Visibility,
) -> SourceRecord {
    let id = format!("{latitude:?}-{longitude:?}");
    match kind {
        SourceKind::Post => SourceRecord::Post(PostRecord {
            id,
            category: category.as_str().into(),
            location: Some(PostLocation {
                latitude,
                longitude,
            }),
            visibility,
            ..PostRecord::default()
        }),
        SourceKind::Business => SourceRecord::Business(BusinessRecord {
            id,
            business_type: category.as_str().into(),
            latitude,
            longitude,
            visibility,
            ..BusinessRecord::default()
        }),
        SourceKind::Event => SourceRecord::Event(EventRecord {
            id,
            venue: Some(Venue {
                address: None,
                coordinates: Some(VenueCoordinates {
                    lat: latitude,
                    lng: longitude,
                }),
            }),
            visibility,
            ..EventRecord::default()
        }),
    }
}

fn record_strategy() -> impl Strategy<Value = SourceRecord> {
    (
        source_kind(),
        coordinate(),
        coordinate(),
        prop::sample::select(Category::ALL.to_vec()),
        any::<bool>(),
    )
        .prop_map(|(kind, latitude, longitude, category, restricted)| {
            let visibility = if restricted {
                Visibility::VerifiedOnly
            } else {
                Visibility::Public
            };
            record_at(kind, latitude, longitude, category, visibility)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn record_normalises_iff_position_is_finite(
        kind in source_kind(),
        latitude in coordinate(),
        longitude in coordinate(),
    ) {
        let record = record_at(kind, latitude, longitude, Category::Food, Visibility::Public);
        let finite = latitude.is_some_and(f64::is_finite) && longitude.is_some_and(f64::is_finite);
        let point = normalise_record(&record);
        prop_assert_eq!(point.is_some(), finite);
        if let Some(point) = point {
            prop_assert_eq!(point.source_kind, kind);
            let expected = Coord {
                x: longitude.unwrap_or_default(),
                y: latitude.unwrap_or_default(),
            };
            prop_assert_eq!(point.location, expected);
        }
    }

    #[test]
    fn region_centre_is_vertex_mean(
        ring in prop::collection::vec((-180.0..180.0f64, -90.0..90.0f64), 3..12),
    ) {
        let vertices: Vec<[f64; 2]> = ring.iter().map(|&(x, y)| [x, y]).collect();
        let index = PolygonIndex::new([RegionBoundary::new("r", vertices)])
            .expect("finite ring");
        let center = index.center_of("r").expect("region exists");
        let n = ring.len() as f64;
        let mean_x = ring.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = ring.iter().map(|(_, y)| y).sum::<f64>() / n;
        prop_assert!((center.x - mean_x).abs() < 1e-9);
        prop_assert!((center.y - mean_y).abs() < 1e-9);
    }

    #[test]
    fn classification_is_deterministic(x in -1.0..4.0f64, y in -1.0..4.0f64) {
        let index = grid_index();
        let point = Coord { x, y };
        prop_assert_eq!(classify_position(&index, point), classify_position(&index, point));
    }

    #[test]
    fn every_point_is_summarised_or_unassigned(
        records in prop::collection::vec(record_strategy(), 0..40),
        verified in any::<bool>(),
    ) {
        let index = grid_index();
        let viewer = verified.then(Viewer::verified);
        let snapshot = build_snapshot(&records, viewer.as_ref(), &index);
        let summarised: usize = snapshot.summaries.iter().map(|s| s.total_count).sum();
        prop_assert_eq!(summarised + snapshot.stats.unassigned, snapshot.points.len());
        for summary in &snapshot.summaries {
            prop_assert!(summary.total_count > 0);
            prop_assert_eq!(summary.total_count, summary.category_counts.values().sum::<usize>());
        }
        let stats = snapshot.stats;
        prop_assert_eq!(stats.fetched, records.len());
        prop_assert_eq!(stats.hidden + stats.malformed + snapshot.points.len(), stats.fetched);
    }

    #[test]
    fn anonymous_viewers_never_see_restricted_records(
        records in prop::collection::vec(record_strategy(), 0..40),
    ) {
        let index = grid_index();
        let snapshot = build_snapshot(&records, None, &index);
        let restricted = records
            .iter()
            .filter(|record| record.visibility() == Visibility::VerifiedOnly)
            .count();
        prop_assert_eq!(snapshot.stats.hidden, restricted);
    }
}
