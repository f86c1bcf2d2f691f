//! Convert source records into [`MapPoint`] values.
//!
//! Normalisation is pure: each variant has its own function, records without
//! a usable position yield `None`, and native categories go through a fixed
//! lookup table with a per-variant fallback.

use geo::Coord;
use log::debug;

use crate::{
    BusinessRecord, Category, EventRecord, MapPoint, PostRecord, SourceKind, SourceRecord,
};

/// Category assigned to posts whose native category is not recognised.
pub const DEFAULT_POST_CATEGORY: Category = Category::Marketplace;

/// Category assigned to businesses whose type is not a food business.
pub const DEFAULT_BUSINESS_CATEGORY: Category = Category::Businesses;

/// Normalise any source record.
///
/// Returns `None` when the record lacks a finite latitude and longitude.
///
/// # Examples
/// ```
/// use regionmap_core::{Category, PostLocation, PostRecord, SourceRecord, normalise_record};
///
/// let record = SourceRecord::Post(PostRecord {
///     id: "1".into(),
///     title: "Free couch".into(),
///     category: "giveaway".into(),
///     location: Some(PostLocation { latitude: Some(-38.1), longitude: Some(144.3) }),
///     ..PostRecord::default()
/// });
/// let point = normalise_record(&record).expect("record has a position");
/// assert_eq!(point.id, "post:1");
/// assert_eq!(point.category, Category::FreeItems);
/// ```
pub fn normalise_record(record: &SourceRecord) -> Option<MapPoint> {
    let point = match record {
        SourceRecord::Post(post) => normalise_post(post),
        SourceRecord::Business(business) => normalise_business(business),
        SourceRecord::Event(event) => normalise_event(event),
    };
    if point.is_none() {
        debug!(
            "dropping {} {} without a usable position",
            record.kind(),
            record.id()
        );
    }
    point
}

/// Normalise a post, reading its nested `location`.
pub fn normalise_post(post: &PostRecord) -> Option<MapPoint> {
    let location = post.location?;
    let position = finite_position(location.latitude, location.longitude)?;
    let mut point = MapPoint::new(
        point_id(SourceKind::Post, &post.id),
        position,
        post.title.clone(),
        post_category(&post.category),
        SourceKind::Post,
    );
    point.description.clone_from(&post.description);
    Some(point)
}

/// Normalise a business listing, reading its flat coordinates.
pub fn normalise_business(business: &BusinessRecord) -> Option<MapPoint> {
    let position = finite_position(business.latitude, business.longitude)?;
    let mut point = MapPoint::new(
        point_id(SourceKind::Business, &business.id),
        position,
        business.name.clone(),
        business_category(&business.business_type),
        SourceKind::Business,
    );
    point.description.clone_from(&business.description);
    point.address.clone_from(&business.address);
    point.contact = [&business.phone, &business.email, &business.website]
        .into_iter()
        .find_map(|value| value.clone());
    Some(point)
}

/// Normalise an event, reading its venue coordinates.
pub fn normalise_event(event: &EventRecord) -> Option<MapPoint> {
    let venue = event.venue.as_ref()?;
    let coordinates = venue.coordinates?;
    let position = finite_position(coordinates.lat, coordinates.lng)?;
    let mut point = MapPoint::new(
        point_id(SourceKind::Event, &event.id),
        position,
        event.title.clone(),
        Category::Events,
        SourceKind::Event,
    );
    point.description.clone_from(&event.description);
    point.date.clone_from(&event.date);
    point.time.clone_from(&event.time);
    point.address.clone_from(&venue.address);
    point.contact.clone_from(&event.contact);
    Some(point)
}

/// Map a post's native category onto the canonical set.
///
/// # Examples
/// ```
/// use regionmap_core::{Category, post_category};
///
/// assert_eq!(post_category("Help Request"), Category::HelpRequests);
/// assert_eq!(post_category("something else"), Category::Marketplace);
/// ```
pub fn post_category(native: &str) -> Category {
    match native_key(native).as_str() {
        "marketplace" | "for_sale" | "buy_sell" | "selling" => Category::Marketplace,
        "deals" | "deal" | "offer" | "offers" | "discount" => Category::Deals,
        "free" | "free_items" | "free_stuff" | "giveaway" => Category::FreeItems,
        "help" | "help_request" | "help_requests" | "request" | "wanted" => {
            Category::HelpRequests
        }
        "food" | "meal" | "produce" => Category::Food,
        "event" | "events" => Category::Events,
        _ => DEFAULT_POST_CATEGORY,
    }
}

/// Map a business type onto the canonical set.
pub fn business_category(native: &str) -> Category {
    match native_key(native).as_str() {
        "restaurant" | "cafe" | "bakery" | "food" | "takeaway" | "grocery" => Category::Food,
        _ => DEFAULT_BUSINESS_CATEGORY,
    }
}

fn native_key(native: &str) -> String {
    native
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

fn point_id(kind: SourceKind, id: &str) -> String {
    format!("{kind}:{id}")
}

fn finite_position(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coord<f64>> {
    let (lat, lng) = (latitude?, longitude?);
    (lat.is_finite() && lng.is_finite()).then_some(Coord { x: lng, y: lat })
}
