//! Source records read from the content collections.
//!
//! The three collections share no schema: posts nest their coordinates under
//! `location`, businesses keep them flat and events hang them off a venue.
//! [`SourceRecord`] makes the variant explicit so each one gets its own
//! normaliser instead of probing for fields.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Access tier attached to every source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Visibility {
    /// Visible to everyone, including anonymous viewers.
    #[default]
    Public,
    /// Visible only to authenticated, verified viewers.
    VerifiedOnly,
}

/// Collection a record or point originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SourceKind {
    /// Community content posts.
    Post,
    /// Business listings.
    Business,
    /// Events.
    Event,
}

impl SourceKind {
    /// Return the kind as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use regionmap_core::SourceKind;
    ///
    /// assert_eq!(SourceKind::Business.as_str(), "business");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Business => "business",
            Self::Event => "event",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested latitude/longitude pair as stored on posts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PostLocation {
    /// Latitude in degrees, if recorded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub latitude: Option<f64>,
    /// Longitude in degrees, if recorded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub longitude: Option<f64>,
}

/// A classified or community post.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PostRecord {
    /// Identifier within the posts collection.
    pub id: String,
    /// Post headline.
    pub title: String,
    /// Free-form body text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Category as chosen by the author.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: String,
    /// Where the post applies, if the author pinned it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<PostLocation>,
    /// Asking price, when the post sells something.
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: Option<f64>,
    /// Access tier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
}

/// A business listing with flat coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusinessRecord {
    /// Identifier within the businesses collection.
    pub id: String,
    /// Trading name.
    pub name: String,
    /// Listing description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Business type as registered by the owner.
    #[cfg_attr(feature = "serde", serde(default))]
    pub business_type: String,
    /// Latitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub longitude: Option<f64>,
    /// Street address.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    /// Contact phone number.
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: Option<String>,
    /// Contact email address.
    #[cfg_attr(feature = "serde", serde(default))]
    pub email: Option<String>,
    /// Website URL.
    #[cfg_attr(feature = "serde", serde(default))]
    pub website: Option<String>,
    /// Access tier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
}

/// Short-form coordinates stored on event venues.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VenueCoordinates {
    /// Latitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lat: Option<f64>,
    /// Longitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lng: Option<f64>,
}

/// Venue details for an event.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Venue {
    /// Street address of the venue.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    /// Venue coordinates, if geocoded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub coordinates: Option<VenueCoordinates>,
}

/// A scheduled community event.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventRecord {
    /// Identifier within the events collection.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Event description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Organiser-supplied event type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub event_type: String,
    /// Calendar date as entered by the organiser.
    #[cfg_attr(feature = "serde", serde(default))]
    pub date: Option<String>,
    /// Start time as entered by the organiser.
    #[cfg_attr(feature = "serde", serde(default))]
    pub time: Option<String>,
    /// Where the event takes place.
    #[cfg_attr(feature = "serde", serde(default))]
    pub venue: Option<Venue>,
    /// Organiser contact details.
    #[cfg_attr(feature = "serde", serde(default))]
    pub contact: Option<String>,
    /// Access tier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
}

/// A record from any of the three content collections.
///
/// Serialised with an internal `kind` tag.
///
/// # Examples
/// ```
/// use regionmap_core::{PostRecord, SourceKind, SourceRecord, Visibility};
///
/// let record = SourceRecord::Post(PostRecord {
///     id: "7".into(),
///     title: "Bike for sale".into(),
///     visibility: Visibility::VerifiedOnly,
///     ..PostRecord::default()
/// });
/// assert_eq!(record.kind(), SourceKind::Post);
/// assert_eq!(record.visibility(), Visibility::VerifiedOnly);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SourceRecord {
    /// Community post.
    Post(PostRecord),
    /// Business listing.
    Business(BusinessRecord),
    /// Event.
    Event(EventRecord),
}

impl SourceRecord {
    /// Collection this record belongs to.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Post(_) => SourceKind::Post,
            Self::Business(_) => SourceKind::Business,
            Self::Event(_) => SourceKind::Event,
        }
    }

    /// Access tier of the record.
    pub fn visibility(&self) -> Visibility {
        match self {
            Self::Post(post) => post.visibility,
            Self::Business(business) => business.visibility,
            Self::Event(event) => event.visibility,
        }
    }

    /// Identifier within the record's own collection.
    pub fn id(&self) -> &str {
        match self {
            Self::Post(post) => &post.id,
            Self::Business(business) => &business.id,
            Self::Event(event) => &event.id,
        }
    }
}
