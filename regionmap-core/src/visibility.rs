//! Viewer-aware record filtering.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SourceRecord, Visibility};

/// The person looking at the map.
///
/// An unauthenticated viewer is treated exactly like an absent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewer {
    /// Whether the viewer has signed in.
    pub is_authenticated: bool,
    /// Whether the viewer's identity has been verified.
    pub is_verified: bool,
}

impl Viewer {
    /// A signed-in viewer who has completed verification.
    pub const fn verified() -> Self {
        Self {
            is_authenticated: true,
            is_verified: true,
        }
    }

    /// A signed-in viewer who has not been verified.
    pub const fn unverified() -> Self {
        Self {
            is_authenticated: true,
            is_verified: false,
        }
    }

    fn may_see_verified_content(&self) -> bool {
        self.is_authenticated && self.is_verified
    }
}

/// Decide whether a tier is visible to `viewer`.
///
/// # Examples
/// ```
/// use regionmap_core::{Viewer, Visibility, is_visible};
///
/// assert!(is_visible(Visibility::Public, None));
/// assert!(!is_visible(Visibility::VerifiedOnly, None));
/// assert!(is_visible(Visibility::VerifiedOnly, Some(&Viewer::verified())));
/// ```
pub fn is_visible(visibility: Visibility, viewer: Option<&Viewer>) -> bool {
    match visibility {
        Visibility::Public => true,
        Visibility::VerifiedOnly => viewer.is_some_and(Viewer::may_see_verified_content),
    }
}

/// Keep only the records `viewer` is allowed to see.
pub fn filter_visible<'a, I>(
    records: I,
    viewer: Option<&'a Viewer>,
) -> impl Iterator<Item = &'a SourceRecord> + 'a
where
    I: IntoIterator<Item = &'a SourceRecord>,
    I::IntoIter: 'a,
{
    records
        .into_iter()
        .filter(move |record| is_visible(record.visibility(), viewer))
}
