//! Canonical map categories.
//!
//! Every [`MapPoint`](crate::MapPoint) belongs to exactly one category. The
//! set is closed so renderers can assign a marker style per variant.
//!
//! # Examples
//! ```
//! use regionmap_core::Category;
//!
//! assert_eq!(Category::FreeItems.as_str(), "free_items");
//! assert_eq!(Category::Deals.to_string(), "deals");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed set of categories shown on the map.
///
/// Declaration order defines the ordering of per-region category counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    /// Community events and gatherings.
    Events,
    /// Discounts and special offers.
    Deals,
    /// Items listed for sale.
    Marketplace,
    /// Items given away at no cost.
    FreeItems,
    /// Requests for help from neighbours.
    HelpRequests,
    /// Food sharing, produce and eateries.
    Food,
    /// Local business listings.
    Businesses,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Events,
        Self::Deals,
        Self::Marketplace,
        Self::FreeItems,
        Self::HelpRequests,
        Self::Food,
        Self::Businesses,
    ];

    /// Return the stable snake_case identifier.
    ///
    /// # Examples
    /// ```
    /// use regionmap_core::Category;
    ///
    /// assert_eq!(Category::HelpRequests.as_str(), "help_requests");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Deals => "deals",
            Self::Marketplace => "marketplace",
            Self::FreeItems => "free_items",
            Self::HelpRequests => "help_requests",
            Self::Food => "food",
            Self::Businesses => "businesses",
        }
    }

    /// Human-readable label for legends and filters.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Events => "Events",
            Self::Deals => "Deals",
            Self::Marketplace => "Marketplace",
            Self::FreeItems => "Free items",
            Self::HelpRequests => "Help requests",
            Self::Food => "Food",
            Self::Businesses => "Businesses",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Category::FreeItems.to_string(), Category::FreeItems.as_str());
    }

    #[rstest]
    #[case("events", Category::Events)]
    #[case(" Marketplace ", Category::Marketplace)]
    #[case("HELP_REQUESTS", Category::HelpRequests)]
    fn parses_identifiers(#[case] raw: &str, #[case] expected: Category) {
        assert_eq!(Category::from_str(raw), Ok(expected));
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = Category::from_str("gossip").unwrap_err();
        assert!(err.contains("unknown category"));
    }

    #[test]
    fn all_is_sorted_by_declaration() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }
}
