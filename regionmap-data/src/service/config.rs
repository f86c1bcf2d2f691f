use std::time::Duration;

use crate::source::{SourceQueries, SourceQuery};

/// Default number of records requested from each collection.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Maximum records requested per collection in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    /// Posts page size.
    pub posts: usize,
    /// Businesses page size.
    pub businesses: usize,
    /// Events page size.
    pub events: usize,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self::uniform(DEFAULT_PAGE_SIZE)
    }
}

impl PageSizes {
    /// Use the same page size for every collection.
    #[must_use]
    pub const fn uniform(size: usize) -> Self {
        Self {
            posts: size,
            businesses: size,
            events: size,
        }
    }
}

/// Configuration for [`MapDataService`](super::MapDataService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Page size per collection.
    pub page_sizes: PageSizes,
    /// Ask sources for active records only.
    pub active_only: bool,
    /// Period of the optional timer refresh.
    pub refresh_interval: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            page_sizes: PageSizes::default(),
            active_only: true,
            refresh_interval: None,
        }
    }
}

impl ServiceConfig {
    /// Set the per-collection page sizes.
    #[must_use]
    pub const fn with_page_sizes(mut self, page_sizes: PageSizes) -> Self {
        self.page_sizes = page_sizes;
        self
    }

    /// Choose whether sources return active records only.
    #[must_use]
    pub const fn with_active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    /// Enable the timer refresh with the given period.
    #[must_use]
    pub const fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    pub(crate) const fn queries(&self) -> SourceQueries {
        SourceQueries {
            posts: self.query(self.page_sizes.posts),
            businesses: self.query(self.page_sizes.businesses),
            events: self.query(self.page_sizes.events),
        }
    }

    const fn query(&self, limit: usize) -> SourceQuery {
        let query = SourceQuery::new(limit);
        if self.active_only { query.active() } else { query }
    }
}
