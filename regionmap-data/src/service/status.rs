use std::time::SystemTime;

/// Lifecycle phase of the map data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No run has started yet.
    #[default]
    Idle,
    /// The latest-issued run is in progress.
    Loading,
    /// The latest-issued run published a snapshot.
    Ready,
    /// The latest-issued run failed; the previous snapshot stays visible.
    Errored,
}

/// Observable state of the map data service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceStatus {
    /// Current phase.
    pub phase: Phase,
    /// Message of the latest failure while [`Phase::Errored`].
    pub error: Option<String>,
    /// When the visible snapshot was published.
    pub last_refreshed_at: Option<SystemTime>,
}

impl ServiceStatus {
    /// Whether a run is in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

/// Result of a single service run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run's snapshot is now the visible one.
    Published {
        /// Request token of the run.
        token: u64,
        /// Points in the published snapshot.
        points: usize,
        /// Regions with at least one point.
        regions: usize,
    },
    /// A later refresh was issued before this run finished; its result was
    /// discarded.
    Superseded {
        /// Request token of the discarded run.
        token: u64,
    },
}

impl RunOutcome {
    /// Request token of the run.
    #[must_use]
    pub const fn token(&self) -> u64 {
        match self {
            Self::Published { token, .. } | Self::Superseded { token } => *token,
        }
    }

    /// Whether the run published its snapshot.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}
