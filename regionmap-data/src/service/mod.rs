//! Orchestration of fetch, classification and publication.
//!
//! [`MapDataService`] owns the only mutable state in the system: the
//! published snapshot and the service status. Both live in one
//! [`ArcSwap`] so readers never observe points from one run alongside
//! summaries from another.
//!
//! # Request tokens
//!
//! Every run takes a token from a monotonic counter when it is issued. At
//! publish time the run's token must still be the latest issued one and must
//! exceed the token of the state it replaces; otherwise the run is reported
//! as [`RunOutcome::Superseded`] and its result is dropped. Older runs are not
//! cancelled, only ignored.

mod config;
mod status;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use arc_swap::{ArcSwap, ArcSwapOption};
use log::{debug, info, warn};
use regionmap_core::{MapPoint, MapSnapshot, PolygonIndex, RegionSummary, Viewer, build_snapshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::source::{FetchError, SourceSet};

pub use config::{DEFAULT_PAGE_SIZE, PageSizes, ServiceConfig};
pub use status::{Phase, RunOutcome, ServiceStatus};

#[derive(Debug, Default)]
struct ServiceState {
    /// Token of the run whose snapshot is visible; zero before the first publish.
    token: u64,
    snapshot: Arc<MapSnapshot>,
    status: ServiceStatus,
}

impl ServiceState {
    fn with_status(&self, status: ServiceStatus) -> Self {
        Self {
            token: self.token,
            snapshot: Arc::clone(&self.snapshot),
            status,
        }
    }
}

#[derive(Debug)]
struct Inner {
    sources: SourceSet,
    index: PolygonIndex,
    config: ServiceConfig,
    viewer: ArcSwapOption<Viewer>,
    issued: AtomicU64,
    state: ArcSwap<ServiceState>,
}

impl Inner {
    fn is_latest(&self, token: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == token
    }

    /// Issue a new token and mark the service as loading.
    fn begin(&self) -> u64 {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.rcu(|current| {
            if self.is_latest(token) {
                Arc::new(current.with_status(ServiceStatus {
                    phase: Phase::Loading,
                    error: None,
                    last_refreshed_at: current.status.last_refreshed_at,
                }))
            } else {
                Arc::clone(current)
            }
        });
        token
    }

    fn publish(&self, token: u64, snapshot: MapSnapshot) -> bool {
        let snapshot = Arc::new(snapshot);
        let mut accepted = false;
        self.state.rcu(|current| {
            accepted = self.is_latest(token) && token > current.token;
            if accepted {
                Arc::new(ServiceState {
                    token,
                    snapshot: Arc::clone(&snapshot),
                    status: ServiceStatus {
                        phase: Phase::Ready,
                        error: None,
                        last_refreshed_at: Some(SystemTime::now()),
                    },
                })
            } else {
                Arc::clone(current)
            }
        });
        accepted
    }

    fn fail(&self, token: u64, error: &FetchError) -> bool {
        let mut accepted = false;
        self.state.rcu(|current| {
            accepted = self.is_latest(token);
            if accepted {
                Arc::new(current.with_status(ServiceStatus {
                    phase: Phase::Errored,
                    error: Some(error.to_string()),
                    last_refreshed_at: current.status.last_refreshed_at,
                }))
            } else {
                Arc::clone(current)
            }
        });
        accepted
    }
}

/// Fetches, classifies and publishes map data.
///
/// Cloning is cheap; clones share the same sources and published state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use regionmap_core::{PolygonIndex, SourceKind};
/// use regionmap_data::{FileRecordSource, MapDataService, ServiceConfig, SourceSet};
///
/// # async fn demo() -> Result<(), regionmap_data::FetchError> {
/// let file = |kind| Arc::new(FileRecordSource::new("records.json", kind));
/// let sources = SourceSet::new(
///     file(SourceKind::Post),
///     file(SourceKind::Business),
///     file(SourceKind::Event),
/// );
/// let service = MapDataService::new(sources, PolygonIndex::default(), ServiceConfig::default());
/// service.run().await?;
/// println!("{} points", service.points().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MapDataService {
    inner: Arc<Inner>,
}

impl MapDataService {
    /// Create an idle service with an empty snapshot and no viewer.
    #[must_use]
    pub fn new(sources: SourceSet, index: PolygonIndex, config: ServiceConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                sources,
                index,
                config,
                viewer: ArcSwapOption::empty(),
                issued: AtomicU64::new(0),
                state: ArcSwap::from_pointee(ServiceState::default()),
            }),
        }
    }

    /// Region index used for classification.
    #[must_use]
    pub fn index(&self) -> &PolygonIndex {
        &self.inner.index
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Set the viewer for subsequent runs.
    ///
    /// The published snapshot is not recomputed; call [`Self::refresh`] to
    /// apply the new viewer.
    pub fn set_viewer(&self, viewer: Option<Viewer>) {
        self.inner.viewer.store(viewer.map(Arc::new));
    }

    /// Viewer used by the next run.
    #[must_use]
    pub fn viewer(&self) -> Option<Viewer> {
        self.inner.viewer.load().as_deref().copied()
    }

    /// The visible snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<MapSnapshot> {
        Arc::clone(&self.inner.state.load().snapshot)
    }

    /// Points of the visible snapshot.
    #[must_use]
    pub fn points(&self) -> Vec<MapPoint> {
        self.snapshot().points.clone()
    }

    /// Region summaries of the visible snapshot.
    #[must_use]
    pub fn summaries(&self) -> Vec<RegionSummary> {
        self.snapshot().summaries.clone()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> ServiceStatus {
        self.inner.state.load().status.clone()
    }

    /// When the visible snapshot was published.
    #[must_use]
    pub fn last_refreshed_at(&self) -> Option<SystemTime> {
        self.inner.state.load().status.last_refreshed_at
    }

    /// Run the pipeline once and try to publish the result.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any collection fails and this run is still
    /// the latest issued; the previous snapshot stays visible. Failures of
    /// superseded runs are reported as [`RunOutcome::Superseded`].
    pub async fn run(&self) -> Result<RunOutcome, FetchError> {
        let token = self.inner.begin();
        self.run_issued(token).await
    }

    /// Start a run on the Tokio runtime.
    ///
    /// The request token is issued before this returns, so of several
    /// refreshes the last one called is the one that publishes.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn refresh(&self) -> JoinHandle<Result<RunOutcome, FetchError>> {
        let token = self.inner.begin();
        let service = self.clone();
        tokio::spawn(async move { service.run_issued(token).await })
    }

    async fn run_issued(&self, token: u64) -> Result<RunOutcome, FetchError> {
        let viewer = self.inner.viewer.load_full();
        let records = match self.inner.sources.fetch_all(&self.inner.config.queries()).await {
            Ok(records) => records,
            Err(error) => {
                if self.inner.fail(token, &error) {
                    warn!("map data run {token} failed: {error}");
                    return Err(error);
                }
                debug!("ignoring failure of superseded run {token}: {error}");
                return Ok(RunOutcome::Superseded { token });
            }
        };

        let snapshot = build_snapshot(&records, viewer.as_deref(), &self.inner.index);
        let stats = snapshot.stats;
        let (points, regions) = (snapshot.points.len(), snapshot.summaries.len());
        if !self.inner.publish(token, snapshot) {
            debug!("discarding superseded run {token}");
            return Ok(RunOutcome::Superseded { token });
        }
        info!(
            "published run {token}: {points} points in {regions} regions \
             ({} hidden, {} malformed, {} unassigned)",
            stats.hidden, stats.malformed, stats.unassigned
        );
        Ok(RunOutcome::Published {
            token,
            points,
            regions,
        })
    }

    /// Refresh every `interval` until `shutdown` is cancelled.
    ///
    /// The first refresh happens immediately. Each run is awaited before the
    /// next tick and missed ticks are skipped, so timer runs never overlap.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime or if `interval` is zero.
    pub fn spawn_auto_refresh(
        &self,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    () = shutdown.cancelled() => {
                        debug!("auto refresh stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(error) = service.run().await {
                            debug!("auto refresh will retry after failure: {error}");
                        }
                    }
                }
            }
        })
    }

    /// Start the timer refresh if [`ServiceConfig::refresh_interval`] is set.
    pub fn start_auto_refresh(&self, shutdown: CancellationToken) -> Option<JoinHandle<()>> {
        self.inner
            .config
            .refresh_interval
            .map(|interval| self.spawn_auto_refresh(interval, shutdown))
    }
}

#[cfg(test)]
mod tests;
