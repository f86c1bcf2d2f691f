//! Tests for the `MapDataService`.

use super::*;
use crate::source::test_support::StubRecordSource;
use crate::source::{SourceError, SourceQuery};
use regionmap_core::test_support::{
    INSIDE_OCEAN_GROVE, OCEAN_GROVE, OFFSHORE, fixture_index, post_at, verified_only,
};
use regionmap_core::{Category, SourceKind};
use rstest::rstest;

struct Harness {
    posts: Arc<StubRecordSource>,
    businesses: Arc<StubRecordSource>,
    events: Arc<StubRecordSource>,
    service: MapDataService,
}

fn harness(config: ServiceConfig) -> Harness {
    let posts = Arc::new(StubRecordSource::new(SourceKind::Post));
    let businesses = Arc::new(StubRecordSource::new(SourceKind::Business));
    let events = Arc::new(StubRecordSource::new(SourceKind::Event));
    let sources = SourceSet::new(posts.clone(), businesses.clone(), events.clone());
    let service = MapDataService::new(sources, fixture_index(), config);
    Harness {
        posts,
        businesses,
        events,
        service,
    }
}

fn network_error() -> SourceError {
    SourceError::Network {
        url: "http://example.test/posts".into(),
        message: "connection refused".into(),
    }
}

#[rstest]
#[tokio::test]
async fn starts_idle_and_empty() {
    let Harness { service, .. } = harness(ServiceConfig::default());
    assert_eq!(service.status(), ServiceStatus::default());
    assert!(service.points().is_empty());
    assert!(service.summaries().is_empty());
    assert!(service.last_refreshed_at().is_none());
}

#[rstest]
#[tokio::test]
async fn run_publishes_points_and_summaries_together() {
    let h = harness(ServiceConfig::default());
    h.posts.enqueue(
        Ok(vec![
            post_at("1", "marketplace", INSIDE_OCEAN_GROVE),
            post_at("2", "deals", INSIDE_OCEAN_GROVE),
            post_at("3", "deals", OFFSHORE),
        ]),
        Duration::ZERO,
    );

    let outcome = h.service.run().await.expect("run succeeds");

    assert_eq!(
        outcome,
        RunOutcome::Published {
            token: 1,
            points: 3,
            regions: 1,
        }
    );
    let snapshot = h.service.snapshot();
    let summary = snapshot.summary(OCEAN_GROVE).expect("Ocean Grove summary");
    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.count_for(Category::Marketplace), 1);
    assert_eq!(summary.count_for(Category::Deals), 1);
    let status = h.service.status();
    assert_eq!(status.phase, Phase::Ready);
    assert!(status.last_refreshed_at.is_some());
}

#[rstest]
#[tokio::test]
async fn queries_respect_configured_page_sizes() {
    let config = ServiceConfig::default()
        .with_page_sizes(PageSizes {
            posts: 10,
            businesses: 20,
            events: 30,
        })
        .with_active_only(false);
    let h = harness(config);
    h.service.run().await.expect("run succeeds");
    assert_eq!(h.posts.last_query(), Some(SourceQuery::new(10)));
    assert_eq!(h.businesses.last_query(), Some(SourceQuery::new(20)));
    assert_eq!(h.events.last_query(), Some(SourceQuery::new(30)));
}

#[rstest]
#[tokio::test]
async fn default_queries_ask_for_active_pages_of_200() {
    let h = harness(ServiceConfig::default());
    h.service.run().await.expect("run succeeds");
    let expected = Some(SourceQuery::new(DEFAULT_PAGE_SIZE).active());
    assert_eq!(h.events.last_query(), expected);
    assert_eq!(h.businesses.last_query(), expected);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn later_refresh_wins_over_slower_earlier_refresh() {
    let h = harness(ServiceConfig::default());
    h.posts.enqueue(
        Ok(vec![post_at("stale", "deals", INSIDE_OCEAN_GROVE)]),
        Duration::from_millis(500),
    );
    h.posts.enqueue(
        Ok(vec![post_at("fresh", "marketplace", INSIDE_OCEAN_GROVE)]),
        Duration::from_millis(10),
    );

    let first = h.service.refresh();
    tokio::task::yield_now().await;
    let second = h.service.refresh();
    let second = second.await.expect("task completes").expect("run succeeds");
    let first = first.await.expect("task completes").expect("run succeeds");

    assert_eq!(first, RunOutcome::Superseded { token: 1 });
    assert!(second.is_published());
    assert_eq!(second.token(), 2);
    let ids: Vec<_> = h.service.points().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["post:fresh".to_owned()]);
    assert_eq!(h.service.status().phase, Phase::Ready);
}

#[rstest]
#[tokio::test]
async fn failure_keeps_previous_snapshot_visible() {
    let h = harness(ServiceConfig::default());
    h.posts.enqueue(
        Ok(vec![post_at("1", "deals", INSIDE_OCEAN_GROVE)]),
        Duration::ZERO,
    );
    h.service.run().await.expect("first run succeeds");
    let published_at = h.service.last_refreshed_at();

    h.events.enqueue(Err(network_error()), Duration::ZERO);
    let err = h.service.run().await.expect_err("events fail");

    assert_eq!(err.failures().len(), 1);
    assert_eq!(h.service.points().len(), 1);
    let status = h.service.status();
    assert_eq!(status.phase, Phase::Errored);
    assert_eq!(status.error, Some(err.to_string()));
    assert_eq!(status.last_refreshed_at, published_at);

    h.service.run().await.expect("recovery run succeeds");
    let status = h.service.status();
    assert_eq!(status.phase, Phase::Ready);
    assert!(status.error.is_none());
}

#[rstest]
#[tokio::test]
async fn partial_results_are_never_published() {
    let h = harness(ServiceConfig::default());
    h.posts.enqueue(
        Ok(vec![post_at("1", "deals", INSIDE_OCEAN_GROVE)]),
        Duration::ZERO,
    );
    h.businesses.enqueue(Err(network_error()), Duration::ZERO);
    h.service.run().await.expect_err("businesses fail");
    assert!(h.service.points().is_empty());
    assert_eq!(h.service.snapshot().stats.fetched, 0);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn superseded_failure_is_not_reported() {
    let h = harness(ServiceConfig::default());
    h.posts.enqueue(Err(network_error()), Duration::from_millis(200));
    h.posts.enqueue(Ok(Vec::new()), Duration::from_millis(10));

    let first = h.service.refresh();
    tokio::task::yield_now().await;
    let second = h.service.refresh();

    let first = first.await.expect("task completes");
    assert_eq!(first, Ok(RunOutcome::Superseded { token: 1 }));
    assert!(second.await.expect("task completes").is_ok());
    assert_eq!(h.service.status().phase, Phase::Ready);
}

#[rstest]
#[tokio::test]
async fn viewer_applies_to_subsequent_runs() {
    let h = harness(ServiceConfig::default());
    let restricted = verified_only(post_at("1", "deals", INSIDE_OCEAN_GROVE));
    h.posts.enqueue(Ok(vec![restricted.clone()]), Duration::ZERO);
    h.posts.enqueue(Ok(vec![restricted]), Duration::ZERO);

    h.service.set_viewer(Some(Viewer::unverified()));
    h.service.run().await.expect("run succeeds");
    assert!(h.service.points().is_empty());
    assert!(h.service.summaries().is_empty());

    h.service.set_viewer(Some(Viewer::verified()));
    assert_eq!(h.service.viewer(), Some(Viewer::verified()));
    h.service.run().await.expect("run succeeds");
    assert_eq!(h.service.points().len(), 1);
    assert_eq!(h.service.summaries().len(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn auto_refresh_runs_on_each_tick_until_cancelled() {
    let h = harness(ServiceConfig::default().with_refresh_interval(Duration::from_secs(60)));
    let shutdown = CancellationToken::new();
    let handle = h
        .service
        .start_auto_refresh(shutdown.clone())
        .expect("interval configured");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(h.posts.calls(), 1);
    assert_eq!(h.service.status().phase, Phase::Ready);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(h.posts.calls(), 2);

    shutdown.cancel();
    handle.await.expect("loop exits cleanly");
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(h.posts.calls(), 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn auto_refresh_never_overlaps_slow_runs() {
    let slow = Arc::new(StubRecordSource::new(SourceKind::Post).with_delay(Duration::from_secs(150)));
    let sources = SourceSet::new(
        slow.clone(),
        Arc::new(StubRecordSource::new(SourceKind::Business)),
        Arc::new(StubRecordSource::new(SourceKind::Event)),
    );
    let service = MapDataService::new(sources, fixture_index(), ServiceConfig::default());
    let shutdown = CancellationToken::new();
    let handle = service.spawn_auto_refresh(Duration::from_secs(60), shutdown.clone());

    // Each run takes 150s against a 60s period; the ticks due while a run is
    // in flight collapse into one.
    tokio::time::sleep(Duration::from_secs(200)).await;
    assert_eq!(slow.calls(), 2);

    shutdown.cancel();
    handle.await.expect("loop exits cleanly");
    assert_eq!(slow.calls(), 2);
}

#[rstest]
#[tokio::test]
async fn no_timer_without_interval() {
    let h = harness(ServiceConfig::default());
    assert!(h.service.start_auto_refresh(CancellationToken::new()).is_none());
}

#[rstest]
#[tokio::test]
async fn undecodable_file_records_are_counted_as_malformed() {
    use crate::source::{FileRecordSource, MemoryRecordSource};

    let dir = tempfile::TempDir::new().expect("create temp dir");
    let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("posts.json"))
        .expect("utf-8 temp path");
    std::fs::write(
        &path,
        r#"[
            {"kind": "post", "id": "1", "title": "Chair", "category": "marketplace",
             "location": {"latitude": -38.26, "longitude": 144.52}},
            {"kind": "post", "id": "2", "title": "Desk",
             "location": {"latitude": "n/a", "longitude": 1.0}}
        ]"#,
    )
    .expect("write posts");
    let sources = SourceSet::new(
        Arc::new(FileRecordSource::new(path, SourceKind::Post)),
        Arc::new(MemoryRecordSource::empty(SourceKind::Business)),
        Arc::new(MemoryRecordSource::empty(SourceKind::Event)),
    );
    let service = MapDataService::new(sources, fixture_index(), ServiceConfig::default());

    service.run().await.expect("one bad record does not fail the run");

    let snapshot = service.snapshot();
    let ids: Vec<_> = snapshot.points.iter().map(|point| point.id.as_str()).collect();
    assert_eq!(ids, vec!["post:1"]);
    assert_eq!(snapshot.stats.fetched, 2);
    assert_eq!(snapshot.stats.malformed, 1);
    assert_eq!(service.status().phase, Phase::Ready);
}
