//! Behavioural tests for [`MapDataService`].
//!
//! These tests drive the service against [`StubRecordSource`] collections on
//! a paused Tokio clock, so delays are deterministic.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use regionmap_core::test_support::{INSIDE_OCEAN_GROVE, fixture_index, post_at, verified_only};
use regionmap_core::{SourceKind, Viewer};
use regionmap_data::source::test_support::StubRecordSource;
use regionmap_data::{
    FetchError, MapDataService, Phase, RunOutcome, ServiceConfig, SourceError, SourceSet,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::{Builder, Runtime};

type RunResult = Result<RunOutcome, FetchError>;

struct ServiceWorld {
    runtime: Runtime,
    posts: Arc<StubRecordSource>,
    events: Arc<StubRecordSource>,
    service: RefCell<Option<MapDataService>>,
    results: RefCell<Vec<RunResult>>,
}

impl ServiceWorld {
    fn service(&self) -> MapDataService {
        self.service
            .borrow()
            .clone()
            .expect("service should be configured")
    }

    fn run_once(&self) -> RunResult {
        let service = self.service();
        self.runtime.block_on(async move { service.run().await })
    }
}

#[fixture]
fn world() -> ServiceWorld {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .expect("failed to build Tokio runtime");
    ServiceWorld {
        runtime,
        posts: Arc::new(StubRecordSource::new(SourceKind::Post)),
        events: Arc::new(StubRecordSource::new(SourceKind::Event)),
        service: RefCell::new(None),
        results: RefCell::new(Vec::new()),
    }
}

#[given("a map data service over the coastal regions")]
fn given_service(world: &ServiceWorld) {
    let sources = SourceSet::new(
        world.posts.clone(),
        Arc::new(StubRecordSource::new(SourceKind::Business)),
        world.events.clone(),
    );
    let service = MapDataService::new(sources, fixture_index(), ServiceConfig::default());
    world.service.replace(Some(service));
}

#[given("the next posts query returns a {category:word} post after {millis} milliseconds")]
fn given_post_response(world: &ServiceWorld, category: String, millis: u64) {
    world.posts.enqueue(
        Ok(vec![post_at(&category, &category, INSIDE_OCEAN_GROVE)]),
        Duration::from_millis(millis),
    );
}

#[given("the next posts query returns a verified-only {category:word} post")]
fn given_restricted_post(world: &ServiceWorld, category: String) {
    let post = verified_only(post_at(&category, &category, INSIDE_OCEAN_GROVE));
    world.posts.enqueue(Ok(vec![post]), Duration::ZERO);
}

#[given("the next events query fails")]
fn given_events_fail(world: &ServiceWorld) {
    world.events.enqueue(
        Err(SourceError::Http {
            url: "http://example.test/events".into(),
            status: 503,
            message: "service unavailable".into(),
        }),
        Duration::ZERO,
    );
}

#[given("the service has completed a run")]
fn given_completed_run(world: &ServiceWorld) {
    let outcome = world.run_once().expect("initial run succeeds");
    assert!(outcome.is_published());
}

#[given("the viewer is signed in but unverified")]
fn given_unverified_viewer(world: &ServiceWorld) {
    world.service().set_viewer(Some(Viewer::unverified()));
}

#[when("two refreshes are issued back to back")]
fn when_two_refreshes(world: &ServiceWorld) {
    let service = world.service();
    let results = world.runtime.block_on(async move {
        let first = service.refresh();
        tokio::task::yield_now().await;
        let second = service.refresh();
        let first = first.await.expect("first refresh task completes");
        let second = second.await.expect("second refresh task completes");
        vec![first, second]
    });
    world.results.replace(results);
}

#[when("the service runs")]
fn when_service_runs(world: &ServiceWorld) {
    let result = world.run_once();
    world.results.borrow_mut().push(result);
}

#[then("the first refresh is superseded")]
fn then_first_superseded(world: &ServiceWorld) {
    let results = world.results.borrow();
    assert_eq!(results.first(), Some(&Ok(RunOutcome::Superseded { token: 1 })));
}

#[then("the second refresh is published")]
fn then_second_published(world: &ServiceWorld) {
    let results = world.results.borrow();
    let second = results.get(1).expect("two refreshes ran");
    assert!(matches!(second, Ok(outcome) if outcome.is_published() && outcome.token() == 2));
}

#[then("the published points are the {category:word} post only")]
fn then_only_post(world: &ServiceWorld, category: String) {
    let ids: Vec<_> = world
        .service()
        .points()
        .into_iter()
        .map(|point| point.id)
        .collect();
    assert_eq!(ids, vec![format!("post:{category}")]);
}

#[then("the run reports a fetch failure")]
fn then_fetch_failure(world: &ServiceWorld) {
    let results = world.results.borrow();
    let err = results
        .last()
        .and_then(|result| result.as_ref().err())
        .expect("the run failed");
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].kind, SourceKind::Event);
}

#[then("the service status is errored")]
fn then_errored(world: &ServiceWorld) {
    let status = world.service().status();
    assert_eq!(status.phase, Phase::Errored);
    assert!(status.error.is_some_and(|message| message.contains("503")));
    assert!(status.last_refreshed_at.is_some());
}

#[then("the service status is ready")]
fn then_ready(world: &ServiceWorld) {
    assert_eq!(world.service().status().phase, Phase::Ready);
}

#[then("the published map is empty")]
fn then_empty(world: &ServiceWorld) {
    let service = world.service();
    assert!(service.points().is_empty());
    assert!(service.summaries().is_empty());
    assert_eq!(service.snapshot().stats.hidden, 1);
}

#[scenario(path = "tests/features/map_data_service.feature", index = 0)]
fn slow_refresh_never_overwrites_later_one(world: ServiceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/map_data_service.feature", index = 1)]
fn failed_fetch_keeps_previous_map(world: ServiceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/map_data_service.feature", index = 2)]
fn verified_only_hidden_from_unverified(world: ServiceWorld) {
    let _ = world;
}
