//! Tests for batch admission, deduplication, and the concurrency bound.

use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use rstest::rstest;

use super::{ConcurrencyLimiter, join_failure};
use crate::{
    fetch::{FetchError, FetchOutcome, FragmentSource},
    fragment::{CandidateId, Fragment, FragmentIndex},
};

/// Source that sleeps, records every call, and tracks its own concurrency.
#[derive(Default)]
struct RecordingSource {
    delay: Duration,
    calls: Mutex<Vec<CandidateId>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl RecordingSource {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<CandidateId> { self.calls.lock().expect("calls lock").clone() }
}

#[async_trait]
impl FragmentSource for RecordingSource {
    async fn fetch(&self, id: CandidateId) -> FetchOutcome {
        self.calls.lock().expect("calls lock").push(id);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        if id.get() % 10 == 0 {
            let index = u32::try_from(id.get() / 10).expect("small id");
            FetchOutcome::Found(Fragment::new(FragmentIndex::new(index), "x"))
        } else {
            FetchOutcome::Absent
        }
    }
}

struct PanickingSource;

#[async_trait]
impl FragmentSource for PanickingSource {
    async fn fetch(&self, id: CandidateId) -> FetchOutcome {
        assert!(id.get() != 13, "unlucky candidate");
        FetchOutcome::Absent
    }
}

struct StalledSource;

#[async_trait]
impl FragmentSource for StalledSource {
    async fn fetch(&self, _id: CandidateId) -> FetchOutcome {
        std::future::pending::<()>().await;
        FetchOutcome::Absent
    }
}

#[rstest]
#[case(1, 12)]
#[case(4, 40)]
#[case(16, 40)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn never_exceeds_max_concurrent(#[case] max_concurrent: usize, #[case] batch: u64) {
    let limiter = ConcurrencyLimiter::new(
        RecordingSource::with_delay(Duration::from_millis(5)),
        max_concurrent,
        Duration::from_secs(5),
    );

    let results = limiter
        .run_batch((1..=batch).map(CandidateId::new), &HashSet::new())
        .await;

    assert_eq!(results.len(), usize::try_from(batch).expect("small batch"));
    assert!(limiter.peak_in_flight() <= max_concurrent);
    assert!(limiter.source().peak.load(Ordering::SeqCst) <= max_concurrent);
    assert_eq!(limiter.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn keeps_pipeline_saturated() {
    let limiter = ConcurrencyLimiter::new(
        RecordingSource::with_delay(Duration::from_millis(20)),
        8,
        Duration::from_secs(5),
    );

    limiter
        .run_batch((1..=32).map(CandidateId::new), &HashSet::new())
        .await;

    assert_eq!(limiter.peak_in_flight(), 8);
}

#[tokio::test]
async fn skips_already_tried_and_repeated_candidates() {
    let limiter = ConcurrencyLimiter::new(RecordingSource::default(), 4, Duration::from_secs(1));
    let tried = HashSet::from([CandidateId::new(2), CandidateId::new(4)]);
    let ids = [1, 2, 3, 3, 4, 5, 1].map(CandidateId::new);

    let results = limiter.run_batch(ids, &tried).await;

    let mut calls = limiter.source().calls();
    calls.sort_unstable();
    assert_eq!(calls, [1, 3, 5].map(CandidateId::new));
    assert_eq!(results.len(), 3);
    assert!(!results.contains_key(&CandidateId::new(2)));
}

#[tokio::test]
async fn returns_found_and_absent_outcomes() {
    let limiter = ConcurrencyLimiter::new(RecordingSource::default(), 2, Duration::from_secs(1));

    let results = limiter
        .run_batch([10, 11].map(CandidateId::new), &HashSet::new())
        .await;

    assert_eq!(
        results[&CandidateId::new(10)],
        FetchOutcome::Found(Fragment::new(FragmentIndex::new(1), "x"))
    );
    assert_eq!(results[&CandidateId::new(11)], FetchOutcome::Absent);
}

#[tokio::test]
async fn panicking_fetch_becomes_an_error_outcome() {
    let limiter = ConcurrencyLimiter::new(PanickingSource, 2, Duration::from_secs(1));

    let results = limiter
        .run_batch([12, 13, 14].map(CandidateId::new), &HashSet::new())
        .await;

    assert_eq!(results.len(), 3);
    assert!(matches!(
        &results[&CandidateId::new(13)],
        FetchOutcome::Error(FetchError::Panicked(message)) if message.contains("unlucky")
    ));
    assert_eq!(results[&CandidateId::new(14)], FetchOutcome::Absent);
    assert_eq!(limiter.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn stalled_fetch_times_out() {
    let limiter = ConcurrencyLimiter::new(StalledSource, 2, Duration::from_millis(50));

    let results = limiter
        .run_batch([1, 2, 3].map(CandidateId::new), &HashSet::new())
        .await;

    assert_eq!(results.len(), 3);
    assert!(
        results
            .values()
            .all(|outcome| *outcome == FetchOutcome::Error(FetchError::Timeout))
    );
}

#[tokio::test(start_paused = true)]
async fn rate_limit_spreads_requests_over_time() {
    let limiter = ConcurrencyLimiter::new(RecordingSource::default(), 8, Duration::from_secs(5))
        .with_rate_limit(Some(2));
    let started = tokio::time::Instant::now();

    let results = limiter
        .run_batch((1..=6).map(CandidateId::new), &HashSet::new())
        .await;

    assert_eq!(results.len(), 6);
    assert!(started.elapsed() >= Duration::from_secs(2));
}

#[tokio::test]
async fn cancelled_task_is_not_reported_as_a_closed_limiter() {
    let handle = tokio::spawn(std::future::pending::<()>());
    handle.abort();
    let err = handle.await.expect_err("task was aborted");

    assert_eq!(join_failure(&err), FetchError::Cancelled);
}

#[tokio::test]
async fn panicked_task_keeps_its_panic_message() {
    let err = tokio::spawn(async { panic!("source exploded") })
        .await
        .expect_err("task panicked");

    assert!(matches!(join_failure(&err), FetchError::Panicked(message) if message.contains("source exploded")));
}
