#![cfg(feature = "metrics")]
//! Tests for `fragment_decoder` metrics.
//!
//! These tests verify that counters and gauges update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.

mod common;

use decoder_testing::StubSource;
use fragment_decoder::{
    FetchError,
    FetchOutcome,
    Fragment,
    FragmentIndex,
    metrics::{FETCHES_IN_FLIGHT, FETCHES_TOTAL, FRAGMENTS_DISCOVERED, inc_fetches},
    run_decoder_with_source,
};
use metrics::{SharedString, Unit};
use metrics_util::{
    CompositeKey,
    debugging::{DebugValue, DebuggingRecorder, Snapshotter},
};
use rstest::rstest;

/// Creates a debugging recorder and snapshotter for metrics testing.
fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

type Entry = (CompositeKey, Option<Unit>, Option<SharedString>, DebugValue);

fn counter_value(snapshot: &[Entry], name: &str, outcome: Option<&str>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.key().name() == name
                && outcome.is_none_or(|wanted| {
                    key.key()
                        .labels()
                        .any(|label| label.key() == "outcome" && label.value() == wanted)
                })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => *count,
            _ => 0,
        })
        .sum()
}

#[rstest]
#[case(FetchOutcome::Found(Fragment::new(FragmentIndex::new(0), "a")), "found")]
#[case(FetchOutcome::Absent, "absent")]
#[case(FetchOutcome::Error(FetchError::Timeout), "error")]
fn fetch_counter_is_labelled_by_outcome(#[case] outcome: FetchOutcome, #[case] label: &str) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || inc_fetches(&outcome));

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_value(&snapshot, FETCHES_TOTAL, Some(label)), 1);
}

#[test]
fn decoder_run_records_fetches_and_discoveries() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let source = StubSource::test_message();
    let config = common::small_config();

    let report = metrics::with_local_recorder(&recorder, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime builds")
            .block_on(run_decoder_with_source(config, source))
    })
    .expect("message decoded");

    let snapshot = snapshotter.snapshot().into_vec();
    let total = counter_value(&snapshot, FETCHES_TOTAL, None);
    assert_eq!(total, u64::try_from(report.requests_made).expect("small count"));
    assert_eq!(counter_value(&snapshot, FETCHES_TOTAL, Some("found")), 4);
    assert_eq!(counter_value(&snapshot, FRAGMENTS_DISCOVERED, None), 4);

    let in_flight = snapshot
        .iter()
        .find(|(key, _, _, _)| key.key().name() == FETCHES_IN_FLIGHT)
        .map(|(_, _, _, value)| value);
    assert!(
        matches!(in_flight, Some(DebugValue::Gauge(value)) if value.into_inner().abs() < f64::EPSILON),
        "in-flight gauge should settle at zero: {in_flight:?}"
    );
}
