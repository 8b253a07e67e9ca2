//! Tests for merge semantics and bookkeeping in `FragmentStore`.

use rstest::rstest;

use super::{found, store_from};
use crate::{
    fetch::{FetchError, FetchOutcome},
    fragment::{CandidateId, FragmentIndex, FragmentStore, MergeStatus},
};

#[test]
fn merging_same_outcome_twice_matches_single_merge() {
    let mut once = FragmentStore::new();
    once.merge(CandidateId::new(17), found(0, "This"));

    let mut twice = once.clone();
    let status = twice.merge(CandidateId::new(17), found(0, "This"));

    assert_eq!(status, MergeStatus::Duplicate);
    assert_eq!(once, twice);
}

#[test]
fn first_discovery_of_an_index_wins() {
    let mut store = store_from(&[(3, 0, "first")]);

    let status = store.merge(CandidateId::new(4), found(0, "second"));

    assert_eq!(status, MergeStatus::Duplicate);
    assert_eq!(store.get(FragmentIndex::zero()), Some("first"));
    assert_eq!(store.source_of(FragmentIndex::zero()), Some(CandidateId::new(3)));
    assert!(store.was_attempted(CandidateId::new(4)));
}

#[test]
fn empty_text_is_rejected() {
    let mut store = FragmentStore::new();

    let status = store.merge(CandidateId::new(1), found(0, ""));

    assert_eq!(status, MergeStatus::Rejected);
    assert!(store.is_empty());
    assert!(store.was_attempted(CandidateId::new(1)));
}

#[rstest]
#[case(FetchOutcome::Absent, MergeStatus::Absent)]
#[case(FetchOutcome::Error(FetchError::Timeout), MergeStatus::Failed)]
#[case(FetchOutcome::Error(FetchError::Status(500)), MergeStatus::Failed)]
fn non_fragment_outcomes_only_mark_attempted(
    #[case] outcome: FetchOutcome,
    #[case] expected: MergeStatus,
) {
    let mut store = FragmentStore::new();

    assert_eq!(store.merge(CandidateId::new(9), outcome), expected);
    assert!(store.is_empty());
    assert_eq!(store.attempted_len(), 1);
}

#[test]
fn tracks_maximum_index_and_source_id() {
    let store = store_from(&[(40, 1, "b"), (900, 5, "f"), (12, 0, "a")]);

    assert_eq!(store.max_index(), Some(FragmentIndex::new(5)));
    assert_eq!(store.max_source_id(), Some(CandidateId::new(900)));
    assert_eq!(store.len(), 3);
}

#[test]
fn gaps_list_missing_indices_below_maximum() {
    let store = store_from(&[(1, 0, "a"), (2, 1, "b"), (3, 4, "e")]);

    assert_eq!(
        store.gaps(),
        vec![FragmentIndex::new(2), FragmentIndex::new(3)]
    );
}

#[rstest]
#[case(&[], 0.0)]
#[case(&[(1, 0, "a")], 1.0)]
#[case(&[(1, 0, "a"), (2, 1, "b"), (3, 3, "d")], 0.75)]
fn fill_ratio_reports_discovered_share(#[case] entries: &[(u64, u32, &str)], #[case] ratio: f64) {
    let store = store_from(entries);
    assert!((store.fill_ratio() - ratio).abs() < f64::EPSILON);
}

#[test]
fn repeated_outcomes_record_one_attempt() {
    let mut store = FragmentStore::new();
    store.merge(CandidateId::new(5), FetchOutcome::Absent);
    store.merge(CandidateId::new(5), FetchOutcome::Absent);
    assert_eq!(store.attempted_len(), 1);
}
