//! Tests for message assembly.

use super::store_from;
use crate::fragment::{AssemblyError, FragmentIndex, FragmentStore, assemble};

#[test]
fn joins_texts_by_ascending_index() {
    let store = store_from(&[(99, 3, "test"), (5, 2, "a"), (17, 0, "This"), (42, 1, "is")]);

    let message = assemble(&store).expect("store is complete");

    assert_eq!(message.as_str(), "This is a test");
}

#[test]
fn assembly_is_independent_of_merge_order() {
    let forward = store_from(&[(1, 0, "alpha"), (2, 1, "beta"), (3, 2, "gamma")]);
    let reverse = store_from(&[(3, 2, "gamma"), (2, 1, "beta"), (1, 0, "alpha")]);

    assert_eq!(
        assemble(&forward).expect("complete"),
        assemble(&reverse).expect("complete")
    );
}

#[test]
fn empty_store_cannot_be_assembled() {
    assert_eq!(assemble(&FragmentStore::new()), Err(AssemblyError::Empty));
}

#[test]
fn gapped_store_reports_missing_indices() {
    let store = store_from(&[(1, 0, "a"), (2, 1, "b"), (3, 3, "d")]);

    let err = assemble(&store).expect_err("gap at index 2");

    assert_eq!(
        err,
        AssemblyError::Incomplete {
            missing: vec![FragmentIndex::new(2)]
        }
    );
    assert_eq!(
        err.to_string(),
        "message incomplete: 1 fragment(s) missing, first gap at index 2"
    );
}
