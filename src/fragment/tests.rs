//! Unit tests for the fragment store, completion predicate, and assembler.
//!
//! Tests are split into focused submodules to keep each file short and easy
//! to navigate.

mod assembly_tests;
mod store_tests;

use super::{CandidateId, Fragment, FragmentIndex, FragmentStore};
use crate::fetch::FetchOutcome;

fn found(index: u32, text: &str) -> FetchOutcome {
    FetchOutcome::Found(Fragment::new(FragmentIndex::new(index), text))
}

/// Build a store from `(candidate, index, text)` triples.
fn store_from(entries: &[(u64, u32, &str)]) -> FragmentStore {
    let mut store = FragmentStore::new();
    for &(id, index, text) in entries {
        store.merge(CandidateId::new(id), found(index, text));
    }
    store
}
