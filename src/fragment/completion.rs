//! Completion predicate over a partially filled [`FragmentStore`].

use super::FragmentStore;

/// Return `true` when `store` is non-empty and holds every index from zero
/// up to its highest discovered index.
///
/// Keys are unique and bounded by the maximum, so the run is unbroken exactly
/// when the store holds `max + 1` entries.
///
/// # Examples
///
/// ```
/// use fragment_decoder::{
///     fetch::FetchOutcome,
///     fragment::{CandidateId, Fragment, FragmentIndex, FragmentStore, is_complete},
/// };
///
/// let mut store = FragmentStore::new();
/// assert!(!is_complete(&store));
/// for (id, index) in [(10, 0), (11, 1), (13, 3)] {
///     let found = FetchOutcome::Found(Fragment::new(FragmentIndex::new(index), "x"));
///     store.merge(CandidateId::new(id), found);
/// }
/// assert!(!is_complete(&store));
/// ```
#[must_use]
pub fn is_complete(store: &FragmentStore) -> bool {
    store.max_index().is_some_and(|max| {
        usize::try_from(max.get()).is_ok_and(|max| store.len() == max + 1)
    })
}
