//! Index-keyed accumulator for discovered fragments.
//!
//! [`FragmentStore`] is the single source of truth for what a run has found.
//! It keeps the text of every discovered fragment keyed by
//! [`FragmentIndex`], remembers which [`CandidateId`] produced each entry, and
//! records every candidate that has been fetched so no identifier is probed
//! twice. Merging is first-write-wins so results from a batch can be applied
//! in any order.

use std::collections::{HashMap, HashSet, hash_map::Entry};

use super::{CandidateId, Fragment, FragmentIndex, MergeStatus};
use crate::fetch::FetchOutcome;

#[derive(Clone, Debug, PartialEq, Eq)]
struct StoredFragment {
    source: CandidateId,
    text: String,
}

/// Fragments discovered so far, plus the set of attempted candidates.
///
/// # Examples
///
/// ```
/// use fragment_decoder::{
///     fetch::FetchOutcome,
///     fragment::{CandidateId, Fragment, FragmentIndex, FragmentStore, MergeStatus},
/// };
///
/// let mut store = FragmentStore::new();
/// let found = FetchOutcome::Found(Fragment::new(FragmentIndex::zero(), "hello"));
/// assert_eq!(store.merge(CandidateId::new(7), found), MergeStatus::Inserted);
/// assert!(store.was_attempted(CandidateId::new(7)));
/// assert!(store.is_complete());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FragmentStore {
    fragments: HashMap<FragmentIndex, StoredFragment>,
    attempted: HashSet<CandidateId>,
    max_index: Option<FragmentIndex>,
}

impl FragmentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Apply the outcome of fetching `id`.
    ///
    /// The candidate is recorded as attempted whatever the outcome. A found
    /// fragment is stored only if its index is still vacant and its text is
    /// non-empty; an occupied index keeps the text of the first discovery.
    pub fn merge(&mut self, id: CandidateId, outcome: FetchOutcome) -> MergeStatus {
        self.attempted.insert(id);
        match outcome {
            FetchOutcome::Found(fragment) => self.insert(id, fragment),
            FetchOutcome::Absent => MergeStatus::Absent,
            FetchOutcome::Error(_) => MergeStatus::Failed,
        }
    }

    fn insert(&mut self, source: CandidateId, fragment: Fragment) -> MergeStatus {
        let (index, text) = fragment.into_parts();
        if text.is_empty() {
            return MergeStatus::Rejected;
        }
        match self.fragments.entry(index) {
            Entry::Occupied(_) => MergeStatus::Duplicate,
            Entry::Vacant(vacant) => {
                vacant.insert(StoredFragment { source, text });
                self.max_index = self.max_index.max(Some(index));
                MergeStatus::Inserted
            }
        }
    }

    /// Whether `id` has already been fetched during this run.
    #[must_use]
    pub fn was_attempted(&self, id: CandidateId) -> bool { self.attempted.contains(&id) }

    /// Borrow the set of attempted candidates.
    #[must_use]
    pub fn attempted(&self) -> &HashSet<CandidateId> { &self.attempted }

    /// Number of candidates attempted so far.
    #[must_use]
    pub fn attempted_len(&self) -> usize { self.attempted.len() }

    /// Number of distinct fragment indices discovered.
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Whether no fragment has been discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.fragments.is_empty() }

    /// Whether a fragment is stored for `index`.
    #[must_use]
    pub fn contains(&self, index: FragmentIndex) -> bool { self.fragments.contains_key(&index) }

    /// Borrow the text stored for `index`.
    #[must_use]
    pub fn get(&self, index: FragmentIndex) -> Option<&str> {
        self.fragments.get(&index).map(|stored| stored.text.as_str())
    }

    /// Candidate that produced the fragment at `index`.
    #[must_use]
    pub fn source_of(&self, index: FragmentIndex) -> Option<CandidateId> {
        self.fragments.get(&index).map(|stored| stored.source)
    }

    /// Highest fragment index discovered so far.
    #[must_use]
    pub const fn max_index(&self) -> Option<FragmentIndex> { self.max_index }

    /// Highest candidate identifier known to carry a fragment.
    #[must_use]
    pub fn max_source_id(&self) -> Option<CandidateId> {
        self.fragments.values().map(|stored| stored.source).max()
    }

    /// Indices in `0..=max_index` that have not been discovered.
    #[must_use]
    pub fn gaps(&self) -> Vec<FragmentIndex> {
        self.max_index.map_or_else(Vec::new, |max| {
            max.up_to_inclusive()
                .filter(|index| !self.fragments.contains_key(index))
                .collect()
        })
    }

    /// Share of `0..=max_index` already discovered, in `[0.0, 1.0]`.
    ///
    /// An empty store reports `0.0`.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        self.max_index.map_or(0.0, |max| {
            f64::from(u32::try_from(self.len()).unwrap_or(u32::MAX)) / (f64::from(max.get()) + 1.0)
        })
    }

    /// Whether indices `0..=max_index` form an unbroken run.
    ///
    /// See [`is_complete`](crate::fragment::is_complete).
    #[must_use]
    pub fn is_complete(&self) -> bool { super::is_complete(self) }
}
