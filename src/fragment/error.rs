//! Error and status types emitted by the fragment store and assembler.

use thiserror::Error;

use super::FragmentIndex;

/// Result of merging one fetch outcome into a
/// [`FragmentStore`](crate::fragment::FragmentStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeStatus {
    /// The outcome populated a previously empty index.
    Inserted,
    /// The index was already populated; the later discovery was dropped.
    Duplicate,
    /// The fragment carried empty text and was not stored.
    Rejected,
    /// The candidate has no fragment.
    Absent,
    /// The fetch failed; the candidate yields no fragment this run.
    Failed,
}

impl MergeStatus {
    /// Whether the merge added a new fragment to the store.
    #[must_use]
    pub const fn is_inserted(self) -> bool { matches!(self, Self::Inserted) }
}

/// Errors produced by [`assemble`](crate::fragment::assemble).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// No fragment has been discovered yet.
    #[error("no fragments discovered")]
    Empty,
    /// Indices below the known maximum are still missing.
    #[error(
        "message incomplete: {} fragment(s) missing, first gap at index {}",
        .missing.len(),
        .missing.first().map_or_else(String::new, ToString::to_string)
    )]
    Incomplete { missing: Vec<FragmentIndex> },
}
