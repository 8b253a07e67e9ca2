//! Deterministic assembly of a completed [`FragmentStore`].

use std::fmt;

use super::{AssemblyError, FragmentStore};

/// Separator placed between consecutive fragment texts.
pub const FRAGMENT_SEPARATOR: &str = " ";

/// The reconstructed message.
///
/// Only produced from a complete store; the text never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssembledMessage(String);

impl AssembledMessage {
    /// Borrow the message text.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Consume the message, returning the owned text.
    #[must_use]
    pub fn into_string(self) -> String { self.0 }
}

impl fmt::Display for AssembledMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for AssembledMessage {
    fn as_ref(&self) -> &str { &self.0 }
}

impl PartialEq<&str> for AssembledMessage {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

/// Join the texts of a complete store by [`FRAGMENT_SEPARATOR`] in ascending
/// index order.
///
/// # Examples
///
/// ```
/// use fragment_decoder::{
///     fetch::FetchOutcome,
///     fragment::{CandidateId, Fragment, FragmentIndex, FragmentStore, assemble},
/// };
///
/// let mut store = FragmentStore::new();
/// for (id, index, text) in [(99, 3, "test"), (17, 0, "This"), (5, 2, "a"), (42, 1, "is")] {
///     let found = FetchOutcome::Found(Fragment::new(FragmentIndex::new(index), text));
///     store.merge(CandidateId::new(id), found);
/// }
/// assert_eq!(assemble(&store).expect("complete store").as_str(), "This is a test");
/// ```
///
/// # Errors
///
/// Returns [`AssemblyError::Empty`] for an empty store and
/// [`AssemblyError::Incomplete`] when any index below the maximum is missing.
pub fn assemble(store: &FragmentStore) -> Result<AssembledMessage, AssemblyError> {
    let Some(max) = store.max_index() else {
        return Err(AssemblyError::Empty);
    };

    let mut texts = Vec::with_capacity(store.len());
    for index in max.up_to_inclusive() {
        match store.get(index) {
            Some(text) => texts.push(text),
            None => {
                return Err(AssemblyError::Incomplete {
                    missing: store.gaps(),
                });
            }
        }
    }
    Ok(AssembledMessage(texts.join(FRAGMENT_SEPARATOR)))
}
