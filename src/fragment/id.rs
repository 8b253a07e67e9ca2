//! Probe identifiers in the remote fragment namespace.

use derive_more::{Display, From, Into};

/// Integer probe value sent to the remote endpoint.
///
/// A candidate may or may not map to a fragment. Identifiers are only
/// scheduling input: they carry no ordering meaning for the assembled message.
///
/// # Examples
///
/// ```
/// use fragment_decoder::fragment::CandidateId;
/// let id = CandidateId::new(42);
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0}")]
pub struct CandidateId(u64);

impl CandidateId {
    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}
