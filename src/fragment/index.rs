//! Position of a fragment within the reassembled message.

use std::num::TryFromIntError;

use derive_more::{Display, From, Into};

/// Zero-based position of a fragment in the message.
///
/// Indices, not candidate identifiers, decide message order. Payloads carry
/// the index as a JSON integer, so conversion from `u64` is fallible.
///
/// # Examples
///
/// ```
/// use fragment_decoder::fragment::FragmentIndex;
///
/// let last = FragmentIndex::new(3);
/// assert_eq!(last.message_len(), 4);
/// assert_eq!(last.up_to_inclusive().count(), 4);
/// assert!(FragmentIndex::try_from(u64::MAX).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0}")]
pub struct FragmentIndex(u32);

impl FragmentIndex {
    /// Wrap a raw position.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Position of the first word.
    #[must_use]
    pub const fn zero() -> Self { Self(0) }

    /// Raw position.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    /// Number of fragments a message ending at this index holds.
    #[must_use]
    pub fn message_len(self) -> u64 { u64::from(self.0) + 1 }

    /// Every index from zero through `self`, in message order.
    pub fn up_to_inclusive(self) -> impl Iterator<Item = FragmentIndex> { (0..=self.0).map(Self) }
}

impl TryFrom<u64> for FragmentIndex {
    type Error = TryFromIntError;

    fn try_from(value: u64) -> Result<Self, Self::Error> { u32::try_from(value).map(Self) }
}
