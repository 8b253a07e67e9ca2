use super::FragmentIndex;

/// One indexed piece of the hidden message.
///
/// # Examples
///
/// ```
/// use fragment_decoder::fragment::{Fragment, FragmentIndex};
/// let fragment = Fragment::new(FragmentIndex::new(2), "a");
/// assert_eq!(fragment.index().get(), 2);
/// assert_eq!(fragment.text(), "a");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fragment {
    index: FragmentIndex,
    text: String,
}

impl Fragment {
    /// Create a fragment from its index and text payload.
    #[must_use]
    pub fn new(index: FragmentIndex, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Position of the fragment within the message.
    #[must_use]
    pub const fn index(&self) -> FragmentIndex { self.index }

    /// Borrow the fragment text.
    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    /// Consume the fragment, returning its index and owned text.
    #[must_use]
    pub fn into_parts(self) -> (FragmentIndex, String) { (self.index, self.text) }
}
