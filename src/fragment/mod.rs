//! Fragment primitives for discovering and reassembling the hidden message.
//!
//! This module collects the domain types the search engine builds on. Each
//! sub-module focuses on a single concept: identifiers, the index-keyed
//! store, the completion predicate, and the final assembly step.

pub mod assembly;
pub mod completion;
pub mod error;
pub mod id;
pub mod index;
pub mod record;
pub mod store;

pub use assembly::{AssembledMessage, FRAGMENT_SEPARATOR, assemble};
pub use completion::is_complete;
pub use error::{AssemblyError, MergeStatus};
pub use id::CandidateId;
pub use index::FragmentIndex;
pub use record::Fragment;
pub use store::FragmentStore;

#[cfg(test)]
mod tests;
