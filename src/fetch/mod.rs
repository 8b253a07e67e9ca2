//! Fragment fetching boundary.
//!
//! A [`FragmentSource`] turns one [`CandidateId`] into one [`FetchOutcome`].
//! Every failure is classified here so the rest of the engine never handles
//! transport errors directly: the search strategy only ever sees `Found`,
//! `Absent`, or `Error`.

pub mod http;
pub mod payload;

use async_trait::async_trait;
use thiserror::Error;

pub use self::{http::HttpSource, payload::decode_fragment};
use crate::fragment::{CandidateId, Fragment};

/// Classified result of fetching a single candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The candidate carries a fragment.
    Found(Fragment),
    /// The endpoint reported that the candidate has no fragment.
    Absent,
    /// The fetch failed; the candidate is not retried during this run.
    Error(FetchError),
}

impl FetchOutcome {
    /// Short label used for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Absent => "absent",
            Self::Error(_) => "error",
        }
    }
}

/// Reasons a single fetch failed.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No response arrived within the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// The request could not be sent or the response body could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The endpoint answered with an unexpected status code.
    #[error("unexpected status {0}")]
    Status(u16),
    /// A success response did not contain a usable fragment.
    #[error("malformed payload: {0}")]
    Payload(String),
    /// The source panicked while handling the candidate.
    #[error("fetch task panicked: {0}")]
    Panicked(String),
    /// The fetch task was cancelled before it produced an outcome.
    #[error("fetch task cancelled")]
    Cancelled,
    /// The limiter stopped admitting fetches before this candidate ran.
    #[error("concurrency limiter closed")]
    LimiterClosed,
}

/// Source of fragments addressed by candidate identifier.
///
/// Implementations must classify every failure into [`FetchOutcome::Error`]
/// rather than panicking or returning early. Sources are shared across all
/// concurrent fetch tasks, so any connection pool they hold must be safe for
/// concurrent use.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use fragment_decoder::{
///     fetch::{FetchOutcome, FragmentSource},
///     fragment::{CandidateId, Fragment, FragmentIndex},
/// };
///
/// struct Single;
///
/// #[async_trait]
/// impl FragmentSource for Single {
///     async fn fetch(&self, id: CandidateId) -> FetchOutcome {
///         if id.get() == 1 {
///             FetchOutcome::Found(Fragment::new(FragmentIndex::zero(), "hi"))
///         } else {
///             FetchOutcome::Absent
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait FragmentSource: Send + Sync + 'static {
    /// Fetch the fragment stored under `id`.
    async fn fetch(&self, id: CandidateId) -> FetchOutcome;
}
