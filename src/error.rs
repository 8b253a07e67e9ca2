//! Canonical error and result types for the crate.
//!
//! This module defines the single public `DecodeError` surface returned by
//! [`run_decoder`](crate::run_decoder). Per-fetch failures never appear here:
//! they are absorbed as [`FetchOutcome::Error`](crate::fetch::FetchOutcome)
//! inside a run. Only configuration problems, client construction failures,
//! and an exhausted search end a run early.

use std::{fmt, time::Duration};

use thiserror::Error;

use crate::{config::ConfigError, fragment::AssemblyError};

/// Result type alias used throughout the public API.
pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// Top-level error type exposed by `fragment_decoder`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The configuration was rejected before any fetch was issued.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// Every cap was reached without completing the message.
    #[error(transparent)]
    ExhaustedSearch(#[from] ExhaustedSearch),
    /// The discovered fragments could not be assembled.
    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
}

impl DecodeError {
    /// Return the exhaustion details if the run gave up.
    #[must_use]
    pub fn as_exhausted(&self) -> Option<&ExhaustedSearch> {
        match self {
            Self::ExhaustedSearch(exhausted) => Some(exhausted),
            _ => None,
        }
    }
}

/// Which limit ended an unsuccessful run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExhaustionReason {
    /// The total request cap was reached.
    RequestCap,
    /// The total elapsed-time cap was reached.
    TimeCap,
    /// Too many consecutive sweep batches found nothing new.
    IdleBatchLimit,
    /// Every identifier up to the namespace ceiling was attempted.
    NamespaceExhausted,
}

impl fmt::Display for ExhaustionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RequestCap => "request cap reached",
            Self::TimeCap => "time cap reached",
            Self::IdleBatchLimit => "idle batch limit reached",
            Self::NamespaceExhausted => "namespace exhausted",
        })
    }
}

/// Diagnostics for a run that gave up before completion.
#[derive(Clone, Debug, Error, PartialEq)]
#[error(
    "search exhausted ({reason}) after {requests_made} requests in {elapsed:?}: \
     {fragments_found} fragment(s) found, fill ratio {fill_ratio:.2}"
)]
pub struct ExhaustedSearch {
    /// Limit that ended the run.
    pub reason: ExhaustionReason,
    /// Share of `0..=max_index` discovered when the run stopped.
    pub fill_ratio: f64,
    /// Number of distinct fragments discovered.
    pub fragments_found: usize,
    /// Number of fetches issued.
    pub requests_made: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}
