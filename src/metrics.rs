//! Metric helpers for `fragment_decoder`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate. With the
//! `metrics` feature disabled every helper is a no-op.

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

use crate::fetch::FetchOutcome;

/// Name of the counter tracking completed fetches, labelled by outcome.
pub const FETCHES_TOTAL: &str = "fragment_decoder_fetches_total";
/// Name of the gauge tracking fetches currently in flight.
pub const FETCHES_IN_FLIGHT: &str = "fragment_decoder_fetches_in_flight";
/// Name of the counter tracking fragments added to the store.
pub const FRAGMENTS_DISCOVERED: &str = "fragment_decoder_fragments_discovered_total";

/// Increment the in-flight gauge.
pub fn inc_in_flight() {
    #[cfg(feature = "metrics")]
    gauge!(FETCHES_IN_FLIGHT).increment(1.0);
}

/// Decrement the in-flight gauge.
pub fn dec_in_flight() {
    #[cfg(feature = "metrics")]
    gauge!(FETCHES_IN_FLIGHT).decrement(1.0);
}

/// Record a completed fetch with its outcome label.
pub fn inc_fetches(outcome: &FetchOutcome) {
    #[cfg(feature = "metrics")]
    counter!(FETCHES_TOTAL, "outcome" => outcome.label()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome;
}

/// Record a newly discovered fragment.
pub fn inc_discovered() {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_DISCOVERED).increment(1);
}
