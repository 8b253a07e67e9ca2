//! Validation errors for [`DecoderConfig`](crate::config::DecoderConfig).

use thiserror::Error;

use super::MAX_RATE_LIMIT;

/// Reasons a configuration is rejected before any fetch is issued.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_concurrent` was zero.
    #[error("max_concurrent must be at least 1")]
    ZeroConcurrency,
    /// The per-request timeout was zero, negative, or not finite.
    #[error("timeout must be a positive duration")]
    NonPositiveTimeout,
    /// The initial sample range contains no identifiers.
    #[error("initial sample range {start}..={end} is empty")]
    EmptySampleRange { start: u64, end: u64 },
    /// The initial sample range is not contained in the namespace.
    #[error(
        "initial sample range {start}..={end} lies outside namespace \
         {namespace_min}..={namespace_max}"
    )]
    SampleRangeOutsideNamespace {
        start: u64,
        end: u64,
        namespace_min: u64,
        namespace_max: u64,
    },
    /// `initial_sample_size` was zero.
    #[error("initial_sample_size must be at least 1")]
    ZeroSampleSize,
    /// A phase batch size was zero.
    #[error("{phase} batch size must be at least 1")]
    ZeroBatchSize { phase: &'static str },
    /// `phase2_probe_interval` was zero.
    #[error("phase2_probe_interval must be at least 1")]
    ZeroProbeInterval,
    /// `phase3_request_cap` was zero.
    #[error("phase3_request_cap must be at least 1")]
    ZeroRequestCap,
    /// `phase3_time_cap` was zero.
    #[error("phase3_time_cap must be a positive duration")]
    ZeroTimeCap,
    /// `phase3_idle_batch_limit` was set to zero.
    #[error("phase3_idle_batch_limit must be at least 1 when set")]
    ZeroIdleBatchLimit,
    /// The request rate was zero or exceeded [`MAX_RATE_LIMIT`].
    #[error("invalid rate {0}; must be between 1 and {max}", max = MAX_RATE_LIMIT)]
    InvalidRate(usize),
    /// The endpoint URL could not be parsed.
    #[error("invalid endpoint url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The path template lacks the identifier placeholder.
    #[error("path template {0:?} does not contain {{id}}")]
    MissingIdPlaceholder(String),
    /// A payload field pointer is not a JSON pointer.
    #[error("payload pointer {0:?} must be empty or start with '/'")]
    InvalidPayloadPointer(String),
    /// A configured "not found" status is not a valid HTTP status code.
    #[error("invalid not-found status {0}")]
    InvalidStatus(u16),
}
