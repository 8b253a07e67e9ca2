//! Run configuration for the decoder.
//!
//! [`DecoderConfig`] gathers the endpoint description, the concurrency and
//! timeout settings, and the search-policy knobs for each phase. Phase
//! boundaries are tunable policy rather than algorithmic constants; the
//! defaults below are the values the crate ships with.

mod builder;
pub mod endpoint;
pub mod error;

use std::{ops::RangeInclusive, time::Duration};

pub use builder::DecoderConfigBuilder;
pub use endpoint::{
    DEFAULT_BASE_URL,
    DEFAULT_PATH_TEMPLATE,
    EndpointConfig,
    ID_PLACEHOLDER,
    PayloadSchema,
};
pub use error::ConfigError;

/// Default cap on simultaneous fetches.
pub const DEFAULT_MAX_CONCURRENT: usize = 25;
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default range sampled during initial discovery.
pub const DEFAULT_SAMPLE_RANGE: RangeInclusive<u64> = 1..=1000;
/// Default number of candidates sampled during initial discovery.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;
/// Default number of gap-filling batches before falling back to a sweep.
pub const DEFAULT_PHASE2_BATCH_BUDGET: usize = 10;
/// Default spacing of gap-filling batches that probe beyond the focus window.
pub const DEFAULT_PHASE2_PROBE_INTERVAL: usize = 3;
/// Default cap on the total number of requests in a run.
pub const DEFAULT_REQUEST_CAP: usize = 10_000;
/// Default cap on the total wall-clock time of a run.
pub const DEFAULT_TIME_CAP: Duration = Duration::from_secs(30);
/// Default number of consecutive fruitless sweep batches before giving up.
pub const DEFAULT_IDLE_BATCH_LIMIT: usize = 100;
/// Default lowest identifier considered part of the namespace.
pub const DEFAULT_NAMESPACE_MIN: u64 = 1;
/// Default highest identifier considered part of the namespace.
pub const DEFAULT_NAMESPACE_MAX: u64 = 10_000;
/// Highest accepted request rate, in requests per second.
pub const MAX_RATE_LIMIT: usize = 10_000;

/// Settings for a single decoding run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fragment_decoder::config::DecoderConfig;
///
/// let config = DecoderConfig::builder()
///     .base_url("http://localhost:8888")
///     .max_concurrent(30)
///     .timeout(Duration::from_secs(2))
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.phase2_batch_size(), 30);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Remote endpoint and response classification.
    pub endpoint: EndpointConfig,
    /// Maximum number of fetches in flight at once.
    pub max_concurrent: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Identifiers sampled during initial discovery.
    pub initial_sample_range: RangeInclusive<u64>,
    /// Number of identifiers sampled during initial discovery.
    pub initial_sample_size: usize,
    /// Gap-filling batch size; `None` uses `max_concurrent`.
    pub phase2_batch_size: Option<usize>,
    /// Number of gap-filling batches before the sweep fallback.
    pub phase2_batch_budget: usize,
    /// Every n-th gap-filling batch samples beyond the focus window.
    pub phase2_probe_interval: usize,
    /// Sweep batch size; `None` uses `max_concurrent`.
    pub phase3_batch_size: Option<usize>,
    /// Hard cap on requests issued across the whole run.
    pub phase3_request_cap: usize,
    /// Hard cap on elapsed time across the whole run.
    pub phase3_time_cap: Duration,
    /// Give up after this many consecutive sweep batches without a new
    /// fragment; `None` disables the limit.
    pub phase3_idle_batch_limit: Option<usize>,
    /// Lowest identifier probed by any phase; the sweep starts here.
    pub namespace_min: u64,
    /// Highest identifier probed by any phase.
    pub namespace_max: u64,
    /// Optional global request rate in requests per second.
    pub rate_limit: Option<usize>,
    /// Seed for candidate sampling; `None` draws from system entropy.
    pub seed: Option<u64>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: DEFAULT_TIMEOUT,
            initial_sample_range: DEFAULT_SAMPLE_RANGE,
            initial_sample_size: DEFAULT_SAMPLE_SIZE,
            phase2_batch_size: None,
            phase2_batch_budget: DEFAULT_PHASE2_BATCH_BUDGET,
            phase2_probe_interval: DEFAULT_PHASE2_PROBE_INTERVAL,
            phase3_batch_size: None,
            phase3_request_cap: DEFAULT_REQUEST_CAP,
            phase3_time_cap: DEFAULT_TIME_CAP,
            phase3_idle_batch_limit: Some(DEFAULT_IDLE_BATCH_LIMIT),
            namespace_min: DEFAULT_NAMESPACE_MIN,
            namespace_max: DEFAULT_NAMESPACE_MAX,
            rate_limit: None,
            seed: None,
        }
    }
}

impl DecoderConfig {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> DecoderConfigBuilder { DecoderConfigBuilder::default() }

    /// Effective gap-filling batch size.
    #[must_use]
    pub fn phase2_batch_size(&self) -> usize {
        self.phase2_batch_size.unwrap_or(self.max_concurrent)
    }

    /// Effective sweep batch size.
    #[must_use]
    pub fn phase3_batch_size(&self) -> usize {
        self.phase3_batch_size.unwrap_or(self.max_concurrent)
    }

    /// Reject settings that cannot drive a terminating run.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::NonPositiveTimeout);
        }
        let (start, end) = (
            *self.initial_sample_range.start(),
            *self.initial_sample_range.end(),
        );
        if start > end {
            return Err(ConfigError::EmptySampleRange { start, end });
        }
        if start < self.namespace_min || end > self.namespace_max {
            return Err(ConfigError::SampleRangeOutsideNamespace {
                start,
                end,
                namespace_min: self.namespace_min,
                namespace_max: self.namespace_max,
            });
        }
        if self.initial_sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        if self.phase2_batch_size() == 0 {
            return Err(ConfigError::ZeroBatchSize { phase: "gap-filling" });
        }
        if self.phase3_batch_size() == 0 {
            return Err(ConfigError::ZeroBatchSize { phase: "sweep" });
        }
        if self.phase2_probe_interval == 0 {
            return Err(ConfigError::ZeroProbeInterval);
        }
        if self.phase3_request_cap == 0 {
            return Err(ConfigError::ZeroRequestCap);
        }
        if self.phase3_time_cap.is_zero() {
            return Err(ConfigError::ZeroTimeCap);
        }
        if self.phase3_idle_batch_limit == Some(0) {
            return Err(ConfigError::ZeroIdleBatchLimit);
        }
        if let Some(rate) = self.rate_limit
            && !(1..=MAX_RATE_LIMIT).contains(&rate)
        {
            return Err(ConfigError::InvalidRate(rate));
        }
        self.endpoint.validate()
    }
}
