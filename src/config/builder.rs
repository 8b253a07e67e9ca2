//! Builder for [`DecoderConfig`].

use std::{ops::RangeInclusive, time::Duration};

use reqwest::Method;

use super::{ConfigError, DecoderConfig, EndpointConfig, PayloadSchema};

/// Consuming builder for [`DecoderConfig`].
///
/// Starts from [`DecoderConfig::default`]; [`build`](Self::build) validates
/// the result so an invalid configuration never reaches the search engine.
///
/// # Examples
///
/// ```
/// use fragment_decoder::config::DecoderConfig;
///
/// let config = DecoderConfig::builder()
///     .initial_sample_range(1..=500)
///     .initial_sample_size(40)
///     .seed(7)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.initial_sample_size, 40);
///
/// let err = DecoderConfig::builder().max_concurrent(0).build();
/// assert!(err.is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecoderConfigBuilder {
    config: DecoderConfig,
}

impl DecoderConfigBuilder {
    /// Replace the whole endpoint description.
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.config.endpoint = endpoint;
        self
    }

    /// Set the base URL of the fragment service.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.endpoint.base_url = base_url.into();
        self
    }

    /// Set the request path template; it must contain `{id}`.
    #[must_use]
    pub fn path_template(mut self, template: impl Into<String>) -> Self {
        self.config.endpoint.path_template = template.into();
        self
    }

    /// Set the HTTP method used for fetches.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.config.endpoint.method = method;
        self
    }

    /// Set the status codes treated as "no fragment here".
    #[must_use]
    pub fn not_found_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.config.endpoint.not_found_statuses = statuses.into_iter().collect();
        self
    }

    /// Set where the index and text live in success payloads.
    #[must_use]
    pub fn payload(mut self, payload: PayloadSchema) -> Self {
        self.config.endpoint.payload = payload;
        self
    }

    /// Set the maximum number of fetches in flight.
    #[must_use]
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.config.max_concurrent = max_concurrent;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the per-request timeout in fractional seconds.
    ///
    /// Negative, zero, and non-finite values are rejected by
    /// [`build`](Self::build).
    #[must_use]
    pub fn timeout_secs(mut self, seconds: f64) -> Self {
        self.config.timeout = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);
        self
    }

    /// Set the identifier range sampled during initial discovery.
    #[must_use]
    pub fn initial_sample_range(mut self, range: RangeInclusive<u64>) -> Self {
        self.config.initial_sample_range = range;
        self
    }

    /// Set the number of identifiers sampled during initial discovery.
    #[must_use]
    pub fn initial_sample_size(mut self, size: usize) -> Self {
        self.config.initial_sample_size = size;
        self
    }

    /// Set the gap-filling batch size.
    #[must_use]
    pub fn phase2_batch_size(mut self, size: usize) -> Self {
        self.config.phase2_batch_size = Some(size);
        self
    }

    /// Set how many gap-filling batches run before the sweep fallback.
    #[must_use]
    pub fn phase2_batch_budget(mut self, budget: usize) -> Self {
        self.config.phase2_batch_budget = budget;
        self
    }

    /// Probe beyond the focus window every `interval` gap-filling batches.
    #[must_use]
    pub fn phase2_probe_interval(mut self, interval: usize) -> Self {
        self.config.phase2_probe_interval = interval;
        self
    }

    /// Set the sweep batch size.
    #[must_use]
    pub fn phase3_batch_size(mut self, size: usize) -> Self {
        self.config.phase3_batch_size = Some(size);
        self
    }

    /// Cap the total number of requests issued by the run.
    #[must_use]
    pub fn phase3_request_cap(mut self, cap: usize) -> Self {
        self.config.phase3_request_cap = cap;
        self
    }

    /// Cap the total elapsed time of the run.
    #[must_use]
    pub fn phase3_time_cap(mut self, cap: Duration) -> Self {
        self.config.phase3_time_cap = cap;
        self
    }

    /// Give up after `limit` consecutive fruitless sweep batches.
    ///
    /// Passing `None` disables the limit.
    #[must_use]
    pub fn phase3_idle_batch_limit(mut self, limit: Option<usize>) -> Self {
        self.config.phase3_idle_batch_limit = limit;
        self
    }

    /// Set the lowest identifier any phase may probe.
    #[must_use]
    pub fn namespace_min(mut self, namespace_min: u64) -> Self {
        self.config.namespace_min = namespace_min;
        self
    }

    /// Set the highest identifier any phase may probe.
    #[must_use]
    pub fn namespace_max(mut self, namespace_max: u64) -> Self {
        self.config.namespace_max = namespace_max;
        self
    }

    /// Set the global request rate in requests per second.
    ///
    /// Passing `None` disables rate limiting.
    #[must_use]
    pub fn rate_limit(mut self, rate: Option<usize>) -> Self {
        self.config.rate_limit = rate;
        self
    }

    /// Seed candidate sampling for reproducible runs.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] reported by
    /// [`DecoderConfig::validate`].
    pub fn build(self) -> Result<DecoderConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
